//! First-run seeding of the system dropdown set and the entries counter.

use sqlx::PgPool;
use tracing::info;

use crate::entries::serial::ENTRIES_COUNTER;
use crate::error::ApiResult;
use crate::options::repo::DropdownOption;

const SYSTEM_USER: &str = "system";

const DEFAULT_OPTIONS: &[(&str, &str, &str)] = &[
    ("PARTICULARS", "TC", "Type Check"),
    ("PARTICULARS", "GC", "Grid Connection"),
    ("PARTICULARS", "PQM", "Power Quality Monitor"),
    ("PARTICULARS", "EVF", "Emergency Verification"),
    ("PARTICULARS", "OPT", "Optimization"),
    ("CLIENT_CODE", "HFEX", "Haryana Electricity Exchange"),
    ("CLIENT_CODE", "ADN", "Adani Power"),
    ("CLIENT_CODE", "HEXA", "Hexagon Energy"),
    ("CLIENT_CODE", "GE", "General Electric"),
    ("SITE_NAME", "SJPR", "SARJAPUR"),
    ("SITE_NAME", "BNSK", "BANSHANKARI"),
    ("SITE_NAME", "GRID", "Grid Station"),
    ("STATE_NAME", "KA", "Karnataka"),
    ("STATE_NAME", "TN", "Tamil Nadu"),
    ("STATE_NAME", "AP", "Andhra Pradesh"),
    ("STATE_NAME", "TS", "Telangana"),
];

/// Inserts the default option set and a zeroed entries counter, once.
/// Guarded by an emptiness check so a restarted service never reseeds.
pub async fn seed_defaults(db: &PgPool) -> ApiResult<()> {
    if DropdownOption::count(db).await? > 0 {
        return Ok(());
    }

    for &(option_type, value, display_name) in DEFAULT_OPTIONS {
        DropdownOption::insert(db, option_type, value, Some(display_name), false, SYSTEM_USER)
            .await?;
    }

    sqlx::query(
        r#"INSERT INTO counters (name, count) VALUES ($1, 0) ON CONFLICT (name) DO NOTHING"#,
    )
    .bind(ENTRIES_COUNTER)
    .execute(db)
    .await?;

    info!(options = DEFAULT_OPTIONS.len(), "seeded default dropdown options");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::is_known_type;
    use std::collections::HashSet;

    #[test]
    fn defaults_use_known_types_only() {
        for (option_type, _, _) in DEFAULT_OPTIONS {
            assert!(is_known_type(option_type), "bad type {option_type}");
        }
    }

    #[test]
    fn defaults_are_unique_per_type_and_value() {
        let mut seen = HashSet::new();
        for (option_type, value, _) in DEFAULT_OPTIONS {
            assert!(seen.insert((option_type, value)), "duplicate {value}");
        }
    }
}
