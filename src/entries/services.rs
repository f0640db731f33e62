use time::OffsetDateTime;
use tracing::info;

use crate::audit;
use crate::auth::repo::User;
use crate::entries::dto::EntryRequest;
use crate::entries::refcode::{cumulative_count, format_reference_code};
use crate::entries::repo::Entry;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::validate;

pub fn validate_request(req: &EntryRequest) -> ApiResult<()> {
    validate::particulars(&req.particulars)?;
    validate::short_code(&req.client_code, "Client code")?;
    validate::capacity_mw(req.capacity_mw)?;
    validate::short_code(&req.state_code, "State code")?;
    validate::short_code(&req.site_code, "Site code")?;
    Ok(())
}

/// Allocate a serial, derive the reference code from it and the current
/// year/month, and persist the entry. The code is computed exactly once here.
pub async fn create_entry(state: &AppState, creator: &User, req: &EntryRequest) -> ApiResult<Entry> {
    validate_request(req)?;

    let serial = state.serials.allocate().await?;

    let now = OffsetDateTime::now_utc();
    let reference_code = format_reference_code(
        &req.particulars,
        &req.client_code,
        req.capacity_mw,
        &req.state_code,
        &req.site_code,
        serial,
        now.year(),
        u8::from(now.month()),
    );

    let entry = Entry::insert(
        &state.db,
        serial,
        &req.particulars,
        &req.client_code,
        req.capacity_mw,
        &req.state_code,
        &req.site_code,
        &reference_code,
        &creator.username,
    )
    .await?;

    audit::record(
        &state.db,
        creator.id,
        &creator.username,
        audit::actions::CREATE,
        audit::entities::ENTRY,
        &entry.id.to_string(),
        &format!(
            "{} (cumulative {})",
            reference_code,
            cumulative_count(serial)
        ),
    )
    .await;

    info!(entry_id = %entry.id, serial, %reference_code, "entry created");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EntryRequest {
        EntryRequest {
            particulars: "TC".into(),
            client_code: "ADN".into(),
            capacity_mw: 5.0,
            state_code: "KA".into(),
            site_code: "SJPR".into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_request(&request()).is_ok());
    }

    #[test]
    fn rejects_bad_capacity() {
        let mut req = request();
        req.capacity_mw = 0.0;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn rejects_out_of_range_codes() {
        let mut req = request();
        req.client_code = "X".into();
        assert!(validate_request(&req).is_err());

        let mut req = request();
        req.site_code = "TOOLONG".into();
        assert!(validate_request(&req).is_err());
    }
}
