//! In-memory search over entry lists, mirroring what the clients render.

use crate::entries::repo::Entry;

/// Case-insensitive substring match over reference code, particulars,
/// client code and creator. A blank query keeps everything.
pub fn matches_query(entry: &Entry, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    entry.reference_code.to_lowercase().contains(&q)
        || entry.particulars.to_lowercase().contains(&q)
        || entry.client_code.to_lowercase().contains(&q)
        || entry.created_by.to_lowercase().contains(&q)
}

pub fn filter_entries(entries: Vec<Entry>, query: &str) -> Vec<Entry> {
    if query.trim().is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| matches_query(e, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn entry(reference_code: &str, particulars: &str, client_code: &str, creator: &str) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            serial_no: 1,
            particulars: particulars.into(),
            client_code: client_code.into(),
            capacity_mw: 5.0,
            state_code: "KA".into(),
            site_code: "SJPR".into(),
            reference_code: reference_code.into(),
            created_by: creator.into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            modified_by: None,
            modified_at: None,
            is_active: true,
        }
    }

    #[test]
    fn empty_query_returns_all() {
        let entries = vec![
            entry("IPR/TC/ADN/5MW/KA/SJPR/2503/01", "TC", "ADN", "alice"),
            entry("IPR/GC/HFEX/9MW/TN/GRID/2503/02", "GC", "HFEX", "bob"),
        ];
        assert_eq!(filter_entries(entries.clone(), "").len(), 2);
        assert_eq!(filter_entries(entries, "   ").len(), 2);
    }

    #[test]
    fn match_is_case_insensitive() {
        let e = entry("IPR/TC/ADN/5MW/KA/SJPR/2503/01", "TC", "ADN", "Alice");
        assert!(matches_query(&e, "adn"));
        assert!(matches_query(&e, "ALICE"));
        assert!(matches_query(&e, "ipr/tc"));
    }

    #[test]
    fn matches_any_of_the_four_fields() {
        let e = entry("IPR/TC/ADN/5MW/KA/SJPR/2503/01", "TC", "HEXA", "bob");
        assert!(matches_query(&e, "TC"));
        assert!(matches_query(&e, "HEXA"));
        assert!(matches_query(&e, "bob"));
        assert!(matches_query(&e, "SJPR")); // via the reference code
    }

    #[test]
    fn non_matching_query_excludes_entry() {
        let e = entry("IPR/TC/ADN/5MW/KA/SJPR/2503/01", "TC", "ADN", "alice");
        assert!(!matches_query(&e, "zzz"));
        // State and site codes on their own are not searched fields.
        let filtered = filter_entries(vec![e], "nope");
        assert!(filtered.is_empty());
    }
}
