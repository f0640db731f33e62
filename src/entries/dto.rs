use serde::Deserialize;

/// Attribute fields submitted when creating or editing an entry. Serial and
/// reference code are never client-supplied.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub particulars: String,
    pub client_code: String,
    pub capacity_mw: f64,
    pub state_code: String,
    pub site_code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}
