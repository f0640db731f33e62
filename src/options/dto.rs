use serde::Deserialize;

/// Request body for adding a custom option.
#[derive(Debug, Deserialize)]
pub struct AddOptionRequest {
    pub option_type: String,
    pub value: String,
    pub display_name: Option<String>,
}

/// Request body for the admin active toggle.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}
