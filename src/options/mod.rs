mod dto;
pub mod handlers;
pub mod repo;
pub mod seed;

use crate::state::AppState;
use axum::Router;

pub const OPTION_TYPES: [&str; 4] = ["PARTICULARS", "CLIENT_CODE", "STATE_NAME", "SITE_NAME"];

pub fn is_known_type(value: &str) -> bool {
    OPTION_TYPES.contains(&value)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_four_categories() {
        for t in OPTION_TYPES {
            assert!(is_known_type(t));
        }
        assert!(!is_known_type("COLOUR"));
        assert!(!is_known_type("particulars"));
    }
}
