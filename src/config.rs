use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Bootstrap admin address: the one account promoted to the admin role.
    /// Replaces the hard-coded address of earlier builds; promotion is audited.
    pub admin_email: Option<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let admin_email = std::env::var("ADMIN_EMAIL")
            .ok()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "refgen".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "refgen-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        Ok(Self {
            database_url,
            admin_email,
            jwt,
        })
    }

    pub fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .map(|a| a.eq_ignore_ascii_case(email.trim()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_admin(addr: Option<&str>) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".into(),
            admin_email: addr.map(|a| a.to_string()),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        }
    }

    #[test]
    fn bootstrap_admin_match_is_case_insensitive() {
        let cfg = config_with_admin(Some("admin@example.com"));
        assert!(cfg.is_bootstrap_admin("Admin@Example.COM"));
        assert!(!cfg.is_bootstrap_admin("other@example.com"));
    }

    #[test]
    fn no_admin_email_means_no_promotion() {
        let cfg = config_with_admin(None);
        assert!(!cfg.is_bootstrap_admin("admin@example.com"));
    }
}
