use serde::Deserialize;

/// Environment-variable-driven configuration, per §6. The engine itself only
/// ever reads `first_superuser_*` (bootstrap is an external collaborator per
/// §1, but the shape is carried here so a binary wiring this crate up has one
/// place to load it from) — `database_url`/`secret_key`/`jwt_algorithm`/
/// `access_token_expire_minutes` are carried for the same reason even though
/// this crate never opens a socket or signs a token itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub secret_key: String,
    pub jwt_algorithm: String,
    pub access_token_expire_minutes: u32,
    pub first_superuser_email: String,
    pub first_superuser_password: String,
    pub first_superuser_full_name: String,
}

impl Settings {
    /// Loads from the process environment (optionally pre-populated from a
    /// `.env` file by the caller via `dotenvy::dotenv()`), the way the
    /// pack's service binaries assemble their `AppConfig`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reports_missing_required_keys() {
        // No env vars populated in the test process: must fail, not panic.
        assert!(Settings::from_env().is_err());
    }
}
