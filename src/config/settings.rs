use std::env;

/// Bootstrap settings read from the environment before anything else
/// starts.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_url: String,
    pub bind_address: String,
    pub log_level: String,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://account_service.db?mode=rwc".to_string());

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(28852);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            bind_address: format!("{}:{}", host, port),
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("SERVER_HOST");
        std::env::remove_var("SERVER_PORT");
        std::env::remove_var("LOG_LEVEL");

        let settings = ServerSettings::from_env();
        assert!(settings.database_url.starts_with("sqlite://"));
        assert_eq!(settings.bind_address, "0.0.0.0:28852");
        assert_eq!(settings.log_level, "info");
    }
}
