/// Runtime configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_HOST | 0.0.0.0 | bind address |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ACTOR_BUFFER_SIZE | 32 | mailbox capacity of every actor |
/// | LOG_LEVEL | info | default filter when RUST_LOG is unset |
/// | LOG_JSON | false | JSON log lines instead of compact text |
/// | CURRENCY | USD | currency recorded on payments |
/// | SEED_DEMO_DATA | false | create demo users and a product at startup |
///
/// Unparsable values fall back to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub actor_buffer_size: usize,
    pub log_level: String,
    pub log_json: bool,
    pub currency: String,
    pub seed_demo_data: bool,
}

impl Config {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            http_host: var("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            actor_buffer_size: var("ACTOR_BUFFER_SIZE")
                .and_then(|p| p.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(32),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: var("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            currency: var("CURRENCY").unwrap_or_else(|| "USD".into()),
            seed_demo_data: var("SEED_DEMO_DATA")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.actor_buffer_size, 32);
        assert_eq!(config.currency, "USD");
        assert!(!config.log_json);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let vars: HashMap<&str, &str> = [
            ("HTTP_PORT", "8080"),
            ("ACTOR_BUFFER_SIZE", "0"),
            ("LOG_JSON", "true"),
            ("CURRENCY", "EUR"),
            ("SEED_DEMO_DATA", "yes"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.actor_buffer_size, 32);
        assert!(config.log_json);
        assert_eq!(config.currency, "EUR");
        // only "true"/"false" parse
        assert!(!config.seed_demo_data);
    }
}
