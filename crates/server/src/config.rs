use std::time::Duration;

use tvsearch_catalog::CatalogConfig;

/// Process configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparsable numbers fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("TVSEARCH_BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let defaults = CatalogConfig::default();
        let base_url = lookup("TVSEARCH_UPSTREAM_URL").unwrap_or(defaults.base_url);
        let timeout = lookup("TVSEARCH_UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            bind_addr: format!("{host}:{port}"),
            catalog: CatalogConfig { base_url, timeout },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.catalog.base_url, "https://api.tvmaze.com");
        assert_eq!(cfg.catalog.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let cfg = config_from(&[
            ("PORT", "8080"),
            ("TVSEARCH_BIND_HOST", "127.0.0.1"),
            ("TVSEARCH_UPSTREAM_URL", "http://localhost:9999"),
            ("TVSEARCH_UPSTREAM_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.catalog.base_url, "http://localhost:9999");
        assert_eq!(cfg.catalog.timeout, Duration::from_secs(3));
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let cfg = config_from(&[("PORT", "eighty"), ("TVSEARCH_UPSTREAM_TIMEOUT_SECS", "-1")]);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.catalog.timeout, Duration::from_secs(10));
    }
}
