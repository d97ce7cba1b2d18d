//! Network configuration
//!
//! A `NetworkConfig` is constructed once and handed to every component.
//! Nothing reads process-wide state after construction.

use crate::error::{ClientError, ClientResult};
use crate::validate::{is_valid_core_uri, is_valid_gateway_uri};
use std::time::Duration;

/// Built-in Core seed addresses
pub const DEFAULT_CORE_SEEDS: &[&str] = &[
    "3.142.136.148",
    "18.118.26.31",
    "3.133.161.241",
    "18.220.31.138",
    "3.145.43.113",
];

/// Known-good Gateways used when discovery fails
pub const DEFAULT_FALLBACK_GATEWAYS: &[&str] = &[
    "http://3.133.135.157",
    "http://18.191.50.129",
    "http://18.224.185.143",
];

/// Gateway used for verification when the caller does not name one
pub const DEFAULT_VERIFY_GATEWAY: &str = "http://3.17.155.208";

/// Proof whitelist host, never used as a submission target
pub const DENYLISTED_GATEWAY: &str = "3.92.247.27";

/// Client configuration for the anchoring network
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Core addresses (`host[:port]`) used to seed discovery
    pub core_seeds: Vec<String>,

    /// Gateway URIs used when discovery fails
    pub fallback_gateways: Vec<String>,

    /// Gateway URI used by verification when none is given
    pub default_verify_gateway: String,

    /// Gateway address excluded from discovery results
    pub denylisted_gateway: String,

    /// Scheme used to reach discovered nodes
    pub node_scheme: String,

    /// Strict discovery: Core seeds must be DNS names with this suffix
    pub core_dns_suffix: Option<String>,

    /// Number of seed Cores drawn for discovery
    pub core_count: usize,

    /// Gateways required before discovery stops
    pub min_gateways: usize,

    /// Per-request timeout for submit/get/verify in milliseconds
    pub request_timeout_ms: u64,

    /// Per-request timeout for peer and Gateway list requests in milliseconds
    pub discovery_timeout_ms: u64,

    /// Timeout for endpoint health probes in milliseconds
    pub probe_timeout_ms: u64,

    /// Extra attempts per discovery candidate (0 = single attempt)
    pub discovery_retries: u32,

    /// Backoff step between discovery retries in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            core_seeds: to_strings(DEFAULT_CORE_SEEDS),
            fallback_gateways: to_strings(DEFAULT_FALLBACK_GATEWAYS),
            default_verify_gateway: DEFAULT_VERIFY_GATEWAY.to_string(),
            denylisted_gateway: DENYLISTED_GATEWAY.to_string(),
            node_scheme: "http".to_string(),
            core_dns_suffix: None,
            core_count: 3,
            min_gateways: 3,
            request_timeout_ms: 10_000,
            discovery_timeout_ms: 10_000,
            probe_timeout_ms: 150,
            discovery_retries: 0,
            retry_backoff_ms: 250,
        }
    }
}

impl NetworkConfig {
    /// Create config from environment variables
    ///
    /// Environment variables:
    /// - `CHAINPOINT_CORES`: Comma-separated Core seed addresses
    /// - `CHAINPOINT_GATEWAYS`: Comma-separated fallback Gateway URIs
    /// - `CHAINPOINT_VERIFY_GATEWAY`: Default verification Gateway URI
    /// - `CHAINPOINT_CORE_DNS_SUFFIX`: Enables strict Core discovery
    /// - `CHAINPOINT_REQUEST_TIMEOUT_MS`: Request timeout (default: 10000)
    /// - `CHAINPOINT_DISCOVERY_TIMEOUT_MS`: Discovery timeout (default: 10000)
    /// - `CHAINPOINT_DISCOVERY_RETRIES`: Retries per discovery candidate (default: 0)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let core_seeds = env_list("CHAINPOINT_CORES").unwrap_or(defaults.core_seeds);
        let fallback_gateways =
            env_list("CHAINPOINT_GATEWAYS").unwrap_or(defaults.fallback_gateways);

        let default_verify_gateway = std::env::var("CHAINPOINT_VERIFY_GATEWAY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_verify_gateway);

        let core_dns_suffix = std::env::var("CHAINPOINT_CORE_DNS_SUFFIX")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            core_seeds,
            fallback_gateways,
            default_verify_gateway,
            core_dns_suffix,
            request_timeout_ms: env_number("CHAINPOINT_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            discovery_timeout_ms: env_number("CHAINPOINT_DISCOVERY_TIMEOUT_MS")
                .unwrap_or(defaults.discovery_timeout_ms),
            discovery_retries: env_number("CHAINPOINT_DISCOVERY_RETRIES")
                .unwrap_or(defaults.discovery_retries),
            ..defaults
        }
    }

    /// Check seed addresses and Gateway URIs
    pub fn validate(&self) -> ClientResult<()> {
        let suffix = self.core_dns_suffix.as_deref();
        let bad_cores: Vec<&str> = self
            .core_seeds
            .iter()
            .filter(|seed| !is_valid_core_uri(&self.node_uri(seed), suffix))
            .map(String::as_str)
            .collect();
        if !bad_cores.is_empty() {
            return Err(ClientError::Config(format!(
                "invalid Core seed addresses : {}",
                bad_cores.join(", ")
            )));
        }

        let bad_gateways: Vec<&str> = self
            .fallback_gateways
            .iter()
            .chain(std::iter::once(&self.default_verify_gateway))
            .filter(|uri| !is_valid_gateway_uri(uri))
            .map(String::as_str)
            .collect();
        if !bad_gateways.is_empty() {
            return Err(ClientError::Config(format!(
                "invalid Gateway URIs : {}",
                bad_gateways.join(", ")
            )));
        }

        if self.core_count == 0 || self.min_gateways == 0 {
            return Err(ClientError::Config(
                "core_count and min_gateways must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Build a node URI from a bare address
    pub fn node_uri(&self, address: &str) -> String {
        format!("{}://{}", self.node_scheme, address)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|s| {
        s.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: &[&str] = &[
        "CHAINPOINT_CORES",
        "CHAINPOINT_GATEWAYS",
        "CHAINPOINT_VERIFY_GATEWAY",
        "CHAINPOINT_CORE_DNS_SUFFIX",
        "CHAINPOINT_REQUEST_TIMEOUT_MS",
        "CHAINPOINT_DISCOVERY_TIMEOUT_MS",
        "CHAINPOINT_DISCOVERY_RETRIES",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.core_seeds.len(), 5);
        assert_eq!(config.fallback_gateways.len(), 3);
        assert_eq!(config.default_verify_gateway, "http://3.17.155.208");
        assert_eq!(config.denylisted_gateway, "3.92.247.27");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.probe_timeout_ms, 150);
        assert_eq!(config.discovery_retries, 0);
        assert_eq!(config.min_gateways, 3);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(NetworkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_hostname_seed_without_suffix() {
        let config = NetworkConfig {
            core_seeds: vec!["a.chainpoint.org".into(), "1.2.3.4".into()],
            ..NetworkConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("a.chainpoint.org"));
    }

    #[test]
    fn test_validate_strict_discovery_requires_suffix() {
        let config = NetworkConfig {
            core_seeds: vec!["a.chainpoint.org".into(), "b.chainpoint.org".into()],
            core_dns_suffix: Some("chainpoint.org".into()),
            ..NetworkConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = NetworkConfig {
            core_seeds: vec!["1.2.3.4".into()],
            core_dns_suffix: Some("chainpoint.org".into()),
            ..NetworkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_gateway() {
        let config = NetworkConfig {
            fallback_gateways: vec!["http://gateway.example".into()],
            ..NetworkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_node_uri() {
        let config = NetworkConfig::default();
        assert_eq!(config.node_uri("1.2.3.4"), "http://1.2.3.4");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = NetworkConfig::from_env();
        assert_eq!(config.core_seeds, NetworkConfig::default().core_seeds);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert!(config.core_dns_suffix.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_custom_lists() {
        clear_env();
        std::env::set_var("CHAINPOINT_CORES", " 1.1.1.1 , ,2.2.2.2");
        std::env::set_var("CHAINPOINT_GATEWAYS", "http://3.3.3.3");
        std::env::set_var("CHAINPOINT_VERIFY_GATEWAY", "http://4.4.4.4");

        let config = NetworkConfig::from_env();
        assert_eq!(config.core_seeds, vec!["1.1.1.1", "2.2.2.2"]);
        assert_eq!(config.fallback_gateways, vec!["http://3.3.3.3"]);
        assert_eq!(config.default_verify_gateway, "http://4.4.4.4");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_numbers() {
        clear_env();
        std::env::set_var("CHAINPOINT_REQUEST_TIMEOUT_MS", "2500");
        std::env::set_var("CHAINPOINT_DISCOVERY_RETRIES", "2");
        std::env::set_var("CHAINPOINT_DISCOVERY_TIMEOUT_MS", "invalid");

        let config = NetworkConfig::from_env();
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.discovery_retries, 2);
        assert_eq!(config.discovery_timeout_ms, 10_000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_dns_suffix() {
        clear_env();
        std::env::set_var("CHAINPOINT_CORE_DNS_SUFFIX", "chainpoint.org");

        let config = NetworkConfig::from_env();
        assert_eq!(config.core_dns_suffix.as_deref(), Some("chainpoint.org"));

        clear_env();
    }
}
