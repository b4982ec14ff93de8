//! Configuration validation integration tests
//!
//! Tests for configuration loading, environment overrides and
//! validation across all sections.

#[cfg(test)]
mod tests {
    use batch_gateway::config::{
        CacheConfig, Config, ProcessorConfig, RateLimitConfig, ServerConfig, Validate,
    };
    use batch_gateway::server::builder::load_config;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::{assert_err, assert_ok};

    // ==================== Defaults ====================

    /// Test that the defaults describe a usable gateway
    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_ok!(config.validate());

        let batch = config.batch();
        assert_eq!(batch.max_batch_size, 20);
        assert_eq!(batch.timeout, 10_000);
        assert_eq!(batch.batch_window, 10);
        assert!(batch.enable_deduplication);
        assert!(batch.use_cache);

        let limit = config.rate_limit();
        assert!(limit.enabled);
        assert_eq!(limit.batch_limit, 10);
        assert_eq!(limit.window_secs, 60);
    }

    // ==================== Section Validation ====================

    /// Test processor limits
    #[test]
    fn test_processor_config_bounds() {
        let mut batch = ProcessorConfig::default();
        assert_ok!(Validate::validate(&batch));

        batch.max_batch_size = 21;
        assert_err!(Validate::validate(&batch));

        batch.max_batch_size = 0;
        assert_err!(Validate::validate(&batch));

        batch = ProcessorConfig::default();
        batch.timeout = 99;
        assert_err!(Validate::validate(&batch));

        batch.timeout = 30_000;
        assert_ok!(Validate::validate(&batch));

        batch.max_concurrency = 0;
        assert_err!(Validate::validate(&batch));
    }

    /// Test server validation
    #[test]
    fn test_server_config_validation() {
        let mut server = ServerConfig::default();
        assert_ok!(Validate::validate(&server));

        server.port = 0;
        assert_err!(Validate::validate(&server));

        server = ServerConfig::default();
        server.workers = Some(0);
        assert_err!(Validate::validate(&server));
    }

    /// Test cache and rate limit validation
    #[test]
    fn test_cache_and_rate_limit_validation() {
        let mut cache = CacheConfig::default();
        assert_ok!(Validate::validate(&cache));
        cache.max_entries = 0;
        assert_err!(Validate::validate(&cache));

        let mut limit = RateLimitConfig::default();
        assert_ok!(Validate::validate(&limit));
        limit.batch_limit = 0;
        assert_err!(Validate::validate(&limit));
    }

    // ==================== Loading ====================

    /// Test that a YAML file round-trips through the loader
    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9090
batch:
  max_batch_size: 5
  timeout: 2000
rate_limit:
  batch_limit: 3
"#
        )
        .unwrap();

        let config = assert_ok!(load_config(file.path()).await);
        assert_eq!(config.server().port, 9090);
        assert_eq!(config.batch().max_batch_size, 5);
        assert_eq!(config.batch().timeout, 2000);
        assert_eq!(config.rate_limit().batch_limit, 3);
        assert_eq!(config.rate_limit().window_secs, 60);
    }

    /// Test that an invalid file is refused at load time
    #[tokio::test]
    async fn test_load_config_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "batch:\n  timeout: 50\n").unwrap();

        assert_err!(load_config(file.path()).await);
    }

    /// Test that a missing file falls back to defaults
    #[tokio::test]
    async fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = assert_ok!(load_config(&dir.path().join("absent.yaml")).await);
        assert_eq!(config.batch().max_batch_size, 20);
    }

    /// Test that environment variables override file values
    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();

        // SAFETY: these variables are only read by this test
        unsafe {
            std::env::set_var("GATEWAY_WORKERS", "3");
            std::env::set_var("BATCH_ENABLE_DEDUP", "false");
        }
        let applied = config.gateway.apply_env_overrides();
        unsafe {
            std::env::remove_var("GATEWAY_WORKERS");
            std::env::remove_var("BATCH_ENABLE_DEDUP");
        }

        assert_ok!(applied);
        assert_eq!(config.server().workers, Some(3));
        assert!(!config.batch().enable_deduplication);
    }

    /// Test that serialized configuration parses back
    #[test]
    fn test_config_yaml_round_trip() {
        let mut config = Config::default();
        config.gateway.batch.timeout = 4321;

        let yaml = assert_ok!(config.to_yaml());
        let parsed = assert_ok!(Config::from_yaml_str(&yaml));
        assert_eq!(parsed.batch().timeout, 4321);
    }
}
