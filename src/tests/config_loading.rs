// Config file loading: env expansion, defaults and aggregated validation errors.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    use crate::config::upstream::Credential;
    use crate::utils::config_loader;
    use crate::utils::constants::{DEFAULT_AUTH_PATH, DEFAULT_TOKEN_TTL_SECONDS};

    fn write_config(content: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    fn path(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().into_owned()
    }

    const CONFIG: &str = r#"
settings:
  server:
    host: "127.0.0.1"
    port: "${CATALOG_TEST_PORT:3001}"
  metrics:
    is_enabled: true
    path: /metrics
upstream:
  base_url: "${CATALOG_TEST_API_URL:https://api.supplier.example}/"
  login: "${CATALOG_TEST_LOGIN:}"
  password: "${CATALOG_TEST_PASSWORD:}"
  static_token: "${CATALOG_TEST_TOKEN:}"
catalog:
  vendor_id: ${CATALOG_TEST_VENDOR:0}
  brand: "${CATALOG_TEST_BRAND:}"
"#;

    fn clear_env() {
        for var in [
            "CATALOG_TEST_PORT",
            "CATALOG_TEST_API_URL",
            "CATALOG_TEST_LOGIN",
            "CATALOG_TEST_PASSWORD",
            "CATALOG_TEST_TOKEN",
            "CATALOG_TEST_VENDOR",
            "CATALOG_TEST_BRAND",
        ] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    #[serial]
    async fn env_values_are_expanded() -> Result<()> {
        clear_env();
        std::env::set_var("CATALOG_TEST_PORT", "8088");
        std::env::set_var("CATALOG_TEST_API_URL", "http://supplier.local");
        std::env::set_var("CATALOG_TEST_LOGIN", "shop");
        std::env::set_var("CATALOG_TEST_PASSWORD", "secret");
        std::env::set_var("CATALOG_TEST_VENDOR", "17");
        std::env::set_var("CATALOG_TEST_BRAND", "Acme");

        let file = write_config(CONFIG)?;
        let config = config_loader::run(&path(&file)).await?;
        clear_env();

        assert_eq!(config.settings.server.port, "8088");
        assert_eq!(config.upstream.base_url, "http://supplier.local");
        assert_eq!(
            config.upstream.credential()?,
            Credential::Login {
                login: "shop".into(),
                password: "secret".into()
            }
        );
        assert_eq!(config.catalog.vendor_id, 17);
        assert_eq!(config.catalog.brand.as_deref(), Some("Acme"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn unset_values_fall_back_to_defaults() -> Result<()> {
        clear_env();

        let file = write_config(CONFIG)?;
        let config = config_loader::run(&path(&file)).await?;

        assert_eq!(config.settings.server.port, "3001");
        assert_eq!(config.settings.http.timeout_ms, 15_000);
        assert_eq!(config.settings.cors.allowed_origins, vec!["*".to_string()]);
        assert!(config.settings.logging.is_some());

        let upstream = &config.upstream;
        assert_eq!(upstream.base_url, "https://api.supplier.example");
        assert_eq!(upstream.login, None);
        assert_eq!(upstream.static_token, None);
        assert_eq!(upstream.auth_paths, vec![DEFAULT_AUTH_PATH.to_string()]);
        assert_eq!(upstream.token_ttl_seconds, Some(DEFAULT_TOKEN_TTL_SECONDS));
        // missing credential is reported per request, not at startup
        assert!(upstream.credential().is_err());

        assert_eq!(config.catalog.vendor_id, 0);
        assert_eq!(config.catalog.brand, None);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn static_token_from_env_wins() -> Result<()> {
        clear_env();
        std::env::set_var("CATALOG_TEST_TOKEN", "pre-shared-token-42");

        let file = write_config(CONFIG)?;
        let config = config_loader::run(&path(&file)).await?;
        clear_env();

        assert_eq!(
            config.upstream.credential()?,
            Credential::Static {
                token: "pre-shared-token-42".into()
            }
        );
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn invalid_values_are_reported_together() -> Result<()> {
        let file = write_config(
            r#"
settings:
  server:
    host: ""
    port: "not-a-port"
upstream:
  base_url: "ftp://supplier.example"
  auth_paths: ["auth/token"]
"#,
        )?;

        let err = config_loader::run(&path(&file)).await.unwrap_err().to_string();
        assert!(err.starts_with("Invalid config format"), "{}", err);
        assert!(err.contains("host"), "{}", err);
        assert!(err.contains("port"), "{}", err);
        assert!(err.contains("base_url"), "{}", err);
        assert!(err.contains("auth/token"), "{}", err);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn malformed_yaml_is_rejected() -> Result<()> {
        let file = write_config("settings: [unclosed")?;
        let err = config_loader::run(&path(&file)).await.unwrap_err().to_string();
        assert!(err.starts_with("Invalid config format"), "{}", err);

        let missing = config_loader::run("/nonexistent/catalog-proxy.yaml").await;
        assert!(missing.is_err());
        Ok(())
    }
}
