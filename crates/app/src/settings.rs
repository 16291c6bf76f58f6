use config::{Config, ConfigError, Environment, File};
use folio_core::config::AppConfig;
use std::path::Path;

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. `{config_dir}/default.toml` (可选)
/// 2. `{config_dir}/local.toml` (可选，本机覆盖)
/// 3. `FOLIO__` 前缀环境变量，层级以 `__` 分隔，如 `FOLIO__SERVER__PORT=9000`
///
/// 缺失的键回落到 `AppConfig::default()`。
pub fn load_settings(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from(config_dir.join("default.toml")).required(false))
        .add_source(File::from(config_dir.join("local.toml")).required(false))
        .add_source(Environment::with_prefix("FOLIO").prefix_separator("__").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = load_settings(tmp.path()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.ledger.starting_cash, dec!(100000));
        assert!(cfg.seed.is_empty());
    }

    #[test]
    fn test_local_overrides_default() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("default.toml"),
            r#"
[server]
port = 9000

[ledger]
starting_cash = 50000

[[seed]]
asset = "ADBE"
price = 444.68
quantity = 5
"#,
        )
        .unwrap();
        fs::write(tmp.path().join("local.toml"), "[server]\nport = 9100\n").unwrap();

        let cfg = load_settings(tmp.path()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.ledger.starting_cash, dec!(50000));
        assert_eq!(cfg.seed.len(), 1);
        assert_eq!(cfg.seed[0].asset, "ADBE");
        assert_eq!(cfg.seed[0].price, dec!(444.68));
    }
}
