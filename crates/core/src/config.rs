use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ledger: LedgerConfig,
    /// 初始组合，仅在 `--seed` 启动时写入账本
    pub seed: Vec<SeedHolding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许跨域访问的前端来源
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// 账本参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// 计算现金余额时的初始资金
    pub starting_cash: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_cash: Decimal::from(100_000),
        }
    }
}

/// 初始组合中的一条持仓，按配置价格以买入方式入账
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedHolding {
    pub asset: String,
    pub price: Decimal,
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.database.data_dir, "data");
        assert_eq!(config.ledger.starting_cash, Decimal::from(100_000));
        assert!(config.seed.is_empty());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let json = r#"{ "server": { "port": 9000 }, "seed": [ { "asset": "ADBE", "price": 444.68, "quantity": 5 } ] }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ledger.starting_cash, Decimal::from(100_000));
        assert_eq!(config.seed.len(), 1);
        assert_eq!(config.seed[0].asset, "ADBE");
        assert_eq!(config.seed[0].quantity, Decimal::from(5));
    }
}
