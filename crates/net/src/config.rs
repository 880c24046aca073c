//! Server configuration, read from an optional `altruist` file and `ALTRUIST_*` variables.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Free-form label logged at startup (`local`, `staging`, `production`).
    #[serde(default = "defaults::environment")]
    pub environment: String,

    #[serde(default = "defaults::database_path")]
    pub database_path: String,

    /// IPFS HTTP API used for pinning. Empty keeps objects in the local database.
    #[serde(default)]
    pub ipfs_api_url: String,

    #[serde(default = "defaults::ipfs_gateway_url")]
    pub ipfs_gateway_url: String,

    #[serde(default)]
    pub ipfs_api_token: Option<String>,

    /// JSON-RPC node for marketplace reads. Empty serves every token as unlisted.
    #[serde(default)]
    pub rpc_url: String,

    /// CORS allow-list. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            environment: defaults::environment(),
            database_path: defaults::database_path(),
            ipfs_api_url: String::new(),
            ipfs_gateway_url: defaults::ipfs_gateway_url(),
            ipfs_api_token: None,
            rpc_url: String::new(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("altruist").required(false))
            .add_source(
                config::Environment::with_prefix("ALTRUIST")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }
}

mod defaults {
    pub fn bind_address() -> String {
        let port = std::env::var("PORT").unwrap_or_else(|_| "3001".into());
        format!("0.0.0.0:{port}")
    }

    pub fn environment() -> String {
        "local".into()
    }

    pub fn database_path() -> String {
        "./data".into()
    }

    pub fn ipfs_gateway_url() -> String {
        "https://gateway.moralisipfs.com".into()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_yields_defaults() {
        let config: Config = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.environment, "local");
        assert_eq!(config.database_path, "./data");
        assert!(config.rpc_url.is_empty());
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.ipfs_gateway_url, Config::default().ipfs_gateway_url);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config: Config = config::Config::builder()
            .set_override("bind_address", "127.0.0.1:8080")
            .unwrap()
            .set_override("rpc_url", "http://localhost:8545")
            .unwrap()
            .set_override("allowed_origins", vec!["https://altruist.app"])
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.allowed_origins, vec!["https://altruist.app".to_string()]);
    }
}
