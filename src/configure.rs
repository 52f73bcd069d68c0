// Copyright Rivtower Technologies LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use color_eyre::eyre::{eyre, Result};
use config::Config;
use serde::{Deserialize, Serialize};

use crate::consul::ConsulConfig;
#[cfg(feature = "log")]
use crate::log::LogConfig;

/// Names the config file; the file itself is optional.
pub const CONFIG_PATH_ENV: &str = "REGISTRAR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "registrar";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Health endpoint listen address; its port must match the advertised one.
    pub listen_addr: String,
    pub consul: ConsulConfig,
    #[cfg(feature = "log")]
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = crate::env::env_or_default(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH);
        let mut config: Self = file_config(&path)?;
        if config.listen_addr.is_empty() {
            config.listen_addr = format!("0.0.0.0:{}", crate::payload::SERVICE_PORT);
        }
        Ok(config)
    }

    /// Whether the health endpoint listens on the port the registry probes.
    pub fn serves_advertised_port(&self) -> bool {
        self.listen_addr
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse::<u16>().ok())
            == Some(crate::payload::SERVICE_PORT)
    }
}

pub fn file_config<T: for<'a> Deserialize<'a>>(path: &str) -> Result<T> {
    let settings = Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()
        .map_err(|e| eyre!("load file config failed: {}", e))?;

    settings
        .try_deserialize::<T>()
        .map_err(|e| eyre!("deserialize config failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config: AppConfig = file_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.consul.consul_url, "127.0.0.1:8500");
        assert_eq!(config.consul.register_timeout_secs, 3);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrar.toml");
        std::fs::write(
            &path,
            r#"
listen_addr = "127.0.0.1:8080"

[consul]
consul_url = "consul:8500"
service_name = "orders"
register_timeout_secs = 5
"#,
        )
        .unwrap();

        let config: AppConfig = file_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert!(!config.serves_advertised_port());
        assert_eq!(config.consul.consul_url, "consul:8500");
        assert_eq!(config.consul.service_name, "orders");
        assert_eq!(config.consul.register_timeout_secs, 5);
        assert_eq!(config.consul.hostname_path, "/etc/hostname");
        assert!(config.consul.deregister_on_shutdown);
    }

    #[test]
    fn load_fills_listen_addr_with_advertised_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        temp_env::with_var(CONFIG_PATH_ENV, path.to_str(), || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.listen_addr, "0.0.0.0:80");
            assert!(config.serves_advertised_port());
        });
    }

    #[test]
    fn advertised_port_check() {
        let with_addr = |listen_addr: &str| AppConfig {
            listen_addr: listen_addr.to_owned(),
            ..Default::default()
        };
        assert!(with_addr("[::]:80").serves_advertised_port());
        assert!(with_addr("10.0.0.5:80").serves_advertised_port());
        assert!(!with_addr("0.0.0.0:8080").serves_advertised_port());
        assert!(!with_addr("localhost").serves_advertised_port());
    }
}
