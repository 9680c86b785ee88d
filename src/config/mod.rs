use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    certification: Certification,
    #[serde(default)]
    minter: Minter,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
}

#[derive(Debug, Deserialize)]
pub struct Certification {
    /// Watched percentage at which a module counts as completed.
    #[serde(default = "default_completion_threshold")]
    completion_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinterMode {
    Simulated,
    Remote,
}

#[derive(Debug, Deserialize)]
pub struct Minter {
    #[serde(default = "default_minter_mode")]
    mode: MinterMode,
    #[serde(default = "default_network")]
    network: String,
    endpoint: Option<String>,
}

fn default_completion_threshold() -> f64 {
    90.0
}

fn default_minter_mode() -> MinterMode {
    MinterMode::Simulated
}

fn default_network() -> String {
    String::from("preprod")
}

impl Default for Certification {
    fn default() -> Self {
        Self {
            completion_threshold: default_completion_threshold(),
        }
    }
}

impl Default for Minter {
    fn default() -> Self {
        Self {
            mode: default_minter_mode(),
            network: default_network(),
            endpoint: None,
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        Ok(config)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn certification(&self) -> &Certification {
        &self.certification
    }

    #[inline]
    pub fn minter(&self) -> &Minter {
        &self.minter
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}

impl Certification {
    #[inline]
    pub fn completion_threshold(&self) -> f64 {
        self.completion_threshold
    }
}

impl Minter {
    #[inline]
    pub fn mode(&self) -> MinterMode {
        self.mode
    }

    #[inline]
    pub fn network(&self) -> &str {
        &self.network
    }

    #[inline]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
        assert_eq!(config.minter().mode(), MinterMode::Simulated);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/db"
            "#,
        )
        .unwrap();

        assert!(!config.app().docs());
        assert_eq!(config.certification().completion_threshold(), 90.0);
        assert_eq!(config.minter().mode(), MinterMode::Simulated);
        assert_eq!(config.minter().network(), "preprod");
        assert!(config.minter().endpoint().is_none());
    }

    #[test]
    fn remote_minter_section() {
        let config = Config::from_slice(
            br#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/db"

            [certification]
            completion_threshold = 85.5

            [minter]
            mode = "remote"
            network = "mainnet"
            endpoint = "http://minter.local/mint"
            "#,
        )
        .unwrap();

        assert_eq!(config.certification().completion_threshold(), 85.5);
        assert_eq!(config.minter().mode(), MinterMode::Remote);
        assert_eq!(config.minter().network(), "mainnet");
        assert_eq!(config.minter().endpoint(), Some("http://minter.local/mint"));
    }
}
