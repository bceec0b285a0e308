use crate::error::{Error, Result};
use crate::services::http_client::HttpClientConfig;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CNET_API_URL: &str = "https://api.conselho.net.br/v3";
pub const DEFAULT_REGIONAL_SITE_TEMPLATE: &str = "https://www.creci{uf}.conselho.net.br";
pub const DEFAULT_REGIONAL_PHOTO_SITE_TEMPLATE: &str = "https://creci{uf}.conselho.net.br";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cnet_api_url: String,
    /// Site de cada regional; `{uf}` é trocado pela UF em caixa baixa.
    pub regional_site_template: String,
    pub regional_photo_site_template: String,
    pub cielo_merchant_id: String,
    pub cielo_merchant_key: String,
    pub cielo_sandbox: bool,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    /// Desliga a verificação de certificados. Somente para testes locais.
    pub http_insecure_tls: bool,
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cnet_api_url: DEFAULT_CNET_API_URL.to_string(),
            regional_site_template: DEFAULT_REGIONAL_SITE_TEMPLATE.to_string(),
            regional_photo_site_template: DEFAULT_REGIONAL_PHOTO_SITE_TEMPLATE.to_string(),
            cielo_merchant_id: String::new(),
            cielo_merchant_key: String::new(),
            cielo_sandbox: false,
            http_timeout_secs: 60,
            http_connect_timeout_secs: 8,
            http_insecure_tls: false,
            database_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            cnet_api_url: var("CNET_API_URL").unwrap_or(defaults.cnet_api_url),
            regional_site_template: var("REGIONAL_SITE_TEMPLATE")
                .unwrap_or(defaults.regional_site_template),
            regional_photo_site_template: var("REGIONAL_PHOTO_SITE_TEMPLATE")
                .unwrap_or(defaults.regional_photo_site_template),
            cielo_merchant_id: var("CIELO_MERCHANT_ID").unwrap_or_default(),
            cielo_merchant_key: var("CIELO_MERCHANT_KEY").unwrap_or_default(),
            cielo_sandbox: var("CIELO_SANDBOX")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.cielo_sandbox),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            http_connect_timeout_secs: var("HTTP_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_connect_timeout_secs),
            http_insecure_tls: var("HTTP_INSECURE_TLS")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.http_insecure_tls),
            database_url: var("DATABASE_URL").filter(|v| !v.is_empty()),
        }
    }

    /// Lê a configuração de um arquivo TOML. Chaves ausentes usam o padrão.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            connect_timeout: Duration::from_secs(self.http_connect_timeout_secs),
            accept_invalid_certs: self.http_insecure_tls,
            ..HttpClientConfig::default()
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
