use std::time::Duration;

use serde::Deserialize;

use auth_identity::AuthConfig;
use mapping_store::MappingConfig;
use storage_common::{PostgresConfig, RedisConfig};
use tokenizer::kms::VaultConfig;

use crate::cookies::CookieConfig;
use crate::retry::RetryPolicy;
use crate::tls::TlsConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    pub vault: VaultConfig,
    /// Fixed KMS derivation context shared by every tokenize call.
    pub derivation_context: String,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            vault: VaultConfig::default(),
            derivation_context: "cloak-tokenizer".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub max_retries: u32,
    pub base_retry_delay_ms: u64,
    pub auth_timeout_ms: u64,
    pub tokenizer_timeout_ms: u64,
    pub mapping_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 200,
            auth_timeout_ms: 2000,
            tokenizer_timeout_ms: 5000,
            mapping_timeout_ms: 2000,
        }
    }
}

impl BackendConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: Duration::from_millis(self.base_retry_delay_ms),
        }
    }

    pub fn auth_deadline(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn tokenizer_deadline(&self) -> Duration {
        Duration::from_millis(self.tokenizer_timeout_ms)
    }

    pub fn mapping_deadline(&self) -> Duration {
        Duration::from_millis(self.mapping_timeout_ms)
    }
}

/// Full gateway configuration, read from `CLOAK_`-prefixed environment
/// variables with `__` as the nesting separator
/// (e.g. `CLOAK_POSTGRES__HOST`, `CLOAK_AUTH__JWT_SECRET`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub http: HttpConfig,
    pub postgres: PostgresConfig,
    pub redis: RedisConfig,
    pub tokenizer: TokenizerSettings,
    pub auth: AuthConfig,
    pub mapping: MappingConfig,
    pub backend: BackendConfig,
    pub cookies: CookieConfig,
    pub tls: TlsConfig,
    pub log_level: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            postgres: PostgresConfig::default(),
            redis: RedisConfig::default(),
            tokenizer: TokenizerSettings::default(),
            auth: AuthConfig::default(),
            mapping: MappingConfig::default(),
            backend: BackendConfig::default(),
            cookies: CookieConfig::default(),
            tls: TlsConfig::default(),
            log_level: "info".into(),
        }
    }
}

impl GatewaySettings {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CLOAK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
