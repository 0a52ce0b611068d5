//! HashiCorp Vault Transit adapter for data-key derivation.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::dek::Dek;
use crate::error::{CryptoError, CryptoResult};
use crate::kms::{DataKey, KeyService};

/// Transit ciphertexts are prefixed with the key version; the prefix has to
/// be present again when the wrapped key is sent back for decryption.
const VAULT_CIPHERTEXT_PREFIX: &str = "vault:v1:";

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Vault address, e.g. `https://vault.internal:8200`.
    pub addr: String,
    pub token: String,
    /// Transit engine mount path.
    pub mount: String,
    /// Convergent key name all tokenize/detokenize calls share.
    pub key_name: String,
    /// Data key size requested from transit (128, 256 or 512 bits).
    pub dek_bits: u32,
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: "http://localhost:8200".into(),
            token: String::new(),
            mount: "transit".into(),
            key_name: "cloak-convergent".into(),
            dek_bits: 256,
            timeout_secs: 30,
        }
    }
}

pub struct VaultTransitClient {
    http: reqwest::Client,
    config: VaultConfig,
}

#[derive(Debug, Deserialize)]
struct DataKeyResponse {
    data: DataKeyPayload,
}

#[derive(Debug, Deserialize)]
struct DataKeyPayload {
    plaintext: String,
    ciphertext: String,
}

#[derive(Debug, Deserialize)]
struct DecryptResponse {
    data: DecryptPayload,
}

#[derive(Debug, Deserialize)]
struct DecryptPayload {
    plaintext: String,
}

impl VaultTransitClient {
    pub fn new(config: VaultConfig) -> CryptoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CryptoError::Kms(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.config.addr.trim_end_matches('/'),
            self.config.mount,
            path
        )
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        payload: serde_json::Value,
    ) -> CryptoResult<T> {
        let response = self
            .http
            .post(url)
            .header("X-Vault-Token", &self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CryptoError::Kms(format!("vault request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CryptoError::Kms(format!("vault returned {status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CryptoError::Kms(format!("vault response parse: {e}")))
    }
}

#[async_trait]
impl KeyService for VaultTransitClient {
    async fn generate_data_key(&self, context: &str) -> CryptoResult<DataKey> {
        let url = self.url(&format!("datakey/plaintext/{}", self.config.key_name));
        let payload = serde_json::json!({
            "bits": self.config.dek_bits,
            "context": BASE64.encode(context.as_bytes()),
        });

        let response: DataKeyResponse = self.post(&url, payload).await?;

        let plaintext = BASE64
            .decode(&response.data.plaintext)
            .map_err(|e| CryptoError::Kms(format!("data key decode: {e}")))?;

        Ok(DataKey {
            plaintext: Dek::new(plaintext),
            wrapped: response.data.ciphertext.into_bytes(),
        })
    }

    async fn decrypt_data_key(&self, wrapped: &[u8]) -> CryptoResult<Dek> {
        let mut ciphertext = String::from_utf8(wrapped.to_vec())
            .map_err(|_| CryptoError::Kms("wrapped dek is not valid transit ciphertext".into()))?;
        if !ciphertext.starts_with(VAULT_CIPHERTEXT_PREFIX) {
            ciphertext = format!("{VAULT_CIPHERTEXT_PREFIX}{ciphertext}");
        }

        let url = self.url(&format!("decrypt/{}", self.config.key_name));
        let payload = serde_json::json!({ "ciphertext": ciphertext });

        let response: DecryptResponse = self.post(&url, payload).await?;

        let plaintext = BASE64
            .decode(&response.data.plaintext)
            .map_err(|e| CryptoError::Kms(format!("data key decode: {e}")))?;

        Ok(Dek::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_mount_and_path() {
        let client = VaultTransitClient::new(VaultConfig {
            addr: "https://vault.example.com:8200/".into(),
            ..VaultConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.url("datakey/plaintext/cloak-convergent"),
            "https://vault.example.com:8200/v1/transit/datakey/plaintext/cloak-convergent"
        );
    }
}
