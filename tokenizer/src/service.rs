use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, enabled, warn, Level};

use crate::error::{CryptoError, CryptoResult};
use crate::kms::KeyService;
use crate::siv;

/// Result of a tokenize call: the sealed payload plus the wrapped data key
/// that has to be persisted next to it.
#[derive(Debug)]
pub struct TokenizedSecret {
    pub cipher_text: Vec<u8>,
    pub dek_wrapped: Vec<u8>,
    pub algo_name: &'static str,
}

/// Stateless encryption/decryption service. The only remote dependency is
/// the key service; everything else lives for a single call.
pub struct TokenizerService {
    kms: Arc<dyn KeyService>,
    derivation_context: String,
}

impl TokenizerService {
    pub fn new(kms: Arc<dyn KeyService>, derivation_context: String) -> Self {
        Self {
            kms,
            derivation_context,
        }
    }

    /// Encrypt `plaintext` under a fresh data key.
    ///
    /// Only the deterministic reversible combination is implemented; any
    /// other flag pairing is an argument error.
    pub async fn tokenize(
        &self,
        plaintext: &[u8],
        deterministic: bool,
        reversible: bool,
    ) -> CryptoResult<TokenizedSecret> {
        if plaintext.is_empty() {
            return Err(CryptoError::PlaintextRequired);
        }
        if !(deterministic && reversible) {
            return Err(CryptoError::UnsupportedAlgorithm);
        }

        let key = self
            .kms
            .generate_data_key(&self.derivation_context)
            .await
            .map_err(|e| {
                warn!(error = %e, "data key derivation failed");
                e
            })?;

        let algo_name = siv::algo_name(key.plaintext.len())?;
        let cipher_text = siv::seal(key.plaintext.as_ref(), plaintext)?;

        // Key material is debug-only output; the enabled!() gate keeps the
        // base64 encoding off the hot path entirely.
        if enabled!(Level::DEBUG) {
            debug!(
                algo = algo_name,
                cipher_text_b64 = %BASE64.encode(&cipher_text),
                dek_wrapped_b64 = %BASE64.encode(&key.wrapped),
                "tokenized"
            );
        }

        Ok(TokenizedSecret {
            cipher_text,
            dek_wrapped: key.wrapped,
            algo_name,
        })
        // `key.plaintext` drops here and zeroes the DEK buffer.
    }

    /// Unwrap the data key and open the ciphertext.
    pub async fn detokenize(
        &self,
        cipher_text: &[u8],
        dek_wrapped: &[u8],
        deterministic: bool,
    ) -> CryptoResult<Vec<u8>> {
        if cipher_text.is_empty() {
            return Err(CryptoError::CiphertextRequired);
        }
        if dek_wrapped.is_empty() {
            return Err(CryptoError::WrappedDekRequired);
        }
        if !deterministic {
            return Err(CryptoError::UnsupportedAlgorithm);
        }

        let dek = self.kms.decrypt_data_key(dek_wrapped).await.map_err(|e| {
            warn!(error = %e, "data key unwrap failed");
            e
        })?;

        let plaintext = siv::open(dek.as_ref(), cipher_text)?;

        if enabled!(Level::DEBUG) {
            debug!(
                cipher_text_b64 = %BASE64.encode(cipher_text),
                "detokenized"
            );
        }

        Ok(plaintext)
    }
}
