pub mod vault;

use async_trait::async_trait;

use crate::dek::Dek;
use crate::error::CryptoResult;

pub use vault::{VaultConfig, VaultTransitClient};

/// A freshly derived data key: the plaintext half for immediate use and the
/// KMS-wrapped half for persistence.
pub struct DataKey {
    pub plaintext: Dek,
    pub wrapped: Vec<u8>,
}

/// Remote key-management service surface the tokenizer depends on.
#[async_trait]
pub trait KeyService: Send + Sync {
    /// Derive a data key under the service's convergent key name and the
    /// given derivation context.
    async fn generate_data_key(&self, context: &str) -> CryptoResult<DataKey>;

    /// Unwrap a previously wrapped data key.
    async fn decrypt_data_key(&self, wrapped: &[u8]) -> CryptoResult<Dek>;
}
