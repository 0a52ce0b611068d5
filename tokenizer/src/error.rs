use error_common::{Code, Fault};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("plaintext is required")]
    PlaintextRequired,

    #[error("cipher text is required")]
    CiphertextRequired,

    #[error("wrapped dek is required")]
    WrappedDekRequired,

    #[error("unsupported tokenize parameters")]
    UnsupportedAlgorithm,

    #[error("invalid token")]
    InvalidToken,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("unexpected data key length: {0} bytes")]
    InvalidKeyLength(usize),

    #[error("key service error: {0}")]
    Kms(String),
}

impl Fault for CryptoError {
    fn code(&self) -> Code {
        match self {
            CryptoError::PlaintextRequired
            | CryptoError::CiphertextRequired
            | CryptoError::WrappedDekRequired
            | CryptoError::UnsupportedAlgorithm
            | CryptoError::InvalidToken => Code::InvalidArgument,
            CryptoError::EncryptionFailed
            | CryptoError::InvalidKeyLength(_)
            | CryptoError::Kms(_) => Code::Internal,
        }
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
