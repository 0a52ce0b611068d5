//! Tokenization engine: deterministic authenticated encryption under
//! per-request data keys derived from a remote KMS.
//!
//! The flow is envelope encryption with a convergent twist: every tokenize
//! call asks the KMS for a data key under one shared key name and a fixed
//! derivation context, encrypts the payload with AES-SIV (no nonce, no
//! associated data, so equal plaintexts yield equal ciphertexts under equal
//! keys), and hands back the ciphertext together with the KMS-wrapped key.
//! Plaintext keys never outlive the call that derived them.

pub mod dek;
pub mod error;
pub mod kms;
pub mod service;
pub mod siv;

pub use dek::Dek;
pub use error::{CryptoError, CryptoResult};
pub use kms::{DataKey, KeyService};
pub use service::{TokenizerService, TokenizedSecret};
