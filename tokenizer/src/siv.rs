//! AES-SIV sealing with no nonce and no associated data.
//!
//! SIV is the one standard AEAD that stays safe when the nonce is absent:
//! the synthetic IV doubles as the authentication tag, and identical
//! plaintexts under identical keys produce identical ciphertexts, which is
//! exactly the deterministic-reversible contract the tokenizer exposes.

use aes_siv::siv::{Aes128Siv, Aes256Siv};
use aes_siv::KeyInit;

use crate::error::{CryptoError, CryptoResult};

/// Keying follows the SIV convention of split halves: a 32-byte data key
/// selects AES-128-SIV, a 64-byte key selects AES-256-SIV.
pub fn algo_name(dek_len: usize) -> CryptoResult<&'static str> {
    match dek_len {
        32 => Ok("aes-128-siv"),
        64 => Ok("aes-256-siv"),
        other => Err(CryptoError::InvalidKeyLength(other)),
    }
}

pub fn seal(dek: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    match dek.len() {
        32 => {
            let mut cipher = Aes128Siv::new_from_slice(dek)
                .map_err(|_| CryptoError::InvalidKeyLength(dek.len()))?;
            cipher
                .encrypt(std::iter::empty::<&[u8]>(), plaintext)
                .map_err(|_| CryptoError::EncryptionFailed)
        }
        64 => {
            let mut cipher = Aes256Siv::new_from_slice(dek)
                .map_err(|_| CryptoError::InvalidKeyLength(dek.len()))?;
            cipher
                .encrypt(std::iter::empty::<&[u8]>(), plaintext)
                .map_err(|_| CryptoError::EncryptionFailed)
        }
        other => Err(CryptoError::InvalidKeyLength(other)),
    }
}

pub fn open(dek: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    match dek.len() {
        32 => {
            let mut cipher = Aes128Siv::new_from_slice(dek)
                .map_err(|_| CryptoError::InvalidKeyLength(dek.len()))?;
            cipher
                .decrypt(std::iter::empty::<&[u8]>(), ciphertext)
                .map_err(|_| CryptoError::InvalidToken)
        }
        64 => {
            let mut cipher = Aes256Siv::new_from_slice(dek)
                .map_err(|_| CryptoError::InvalidKeyLength(dek.len()))?;
            cipher
                .decrypt(std::iter::empty::<&[u8]>(), ciphertext)
                .map_err(|_| CryptoError::InvalidToken)
        }
        other => Err(CryptoError::InvalidKeyLength(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip_128() {
        let dek = [0x11u8; 32];
        let sealed = seal(&dek, b"round trip").unwrap();
        assert_eq!(open(&dek, &sealed).unwrap(), b"round trip");
    }

    #[test]
    fn seal_open_roundtrip_256() {
        let dek = [0x22u8; 64];
        let sealed = seal(&dek, b"larger key").unwrap();
        assert_eq!(open(&dek, &sealed).unwrap(), b"larger key");
    }

    #[test]
    fn sealing_is_deterministic() {
        let dek = [0x33u8; 32];
        assert_eq!(seal(&dek, b"same").unwrap(), seal(&dek, b"same").unwrap());
    }

    #[test]
    fn rejects_odd_key_length() {
        assert!(matches!(
            seal(&[0u8; 48], b"x"),
            Err(CryptoError::InvalidKeyLength(48))
        ));
        assert!(matches!(
            open(&[0u8; 16], b"x"),
            Err(CryptoError::InvalidKeyLength(16))
        ));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let sealed = seal(&[0x44u8; 32], b"secret").unwrap();
        assert!(matches!(
            open(&[0x45u8; 32], &sealed),
            Err(CryptoError::InvalidToken)
        ));
    }

    #[test]
    fn algo_names() {
        assert_eq!(algo_name(32).unwrap(), "aes-128-siv");
        assert_eq!(algo_name(64).unwrap(), "aes-256-siv");
        assert!(algo_name(24).is_err());
    }
}
