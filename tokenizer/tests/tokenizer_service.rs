//! Tokenizer flows driven through a stub key service.
//!
//! The stub mirrors a convergent transit key: the same derivation context
//! always yields the same data key, which is what makes the determinism
//! assertions meaningful.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use tokenizer::{CryptoError, DataKey, Dek, KeyService, TokenizerService};

const STUB_PREFIX: &str = "stub:v1:";

struct StubKms {
    dek: Vec<u8>,
}

impl StubKms {
    fn new(dek: Vec<u8>) -> Self {
        Self { dek }
    }

    fn wrap(&self) -> Vec<u8> {
        format!("{STUB_PREFIX}{}", BASE64.encode(&self.dek)).into_bytes()
    }
}

#[async_trait]
impl KeyService for StubKms {
    async fn generate_data_key(&self, _context: &str) -> Result<DataKey, CryptoError> {
        Ok(DataKey {
            plaintext: Dek::new(self.dek.clone()),
            wrapped: self.wrap(),
        })
    }

    async fn decrypt_data_key(&self, wrapped: &[u8]) -> Result<Dek, CryptoError> {
        let text = std::str::from_utf8(wrapped)
            .map_err(|_| CryptoError::Kms("malformed wrapping".into()))?;
        let encoded = text
            .strip_prefix(STUB_PREFIX)
            .ok_or_else(|| CryptoError::Kms("unknown wrapping prefix".into()))?;
        let dek = BASE64
            .decode(encoded)
            .map_err(|_| CryptoError::Kms("undecodable wrapping".into()))?;
        if dek != self.dek {
            return Err(CryptoError::Kms("wrapping does not match any key".into()));
        }
        Ok(Dek::new(dek))
    }
}

fn service(dek: Vec<u8>) -> TokenizerService {
    TokenizerService::new(Arc::new(StubKms::new(dek)), "test-context".into())
}

#[tokio::test]
async fn tokenize_detokenize_roundtrip() {
    let svc = service(vec![7u8; 32]);

    let sealed = svc.tokenize(b"hello", true, true).await.unwrap();
    assert_eq!(sealed.algo_name, "aes-128-siv");
    assert!(!sealed.cipher_text.is_empty());
    assert!(!sealed.dek_wrapped.is_empty());

    let plaintext = svc
        .detokenize(&sealed.cipher_text, &sealed.dek_wrapped, true)
        .await
        .unwrap();
    assert_eq!(plaintext, b"hello");
}

#[tokio::test]
async fn roundtrip_holds_for_arbitrary_payloads() {
    let svc = service(vec![42u8; 64]);

    for len in [1usize, 2, 15, 16, 17, 255, 4096] {
        let payload: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
        let sealed = svc.tokenize(&payload, true, true).await.unwrap();
        assert_eq!(sealed.algo_name, "aes-256-siv");
        let opened = svc
            .detokenize(&sealed.cipher_text, &sealed.dek_wrapped, true)
            .await
            .unwrap();
        assert_eq!(opened, payload, "roundtrip broke at payload length {len}");
    }
}

#[tokio::test]
async fn tokenization_is_deterministic_under_one_key() {
    let svc = service(vec![9u8; 32]);

    let first = svc.tokenize(b"same input", true, true).await.unwrap();
    let second = svc.tokenize(b"same input", true, true).await.unwrap();
    assert_eq!(first.cipher_text, second.cipher_text);

    let other = svc.tokenize(b"other input", true, true).await.unwrap();
    assert_ne!(first.cipher_text, other.cipher_text);
}

#[tokio::test]
async fn flipping_any_ciphertext_byte_fails_authentication() {
    let svc = service(vec![3u8; 32]);
    let sealed = svc.tokenize(b"integrity", true, true).await.unwrap();

    for idx in 0..sealed.cipher_text.len() {
        let mut tampered = sealed.cipher_text.clone();
        tampered[idx] ^= 0x01;
        let err = svc
            .detokenize(&tampered, &sealed.dek_wrapped, true)
            .await
            .unwrap_err();
        assert!(
            matches!(err, CryptoError::InvalidToken),
            "byte {idx}: expected invalid token, got {err:?}"
        );
    }
}

#[tokio::test]
async fn flipping_any_wrapped_dek_byte_fails() {
    let svc = service(vec![5u8; 32]);
    let sealed = svc.tokenize(b"opaque wrapping", true, true).await.unwrap();

    for idx in 0..sealed.dek_wrapped.len() {
        let mut tampered = sealed.dek_wrapped.clone();
        tampered[idx] ^= 0x20;
        assert!(
            svc.detokenize(&sealed.cipher_text, &tampered, true)
                .await
                .is_err(),
            "byte {idx}: tampered wrapping must not unwrap"
        );
    }
}

#[tokio::test]
async fn unsupported_flag_combinations_are_rejected() {
    let svc = service(vec![1u8; 32]);

    for (deterministic, reversible) in [(false, false), (false, true), (true, false)] {
        let err = svc
            .tokenize(b"x", deterministic, reversible)
            .await
            .unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedAlgorithm));
    }

    let sealed = svc.tokenize(b"x", true, true).await.unwrap();
    let err = svc
        .detokenize(&sealed.cipher_text, &sealed.dek_wrapped, false)
        .await
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedAlgorithm));
}

#[tokio::test]
async fn empty_inputs_are_rejected() {
    let svc = service(vec![1u8; 32]);

    assert!(matches!(
        svc.tokenize(b"", true, true).await.unwrap_err(),
        CryptoError::PlaintextRequired
    ));
    assert!(matches!(
        svc.detokenize(b"", b"wrapped", true).await.unwrap_err(),
        CryptoError::CiphertextRequired
    ));
    assert!(matches!(
        svc.detokenize(b"ct", b"", true).await.unwrap_err(),
        CryptoError::WrappedDekRequired
    ));
}
