//! Northbound JSON shapes. Binary fields travel as standard base64;
//! `token_ttl` travels as a Go-style duration string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mapping_store::Mapping;

use crate::duration::format_go_duration;

pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
    pub role_id: i32,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct IsAdminRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct IsAdminResponse {
    pub result: bool,
}

#[derive(Debug, Deserialize)]
pub struct TokenizeRequest {
    #[serde(with = "base64_bytes")]
    pub plaintext: Vec<u8>,
    pub deterministic: bool,
    pub reversible: bool,
    /// Mapping lifetime in seconds.
    pub token_ttl: i64,
}

#[derive(Debug, Deserialize)]
pub struct DetokenizeRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct DetokenizeResponse {
    #[serde(with = "base64_bytes")]
    pub plaintext: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMappingRequest {
    /// Go-style duration string, e.g. "24h0m0s".
    pub token_ttl: String,
}

#[derive(Debug, Serialize)]
pub struct MappingSchema {
    pub id: Uuid,
    #[serde(with = "base64_bytes")]
    pub cipher_text: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub dek_wrapped: Vec<u8>,
    pub token_ttl: String,
    pub created_at: String,
    pub deterministic: bool,
    pub reversible: bool,
}

impl From<&Mapping> for MappingSchema {
    fn from(mapping: &Mapping) -> Self {
        Self {
            id: mapping.id,
            cipher_text: mapping.cipher_text.clone(),
            dek_wrapped: mapping.dek_wrapped.clone(),
            token_ttl: format_go_duration(mapping.token_ttl),
            created_at: mapping.created_at.to_rfc3339(),
            deterministic: mapping.deterministic,
            reversible: mapping.reversible,
        }
    }
}
