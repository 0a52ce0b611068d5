use std::sync::Arc;

use auth_identity::TokenSigner;

use crate::backend::{AuthBackend, MappingBackend, TokenizerBackend};
use crate::cookies::CookieConfig;

/// Shared request-handling state: the wrapped backends, the token verifier
/// the middleware parses access tokens with, and cookie lifetimes.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthBackend>,
    pub tokenizer: Arc<TokenizerBackend>,
    pub mapping: Arc<MappingBackend>,
    pub signer: TokenSigner,
    pub cookies: CookieConfig,
}
