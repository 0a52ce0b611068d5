//! Deadline- and retry-wrapped views of the core services.
//!
//! Every call carries a per-backend deadline; cancellation drops the
//! in-flight store future. Failures collapse into [`BackendError`], which
//! keeps the upstream message for logs and the status code for mapping.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use error_common::{Code, Fault};
use uuid::Uuid;

use auth_identity::{AuthService, SessionTokens};
use mapping_store::{Mapping, MappingService, NewMapping};
use tokenizer::{TokenizerService, TokenizedSecret};

use crate::retry::{retry, RetryPolicy};

#[derive(Debug)]
pub struct BackendError {
    pub code: Code,
    pub message: String,
}

impl BackendError {
    fn from_fault<E: Fault + fmt::Display>(error: E) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Fault for BackendError {
    fn code(&self) -> Code {
        self.code
    }
}

async fn with_deadline<T, E, Fut>(deadline: Duration, fut: Fut) -> Result<T, BackendError>
where
    E: Fault + fmt::Display,
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BackendError::from_fault(e)),
        Err(_) => Err(BackendError {
            code: Code::DeadlineExceeded,
            message: "backend call deadline exceeded".into(),
        }),
    }
}

pub struct AuthBackend {
    service: Arc<AuthService>,
    policy: RetryPolicy,
    deadline: Duration,
}

impl AuthBackend {
    pub fn new(service: Arc<AuthService>, policy: RetryPolicy, deadline: Duration) -> Self {
        Self {
            service,
            policy,
            deadline,
        }
    }

    pub async fn register(
        &self,
        login: &str,
        password: &str,
        role_id: i32,
    ) -> Result<Uuid, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.register(login, password, role_id))
        })
        .await
    }

    pub async fn login(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(Uuid, SessionTokens), BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.login(login, password))
        })
        .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.refresh(refresh_token))
        })
        .await
    }

    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.is_admin(user_id))
        })
        .await
    }
}

pub struct TokenizerBackend {
    service: Arc<TokenizerService>,
    policy: RetryPolicy,
    deadline: Duration,
}

impl TokenizerBackend {
    pub fn new(service: Arc<TokenizerService>, policy: RetryPolicy, deadline: Duration) -> Self {
        Self {
            service,
            policy,
            deadline,
        }
    }

    pub async fn tokenize(
        &self,
        plaintext: &[u8],
        deterministic: bool,
        reversible: bool,
    ) -> Result<TokenizedSecret, BackendError> {
        retry(self.policy, || {
            with_deadline(
                self.deadline,
                self.service.tokenize(plaintext, deterministic, reversible),
            )
        })
        .await
    }

    pub async fn detokenize(
        &self,
        cipher_text: &[u8],
        dek_wrapped: &[u8],
        deterministic: bool,
    ) -> Result<Vec<u8>, BackendError> {
        retry(self.policy, || {
            with_deadline(
                self.deadline,
                self.service
                    .detokenize(cipher_text, dek_wrapped, deterministic),
            )
        })
        .await
    }
}

pub struct MappingBackend {
    service: Arc<MappingService>,
    policy: RetryPolicy,
    deadline: Duration,
}

impl MappingBackend {
    pub fn new(service: Arc<MappingService>, policy: RetryPolicy, deadline: Duration) -> Self {
        Self {
            service,
            policy,
            deadline,
        }
    }

    pub async fn create_mapping(&self, mapping: &NewMapping) -> Result<Mapping, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.create_mapping(mapping.clone()))
        })
        .await
    }

    pub async fn get_mapping(&self, id: Uuid) -> Result<Mapping, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.get_mapping(id))
        })
        .await
    }

    pub async fn update_mapping(&self, id: Uuid, token_ttl: i64) -> Result<Mapping, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.update_mapping(id, token_ttl))
        })
        .await
    }

    pub async fn delete_mapping(&self, id: Uuid) -> Result<(), BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.delete_mapping(id))
        })
        .await
    }

    pub async fn list_mappings(&self) -> Result<Vec<Mapping>, BackendError> {
        retry(self.policy, || {
            with_deadline(self.deadline, self.service.list_mappings())
        })
        .await
    }
}
