//! Shared status vocabulary for the cloak services.
//!
//! Every backend call resolves to one of the codes below; the gateway maps
//! them onto HTTP statuses and uses them to decide whether a call is worth
//! retrying.

use serde::{Deserialize, Serialize};

/// Closed set of service status codes carried across component boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    InvalidArgument,
    Unauthenticated,
    NotFound,
    AlreadyExists,
    DeadlineExceeded,
    Internal,
}

impl Code {
    /// Whether a call that failed with this code may succeed on a retry.
    ///
    /// Only `Internal` qualifies: argument, auth, existence and expiry
    /// failures are stable properties of the request.
    pub fn is_retriable(self) -> bool {
        matches!(self, Code::Internal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::Unauthenticated => "UNAUTHENTICATED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every service error so callers can classify failures
/// without knowing the concrete error type.
pub trait Fault {
    fn code(&self) -> Code;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_is_retriable() {
        assert!(Code::Internal.is_retriable());
        for code in [
            Code::InvalidArgument,
            Code::Unauthenticated,
            Code::NotFound,
            Code::AlreadyExists,
            Code::DeadlineExceeded,
        ] {
            assert!(!code.is_retriable(), "{code} must not be retriable");
        }
    }
}
