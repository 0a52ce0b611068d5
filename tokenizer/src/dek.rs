use std::fmt;

use zeroize::Zeroizing;

/// Plaintext data encryption key.
///
/// Owned exclusively by a single tokenize or detokenize invocation. The
/// backing buffer is zeroed when the value drops, on every exit path
/// including unwind, so a `Dek` must never be cloned out of its scope.
pub struct Dek(Zeroizing<Vec<u8>>);

impl Dek {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Dek {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Dek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dek({} bytes)", self.0.len())
    }
}
