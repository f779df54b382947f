//! Credential primitives: identities, login payloads and the legacy digest.
//!
//! Stored credentials were written as unsalted SHA-1 hex digests. That scheme
//! is weak, but changing it requires re-hashing every stored value, so the
//! hasher stays compatible with what is on disk.

use std::fmt;

use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

/// Length in hex characters of every digest produced by [`hash_credential`].
pub const DIGEST_HEX_LEN: usize = 40;

/// Validation failures for login payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Identity was missing or blank once trimmed.
    #[error("identity must not be empty")]
    EmptyIdentity,
    /// Password was missing or empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Opaque lookup key into exactly one credential table.
///
/// Numeric and textual identifiers are both carried as trimmed text; the
/// store adapter compares them as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Trim and validate a raw identity.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::Identity;
    ///
    /// let identity = Identity::new(" 10452 ").expect("valid identity");
    /// assert_eq!(identity.as_str(), "10452");
    /// ```
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identity as text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex digest of a credential, either freshly computed or read from a store.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialDigest(String);

impl CredentialDigest {
    /// Wrap a digest exactly as it was persisted.
    ///
    /// No trimming or case folding happens here; [`CredentialDigest::matches`]
    /// is the only place case is ignored.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the digest text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare two digests ignoring ASCII case.
    ///
    /// Length and every character must otherwise agree.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::CredentialDigest;
    ///
    /// let stored = CredentialDigest::from_stored("AB12");
    /// assert!(stored.matches(&CredentialDigest::from_stored("ab12")));
    /// assert!(!stored.matches(&CredentialDigest::from_stored("ab123")));
    /// ```
    pub fn matches(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialDigest(..)")
    }
}

/// Hash a plaintext credential with the legacy scheme.
///
/// # Examples
/// ```
/// use mineops::domain::{hash_credential, DIGEST_HEX_LEN};
///
/// let digest = hash_credential("password");
/// assert_eq!(digest.as_str(), "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8");
/// assert_eq!(digest.as_str().len(), DIGEST_HEX_LEN);
/// ```
pub fn hash_credential(plaintext: &str) -> CredentialDigest {
    CredentialDigest(hex::encode(Sha1::digest(plaintext.as_bytes())))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `identity` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identity: Identity,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(identity: &str, password: &str) -> Result<Self, LoginValidationError> {
        let identity = Identity::new(identity)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            identity,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Identity to look up.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}
