//! Admin login use case.
//!
//! Verification runs against the configured credential table. Once it
//! passes, the profile procedure is called with the identity and the freshly
//! computed digest, and its first row becomes the response.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::credentials::{hash_credential, LoginCredentials};
use super::ports::{CredentialStore, LoginService, ProcedureGateway};
use super::procedures::{ParamType, ProcedureCall, ProcedureSignature};
use super::rows::{Row, RowNormalizer};
use super::verifier::CredentialVerifier;
use super::Error;

/// Profile lookup for a verified admin user.
pub const ADMIN_PROFILE: ProcedureSignature =
    ProcedureSignature::rows("SP_MINES_ADMIN_USER_GET", &[ParamType::Text, ParamType::Text]);

const OPERATION: &str = "adminlogin";

/// [`LoginService`] backed by a credential store and the profile procedure.
#[derive(Clone)]
pub struct AdminLoginService {
    verifier: CredentialVerifier,
    gateway: Arc<dyn ProcedureGateway>,
    normalizer: RowNormalizer,
}

impl AdminLoginService {
    /// Wire the service.
    pub fn new(store: Arc<dyn CredentialStore>, gateway: Arc<dyn ProcedureGateway>) -> Self {
        Self {
            verifier: CredentialVerifier::new(store),
            gateway,
            normalizer: RowNormalizer::new(),
        }
    }

    /// Also strip `digest_aliases` from the profile row.
    ///
    /// Pass the digest columns of the configured credential table so a
    /// custom column never reaches the response.
    pub fn with_digest_aliases<I, S>(mut self, digest_aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer = self.normalizer.with_sensitive_fields(digest_aliases);
        self
    }
}

#[async_trait]
impl LoginService for AdminLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Row, Error> {
        let identity = credentials.identity();
        let verified = self
            .verifier
            .verify(identity, credentials.password())
            .await
            .map_err(|err| err.into_domain(OPERATION, identity.as_str()))?;
        if !verified {
            info!(%identity, "login rejected");
            return Err(Error::unauthorized("Invalid credentials!"));
        }

        let digest = hash_credential(credentials.password());
        let call = ProcedureCall::new(
            ADMIN_PROFILE,
            vec![Some(identity.to_string()), Some(digest.as_str().to_owned())],
        )
        .map_err(|err| err.into_domain(OPERATION, identity.as_str()))?;
        let raw = self
            .gateway
            .call(&call)
            .await
            .map_err(|err| err.into_domain(OPERATION, identity.as_str()))?;

        let profile = self
            .normalizer
            .normalize(raw)
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("User data not found"))?;
        info!(%identity, "login accepted");
        Ok(profile)
    }
}
