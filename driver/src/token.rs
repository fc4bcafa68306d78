use error_stack::{Report, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kernel::interface::query::TokenVerifier;
use kernel::prelude::entity::{AuthToken, UserId};
use kernel::KernelError;

/// Claims the identity service signs into every token. Only `id` is read;
/// `exp` is enforced by the validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: u64,
}

/// HS256 verifier for tokens signed with the shared `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> error_stack::Result<Self, KernelError> {
        if secret.trim().is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("JWT_SECRET must not be blank"));
        }
        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        })
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &AuthToken) -> error_stack::Result<UserId, KernelError> {
        let token: &String = token.as_ref();
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|error| {
                tracing::debug!(kind = ?error.kind(), "bearer token rejected");
                Report::new(error)
            })
            .change_context_lazy(|| KernelError::Unauthorized)?;
        Ok(UserId::new(data.claims.id))
    }
}
