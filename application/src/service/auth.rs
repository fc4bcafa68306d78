use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{AuthQuery, DependOnAuthQuery, TokenVerifier};
use kernel::prelude::entity::AuthToken;
use kernel::KernelError;

use crate::transfer::{CallerDto, ResolveCallerDto};

#[async_trait::async_trait]
pub trait ResolveCallerService: 'static + Sync + Send + DependOnAuthQuery {
    /// A valid token is not enough: the user it names must still exist and
    /// be active. The role comes from the user row, not from the token.
    async fn resolve_caller<V: TokenVerifier>(
        &self,
        verifier: &V,
        dto: ResolveCallerDto,
    ) -> error_stack::Result<CallerDto, KernelError> {
        let token = dto.token.trim();
        if token.is_empty() {
            return Err(Report::new(KernelError::Unauthorized).attach_printable("missing token"));
        }
        let user_id = verifier.verify(&AuthToken::new(token))?;

        let mut connection = self.database_connection().transact().await?;

        let caller = self
            .auth_query()
            .find_caller(&mut connection, &user_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Unauthorized)
                    .attach_printable("token names an unknown or deactivated user")
            })?;

        Ok(CallerDto::from(caller))
    }
}

impl<T> ResolveCallerService for T where T: DependOnAuthQuery {}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use error_stack::Report;
    use uuid::Uuid;

    use kernel::interface::query::TokenVerifier;
    use kernel::prelude::entity::{AuthToken, Caller, UserId, UserRole};
    use kernel::KernelError;

    use crate::memory::InMemoryDatabase;
    use crate::service::ResolveCallerService;
    use crate::transfer::ResolveCallerDto;

    struct IssuedTokens(HashMap<&'static str, Uuid>);

    impl TokenVerifier for IssuedTokens {
        fn verify(&self, token: &AuthToken) -> error_stack::Result<UserId, KernelError> {
            let token: &String = token.as_ref();
            self.0
                .get(token.as_str())
                .map(|id| UserId::new(*id))
                .ok_or_else(|| Report::new(KernelError::Unauthorized))
        }
    }

    fn resolve(token: &str) -> ResolveCallerDto {
        ResolveCallerDto {
            token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn active_user_resolves_with_stored_role() {
        let db = InMemoryDatabase::default();
        let user_id = Uuid::new_v4();
        db.seed(|store| {
            store.users.insert(
                UserId::new(user_id),
                (Caller::new(UserId::new(user_id), UserRole::Admin), true),
            );
        })
        .await;
        let tokens = IssuedTokens(HashMap::from([("signed", user_id)]));

        let caller = db.resolve_caller(&tokens, resolve("signed")).await.unwrap();
        assert_eq!(caller.user_id, user_id);
        assert!(caller.admin);
    }

    #[tokio::test]
    async fn deactivated_or_unknown_users_are_unauthorized() {
        let db = InMemoryDatabase::default();
        let inactive = Uuid::new_v4();
        db.seed(|store| {
            store.users.insert(
                UserId::new(inactive),
                (Caller::new(UserId::new(inactive), UserRole::Customer), false),
            );
        })
        .await;
        let tokens = IssuedTokens(HashMap::from([
            ("inactive", inactive),
            ("ghost", Uuid::new_v4()),
        ]));

        for token in ["inactive", "ghost"] {
            let error = db.resolve_caller(&tokens, resolve(token)).await.unwrap_err();
            assert!(matches!(error.current_context(), KernelError::Unauthorized));
        }
    }

    #[tokio::test]
    async fn blank_or_rejected_token_is_unauthorized() {
        let db = InMemoryDatabase::default();
        let tokens = IssuedTokens(HashMap::new());
        for token in ["", "  ", "forged"] {
            let error = db.resolve_caller(&tokens, resolve(token)).await.unwrap_err();
            assert!(matches!(error.current_context(), KernelError::Unauthorized));
        }
    }
}
