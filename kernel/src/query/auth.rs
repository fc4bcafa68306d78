use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{AuthToken, Caller, UserId};
use crate::KernelError;

/// Checks a bearer token's signature and expiry and yields the user it was
/// issued to. Tokens are issued by the identity service, never here.
pub trait TokenVerifier: 'static + Sync + Send {
    fn verify(&self, token: &AuthToken) -> error_stack::Result<UserId, KernelError>;
}

#[async_trait::async_trait]
pub trait AuthQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// The caller behind `user_id`, or `None` if the user is unknown or
    /// deactivated.
    async fn find_caller(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Caller>, KernelError>;
}

pub trait DependOnAuthQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type AuthQuery: AuthQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn auth_query(&self) -> &Self::AuthQuery;
}
