use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::AuthQuery;
use kernel::prelude::entity::{Caller, UserId, UserRole};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresAuthRepository;

#[async_trait::async_trait]
impl AuthQuery for PostgresAuthRepository {
    type Transaction = PostgresTransaction;

    async fn find_caller(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Caller>, KernelError> {
        PgAuthInternal::find_caller(con, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct CallerRow {
    id: Uuid,
    role: String,
}

impl TryFrom<CallerRow> for Caller {
    type Error = Report<KernelError>;
    fn try_from(row: CallerRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<UserRole>().map_err(|error| {
            Report::new(KernelError::Internal).attach_printable(error)
        })?;
        Ok(Caller::new(UserId::new(row.id), role))
    }
}

pub(in crate::database) struct PgAuthInternal;

impl PgAuthInternal {
    async fn find_caller(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Caller>, KernelError> {
        let row = sqlx::query_as::<_, CallerRow>(
            // language=postgresql
            r#"
            SELECT id, role
            FROM users
            WHERE id = $1 AND active
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Caller::try_from).transpose()
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use sqlx::PgConnection;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::AuthQuery;
    use kernel::prelude::entity::{UserId, UserRole};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresAuthRepository, PostgresDatabase};
    use crate::error::ConvertError;

    pub(in crate::database) async fn user_fixture(
        con: &mut PgConnection,
        role: &str,
    ) -> error_stack::Result<Uuid, KernelError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, name, email, role) VALUES ($1, 'Test user', $2, $3)",
        )
        .bind(id)
        .bind(format!("{}@example.com", id.simple()))
        .bind(role)
        .execute(con)
        .await
        .convert_error()?;
        Ok(id)
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn only_active_users_resolve() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut connection = db.transact().await?;

        let admin = user_fixture(&mut connection, "admin").await?;
        let retired = user_fixture(&mut connection, "customer").await?;
        sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
            .bind(retired)
            .execute(&mut *connection)
            .await
            .convert_error()?;

        let caller = PostgresAuthRepository
            .find_caller(&mut connection, &UserId::new(admin))
            .await?
            .unwrap();
        assert_eq!(caller.user_id().as_ref(), &admin);
        assert_eq!(caller.role(), &UserRole::Admin);

        for missing in [retired, Uuid::new_v4()] {
            let rejected = PostgresAuthRepository
                .find_caller(&mut connection, &UserId::new(missing))
                .await?;
            assert!(rejected.is_none());
        }

        Ok(())
    }
}
