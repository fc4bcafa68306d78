use crate::error::ErrorStatus;
use crate::handler::AppModule;
use application::service::ResolveCallerService;
use application::transfer::{CallerDto, ResolveCallerDto};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::Report;
use kernel::KernelError;

/// Any active user holding a valid signed bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub CallerDto);

/// A caller whose role is `admin`.
#[derive(Debug, Clone)]
pub struct Admin(pub CallerDto);

async fn resolve(parts: &mut Parts, module: &AppModule) -> Result<CallerDto, ErrorStatus> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|rejection| {
            Report::new(KernelError::Unauthorized).attach_printable(rejection.to_string())
        })?;

    let caller = module
        .pgpool()
        .resolve_caller(
            module.token_verifier(),
            ResolveCallerDto {
                token: bearer.token().to_string(),
            },
        )
        .await?;
    Ok(caller)
}

#[axum::async_trait]
impl FromRequestParts<AppModule> for Authenticated {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await.map(Self)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppModule> for Admin {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let caller = resolve(parts, state).await?;
        if !caller.admin {
            tracing::debug!(user_id = %caller.user_id, "admin route refused");
            return Err(Report::new(KernelError::Forbidden).into());
        }
        Ok(Self(caller))
    }
}
