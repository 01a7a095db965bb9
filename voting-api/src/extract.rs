use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use tower_sessions::Session;
use uuid::Uuid;
use voting_app::domain::Identity;
use voting_app::AppContext;
use voting_errors::AppError;

pub const USER_ID_KEY: &str = "user_id";

/// `axum::Json` with malformed bodies reported as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with bad ids reported as `{"error": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// `axum::extract::Query` with undecodable query strings reported as `{"error": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParam<T>(pub T);

/// The signed-in caller, if any.
pub struct MaybeUser(pub Option<Identity>);

/// A signed-in caller. Rejects with 401 otherwise.
pub struct CurrentUser(pub Identity);

/// A signed-in admin. Anyone else gets 401.
pub struct AdminUser(pub Identity);

impl FromRequestParts<AppContext> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        session_identity(parts, ctx).await.map(MaybeUser)
    }
}

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        session_identity(parts, ctx)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<AppContext> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        match session_identity(parts, ctx).await? {
            Some(identity) if identity.is_admin() => Ok(AdminUser(identity)),
            Some(identity) => {
                tracing::warn!(user_id = %identity.id, "Non-admin called an admin endpoint");
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }
}

async fn session_identity(
    parts: &mut Parts,
    ctx: &AppContext,
) -> Result<Option<Identity>, AppError> {
    let session = Session::from_request_parts(parts, ctx)
        .await
        .map_err(|(_, message)| session_failure(message))?;

    let user_id: Option<Uuid> = session.get(USER_ID_KEY).await.map_err(session_failure)?;
    match user_id {
        Some(id) => ctx.identify_caller.resolve(id).await,
        None => Ok(None),
    }
}

pub fn session_failure(err: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %err, "Session store failure");
    AppError::Internal(format!("Session store failure: {err}"))
}
