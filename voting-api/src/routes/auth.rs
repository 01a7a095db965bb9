use axum::{
    extract::State,
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use voting_app::domain::Identity;
use voting_app::AppContext;
use voting_errors::AppError;

use crate::extract::{session_failure, MaybeUser, QueryParam, USER_ID_KEY};

const OAUTH_STATE_KEY: &str = "oauth_state";
const PKCE_VERIFIER_KEY: &str = "pkce_verifier";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Me {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<Identity>,
}

pub async fn login(State(ctx): State<AppContext>, session: Session) -> Result<Redirect, AppError> {
    let redirect = ctx.oauth.login_redirect();

    session
        .insert(OAUTH_STATE_KEY, redirect.csrf_state)
        .await
        .map_err(session_failure)?;
    session
        .insert(PKCE_VERIFIER_KEY, redirect.pkce_verifier)
        .await
        .map_err(session_failure)?;

    Ok(Redirect::to(&redirect.url))
}

pub async fn callback(
    State(ctx): State<AppContext>,
    session: Session,
    QueryParam(query): QueryParam<CallbackQuery>,
) -> Result<Redirect, AppError> {
    if let Some(error) = query.error {
        tracing::warn!(%error, "Google sign-in was not completed");
        return Err(AppError::validation(format!("Sign-in failed: {error}")));
    }

    // Both are single-use.
    let expected_state: Option<String> = session
        .remove(OAUTH_STATE_KEY)
        .await
        .map_err(session_failure)?;
    let pkce_verifier: Option<String> = session
        .remove(PKCE_VERIFIER_KEY)
        .await
        .map_err(session_failure)?;

    let (Some(expected), Some(verifier)) = (expected_state, pkce_verifier) else {
        tracing::warn!("OAuth callback without a pending login");
        return Err(AppError::Forbidden);
    };
    if query.state.as_deref() != Some(expected.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Err(AppError::Forbidden);
    }

    let code = query
        .code
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let profile = ctx.oauth.exchange_code(&code, verifier).await?;
    let identity = ctx.identify_caller.sign_in(profile).await?;

    session.cycle_id().await.map_err(session_failure)?;
    session
        .insert(USER_ID_KEY, identity.id)
        .await
        .map_err(session_failure)?;

    Ok(Redirect::to("/"))
}

pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await.map_err(session_failure)?;
    Ok(Redirect::to("/"))
}

pub async fn me(MaybeUser(user): MaybeUser) -> Json<Me> {
    Json(Me {
        authenticated: user.is_some(),
        user,
    })
}
