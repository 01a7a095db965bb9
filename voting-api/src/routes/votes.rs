use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;
use voting_app::domain::Vote;
use voting_app::AppContext;
use voting_errors::AppError;

use crate::extract::{CurrentUser, PathParam};

pub async fn cast(
    State(ctx): State<AppContext>,
    CurrentUser(voter): CurrentUser,
    PathParam(proposal_id): PathParam<Uuid>,
) -> Result<(StatusCode, Json<Vote>), AppError> {
    let vote = ctx.vote_on_proposal.cast(voter.id, proposal_id).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

pub async fn remove(
    State(ctx): State<AppContext>,
    CurrentUser(voter): CurrentUser,
    PathParam(proposal_id): PathParam<Uuid>,
) -> Result<Json<Value>, AppError> {
    ctx.vote_on_proposal.remove(voter.id, proposal_id).await?;
    Ok(Json(json!({ "success": true })))
}
