use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use voting_app::application::Listing;
use voting_app::domain::{NewProposal, Page, Proposal, ProposalUpdate, ProposalWithDetails};
use voting_app::AppContext;
use voting_errors::AppError;

use super::PageQuery;
use crate::extract::{AdminUser, JsonBody, MaybeUser, PathParam, QueryParam};

/// Admin-authored proposals open for votes.
pub async fn list(
    State(ctx): State<AppContext>,
    MaybeUser(viewer): MaybeUser,
    QueryParam(query): QueryParam<PageQuery>,
) -> Result<Json<Page<ProposalWithDetails>>, AppError> {
    let page = ctx
        .list_proposals
        .execute(Listing::Voting, query.request(), viewer.map(|v| v.id))
        .await?;
    Ok(Json(page))
}

pub async fn list_all(
    State(ctx): State<AppContext>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<ProposalWithDetails>>, AppError> {
    Ok(Json(ctx.moderate_proposals.list_all().await?))
}

pub async fn create(
    State(ctx): State<AppContext>,
    AdminUser(admin): AdminUser,
    JsonBody(input): JsonBody<NewProposal>,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    let proposal = ctx.moderate_proposals.create(input).await?;
    tracing::debug!(admin = %admin.id, proposal_id = %proposal.id, "Admin created proposal");
    Ok((StatusCode::CREATED, Json(proposal)))
}

pub async fn update(
    State(ctx): State<AppContext>,
    AdminUser(_): AdminUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(update): JsonBody<ProposalUpdate>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(ctx.moderate_proposals.edit(id, update).await?))
}

pub async fn approve(
    State(ctx): State<AppContext>,
    AdminUser(_): AdminUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(ctx.moderate_proposals.approve(id).await?))
}

pub async fn delete(
    State(ctx): State<AppContext>,
    AdminUser(_): AdminUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Value>, AppError> {
    ctx.moderate_proposals.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
