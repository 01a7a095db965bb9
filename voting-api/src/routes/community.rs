use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use voting_app::application::Listing;
use voting_app::domain::{CommunitySubmission, Page, Proposal, ProposalStatus, ProposalWithDetails};
use voting_app::AppContext;
use voting_errors::AppError;

use super::PageQuery;
use crate::extract::{AdminUser, CurrentUser, JsonBody, MaybeUser, QueryParam};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    status: Option<String>,
}

impl StatusQuery {
    fn status(&self) -> Result<Option<ProposalStatus>, AppError> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<ProposalStatus>)
            .transpose()
            .map_err(AppError::Validation)
    }
}

/// Approved community proposals open for votes.
pub async fn list(
    State(ctx): State<AppContext>,
    MaybeUser(viewer): MaybeUser,
    QueryParam(query): QueryParam<PageQuery>,
) -> Result<Json<Page<ProposalWithDetails>>, AppError> {
    let page = ctx
        .list_proposals
        .execute(Listing::Community, query.request(), viewer.map(|v| v.id))
        .await?;
    Ok(Json(page))
}

pub async fn submit(
    State(ctx): State<AppContext>,
    CurrentUser(author): CurrentUser,
    JsonBody(submission): JsonBody<CommunitySubmission>,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    let proposal = ctx.submit_proposal.execute(&author, submission).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// Every community proposal, or only those in `?status=`.
pub async fn list_for_admin(
    State(ctx): State<AppContext>,
    AdminUser(_): AdminUser,
    QueryParam(query): QueryParam<StatusQuery>,
) -> Result<Json<Vec<ProposalWithDetails>>, AppError> {
    let proposals = ctx
        .moderate_proposals
        .list_community(query.status()?)
        .await?;
    Ok(Json(proposals))
}
