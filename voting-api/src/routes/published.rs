use axum::{
    extract::State,
    Json,
};
use voting_app::application::Listing;
use voting_app::domain::{Page, ProposalWithDetails};
use voting_app::AppContext;
use voting_errors::AppError;

use super::PageQuery;
use crate::extract::{MaybeUser, QueryParam};

/// Finished videos, most recently updated first.
pub async fn list(
    State(ctx): State<AppContext>,
    MaybeUser(viewer): MaybeUser,
    QueryParam(query): QueryParam<PageQuery>,
) -> Result<Json<Page<ProposalWithDetails>>, AppError> {
    let page = ctx
        .list_proposals
        .execute(Listing::Published, query.request(), viewer.map(|v| v.id))
        .await?;
    Ok(Json(page))
}
