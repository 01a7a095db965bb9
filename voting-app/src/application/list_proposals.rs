use crate::domain::{Page, PageRequest, ProposalStatus, ProposalWithDetails};
use crate::infrastructure::db::{
    classify_db_error, ListingOrder, ProposalFilter, ProposalRepository, VoteRepository,
};
use sea_orm::DbErr;
use std::collections::HashSet;
use uuid::Uuid;
use voting_errors::AppError;

/// The public listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Admin-authored proposals open for votes.
    Voting,
    /// Approved community proposals open for votes.
    Community,
    /// Finished videos, most recently published first.
    Published,
}

impl Listing {
    pub fn filter(&self) -> ProposalFilter {
        match self {
            Self::Voting => ProposalFilter {
                status: Some(ProposalStatus::Voting),
                is_community: Some(false),
            },
            Self::Community => ProposalFilter {
                status: Some(ProposalStatus::Voting),
                is_community: Some(true),
            },
            Self::Published => ProposalFilter {
                status: Some(ProposalStatus::Published),
                is_community: None,
            },
        }
    }

    pub fn order(&self) -> ListingOrder {
        match self {
            Self::Voting | Self::Community => ListingOrder::Newest,
            Self::Published => ListingOrder::RecentlyUpdated,
        }
    }
}

pub struct ListProposals {
    proposals: ProposalRepository,
    votes: VoteRepository,
}

impl ListProposals {
    pub fn new(proposals: ProposalRepository, votes: VoteRepository) -> Self {
        Self { proposals, votes }
    }

    pub async fn execute(
        &self,
        listing: Listing,
        request: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Page<ProposalWithDetails>, AppError> {
        self.page(listing.filter(), listing.order(), request, viewer)
            .await
    }

    /// One page of proposals with vote counts and, for a signed-in viewer, their
    /// own vote state. A page past the end resolves to the last page; the returned
    /// `page` tells the caller which one they got.
    pub async fn page(
        &self,
        filter: ProposalFilter,
        order: ListingOrder,
        request: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<Page<ProposalWithDetails>, AppError> {
        let (items, voted, total) = tokio::try_join!(
            self.requested_page(&filter, order, request),
            self.voted_ids(viewer),
            self.proposals.count(&filter),
        )
        .map_err(|e| classify_db_error(e, "List proposals"))?;

        let resolved = request.clamped(total);
        let items = match items {
            Some(items) if resolved == request => items,
            _ => {
                tracing::debug!(
                    requested = request.page,
                    resolved = resolved.page,
                    "Requested page out of range"
                );
                let offset = resolved
                    .offset()
                    .ok_or_else(|| AppError::validation("Page out of range"))?;
                self.proposals
                    .find_page(&filter, order, offset, resolved.page_size)
                    .await
                    .map_err(|e| classify_db_error(e, "List proposals"))?
            }
        };

        let items = items
            .into_iter()
            .map(|mut proposal| {
                proposal.has_voted = voted.contains(&proposal.id);
                proposal
            })
            .collect();

        Ok(Page::new(items, total, resolved))
    }

    /// `None` without a query when the page cannot even be addressed.
    async fn requested_page(
        &self,
        filter: &ProposalFilter,
        order: ListingOrder,
        request: PageRequest,
    ) -> Result<Option<Vec<ProposalWithDetails>>, DbErr> {
        match request.offset() {
            Some(offset) => self
                .proposals
                .find_page(filter, order, offset, request.page_size)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    async fn voted_ids(&self, viewer: Option<Uuid>) -> Result<HashSet<Uuid>, DbErr> {
        match viewer {
            Some(user_id) => Ok(self
                .votes
                .proposal_ids_voted_by(user_id)
                .await?
                .into_iter()
                .collect()),
            None => Ok(HashSet::new()),
        }
    }
}
