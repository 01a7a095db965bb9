use crate::domain::Vote;
use crate::infrastructure::db::{classify_db_error, VoteRepository};
use uuid::Uuid;
use voting_errors::AppError;

/// Casting and withdrawing votes. Neither call is idempotent: a duplicate cast is a
/// conflict and withdrawing a missing vote is not found. Uniqueness is left to the
/// store, so two racing casts end with one row and one conflict.
pub struct VoteOnProposal {
    votes: VoteRepository,
}

impl VoteOnProposal {
    pub fn new(votes: VoteRepository) -> Self {
        Self { votes }
    }

    pub async fn cast(&self, user_id: Uuid, proposal_id: Uuid) -> Result<Vote, AppError> {
        let vote = self
            .votes
            .create(user_id, proposal_id)
            .await
            .map_err(|e| match classify_db_error(e, "Cast vote") {
                AppError::Conflict(_) => {
                    AppError::Conflict("You have already voted for this proposal".to_string())
                }
                AppError::NotFound(_) => AppError::not_found("Proposal not found"),
                other => other,
            })?;

        tracing::info!(%user_id, %proposal_id, "Vote cast");
        Ok(vote.into())
    }

    pub async fn remove(&self, user_id: Uuid, proposal_id: Uuid) -> Result<(), AppError> {
        let removed = self
            .votes
            .delete(user_id, proposal_id)
            .await
            .map_err(|e| classify_db_error(e, "Remove vote"))?;

        if removed == 0 {
            return Err(AppError::not_found("Vote not found"));
        }

        tracing::info!(%user_id, %proposal_id, "Vote removed");
        Ok(())
    }
}
