use super::entities::{vote, Vote};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// A second vote for the same pair fails on the primary key, never silently.
    pub async fn create(&self, user_id: Uuid, proposal_id: Uuid) -> Result<vote::Model, DbErr> {
        let active = vote::ActiveModel {
            user_id: Set(user_id),
            proposal_id: Set(proposal_id),
            created_at: Set(chrono::Utc::now()),
        };
        active.insert(&self.db).await
    }

    /// Returns the number of rows removed: 0 or 1.
    pub async fn delete(&self, user_id: Uuid, proposal_id: Uuid) -> Result<u64, DbErr> {
        let result = Vote::delete_many()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::ProposalId.eq(proposal_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn proposal_ids_voted_by(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        Vote::find()
            .select_only()
            .column(vote::Column::ProposalId)
            .filter(vote::Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
    }
}
