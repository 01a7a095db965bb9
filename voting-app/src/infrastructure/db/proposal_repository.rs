use super::entities::{proposal, user, vote, Proposal};
use crate::domain::{
    Creator, Proposal as DomainProposal, ProposalChanges, ProposalStatus, ProposalWithDetails,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, Condition, DatabaseConnection, DbErr, FromQueryResult, JoinType,
    PaginatorTrait, Select,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposalFilter {
    pub status: Option<ProposalStatus>,
    pub is_community: Option<bool>,
}

impl ProposalFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(status) = self.status {
            condition = condition.add(proposal::Column::Status.eq(status));
        }
        if let Some(is_community) = self.is_community {
            condition = condition.add(proposal::Column::IsCommunity.eq(is_community));
        }
        condition
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingOrder {
    #[default]
    Newest,
    RecentlyUpdated,
}

/// One proposal joined with its creator and the number of vote rows pointing at it.
#[derive(Debug, FromQueryResult)]
struct ProposalRow {
    id: Uuid,
    title: String,
    description: String,
    thumbnail_url: String,
    status: ProposalStatus,
    is_community: bool,
    published_url: Option<String>,
    created_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    vote_count: i64,
    creator_name: Option<String>,
    creator_email: Option<String>,
    creator_avatar: Option<String>,
}

impl ProposalRow {
    fn into_details(self) -> ProposalWithDetails {
        let created_by = match (self.created_by, self.creator_name, self.creator_email) {
            (Some(id), Some(name), Some(email)) => Some(Creator {
                id,
                name,
                email,
                avatar_url: self.creator_avatar,
            }),
            _ => None,
        };

        ProposalWithDetails {
            id: self.id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            status: self.status,
            is_community: self.is_community,
            published_url: self.published_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            vote_count: self.vote_count,
            has_voted: false,
            created_by,
        }
    }
}

#[derive(Clone)]
pub struct ProposalRepository {
    db: DatabaseConnection,
}

impl ProposalRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: &DomainProposal) -> Result<proposal::Model, DbErr> {
        let active = proposal::ActiveModel {
            id: Set(data.id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            thumbnail_url: Set(data.thumbnail_url.clone()),
            status: Set(data.status),
            is_community: Set(data.is_community),
            published_url: Set(data.published_url.clone()),
            created_by: Set(data.created_by),
            created_at: Set(data.created_at),
            updated_at: Set(data.updated_at),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<proposal::Model>, DbErr> {
        Proposal::find_by_id(id).one(&self.db).await
    }

    /// Vote counts are computed from the vote rows on every read; nothing is cached.
    fn with_details(filter: &ProposalFilter, order: ListingOrder) -> Select<Proposal> {
        let query = Proposal::find()
            .filter(filter.condition())
            .column_as(
                Expr::col((vote::Entity, vote::Column::UserId)).count(),
                "vote_count",
            )
            .column_as(user::Column::Name, "creator_name")
            .column_as(user::Column::Email, "creator_email")
            .column_as(user::Column::AvatarUrl, "creator_avatar")
            .join(JoinType::LeftJoin, proposal::Relation::Votes.def())
            .join(JoinType::LeftJoin, proposal::Relation::Creator.def())
            .group_by(proposal::Column::Id)
            .group_by(user::Column::Id);

        let query = match order {
            ListingOrder::Newest => query.order_by_desc(proposal::Column::CreatedAt),
            ListingOrder::RecentlyUpdated => query.order_by_desc(proposal::Column::UpdatedAt),
        };

        // Tie-break so that pages never overlap.
        query.order_by_desc(proposal::Column::Id)
    }

    pub async fn find_page(
        &self,
        filter: &ProposalFilter,
        order: ListingOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ProposalWithDetails>, DbErr> {
        let rows = Self::with_details(filter, order)
            .offset(offset)
            .limit(limit)
            .into_model::<ProposalRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ProposalRow::into_details).collect())
    }

    pub async fn find_all(
        &self,
        filter: &ProposalFilter,
        order: ListingOrder,
    ) -> Result<Vec<ProposalWithDetails>, DbErr> {
        let rows = Self::with_details(filter, order)
            .into_model::<ProposalRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ProposalRow::into_details).collect())
    }

    pub async fn count(&self, filter: &ProposalFilter) -> Result<u64, DbErr> {
        Proposal::find()
            .filter(filter.condition())
            .count(&self.db)
            .await
    }

    pub async fn update(
        &self,
        current: proposal::Model,
        changes: &ProposalChanges,
    ) -> Result<proposal::Model, DbErr> {
        let mut active: proposal::ActiveModel = current.into();
        if let Some(title) = &changes.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(published_url) = &changes.published_url {
            active.published_url = Set(published_url.clone());
        }
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await
    }

    /// Votes go with the proposal through `ON DELETE CASCADE`. Returns rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = Proposal::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
