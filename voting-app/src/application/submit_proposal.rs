use crate::domain::{
    CommunitySubmission, Identity, Proposal, ProposalStatus, COMMUNITY_PLACEHOLDER_THUMBNAIL,
};
use crate::infrastructure::db::{classify_db_error, ProposalRepository};
use crate::infrastructure::security::InputSanitizer;
use uuid::Uuid;
use voting_errors::AppError;

/// Community submissions land in the moderation queue as PENDING.
pub struct SubmitProposal {
    proposals: ProposalRepository,
}

impl SubmitProposal {
    pub fn new(proposals: ProposalRepository) -> Self {
        Self { proposals }
    }

    pub async fn execute(
        &self,
        author: &Identity,
        submission: CommunitySubmission,
    ) -> Result<Proposal, AppError> {
        let now = chrono::Utc::now();
        let proposal = Proposal {
            id: Uuid::new_v4(),
            title: InputSanitizer::title(&submission.title)?,
            description: InputSanitizer::description(&submission.description)?,
            thumbnail_url: COMMUNITY_PLACEHOLDER_THUMBNAIL.to_string(),
            status: ProposalStatus::Pending,
            is_community: true,
            published_url: None,
            created_by: Some(author.id),
            created_at: now,
            updated_at: now,
        };

        let model = self
            .proposals
            .create(&proposal)
            .await
            .map_err(|e| classify_db_error(e, "Submit community proposal"))?;

        tracing::info!(proposal_id = %model.id, author = %author.id, "Community proposal submitted");
        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{seed_user, Services};
    use crate::domain::Role;
    use crate::infrastructure::db::testing::memory_db;

    fn identity(id: Uuid) -> Identity {
        Identity {
            id,
            name: "Viewer".into(),
            email: "viewer@example.com".into(),
            avatar_url: None,
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn submission_enters_moderation_queue() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        let user = seed_user(&db, "viewer@example.com").await;

        let created = services
            .submit
            .execute(
                &identity(user.id),
                CommunitySubmission {
                    title: "  Macros 2.0 ".into(),
                    description: "Declarative vs procedural".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.status, ProposalStatus::Pending);
        assert!(created.is_community);
        assert_eq!(created.title, "Macros 2.0");
        assert_eq!(created.thumbnail_url, COMMUNITY_PLACEHOLDER_THUMBNAIL);
        assert_eq!(created.created_by, Some(user.id));

        let queue = services
            .moderate
            .list_community(Some(ProposalStatus::Pending))
            .await
            .unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].title, "Macros 2.0");
        assert_eq!(queue[0].description, "Declarative vs procedural");
        assert_eq!(queue[0].status, ProposalStatus::Pending);
        assert_eq!(queue[0].created_by.as_ref().map(|c| c.id), Some(user.id));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        let user = seed_user(&db, "viewer@example.com").await;

        let err = services
            .submit
            .execute(
                &identity(user.id),
                CommunitySubmission {
                    title: "Title".into(),
                    description: "   ".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
