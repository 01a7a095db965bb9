use crate::domain::{
    NewProposal, Proposal, ProposalChanges, ProposalStatus, ProposalUpdate, ProposalWithDetails,
};
use crate::infrastructure::db::entities::proposal::Model as ProposalModel;
use crate::infrastructure::db::{
    classify_db_error, ListingOrder, ProposalFilter, ProposalRepository,
};
use crate::infrastructure::security::InputSanitizer;
use uuid::Uuid;
use voting_errors::AppError;

/// Admin-side operations. Callers are expected to have checked the admin role.
pub struct ModerateProposals {
    proposals: ProposalRepository,
}

impl ModerateProposals {
    pub fn new(proposals: ProposalRepository) -> Self {
        Self { proposals }
    }

    /// Every proposal regardless of status, newest first.
    pub async fn list_all(&self) -> Result<Vec<ProposalWithDetails>, AppError> {
        self.proposals
            .find_all(&ProposalFilter::default(), ListingOrder::Newest)
            .await
            .map_err(|e| classify_db_error(e, "List all proposals"))
    }

    /// Community submissions, optionally narrowed to one status (PENDING for the
    /// moderation queue).
    pub async fn list_community(
        &self,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<ProposalWithDetails>, AppError> {
        let filter = ProposalFilter {
            status,
            is_community: Some(true),
        };
        self.proposals
            .find_all(&filter, ListingOrder::Newest)
            .await
            .map_err(|e| classify_db_error(e, "List community proposals"))
    }

    /// Admin-authored proposals skip moderation and open for votes straight away.
    pub async fn create(&self, input: NewProposal) -> Result<Proposal, AppError> {
        let now = chrono::Utc::now();
        let proposal = Proposal {
            id: Uuid::new_v4(),
            title: InputSanitizer::title(&input.title)?,
            description: InputSanitizer::description(&input.description)?,
            thumbnail_url: InputSanitizer::thumbnail_url(&input.thumbnail_url)?,
            status: ProposalStatus::Voting,
            is_community: false,
            published_url: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };

        let model = self
            .proposals
            .create(&proposal)
            .await
            .map_err(|e| classify_db_error(e, "Create proposal"))?;

        tracing::info!(proposal_id = %model.id, "Proposal created");
        Ok(model.into())
    }

    pub async fn approve(&self, id: Uuid) -> Result<Proposal, AppError> {
        let current = self.find(id).await?;
        if current.status != ProposalStatus::Pending {
            return Err(AppError::validation(format!(
                "Only pending proposals can be approved; this one is {}",
                current.status
            )));
        }

        let changes = ProposalChanges {
            status: Some(ProposalStatus::Voting),
            ..Default::default()
        };
        self.apply(current, changes).await
    }

    pub async fn edit(&self, id: Uuid, update: ProposalUpdate) -> Result<Proposal, AppError> {
        if update.is_empty() {
            return Err(no_changes());
        }

        let current = self.find(id).await?;
        let snapshot: Proposal = current.clone().into();
        let changes = plan_edit(&snapshot, update)?;
        self.apply(current, changes).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self
            .proposals
            .delete(id)
            .await
            .map_err(|e| classify_db_error(e, "Delete proposal"))?;

        if removed == 0 {
            return Err(AppError::not_found("Proposal not found"));
        }

        tracing::info!(proposal_id = %id, "Proposal deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<ProposalModel, AppError> {
        self.proposals
            .find_by_id(id)
            .await
            .map_err(|e| classify_db_error(e, "Find proposal"))?
            .ok_or_else(|| AppError::not_found("Proposal not found"))
    }

    async fn apply(
        &self,
        current: ProposalModel,
        changes: ProposalChanges,
    ) -> Result<Proposal, AppError> {
        let from = current.status;
        let model = self
            .proposals
            .update(current, &changes)
            .await
            .map_err(|e| match classify_db_error(e, "Update proposal") {
                AppError::NotFound(_) => AppError::not_found("Proposal not found"),
                other => other,
            })?;

        tracing::info!(
            proposal_id = %model.id,
            from = %from,
            to = %model.status,
            "Proposal updated"
        );
        Ok(model.into())
    }
}

fn no_changes() -> AppError {
    AppError::validation("Nothing to update: send title, description, status or publishedUrl")
}

/// Checks an edit against the stored proposal and normalises it.
///
/// A `publishedUrl` key that is absent keeps the stored value, even when the
/// status moves to PUBLISHED in the same call. Only an explicit `null` (or a blank
/// string) clears it.
pub fn plan_edit(current: &Proposal, update: ProposalUpdate) -> Result<ProposalChanges, AppError> {
    if update.is_empty() {
        return Err(no_changes());
    }

    let title = update
        .title
        .as_deref()
        .map(InputSanitizer::title)
        .transpose()?;
    let description = update
        .description
        .as_deref()
        .map(InputSanitizer::description)
        .transpose()?;

    if let Some(next) = update.status {
        if !current.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Cannot move a proposal from {} to {}",
                current.status, next
            )));
        }
    }

    let published_url = update
        .published_url
        .map(|url| InputSanitizer::published_url(url.as_deref()))
        .transpose()?;

    let resulting_status = update.status.unwrap_or(current.status);
    if matches!(published_url, Some(Some(_))) && resulting_status != ProposalStatus::Published {
        return Err(AppError::validation(
            "publishedUrl can only be set on a published proposal",
        ));
    }

    Ok(ProposalChanges {
        title,
        description,
        status: update.status,
        published_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{seed_proposal, seed_user, Services};
    use crate::application::Listing;
    use crate::domain::PageRequest;
    use crate::infrastructure::db::testing::memory_db;

    fn proposal(status: ProposalStatus, published_url: Option<&str>) -> Proposal {
        let now = chrono::Utc::now();
        Proposal {
            id: Uuid::new_v4(),
            title: "Ownership".into(),
            description: "Borrowing in depth".into(),
            thumbnail_url: "https://i.ytimg.com/vi/x/maxresdefault.jpg".into(),
            status,
            is_community: false,
            published_url: published_url.map(str::to_string),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = plan_edit(&proposal(ProposalStatus::Voting, None), ProposalUpdate::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let update = ProposalUpdate {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(plan_edit(&proposal(ProposalStatus::Voting, None), update).is_err());
    }

    #[test]
    fn text_fields_are_trimmed() {
        let update = ProposalUpdate {
            title: Some("  Lifetimes ".into()),
            description: Some(" Variance too ".into()),
            ..Default::default()
        };
        let changes = plan_edit(&proposal(ProposalStatus::Voting, None), update).unwrap();
        assert_eq!(changes.title.as_deref(), Some("Lifetimes"));
        assert_eq!(changes.description.as_deref(), Some("Variance too"));
        assert_eq!(changes.status, None);
        assert_eq!(changes.published_url, None);
    }

    #[test]
    fn publishing_without_url_key_keeps_stored_url() {
        // A missing key must not null the stored URL.
        let update = ProposalUpdate {
            status: Some(ProposalStatus::Published),
            ..Default::default()
        };
        let changes = plan_edit(
            &proposal(ProposalStatus::Voting, Some("https://youtu.be/old")),
            update,
        )
        .unwrap();
        assert_eq!(changes.status, Some(ProposalStatus::Published));
        assert_eq!(changes.published_url, None);
    }

    #[test]
    fn explicit_null_clears_url() {
        let update = ProposalUpdate {
            status: Some(ProposalStatus::Published),
            published_url: Some(None),
            ..Default::default()
        };
        let changes = plan_edit(&proposal(ProposalStatus::Voting, None), update).unwrap();
        assert_eq!(changes.published_url, Some(None));
    }

    #[test]
    fn url_needs_published_status() {
        let update = ProposalUpdate {
            published_url: Some(Some("https://youtu.be/abc".into())),
            ..Default::default()
        };
        assert!(plan_edit(&proposal(ProposalStatus::Voting, None), update.clone()).is_err());
        assert!(plan_edit(&proposal(ProposalStatus::Published, None), update).is_ok());
    }

    #[test]
    fn backwards_transitions_are_rejected() {
        let update = ProposalUpdate {
            status: Some(ProposalStatus::Voting),
            ..Default::default()
        };
        assert!(plan_edit(&proposal(ProposalStatus::Published, None), update).is_err());

        let update = ProposalUpdate {
            status: Some(ProposalStatus::Published),
            ..Default::default()
        };
        assert!(plan_edit(&proposal(ProposalStatus::Pending, None), update).is_err());
    }

    #[tokio::test]
    async fn approved_submission_moves_to_public_list() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        let author = seed_user(&db, "author@example.com").await;
        let submitted = seed_proposal(&db, ProposalStatus::Pending, true, Some(author.id)).await;

        let queue = services
            .moderate
            .list_community(Some(ProposalStatus::Pending))
            .await
            .unwrap();
        assert_eq!(queue.len(), 1);

        let approved = services.moderate.approve(submitted.id).await.unwrap();
        assert_eq!(approved.status, ProposalStatus::Voting);

        let queue = services
            .moderate
            .list_community(Some(ProposalStatus::Pending))
            .await
            .unwrap();
        assert!(queue.is_empty());

        let public = services
            .list
            .execute(Listing::Community, PageRequest::default(), None)
            .await
            .unwrap();
        assert_eq!(public.items.len(), 1);
        assert_eq!(public.items[0].id, submitted.id);

        let again = services.moderate.approve(submitted.id).await.unwrap_err();
        assert!(matches!(again, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn publishing_preserves_existing_url() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        let created = seed_proposal(&db, ProposalStatus::Voting, false, None).await;

        let published = services
            .moderate
            .edit(
                created.id,
                ProposalUpdate {
                    status: Some(ProposalStatus::Published),
                    published_url: Some(Some("https://youtu.be/first".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(published.published_url.as_deref(), Some("https://youtu.be/first"));

        let republished = services
            .moderate
            .edit(
                created.id,
                ProposalUpdate {
                    status: Some(ProposalStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            republished.published_url.as_deref(),
            Some("https://youtu.be/first")
        );
        assert!(republished.updated_at >= published.updated_at);
    }

    #[tokio::test]
    async fn create_opens_for_votes_immediately() {
        let db = memory_db().await;
        let services = Services::new(db);

        let created = services
            .moderate
            .create(NewProposal {
                title: "Error handling".into(),
                description: "thiserror vs anyhow".into(),
                thumbnail_url: "https://i.ytimg.com/vi/x/maxresdefault.jpg".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.status, ProposalStatus::Voting);
        assert!(!created.is_community);

        let missing_thumbnail = services
            .moderate
            .create(NewProposal {
                title: "Error handling".into(),
                description: "thiserror vs anyhow".into(),
                thumbnail_url: "".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(missing_thumbnail, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_cascades_votes_and_reports_missing() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        let user = seed_user(&db, "viewer@example.com").await;
        let proposal = seed_proposal(&db, ProposalStatus::Voting, false, None).await;
        services.votes.cast(user.id, proposal.id).await.unwrap();

        services.moderate.delete(proposal.id).await.unwrap();

        let remaining = crate::infrastructure::db::VoteRepository::new(db)
            .proposal_ids_voted_by(user.id)
            .await
            .unwrap();
        assert!(remaining.is_empty());

        let err = services.moderate.delete(proposal.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn editing_a_missing_proposal_is_not_found() {
        let db = memory_db().await;
        let services = Services::new(db);

        let err = services
            .moderate
            .edit(
                Uuid::new_v4(),
                ProposalUpdate {
                    title: Some("New title".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_all_includes_every_status() {
        let db = memory_db().await;
        let services = Services::new(db.clone());
        seed_proposal(&db, ProposalStatus::Pending, true, None).await;
        seed_proposal(&db, ProposalStatus::Voting, false, None).await;
        seed_proposal(&db, ProposalStatus::Published, false, None).await;

        let all = services.moderate.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
