use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Thumbnail assigned to every community submission until an admin replaces it.
pub const COMMUNITY_PLACEHOLDER_THUMBNAIL: &str = "/community-placeholder.svg";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ProposalStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "VOTING")]
    Voting,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Voting => "VOTING",
            Self::Published => "PUBLISHED",
        }
    }

    /// PENDING -> VOTING -> PUBLISHED. Re-asserting the current status is a no-op.
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Pending)
                | (Self::Voting, Self::Voting)
                | (Self::Published, Self::Published)
                | (Self::Pending, Self::Voting)
                | (Self::Voting, Self::Published)
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "VOTING" => Ok(Self::Voting),
            "PUBLISHED" => Ok(Self::Published),
            other => Err(format!("Unknown proposal status: {other}")),
        }
    }
}

/// A proposal row as stored, without vote aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub status: ProposalStatus,
    pub is_community: bool,
    pub published_url: Option<String>,
    #[serde(rename = "createdById")]
    pub created_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Display info for the user who submitted a community proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Proposal annotated for listings: vote count, the caller's vote state and creator info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalWithDetails {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub status: ProposalStatus,
    pub is_community: bool,
    pub published_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub vote_count: i64,
    pub has_voted: bool,
    pub created_by: Option<Creator>,
}

/// Admin-authored proposal input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunitySubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial edit. `published_url` tells apart a missing key (`None`) from an
/// explicit `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProposalStatus>,
    #[serde(default, deserialize_with = "present")]
    pub published_url: Option<Option<String>>,
}

impl ProposalUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.published_url.is_none()
    }
}

/// An edit that has been validated against the stored proposal. Each `Some` is a
/// column to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProposalStatus>,
    pub published_url: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_moves_forward_one_step_at_a_time() {
        use ProposalStatus::*;

        assert!(Pending.can_transition_to(Voting));
        assert!(Voting.can_transition_to(Published));
        assert!(Voting.can_transition_to(Voting));

        assert!(!Pending.can_transition_to(Published));
        assert!(!Voting.can_transition_to(Pending));
        assert!(!Published.can_transition_to(Voting));
        assert!(!Published.can_transition_to(Pending));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("voting".parse::<ProposalStatus>(), Ok(ProposalStatus::Voting));
        assert_eq!(" PENDING ".parse::<ProposalStatus>(), Ok(ProposalStatus::Pending));
        assert!("ARCHIVED".parse::<ProposalStatus>().is_err());
    }

    #[test]
    fn update_distinguishes_missing_and_null_published_url() {
        let missing: ProposalUpdate = serde_json::from_str(r#"{"status":"PUBLISHED"}"#).unwrap();
        assert_eq!(missing.published_url, None);
        assert_eq!(missing.status, Some(ProposalStatus::Published));

        let null: ProposalUpdate = serde_json::from_str(r#"{"publishedUrl":null}"#).unwrap();
        assert_eq!(null.published_url, Some(None));

        let set: ProposalUpdate =
            serde_json::from_str(r#"{"publishedUrl":"https://youtu.be/abc"}"#).unwrap();
        assert_eq!(set.published_url, Some(Some("https://youtu.be/abc".to_string())));
    }

    #[test]
    fn update_with_only_unknown_fields_is_empty() {
        let update: ProposalUpdate = serde_json::from_str(r#"{"votes":3}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn bare_row_serializes_creator_as_id() {
        let now = chrono::Utc::now();
        let proposal = Proposal {
            id: Uuid::new_v4(),
            title: "Rust async".into(),
            description: "Pinning explained".into(),
            thumbnail_url: COMMUNITY_PLACEHOLDER_THUMBNAIL.into(),
            status: ProposalStatus::Pending,
            is_community: true,
            published_url: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["isCommunity"], true);
        assert!(json.get("createdById").is_some());
        assert!(json.get("thumbnailUrl").is_some());
    }
}
