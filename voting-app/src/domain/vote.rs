use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: uuid::Uuid,
    pub proposal_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
