use super::entities::{user, User};
use crate::domain::User as DomainUser;
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DomainUser>, DbErr> {
        Ok(User::find_by_id(id).one(&self.db).await?.map(Into::into))
    }

    /// Inserts on first sign-in, otherwise refreshes the profile fields. Keyed on
    /// the Google subject id in a single statement, so concurrent first logins
    /// cannot create two rows.
    pub async fn upsert(&self, profile: &DomainUser) -> Result<DomainUser, DbErr> {
        let now = chrono::Utc::now();
        let active = user::ActiveModel {
            id: Set(profile.id),
            google_id: Set(profile.google_id.clone()),
            email: Set(profile.email.clone()),
            name: Set(profile.name.clone()),
            avatar_url: Set(profile.avatar_url.clone()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        let on_conflict = OnConflict::column(user::Column::GoogleId)
            .update_columns([
                user::Column::Email,
                user::Column::Name,
                user::Column::AvatarUrl,
                user::Column::UpdatedAt,
            ])
            .to_owned();

        let model = User::insert(active)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await?;
        Ok(model.into())
    }
}
