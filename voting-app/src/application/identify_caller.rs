use crate::domain::{role_for_email, Identity, User};
use crate::infrastructure::auth::GoogleUserInfo;
use crate::infrastructure::db::{classify_db_error, UserRepository};
use uuid::Uuid;
use voting_errors::AppError;

/// Turns a session's user id, or a fresh OAuth profile, into an `Identity` with
/// its role worked out against the configured admin email.
pub struct IdentifyCaller {
    users: UserRepository,
    admin_email: Option<String>,
}

impl IdentifyCaller {
    pub fn new(users: UserRepository, admin_email: Option<String>) -> Self {
        Self { users, admin_email }
    }

    /// `None` when the user behind the session no longer exists.
    pub async fn resolve(&self, user_id: Uuid) -> Result<Option<Identity>, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| classify_db_error(e, "Load session user"))?;

        Ok(user.map(|u| self.identity(u)))
    }

    /// First sign-in creates the user; later ones refresh the profile.
    pub async fn sign_in(&self, profile: GoogleUserInfo) -> Result<Identity, AppError> {
        let user = User::new(
            profile.sub.clone(),
            profile.email.clone(),
            profile.display_name(),
            profile.picture.clone(),
        );

        let stored = self
            .users
            .upsert(&user)
            .await
            .map_err(|e| classify_db_error(e, "Sign in"))?;

        let identity = self.identity(stored);
        tracing::info!(user_id = %identity.id, role = ?identity.role, "User signed in");
        Ok(identity)
    }

    fn identity(&self, user: User) -> Identity {
        let role = role_for_email(&user.email, self.admin_email.as_deref());
        Identity {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::infrastructure::db::testing::memory_db;

    fn profile(sub: &str, email: &str, name: &str) -> GoogleUserInfo {
        GoogleUserInfo {
            sub: sub.into(),
            email: email.into(),
            name: Some(name.into()),
            picture: None,
        }
    }

    #[tokio::test]
    async fn sign_in_derives_role_from_email() {
        let db = memory_db().await;
        let identify = IdentifyCaller::new(
            UserRepository::new(db),
            Some("owner@example.com".into()),
        );

        let admin = identify
            .sign_in(profile("g-1", "owner@example.com", "Owner"))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let viewer = identify
            .sign_in(profile("g-2", "viewer@example.com", "Viewer"))
            .await
            .unwrap();
        assert_eq!(viewer.role, Role::User);
    }

    #[tokio::test]
    async fn repeat_sign_in_keeps_the_same_user() {
        let db = memory_db().await;
        let identify = IdentifyCaller::new(UserRepository::new(db), None);

        let first = identify
            .sign_in(profile("g-1", "viewer@example.com", "Old name"))
            .await
            .unwrap();
        let second = identify
            .sign_in(profile("g-1", "viewer@example.com", "New name"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "New name");

        let resolved = identify.resolve(first.id).await.unwrap().unwrap();
        assert_eq!(resolved.name, "New name");
    }

    #[tokio::test]
    async fn accounts_sharing_an_email_both_sign_in() {
        let db = memory_db().await;
        let identify = IdentifyCaller::new(UserRepository::new(db), None);

        let first = identify
            .sign_in(profile("g-1", "family@example.com", "First"))
            .await
            .unwrap();
        let second = identify
            .sign_in(profile("g-2", "family@example.com", "Second"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.email, "family@example.com");
    }

    #[tokio::test]
    async fn unknown_session_user_resolves_to_none() {
        let db = memory_db().await;
        let identify = IdentifyCaller::new(UserRepository::new(db), None);

        assert!(identify.resolve(Uuid::new_v4()).await.unwrap().is_none());
    }
}
