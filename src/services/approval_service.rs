use std::sync::Arc;

use crate::{
    auth::{require_admin, SessionManager},
    errors::{AppError, AppResult},
    models::{
        domain::{UserRole, UserStatus},
        dto::response::UserDto,
    },
    repositories::UserRepository,
};

/// Admin-only account moderation. The acting session is read from the
/// session manager at call time.
pub struct ApprovalService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
}

impl ApprovalService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionManager>) -> Self {
        Self { users, sessions }
    }

    pub async fn approve(&self, user_id: &str) -> AppResult<()> {
        self.set_status(user_id, UserStatus::Approved).await
    }

    pub async fn reject(&self, user_id: &str) -> AppResult<()> {
        self.set_status(user_id, UserStatus::Rejected).await
    }

    /// Deletes the account. Its submissions are left in place.
    pub async fn remove(&self, user_id: &str) -> AppResult<()> {
        let admin = require_admin(self.sessions.get())?;
        if admin.user_id() == user_id {
            return Err(AppError::ValidationError(
                "You cannot remove your own account".to_string(),
            ));
        }

        self.users.delete(user_id).await?;
        log::info!("Admin '{}' removed user {}", admin.user.username, user_id);
        Ok(())
    }

    pub async fn list_pending_students(&self) -> AppResult<Vec<UserDto>> {
        self.list_students(UserStatus::Pending).await
    }

    pub async fn list_approved_students(&self) -> AppResult<Vec<UserDto>> {
        self.list_students(UserStatus::Approved).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        require_admin(self.sessions.get())?;
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn list_students(&self, status: UserStatus) -> AppResult<Vec<UserDto>> {
        require_admin(self.sessions.get())?;
        let users = self
            .users
            .find_by_role_and_status(UserRole::Student, status)
            .await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn set_status(&self, user_id: &str, status: UserStatus) -> AppResult<()> {
        let admin = require_admin(self.sessions.get())?;
        self.users.update_status(user_id, status).await?;
        log::info!(
            "Admin '{}' set user {} to {}",
            admin.user.username,
            user_id,
            status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::User,
        repositories::{user_repository::MockUserRepository, InMemoryUserRepository},
        test_utils::fixtures::{admin, session_for, student},
    };

    async fn setup() -> (ApprovalService, Arc<InMemoryUserRepository>, Arc<SessionManager>, User) {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(SessionManager::new());
        let admin = admin();
        users.insert(admin.clone()).await.unwrap();
        sessions.set(session_for(&admin));

        let service = ApprovalService::new(users.clone(), sessions.clone());
        (service, users, sessions, admin)
    }

    #[tokio::test]
    async fn test_approve_and_reject_update_status() {
        let (service, users, _, _) = setup().await;
        let student = users
            .insert(student("ann", UserStatus::Pending))
            .await
            .unwrap();

        service.approve(&student.id).await.unwrap();
        let stored = users.find_by_id(&student.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Approved);

        service.reject(&student.id).await.unwrap();
        service.reject(&student.id).await.unwrap();
        let stored = users.find_by_id(&student.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Rejected);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (service, _, _, _) = setup().await;

        assert!(matches!(
            service.approve("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.remove("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_student_cannot_moderate() {
        let (service, users, sessions, _) = setup().await;
        let student = users
            .insert(student("ann", UserStatus::Approved))
            .await
            .unwrap();
        let target = users
            .insert(crate::test_utils::fixtures::student("bob", UserStatus::Pending))
            .await
            .unwrap();
        sessions.set(session_for(&student));

        assert!(matches!(
            service.approve(&target.id).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            service.list_pending_students().await,
            Err(AppError::Unauthorized(_))
        ));

        sessions.clear();
        assert!(matches!(
            service.remove(&target.id).await,
            Err(AppError::Unauthorized(_))
        ));

        let stored = users.find_by_id(&target.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Pending);
    }

    #[tokio::test]
    async fn test_remove_deletes_account_but_not_self() {
        let (service, users, _, admin) = setup().await;
        let student = users
            .insert(student("ann", UserStatus::Approved))
            .await
            .unwrap();

        service.remove(&student.id).await.unwrap();
        assert!(users.find_by_id(&student.id).await.unwrap().is_none());

        assert!(matches!(
            service.remove(&admin.id).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_lists_filter_students_by_status() {
        let (service, users, _, _) = setup().await;
        users
            .insert(student("ann", UserStatus::Pending))
            .await
            .unwrap();
        users
            .insert(student("bob", UserStatus::Approved))
            .await
            .unwrap();
        users
            .insert(student("cat", UserStatus::Rejected))
            .await
            .unwrap();

        let pending: Vec<_> = service
            .list_pending_students()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(pending, vec!["ann"]);

        let approved = service.list_approved_students().await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].username, "bob");

        assert_eq!(service.list_users().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_status()
            .returning(|_, _| Err(AppError::StoreUnavailable("timeout".into())));

        let sessions = Arc::new(SessionManager::new());
        sessions.set(session_for(&admin()));
        let service = ApprovalService::new(Arc::new(users), sessions);

        assert!(matches!(
            service.approve("u-1").await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
