use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    auth::{FileTokenStore, JwtService, SessionManager, TokenStore},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizCourseRepository, MongoQuizSubmissionRepository, MongoUserRepository,
        QuizCourseRepository, QuizSubmissionRepository, UserRepository,
    },
    services::{
        ApprovalService, AuthService, QuizAttemptService, QuizCourseService, ReviewService,
    },
};

/// The stores an [`AppState`] is assembled from.
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn QuizCourseRepository>,
    pub submissions: Arc<dyn QuizSubmissionRepository>,
    pub tokens: Arc<dyn TokenStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub auth_service: Arc<AuthService>,
    pub approval_service: Arc<ApprovalService>,
    pub quiz_course_service: Arc<QuizCourseService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub review_service: Arc<ReviewService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connects to MongoDB, makes sure the unique indexes exist and persists
    /// the session token in `config.session_token_file`.
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db, &config.users_collection));
        users.ensure_indexes().await?;

        let courses = Arc::new(MongoQuizCourseRepository::new(&db, &config.courses_collection));
        courses.ensure_indexes().await?;

        let submissions = Arc::new(MongoQuizSubmissionRepository::new(
            &db,
            &config.submissions_collection,
            &config.sent_results_collection,
        ));
        submissions.ensure_indexes().await?;

        let tokens = Arc::new(FileTokenStore::new(config.session_token_file.clone()));

        Ok(Self::from_stores(
            config,
            Stores {
                users,
                courses,
                submissions,
                tokens,
            },
        ))
    }

    pub fn from_stores(config: Config, stores: Stores) -> Self {
        let sessions = Arc::new(SessionManager::new());
        let jwt = JwtService::new(&config.session_token_secret, config.session_token_hours);

        let auth_service = Arc::new(AuthService::new(
            stores.users.clone(),
            stores.tokens,
            sessions.clone(),
            jwt,
        ));
        let approval_service = Arc::new(ApprovalService::new(
            stores.users.clone(),
            sessions.clone(),
        ));
        let quiz_course_service = Arc::new(QuizCourseService::new(
            stores.courses,
            sessions.clone(),
        ));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(stores.submissions.clone()));
        let review_service = Arc::new(ReviewService::new(
            stores.submissions,
            stores.users,
            sessions.clone(),
        ));

        Self {
            sessions,
            auth_service,
            approval_service,
            quiz_course_service,
            quiz_attempt_service,
            review_service,
            config: Arc::new(config),
        }
    }

    /// Restores any persisted session, then keeps following token changes
    /// until the returned task is aborted.
    pub async fn start(&self) -> AppResult<JoinHandle<()>> {
        self.auth_service.restore_session().await?;
        Ok(Arc::clone(&self.auth_service).follow_token_changes())
    }

    pub fn teardown(&self, token_watch: Option<JoinHandle<()>>) {
        if let Some(handle) = token_watch {
            handle.abort();
        }
        self.sessions.teardown();
        log::debug!("Application state torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::MemoryTokenStore,
        repositories::{
            InMemoryQuizCourseRepository, InMemoryQuizSubmissionRepository, InMemoryUserRepository,
        },
    };

    fn in_memory_state() -> AppState {
        AppState::from_stores(
            Config::test_config(),
            Stores {
                users: Arc::new(InMemoryUserRepository::new()),
                courses: Arc::new(InMemoryQuizCourseRepository::new()),
                submissions: Arc::new(InMemoryQuizSubmissionRepository::new()),
                tokens: Arc::new(MemoryTokenStore::new()),
            },
        )
    }

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_services_share_one_session_manager() {
        let state = in_memory_state();
        let admin = state
            .auth_service
            .ensure_bootstrap_admin("Root", "root@example.com", "root", "secret")
            .await
            .unwrap();

        state.auth_service.login("root", "secret").await.unwrap();
        assert_eq!(state.sessions.get().map(|s| s.user.id), Some(admin.id));
        assert_eq!(state.approval_service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_start_without_token_and_teardown() {
        let state = in_memory_state();
        state.sessions.on_change(|_| {});

        let watch = state.start().await.unwrap();
        assert!(!state.sessions.is_authenticated());

        state.teardown(Some(watch));
        assert_eq!(state.sessions.listener_count(), 0);
    }
}
