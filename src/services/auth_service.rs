use std::sync::Arc;

use tokio::task::JoinHandle;
use validator::Validate;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        JwtService, SessionManager, TokenStore,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{Session, User, UserStatus},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::UserDto,
        },
    },
    repositories::UserRepository,
};

/// Login, registration and session bootstrap.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenStore>,
    sessions: Arc<SessionManager>,
    jwt: JwtService,
}

/// The approval gate. Admins always pass; everyone else must be approved.
pub fn check_approval(user: &User) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    match user.status {
        UserStatus::Approved => Ok(()),
        UserStatus::Pending => Err(AppError::PendingApproval),
        UserStatus::Rejected => Err(AppError::Rejected),
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenStore>,
        sessions: Arc<SessionManager>,
        jwt: JwtService,
    ) -> Self {
        Self {
            users,
            tokens,
            sessions,
            jwt,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Authenticates by email or username and establishes the session.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<Session> {
        let request = LoginRequest {
            identifier: identifier.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let user = self
            .users
            .find_by_credential(&request.identifier)
            .await?
            .filter(|user| verify_password(&request.password, &user.password_hash))
            .ok_or_else(|| {
                log::info!("Failed login attempt for '{}'", request.identifier);
                AppError::InvalidCredentials
            })?;

        if let Err(e) = check_approval(&user) {
            log::info!("Login refused for '{}': account is {}", user.username, user.status);
            return Err(e);
        }

        let token = self.jwt.create_token(&user)?;
        self.tokens.save(&token).await?;

        let session = Session::new(UserDto::from(user), token);
        self.sessions.set(session.clone());
        log::info!("User '{}' logged in", session.user.username);

        Ok(session)
    }

    /// Creates a pending student account. Does not log the new user in.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserDto> {
        let request = request.trimmed();
        request.validate()?;
        let email = request.email.to_lowercase();

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::DuplicateUsername(request.username));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new_student(&request.name, &email, &request.username, password_hash);

        // The store's unique indexes catch a concurrent registration that
        // slipped past the checks above.
        let user = self.users.insert(user).await?;
        log::info!("Registered user '{}', awaiting approval", user.username);

        Ok(UserDto::from(user))
    }

    pub async fn logout(&self) {
        if let Err(e) = self.tokens.clear().await {
            log::warn!("Failed to clear persisted session token: {}", e);
        }
        self.sessions.clear();
    }

    /// Re-derives the session from a persisted token, applying the same
    /// approval gate as `login`. A token that no longer qualifies is discarded.
    pub async fn restore_session(&self) -> AppResult<Option<Session>> {
        self.sessions.set_loading(true);
        let result = match self.tokens.current_token().await {
            Ok(Some(token)) => self.session_from_token(token).await,
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        self.sessions.set_loading(false);
        result
    }

    /// Keeps the session in step with the token store until the returned
    /// task is aborted.
    pub fn follow_token_changes(self: Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.tokens.subscribe();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let token = changes.borrow_and_update().clone();
                match token {
                    None => {
                        if self.sessions.is_authenticated() {
                            log::info!("Session token removed, clearing session");
                            self.sessions.clear();
                        }
                    }
                    Some(token) => {
                        let current = self.sessions.get();
                        if current.is_some_and(|s| s.token == token) {
                            continue;
                        }
                        if let Err(e) = self.session_from_token(token).await {
                            log::error!("Failed to refresh session from new token: {}", e);
                        }
                    }
                }
            }
        })
    }

    /// Provisions the administrator account if it does not exist yet.
    pub async fn ensure_bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<UserDto> {
        if username.contains('@') {
            return Err(AppError::ValidationError(
                "Username cannot contain '@'".to_string(),
            ));
        }
        let email = email.trim().to_lowercase();

        let existing = match self.users.find_by_username(username).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(&email).await?,
        };

        if let Some(user) = existing {
            if !user.is_admin() {
                return Err(AppError::ValidationError(format!(
                    "Account '{}' already exists and is not an administrator",
                    user.username
                )));
            }
            log::debug!("Bootstrap admin '{}' already present", user.username);
            return Ok(UserDto::from(user));
        }

        let admin = User::new_admin(name, &email, username, hash_password(password)?);
        let admin = self.users.insert(admin).await?;
        log::info!("Created bootstrap admin '{}'", admin.username);

        Ok(UserDto::from(admin))
    }

    async fn session_from_token(&self, token: String) -> AppResult<Option<Session>> {
        let claims = match self.jwt.validate_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                log::info!("Discarding persisted session: {}", e);
                self.discard_session().await;
                return Ok(None);
            }
        };

        let Some(user) = self.users.find_by_id(&claims.sub).await? else {
            log::info!("Discarding session for removed user '{}'", claims.username);
            self.discard_session().await;
            return Ok(None);
        };

        if let Err(e) = check_approval(&user) {
            log::warn!("Discarding session for '{}': {}", user.username, e);
            self.discard_session().await;
            return Ok(None);
        }

        let session = Session::new(UserDto::from(user), token);
        self.sessions.set(session.clone());
        Ok(Some(session))
    }

    async fn discard_session(&self) {
        if let Err(e) = self.tokens.clear().await {
            log::warn!("Failed to clear persisted session token: {}", e);
        }
        self.sessions.clear();
    }
}
