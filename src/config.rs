use std::{env, path::PathBuf};

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub users_collection: String,
    pub courses_collection: String,
    pub submissions_collection: String,
    pub sent_results_collection: String,
    pub session_token_secret: SecretString,
    pub session_token_hours: i64,
    pub session_token_file: PathBuf,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the single administrator account provisioned at startup.
#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: SecretString,
}

const DEV_TOKEN_SECRET: &str = "dev_secret_key_change_in_production";

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizdesk-local".to_string()),
            users_collection: env::var("USERS_COLLECTION")
                .unwrap_or_else(|_| "profiles".to_string()),
            courses_collection: env::var("COURSES_COLLECTION")
                .unwrap_or_else(|_| "quiz_courses".to_string()),
            submissions_collection: env::var("SUBMISSIONS_COLLECTION")
                .unwrap_or_else(|_| "quiz_submissions".to_string()),
            sent_results_collection: env::var("SENT_RESULTS_COLLECTION")
                .unwrap_or_else(|_| "sent_results".to_string()),
            session_token_secret: SecretString::from(
                env::var("SESSION_TOKEN_SECRET").unwrap_or_else(|_| DEV_TOKEN_SECRET.to_string()),
            ),
            session_token_hours: env::var("SESSION_TOKEN_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24 * 7),
            session_token_file: env::var("SESSION_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".quizdesk-session.json")),
            bootstrap_admin: BootstrapAdmin::from_env(),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let secret = self.session_token_secret.expose_secret();

        if secret == DEV_TOKEN_SECRET {
            panic!(
                "FATAL: SESSION_TOKEN_SECRET is using default value! Set SESSION_TOKEN_SECRET to a secure random string."
            );
        }

        if secret.len() < 32 {
            panic!(
                "FATAL: SESSION_TOKEN_SECRET is too short ({}). Must be at least 32 characters.",
                secret.len()
            );
        }

        if self.bootstrap_admin.is_none() {
            panic!(
                "FATAL: no bootstrap administrator configured! Set BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizdesk-test".to_string(),
            users_collection: "profiles".to_string(),
            courses_collection: "quiz_courses".to_string(),
            submissions_collection: "quiz_submissions".to_string(),
            sent_results_collection: "sent_results".to_string(),
            session_token_secret: SecretString::from("test_session_token_secret".to_string()),
            session_token_hours: 1,
            session_token_file: PathBuf::from("quizdesk-test-session.json"),
            bootstrap_admin: None,
        }
    }
}

impl BootstrapAdmin {
    fn from_env() -> Option<Self> {
        let email = env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?;
        let username = env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?;
        let password = env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?;

        Some(Self {
            name: env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            email,
            username,
            password: SecretString::from(password),
        })
    }
}
