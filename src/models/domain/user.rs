use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    /// Argon2 PHC string. Never leaves the identity store layer.
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// Stored as a lowercase string. Unknown values read back as `Student`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Admin,
    Student,
}

/// Stored as a lowercase string. Unknown values read back as `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

impl User {
    /// A self-registered account: always a pending student.
    pub fn new_student(name: &str, email: &str, username: &str, password_hash: String) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
            role: UserRole::Student,
            status: UserStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn new_admin(name: &str, email: &str, username: &str, password_hash: String) -> Self {
        User {
            role: UserRole::Admin,
            status: UserStatus::Approved,
            ..User::new_student(name, email, username, password_hash)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Student => "student",
        }
    }

    /// Total conversion from the store's untyped representation.
    pub fn from_store(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "student" => UserRole::Student,
            other => {
                log::warn!("Unknown user role '{}' in store, treating as student", other);
                UserRole::Student
            }
        }
    }
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Rejected => "rejected",
        }
    }

    /// Total conversion from the store's untyped representation.
    pub fn from_store(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => UserStatus::Pending,
            "approved" => UserStatus::Approved,
            "rejected" => UserStatus::Rejected,
            other => {
                log::warn!("Unknown user status '{}' in store, treating as pending", other);
                UserStatus::Pending
            }
        }
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        UserRole::from_store(&raw)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl From<String> for UserStatus {
    fn from(raw: String) -> Self {
        UserStatus::from_store(&raw)
    }
}

impl From<UserStatus> for String {
    fn from(status: UserStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
impl User {
    pub fn test_student(username: &str, status: UserStatus) -> Self {
        User {
            status,
            ..User::new_student(
                "Test Student",
                &format!("{}@example.com", username),
                username,
                "not-a-real-hash".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_is_pending() {
        let user = User::new_student("Ann", "ann@example.com", "ann", "hash".to_string());

        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.status, UserStatus::Pending);
        assert!(!user.is_admin());
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_new_admin_is_never_pending() {
        let admin = User::new_admin("Root", "root@example.com", "root", "hash".to_string());

        assert!(admin.is_admin());
        assert_eq!(admin.status, UserStatus::Approved);
    }

    #[test]
    fn test_role_and_status_serialize_as_lowercase_strings() {
        let user = User::test_student("bob", UserStatus::Rejected);
        let json = serde_json::to_value(&user).expect("user should serialize");

        assert_eq!(json["role"], "student");
        assert_eq!(json["status"], "rejected");
    }

    #[test]
    fn test_unknown_store_values_default_to_least_privilege() {
        assert_eq!(UserRole::from_store("superuser"), UserRole::Student);
        assert_eq!(UserStatus::from_store("maybe"), UserStatus::Pending);
        assert_eq!(UserRole::from_store(" ADMIN "), UserRole::Admin);

        let parsed: UserRole = serde_json::from_str("\"root\"").expect("any string parses");
        assert_eq!(parsed, UserRole::Student);
    }
}
