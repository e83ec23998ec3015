use crate::models::{
    domain::{Session, User, UserStatus},
    dto::response::UserDto,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn admin() -> User {
        User::new_admin("Root Admin", "root@example.com", "root", "hash".to_string())
    }

    /// A student with the given approval status.
    pub fn student(username: &str, status: UserStatus) -> User {
        User::test_student(username, status)
    }

    pub fn session_for(user: &User) -> Session {
        Session::new(UserDto::from(user.clone()), "test-token".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::UserStatus;

    #[test]
    fn test_fixtures_admin_session() {
        let session = session_for(&admin());
        assert!(session.is_admin());
        assert_eq!(session.user.username, "root");
    }

    #[test]
    fn test_fixtures_student() {
        let user = student("ann", UserStatus::Rejected);
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.status, UserStatus::Rejected);
    }
}
