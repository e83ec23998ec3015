use crate::{
    errors::{AppError, AppResult},
    models::domain::Session,
};

pub fn require_session(session: Option<Session>) -> AppResult<Session> {
    session.ok_or_else(|| AppError::Unauthorized("Please log in first".to_string()))
}

pub fn require_admin(session: Option<Session>) -> AppResult<Session> {
    let session = require_session(session)?;
    if !session.is_admin() {
        return Err(AppError::Unauthorized(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(session)
}

pub fn require_self_or_admin(session: &Session, user_id: &str) -> AppResult<()> {
    if !session.is_admin() && session.user_id() != user_id {
        return Err(AppError::Unauthorized(
            "You can only access your own results".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        domain::{User, UserStatus},
        dto::response::UserDto,
    };

    fn session_for(user: User) -> Session {
        Session::new(UserDto::from(user), "token".to_string())
    }

    #[test]
    fn test_require_session() {
        assert!(matches!(
            require_session(None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_require_admin() {
        let admin = User::new_admin("Root", "root@example.com", "root", "hash".into());
        assert!(require_admin(Some(session_for(admin))).is_ok());

        let student = User::test_student("john", UserStatus::Approved);
        assert!(require_admin(Some(session_for(student))).is_err());
        assert!(require_admin(None).is_err());
    }

    #[test]
    fn test_require_self_or_admin() {
        let student = User::test_student("john", UserStatus::Approved);
        let id = student.id.clone();
        let session = session_for(student);

        assert!(require_self_or_admin(&session, &id).is_ok());
        assert!(require_self_or_admin(&session, "someone-else").is_err());

        let admin = User::new_admin("Root", "root@example.com", "root", "hash".into());
        assert!(require_self_or_admin(&session_for(admin), &id).is_ok());
    }
}
