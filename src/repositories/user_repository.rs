use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{duplicate_key_message, Database},
    errors::{AppError, AppResult},
    models::domain::{User, UserRole, UserStatus},
};

/// The identity store: user accounts and their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateUsername` or `DuplicateEmail` on a unique collision.
    async fn insert(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Looks an account up by email when the identifier contains `@`,
    /// otherwise by username.
    async fn find_by_credential(&self, identifier: &str) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn find_by_role_and_status(
        &self,
        role: UserRole,
        status: UserStatus,
    ) -> AppResult<Vec<User>>;
    async fn update_status(&self, id: &str, status: UserStatus) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(err) => match duplicate_key_message(&err) {
                Some(message) if message.contains("email_unique") => {
                    Err(AppError::DuplicateEmail(user.email))
                }
                Some(_) => Err(AppError::DuplicateUsername(user.username)),
                None => Err(err.into()),
            },
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?;
        Ok(user)
    }

    async fn find_by_credential(&self, identifier: &str) -> AppResult<Option<User>> {
        if identifier.contains('@') {
            self.find_by_email(identifier).await
        } else {
            self.find_by_username(identifier).await
        }
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn find_by_role_and_status(
        &self,
        role: UserRole,
        status: UserStatus,
    ) -> AppResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! { "role": role.as_str(), "status": status.as_str() })
            .sort(doc! { "created_at": 1 })
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn update_status(&self, id: &str, status: UserStatus) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        for (field, name) in [
            ("id", "id_unique"),
            ("username", "username_unique"),
            ("email", "email_unique"),
        ] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(name.to_string())
                        .build(),
                )
                .build();
            self.collection.create_index(model).await?;
        }

        log::info!(
            "Ensured unique indexes on {}.id, username and email",
            self.collection.name()
        );
        Ok(())
    }
}
