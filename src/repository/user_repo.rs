use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::{
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::{error, info, instrument};

use crate::model::user::{ProfileUpdate, User};
use crate::repository::mongo::USERS;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the email is taken.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn update_profile(&self, id: &ObjectId, update: ProfileUpdate) -> RepositoryResult<Option<User>>;
    async fn set_otp(&self, id: &ObjectId, otp: &str, expires: bson::DateTime) -> RepositoryResult<()>;
    /// Stores the new hash and clears the OTP fields in one update.
    async fn reset_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()>;
    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        MongoUserRepository { collection: db.collection::<User>(USERS) }
    }

    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        info!("Unique index on users.email ensured");
        Ok(())
    }

    async fn set_fields(&self, id: &ObjectId, update: Document) -> RepositoryResult<()> {
        let result = self.collection.update_one(doc! { "_id": id }, update, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No user found for ID: {}", id)));
        }
        Ok(())
    }
}

fn profile_set_document(update: &ProfileUpdate) -> Document {
    let mut set = Document::new();
    let fields = [
        ("username", &update.username),
        ("nickname", &update.nickname),
        ("phone", &update.phone),
        ("address", &update.address),
        ("image", &update.image),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            set.insert(key, value.clone());
        }
    }
    set.insert("updatedAt", bson::DateTime::now());
    set
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = bson::DateTime::now();
        user.created_at = Some(now);
        user.updated_at = Some(now);
        match self.collection.insert_one(&user, None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                let err = RepositoryError::from(e);
                error!("Failed to insert user: {}", err);
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: &ObjectId, update: ProfileUpdate) -> RepositoryResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": profile_set_document(&update) }, options)
            .await?;
        if updated.is_none() {
            error!("No user found to update for ID: {}", id);
        }
        Ok(updated)
    }

    #[instrument(skip(self, otp))]
    async fn set_otp(&self, id: &ObjectId, otp: &str, expires: bson::DateTime) -> RepositoryResult<()> {
        self.set_fields(
            id,
            doc! { "$set": { "otp": otp, "otpExpires": expires, "updatedAt": bson::DateTime::now() } },
        )
        .await
    }

    #[instrument(skip(self, password_hash))]
    async fn reset_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()> {
        self.set_fields(
            id,
            doc! {
                "$set": { "password": password_hash, "updatedAt": bson::DateTime::now() },
                "$unset": { "otp": "", "otpExpires": "" },
            },
        )
        .await
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> RepositoryResult<()> {
        self.set_fields(
            id,
            doc! { "$set": { "password": password_hash, "updatedAt": bson::DateTime::now() } },
        )
        .await
    }
}
