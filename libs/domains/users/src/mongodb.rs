//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, Pagination, User, UserFields};
use crate::repository::UserRepository;

/// BSON shape of a user in the `users` collection.
///
/// Kept separate from the API-facing [`User`] so the identifier can be
/// a real `ObjectId` in storage and a hex string on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    age: i64,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.to_hex(),
            name: doc.name,
            age: doc.age,
            email: doc.email,
            address: doc.address,
        }
    }
}

impl From<NewUser> for UserDocument {
    fn from(input: NewUser) -> Self {
        UserDocument {
            id: ObjectId::new(),
            name: input.name,
            age: input.age,
            email: input.email,
            address: input.address,
        }
    }
}

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository backed by the `users` collection
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("mydb");
    /// let repo = MongoUserRepository::new(db);
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "users")
    }

    /// Create a repository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { collection }
    }

    /// Parse an opaque identifier, failing before any query is issued
    fn parse_object_id(id: &str) -> UserResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| UserError::InvalidId(id.to_string()))
    }

    /// Build the list filter: match-all when the search term is empty,
    /// otherwise a case-insensitive substring match against name,
    /// email or address.
    fn build_filter(search: &str) -> Document {
        if search.is_empty() {
            return doc! {};
        }

        doc! {
            "$or": [
                { "name": { "$regex": search, "$options": "i" } },
                { "email": { "$regex": search, "$options": "i" } },
                { "address": { "$regex": search, "$options": "i" } },
            ]
        }
    }

    /// Build the `$set` document from the fields that carry a value
    fn set_document(fields: &UserFields) -> Document {
        let mut set = Document::new();

        if let Some(ref name) = fields.name {
            set.insert("name", name);
        }
        if let Some(age) = fields.age {
            set.insert("age", age);
        }
        if let Some(ref email) = fields.email {
            set.insert("email", email);
        }
        if let Some(ref address) = fields.address {
            set.insert("address", address);
        }

        set
    }

    fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
            ErrorKind::Command(command_error) => command_error.code == 11000,
            _ => false,
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn list(&self, search: &str, pagination: Pagination) -> UserResult<(Vec<User>, u64)> {
        let filter = Self::build_filter(search);

        let options = FindOptions::builder()
            .skip(pagination.skip())
            .limit(pagination.limit)
            .build();

        // Page and total are fetched together; no transaction spans
        // them, so the total may be stale under concurrent writes.
        let (documents, total) = tokio::join!(
            async {
                let cursor = self
                    .collection
                    .find(filter.clone())
                    .with_options(options)
                    .await?;
                cursor.try_collect::<Vec<UserDocument>>().await
            },
            async { self.collection.count_documents(filter.clone()).await },
        );

        let users = documents?.into_iter().map(User::from).collect();
        Ok((users, total?))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();
        let document = UserDocument::from(input);

        self.collection.insert_one(&document).await.map_err(|e| {
            if Self::is_duplicate_key_error(&e) {
                UserError::DuplicateEmail(email)
            } else {
                UserError::from(e)
            }
        })?;

        tracing::info!(user_id = %document.id, "User created successfully");
        Ok(User::from(document))
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, id: &str, fields: UserFields) -> UserResult<User> {
        let object_id = Self::parse_object_id(id)?;
        let set = Self::set_document(&fields);

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
            .with_options(options)
            .await
            .map_err(|e| {
                if Self::is_duplicate_key_error(&e) {
                    UserError::DuplicateEmail(fields.email.clone().unwrap_or_default())
                } else {
                    UserError::from(e)
                }
            })?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        tracing::info!(user_id = %id, "User updated successfully");
        Ok(User::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> UserResult<()> {
        let object_id = Self::parse_object_id(id)?;

        let result = self
            .collection
            .delete_one(doc! { "_id": object_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %id, "User deleted successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists_by_email(&self, email: &str, exclude_id: Option<String>) -> UserResult<bool> {
        let mut filter = doc! { "email": email };

        if let Some(ref id) = exclude_id {
            let object_id = Self::parse_object_id(id)?;
            filter.insert("_id", doc! { "$ne": object_id });
        }

        let count = self.collection.count_documents(filter).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn create_indexes(&self) -> UserResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(index).await?;

        tracing::info!("Unique email index ensured on users collection");
        Ok(())
    }
}
