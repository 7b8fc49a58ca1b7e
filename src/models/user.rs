use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registered user as stored in the `User` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Input for registering a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

/// Replacement profile for an existing user. Every field is written as-is,
/// so omitted optional fields are cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}
