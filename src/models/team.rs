use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{Task, User};

/// A team as stored in the `Team` collection.
///
/// `members_id` keeps insertion order, always contains `owner_id` and never
/// holds the same user twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub owner_id: ObjectId,
    #[serde(default)]
    pub members_id: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Team {
    pub fn has_member(&self, user_id: &ObjectId) -> bool {
        self.members_id.contains(user_id)
    }
}

/// Name and owner of a team, used for both creation and full-replace updates.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamFields {
    pub name: String,
    pub owner_id: ObjectId,
}

/// A team together with its resolved member profiles and TEAM tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDetails {
    pub team: Team,
    pub members: Vec<User>,
    pub tasks: Vec<Task>,
}
