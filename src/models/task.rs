use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Personal,
    Team,
}

impl TaskType {
    /// Value stored in the `type` field of task documents.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Personal => "PERSONAL",
            TaskType::Team => "TEAM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    New,
    InProgress,
    Done,
}

/// A task as stored in the `Task` collection.
///
/// PERSONAL tasks carry exactly one assigned user and no `team_id`.
/// TEAM tasks always carry `team_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_users_id: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<ObjectId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Caller-supplied task content for create and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Ignored on create; on update an omitted status resets to `New`.
    pub status: Option<TaskStatus>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TaskFields {
    pub fn has_valid_range(&self) -> bool {
        self.end >= self.start
    }
}
