use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskStore, TeamStore, UserStore};
use crate::models::{Task, TaskType, Team, User};

/// Process-local document store. Documents keep insertion order and a
/// replaced document keeps its original position.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    teams: RwLock<Vec<Team>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert<T: Clone>(docs: &mut Vec<T>, doc: &T, same: impl Fn(&T) -> bool) {
    match docs.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = doc.clone(),
        None => docs.push(doc.clone()),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(self.users.read().await.iter().any(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn save(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        // mirrors the unique index on `username`
        if users.iter().any(|u| u.username == user.username && u.id != user.id) {
            return Err(StoreError::DuplicateKey(format!("username: {}", user.username)));
        }
        upsert(&mut users, user, |u| u.id == user.id);
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.users.write().await.retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Team>> {
        Ok(self.teams.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(self.teams.read().await.iter().any(|t| t.id == id))
    }

    async fn find_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<Vec<Team>> {
        Ok(self
            .teams
            .read()
            .await
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn exists_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<bool> {
        Ok(self.teams.read().await.iter().any(|t| t.owner_id == owner_id))
    }

    async fn find_by_member_id(&self, user_id: ObjectId) -> StoreResult<Vec<Team>> {
        Ok(self
            .teams
            .read()
            .await
            .iter()
            .filter(|t| t.has_member(&user_id))
            .cloned()
            .collect())
    }

    async fn save(&self, team: &Team) -> StoreResult<()> {
        upsert(&mut *self.teams.write().await, team, |t| t.id == team.id);
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.teams.write().await.retain(|t| t.id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn exists_by_id_and_type(&self, id: ObjectId, task_type: TaskType) -> StoreResult<bool> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .any(|t| t.id == id && t.task_type == task_type))
    }

    async fn find_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.task_type == task_type && t.assigned_users_id.contains(&user_id))
            .cloned()
            .collect())
    }

    async fn find_by_team_id_and_type(
        &self,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.task_type == task_type && t.team_id == Some(team_id))
            .cloned()
            .collect())
    }

    async fn save(&self, task: &Task) -> StoreResult<()> {
        upsert(&mut *self.tasks.write().await, task, |t| t.id == task.id);
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.tasks.write().await.retain(|t| t.id != id);
        Ok(())
    }

    async fn delete_by_id_and_team_id_and_type(
        &self,
        id: ObjectId,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()> {
        self.tasks
            .write()
            .await
            .retain(|t| !(t.id == id && t.team_id == Some(team_id) && t.task_type == task_type));
        Ok(())
    }

    async fn delete_by_team_id(&self, team_id: ObjectId) -> StoreResult<()> {
        self.tasks.write().await.retain(|t| t.team_id != Some(team_id));
        Ok(())
    }

    async fn delete_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()> {
        self.tasks
            .write()
            .await
            .retain(|t| !(t.task_type == task_type && t.assigned_users_id.contains(&user_id)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(username: &str) -> User {
        let now = Utc::now();
        User {
            id: ObjectId::new(),
            username: username.to_string(),
            password: "hash".to_string(),
            email: format!("{}@example.com", username),
            phone: None,
            firstname: None,
            lastname: None,
            created_at: now,
            modified_at: now,
        }
    }

    #[tokio::test]
    async fn save_replaces_in_place() {
        let store = MemoryStore::new();
        let first = user("alice");
        let second = user("bobby");
        UserStore::save(&store, &first).await.unwrap();
        UserStore::save(&store, &second).await.unwrap();

        let mut renamed = first.clone();
        renamed.email = "new@example.com".to_string();
        UserStore::save(&store, &renamed).await.unwrap();

        let users = store.users.read().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "new@example.com");
        assert_eq!(users[1].id, second.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        UserStore::save(&store, &user("alice")).await.unwrap();
        let err = UserStore::save(&store, &user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn member_query_matches_array_contents() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let member = ObjectId::new();
        let now = Utc::now();
        let team = Team {
            id: ObjectId::new(),
            name: "Eng".to_string(),
            owner_id: owner,
            members_id: vec![owner, member],
            created_at: now,
            modified_at: now,
        };
        TeamStore::save(&store, &team).await.unwrap();

        assert_eq!(store.find_by_member_id(member).await.unwrap().len(), 1);
        assert!(store.find_by_member_id(ObjectId::new()).await.unwrap().is_empty());
        assert!(store.exists_by_owner_id(owner).await.unwrap());
        assert!(!store.exists_by_owner_id(member).await.unwrap());
    }
}
