use async_trait::async_trait;
use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::{StoreError, StoreResult, TaskStore, TeamStore, UserStore};
use crate::models::{Task, TaskType, Team, User};

const USERS: &str = "User";
const TEAMS: &str = "Team";
const TASKS: &str = "Task";

const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoStore {
    pub client: Client,
    pub db: Database,
    users: Collection<User>,
    teams: Collection<Team>,
    tasks: Collection<Task>,
}

impl MongoStore {
    pub async fn init(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client_options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);
        let store = MongoStore {
            users: db.collection::<User>(USERS),
            teams: db.collection::<Team>(TEAMS),
            tasks: db.collection::<Task>(TASKS),
            client,
            db,
        };
        store.ensure_indexes().await?;
        info!("Connected to MongoDB database '{}'", db_name);
        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(username).await?;
        self.teams.create_index(IndexModel::builder().keys(doc! { "ownerId": 1 }).build()).await?;
        self.teams.create_index(IndexModel::builder().keys(doc! { "membersId": 1 }).build()).await?;
        self.tasks
            .create_index(IndexModel::builder().keys(doc! { "teamId": 1, "type": 1 }).build())
            .await?;
        self.tasks
            .create_index(IndexModel::builder().keys(doc! { "assignedUsersId": 1, "type": 1 }).build())
            .await?;
        Ok(())
    }
}

fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

fn map_write_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            StoreError::DuplicateKey(write.message.clone())
        }
        _ => StoreError::Mongo(err),
    }
}

async fn exists<T>(coll: &Collection<T>, filter: Document) -> StoreResult<bool>
where
    T: Send + Sync,
{
    Ok(coll.count_documents(filter).limit(1).await? > 0)
}

async fn find_all<T>(coll: &Collection<T>, filter: Document) -> StoreResult<Vec<T>>
where
    T: serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = coll.find(filter).await?;
    Ok(cursor.try_collect().await?)
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(by_id(id)).await?)
    }

    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        exists(&self.users, by_id(id)).await
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }

    async fn save(&self, user: &User) -> StoreResult<()> {
        self.users
            .replace_one(by_id(user.id), user)
            .upsert(true)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.users.delete_one(by_id(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl TeamStore for MongoStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Team>> {
        Ok(self.teams.find_one(by_id(id)).await?)
    }

    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        exists(&self.teams, by_id(id)).await
    }

    async fn find_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<Vec<Team>> {
        find_all(&self.teams, doc! { "ownerId": owner_id }).await
    }

    async fn exists_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<bool> {
        exists(&self.teams, doc! { "ownerId": owner_id }).await
    }

    async fn find_by_member_id(&self, user_id: ObjectId) -> StoreResult<Vec<Team>> {
        find_all(&self.teams, doc! { "membersId": user_id }).await
    }

    async fn save(&self, team: &Team) -> StoreResult<()> {
        self.teams
            .replace_one(by_id(team.id), team)
            .upsert(true)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.teams.delete_one(by_id(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MongoStore {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Task>> {
        Ok(self.tasks.find_one(by_id(id)).await?)
    }

    async fn exists_by_id_and_type(&self, id: ObjectId, task_type: TaskType) -> StoreResult<bool> {
        exists(&self.tasks, doc! { "_id": id, "type": task_type.as_str() }).await
    }

    async fn find_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>> {
        find_all(
            &self.tasks,
            doc! { "assignedUsersId": user_id, "type": task_type.as_str() },
        )
        .await
    }

    async fn find_by_team_id_and_type(
        &self,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>> {
        find_all(&self.tasks, doc! { "teamId": team_id, "type": task_type.as_str() }).await
    }

    async fn save(&self, task: &Task) -> StoreResult<()> {
        self.tasks
            .replace_one(by_id(task.id), task)
            .upsert(true)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()> {
        self.tasks.delete_one(by_id(id)).await?;
        Ok(())
    }

    async fn delete_by_id_and_team_id_and_type(
        &self,
        id: ObjectId,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()> {
        self.tasks
            .delete_one(doc! { "_id": id, "teamId": team_id, "type": task_type.as_str() })
            .await?;
        Ok(())
    }

    async fn delete_by_team_id(&self, team_id: ObjectId) -> StoreResult<()> {
        self.tasks.delete_many(doc! { "teamId": team_id }).await?;
        Ok(())
    }

    async fn delete_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()> {
        self.tasks
            .delete_many(doc! { "assignedUsersId": user_id, "type": task_type.as_str() })
            .await?;
        Ok(())
    }
}
