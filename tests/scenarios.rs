mod common;

use common::{new_user, task_fields, test_app};
use task_manager::models::TeamFields;
use task_manager::store::{TaskStore, TeamStore};
use task_manager::ServiceError;

#[tokio::test]
async fn only_team_members_can_be_assigned() {
    let app = test_app();
    let s = &app.services;
    let alice = s.users.register(new_user("alice", "pw1")).await.unwrap();
    let bob = s.users.register(new_user("bobby", "pw2")).await.unwrap();
    let carol = s.users.register(new_user("carol", "pw3")).await.unwrap();

    let team = s
        .teams
        .create(TeamFields {
            name: "Eng".to_string(),
            owner_id: alice.id,
        })
        .await
        .unwrap()
        .team;
    s.teams.add_member(team.id, bob.id).await.unwrap();
    let task = s.tasks.create_team_task(team.id, task_fields("launch")).await.unwrap();

    s.tasks.assign_user_by_id(task.id, bob.id).await.unwrap();
    let err = s.tasks.assign_user_by_id(task.id, carol.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotTeamMember(_)));

    let stored = TaskStore::find_by_id(&*app.store, task.id).await.unwrap().unwrap();
    assert_eq!(stored.assigned_users_id, vec![bob.id]);
}

#[tokio::test]
async fn deleting_a_team_owner_leaves_state_unchanged() {
    let app = test_app();
    let s = &app.services;
    let alice = s.users.register(new_user("alice", "pw1")).await.unwrap();
    let bob = s.users.register(new_user("bobby", "pw2")).await.unwrap();
    let team = s
        .teams
        .create(TeamFields {
            name: "Eng".to_string(),
            owner_id: alice.id,
        })
        .await
        .unwrap()
        .team;
    s.teams.add_member(team.id, bob.id).await.unwrap();
    let task = s.tasks.create_team_task(team.id, task_fields("launch")).await.unwrap();
    s.tasks.assign_user_by_id(task.id, alice.id).await.unwrap();

    let team_before = TeamStore::find_by_id(&*app.store, team.id).await.unwrap();
    let task_before = TaskStore::find_by_id(&*app.store, task.id).await.unwrap();

    let err = s.users.delete(alice.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::DeletionNotAllowed(_)));

    assert!(s.users.exists_by_id(alice.id).await.unwrap());
    assert_eq!(TeamStore::find_by_id(&*app.store, team.id).await.unwrap(), team_before);
    assert_eq!(TaskStore::find_by_id(&*app.store, task.id).await.unwrap(), task_before);
}
