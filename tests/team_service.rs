mod common;

use chrono::Duration;
use common::{task_fields, test_app};
use mongodb::bson::oid::ObjectId;
use task_manager::models::{TeamFields, UserFields};
use task_manager::store::TeamStore;
use task_manager::ServiceError;

#[tokio::test]
async fn create_makes_owner_the_only_member() {
    let app = test_app();
    let alice = app.register("alice").await;

    let details = app
        .services
        .teams
        .create(TeamFields {
            name: "Eng".to_string(),
            owner_id: alice.id,
        })
        .await
        .unwrap();

    assert_eq!(details.team.owner_id, alice.id);
    assert_eq!(details.team.members_id, vec![alice.id]);
    assert_eq!(details.members, vec![alice]);
    assert!(details.tasks.is_empty());
    assert_eq!(details.team.created_at, details.team.modified_at);
}

#[tokio::test]
async fn create_with_missing_owner_is_not_found() {
    let app = test_app();
    let err = app
        .services
        .teams
        .create(TeamFields {
            name: "Eng".to_string(),
            owner_id: ObjectId::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn add_member_is_idempotent() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bobby").await;
    let team = app.create_team("Eng", alice.id).await;

    app.clock.advance(Duration::minutes(1));
    app.services.teams.add_member(team.id, bob.id).await.unwrap();
    let after_first = app.store.find_by_id(team.id).await.unwrap().unwrap();

    app.clock.advance(Duration::minutes(1));
    app.services.teams.add_member(team.id, bob.id).await.unwrap();
    let after_second = app.store.find_by_id(team.id).await.unwrap().unwrap();

    assert_eq!(after_second.members_id, vec![alice.id, bob.id]);
    assert!(after_first.modified_at > team.modified_at);
    assert_eq!(after_second.modified_at, after_first.modified_at);
}

#[tokio::test]
async fn add_member_requires_team_and_user() {
    let app = test_app();
    let alice = app.register("alice").await;
    let team = app.create_team("Eng", alice.id).await;
    let teams = &app.services.teams;

    assert!(matches!(
        teams.add_member(ObjectId::new(), alice.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        teams.add_member(team.id, ObjectId::new()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn get_teams_includes_members_and_team_tasks_only() {
    let app = test_app();
    let s = &app.services;
    let alice = app.register("alice").await;
    let bob = app.register("bobby").await;
    let eng = app.create_team("Eng", alice.id).await;
    app.create_team("Ops", bob.id).await;
    s.teams.add_member(eng.id, bob.id).await.unwrap();
    let task = s.tasks.create_team_task(eng.id, task_fields("deploy")).await.unwrap();
    s.tasks.create_user_task(alice.id, task_fields("private")).await.unwrap();

    let teams = s.teams.get_teams_by_user_id(alice.id).await.unwrap();

    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].team.id, eng.id);
    let member_ids: Vec<_> = teams[0].members.iter().map(|u| u.id).collect();
    assert_eq!(member_ids, vec![alice.id, bob.id]);
    assert_eq!(teams[0].tasks, vec![task]);
}

#[tokio::test]
async fn get_teams_skips_members_without_user_record() {
    let app = test_app();
    let alice = app.register("alice").await;
    let mut team = app.create_team("Eng", alice.id).await;
    let ghost = ObjectId::new();
    team.members_id.push(ghost);
    app.store.save(&team).await.unwrap();

    let teams = app.services.teams.get_teams_by_user_id(alice.id).await.unwrap();
    assert_eq!(teams[0].team.members_id.len(), 2);
    assert_eq!(teams[0].members.len(), 1);
}

#[tokio::test]
async fn get_teams_for_missing_user_is_not_found() {
    let app = test_app();
    assert!(matches!(
        app.services.teams.get_teams_by_user_id(ObjectId::new()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_replaces_name_and_keeps_members() {
    let app = test_app();
    let alice = app.register("alice").await;
    let bob = app.register("bobby").await;
    let team = app.create_team("Eng", alice.id).await;
    app.services.teams.add_member(team.id, bob.id).await.unwrap();

    app.clock.advance(Duration::minutes(3));
    let details = app
        .services
        .teams
        .update(
            team.id,
            TeamFields {
                name: "Platform".to_string(),
                owner_id: bob.id,
            },
        )
        .await
        .unwrap();

    assert_eq!(details.team.name, "Platform");
    assert_eq!(details.team.owner_id, bob.id);
    assert_eq!(details.team.members_id, vec![alice.id, bob.id]);
    assert_eq!(details.team.created_at, team.created_at);
    assert!(details.team.modified_at > team.modified_at);
}

#[tokio::test]
async fn update_rejects_owner_outside_team() {
    let app = test_app();
    let alice = app.register("alice").await;
    let carol = app.register("carol").await;
    let team = app.create_team("Eng", alice.id).await;

    let err = app
        .services
        .teams
        .update(
            team.id,
            TeamFields {
                name: "Eng".to_string(),
                owner_id: carol.id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotTeamMember(_)));

    let err = app
        .services
        .teams
        .update(
            ObjectId::new(),
            TeamFields {
                name: "Eng".to_string(),
                owner_id: alice.id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn touch_modified_at_changes_only_timestamp() {
    let app = test_app();
    let alice = app.register("alice").await;
    let team = app.create_team("Eng", alice.id).await;

    app.clock.advance(Duration::hours(1));
    app.services.teams.touch_modified_at(team.id).await.unwrap();

    let stored = app.store.find_by_id(team.id).await.unwrap().unwrap();
    assert_eq!(stored.modified_at, team.modified_at + Duration::hours(1));
    assert_eq!(stored.name, team.name);
    assert_eq!(stored.members_id, team.members_id);
    assert!(matches!(
        app.services.teams.touch_modified_at(ObjectId::new()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_removes_team_and_its_tasks() {
    let app = test_app();
    let s = &app.services;
    let alice = app.register("alice").await;
    let team = app.create_team("Eng", alice.id).await;
    let task = s.tasks.create_team_task(team.id, task_fields("deploy")).await.unwrap();

    s.teams.delete(team.id).await.unwrap();

    assert!(matches!(s.teams.assert_exists(team.id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(
        s.tasks.assert_team_task_exists_by_id(task.id).await,
        Err(ServiceError::NotFound(_))
    ));
    // owning nothing any more, alice can now be deleted
    s.users.delete(alice.id).await.unwrap();
}

#[tokio::test]
async fn remove_user_from_all_teams_strips_membership() {
    let app = test_app();
    let s = &app.services;
    let alice = app.register("alice").await;
    let bob = app.register("bobby").await;
    let eng = app.create_team("Eng", alice.id).await;
    let ops = app.create_team("Ops", alice.id).await;
    s.teams.add_member(eng.id, bob.id).await.unwrap();
    s.teams.add_member(ops.id, bob.id).await.unwrap();

    s.teams.remove_user_from_all_teams(bob.id).await.unwrap();

    assert!(app.store.find_by_member_id(bob.id).await.unwrap().is_empty());
    assert!(matches!(
        s.teams.assert_is_member(eng.id, bob.id).await,
        Err(ServiceError::NotTeamMember(_))
    ));
    assert!(matches!(
        s.teams.remove_user_from_all_teams(ObjectId::new()).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn assert_is_member_checks_team_before_membership() {
    let app = test_app();
    let alice = app.register("alice").await;
    let team = app.create_team("Eng", alice.id).await;
    let teams = &app.services.teams;

    teams.assert_is_member(team.id, alice.id).await.unwrap();
    assert!(matches!(
        teams.assert_is_member(ObjectId::new(), alice.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        teams.assert_is_member(team.id, ObjectId::new()).await,
        Err(ServiceError::NotTeamMember(_))
    ));
}

#[tokio::test]
async fn renamed_member_still_resolves_in_team_details() {
    let app = test_app();
    let alice = app.register("alice").await;
    app.create_team("Eng", alice.id).await;
    app.services
        .users
        .update(
            alice.id,
            UserFields {
                username: "alice_w".to_string(),
                email: alice.email.clone(),
                phone: None,
                firstname: None,
                lastname: None,
            },
        )
        .await
        .unwrap();

    let teams = app.services.teams.get_teams_by_user_id(alice.id).await.unwrap();
    assert_eq!(teams[0].members[0].username, "alice_w");
}
