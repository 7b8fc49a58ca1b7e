use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use super::{TaskService, UserService};
use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Team, TeamDetails, TeamFields};
use crate::store::TeamStore;

/// Owns teams and their membership lists.
pub struct TeamService {
    teams: Arc<dyn TeamStore>,
    users: Arc<UserService>,
    tasks: Arc<TaskService>,
    clock: Arc<dyn Clock>,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamStore>,
        users: Arc<UserService>,
        tasks: Arc<TaskService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            teams,
            users,
            tasks,
            clock,
        }
    }

    /// Teams owned by the user, with member profiles and TEAM tasks.
    pub async fn get_teams_by_user_id(&self, owner_id: ObjectId) -> ServiceResult<Vec<TeamDetails>> {
        self.users.assert_exists(owner_id).await?;

        let teams = self.teams.find_by_owner_id(owner_id).await?;
        info!("Found {} teams owned by user {}", teams.len(), owner_id);

        let mut details = Vec::with_capacity(teams.len());
        for team in teams {
            details.push(self.collect_details(team).await?);
        }
        Ok(details)
    }

    pub async fn create(&self, fields: TeamFields) -> ServiceResult<TeamDetails> {
        let owner = self.users.get_by_id(fields.owner_id).await?;

        let now = self.clock.now();
        let team = Team {
            id: ObjectId::new(),
            name: fields.name,
            owner_id: owner.id,
            members_id: vec![owner.id],
            created_at: now,
            modified_at: now,
        };
        self.teams.save(&team).await?;
        info!("Created team {} owned by {}", team.id, owner.id);

        Ok(TeamDetails {
            team,
            members: vec![owner],
            tasks: Vec::new(),
        })
    }

    /// Replaces name and owner. The new owner must already be a member.
    pub async fn update(&self, id: ObjectId, fields: TeamFields) -> ServiceResult<TeamDetails> {
        let existing = self.get_team(id).await?;

        if fields.owner_id != existing.owner_id {
            self.users.assert_exists(fields.owner_id).await?;
            if !existing.has_member(&fields.owner_id) {
                warn!("Team {} owner change rejected: {} is not a member", id, fields.owner_id);
                return Err(not_a_member(id, fields.owner_id));
            }
        }

        let updated = Team {
            id,
            name: fields.name,
            owner_id: fields.owner_id,
            members_id: existing.members_id,
            created_at: existing.created_at,
            modified_at: self.clock.now(),
        };
        self.teams.save(&updated).await?;
        info!("Updated team {}", id);

        self.collect_details(updated).await
    }

    pub async fn touch_modified_at(&self, id: ObjectId) -> ServiceResult<()> {
        let mut team = self.get_team(id).await?;
        team.modified_at = self.clock.now();
        self.teams.save(&team).await?;
        Ok(())
    }

    /// Adds a user to the team. Adding an existing member changes nothing.
    pub async fn add_member(&self, team_id: ObjectId, user_id: ObjectId) -> ServiceResult<()> {
        let mut team = self.get_team(team_id).await?;
        self.users.assert_exists(user_id).await?;

        if team.has_member(&user_id) {
            warn!("User {} is already a member of team {}", user_id, team_id);
            return Ok(());
        }

        team.members_id.push(user_id);
        team.modified_at = self.clock.now();
        self.teams.save(&team).await?;
        info!("Added user {} to team {}", user_id, team_id);
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> ServiceResult<()> {
        self.assert_exists(id).await?;
        self.tasks.delete_team_tasks_by_team_id(id).await?;
        self.teams.delete_by_id(id).await?;
        info!("Deleted team {}", id);
        Ok(())
    }

    pub async fn remove_user_from_all_teams(&self, user_id: ObjectId) -> ServiceResult<()> {
        self.users.assert_exists(user_id).await?;

        for mut team in self.teams.find_by_member_id(user_id).await? {
            team.members_id.retain(|member| *member != user_id);
            team.modified_at = self.clock.now();
            self.teams.save(&team).await?;
            info!("Removed user {} from team {}", user_id, team.id);
        }
        Ok(())
    }

    pub async fn owns_any_team(&self, user_id: ObjectId) -> ServiceResult<bool> {
        Ok(self.teams.exists_by_owner_id(user_id).await?)
    }

    pub async fn assert_exists(&self, id: ObjectId) -> ServiceResult<()> {
        if !self.teams.exists_by_id(id).await? {
            warn!("Team {} does not exist", id);
            return Err(ServiceError::team_not_found(id));
        }
        Ok(())
    }

    pub async fn assert_is_member(&self, team_id: ObjectId, user_id: ObjectId) -> ServiceResult<()> {
        let team = self.get_team(team_id).await?;
        if !team.has_member(&user_id) {
            warn!("User {} is not a member of team {}", user_id, team_id);
            return Err(not_a_member(team_id, user_id));
        }
        Ok(())
    }

    async fn get_team(&self, id: ObjectId) -> ServiceResult<Team> {
        self.teams.find_by_id(id).await?.ok_or_else(|| {
            warn!("Team {} not found", id);
            ServiceError::team_not_found(id)
        })
    }

    async fn collect_details(&self, team: Team) -> ServiceResult<TeamDetails> {
        let mut members = Vec::with_capacity(team.members_id.len());
        for member_id in &team.members_id {
            // members may outlive their user record
            if let Some(user) = self.users.find_by_id(*member_id).await? {
                members.push(user);
            }
        }
        let tasks = self.tasks.get_tasks_by_team_id(team.id).await?;

        Ok(TeamDetails {
            team,
            members,
            tasks,
        })
    }
}

fn not_a_member(team_id: ObjectId, user_id: ObjectId) -> ServiceError {
    ServiceError::NotTeamMember(format!(
        "User with ID: {} isn't a member of the team with ID: {}",
        user_id, team_id
    ))
}
