use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A project: exactly one manager plus a team of collaborators.
///
/// The manager and team drive the authorization guard: team members may read
/// the project and its subresources, only the manager may mutate them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub client_name: String,
    pub description: String,
    pub manager: Uuid,
    /// Team member ids, loaded from the `project_members` join table.
    #[sqlx(default)]
    #[serde(default)]
    pub team: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, manager: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_name: input.project_name,
            client_name: input.client_name,
            description: input.description,
            manager,
            team: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Input payload for creating or updating a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "Project description is required"))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation_assigns_manager() {
        let manager = Uuid::new_v4();
        let project = Project::new(
            ProjectInput {
                project_name: "Website redesign".to_string(),
                client_name: "Acme".to_string(),
                description: "New marketing site".to_string(),
            },
            manager,
        );
        assert_eq!(project.manager, manager);
        assert!(project.team.is_empty());
    }

    #[test]
    fn test_project_input_validation() {
        let valid = ProjectInput {
            project_name: "Website redesign".to_string(),
            client_name: "Acme".to_string(),
            description: "New marketing site".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_name = ProjectInput {
            project_name: "".to_string(),
            client_name: "Acme".to_string(),
            description: "New marketing site".to_string(),
        };
        assert!(missing_name.validate().is_err());
    }
}
