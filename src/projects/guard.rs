//!
//! # Authorization Guard
//!
//! Resolves a project and decides whether the acting user may touch it.
//! Denials are reported as `NotFound` with the exact same message as a
//! missing project, so a non-member can never learn that a project exists.
//!
//! Two levels are in play and they are deliberately asymmetric: team members
//! get `Read`, but `Write` (project updates, deletion, task mutation) is
//! manager-only. Handlers compose [`load_project`] explicitly instead of
//! relying on any implicit request state.

use crate::error::AppError;
use crate::models::Project;
use sqlx::PgPool;
use uuid::Uuid;

/// The one message rendered for missing and denied alike.
const PROJECT_NOT_FOUND: &str = "Project not found";

/// Requested access level for a project-scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Manager or team member.
    Read,
    /// Manager only. Team membership does not grant mutation.
    Write,
}

/// Checks `user_id` against the project's manager and team.
pub fn authorize(project: &Project, user_id: Uuid, access: Access) -> Result<(), AppError> {
    let allowed = match access {
        Access::Read => project.manager == user_id || project.team.contains(&user_id),
        Access::Write => project.manager == user_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::NotFound(PROJECT_NOT_FOUND.into()))
    }
}

/// Loads a project with its team and applies the access check.
///
/// Every project-scoped handler starts here; the returned `Project` is the
/// authorized target for the rest of the request.
pub async fn load_project(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
    access: Access,
) -> Result<Project, AppError> {
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, project_name, client_name, description, manager, created_at \
         FROM projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    let mut project = match project {
        Some(project) => project,
        None => return Err(AppError::NotFound(PROJECT_NOT_FOUND.into())),
    };

    let team: Vec<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await?;
    project.team = team.into_iter().map(|(id,)| id).collect();

    authorize(&project, user_id, access)?;

    Ok(project)
}
