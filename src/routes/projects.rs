use crate::{
    auth::extractors::AuthenticatedUserId,
    error::AppError,
    models::{Project, ProjectInput, Task},
    projects::{load_project, Access},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// A project together with its tasks, as returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// Create a project; the caller becomes its manager.
#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let project = Project::new(data.into_inner(), user_id.0);

    sqlx::query(
        "INSERT INTO projects (id, project_name, client_name, description, manager, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(project.id)
    .bind(&project.project_name)
    .bind(&project.client_name)
    .bind(&project.description)
    .bind(project.manager)
    .bind(project.created_at)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Project created successfully"
    })))
}

/// List the projects the acting user manages or collaborates on.
#[get("")]
pub async fn get_projects(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT DISTINCT p.id, p.project_name, p.client_name, p.description, p.manager, \
                p.created_at \
         FROM projects p \
         LEFT JOIN project_members m ON m.project_id = p.id \
         WHERE p.manager = $1 OR m.user_id = $1 \
         ORDER BY p.created_at DESC",
    )
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Fetch one project with its tasks. Read access: manager or team member.
#[get("/{project_id}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = load_project(&pool, *project_id, user_id.0, Access::Read).await?;

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, project_id, name, description, status, created_at, updated_at \
         FROM tasks WHERE project_id = $1 ORDER BY created_at",
    )
    .bind(project.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(ProjectDetail { project, tasks }))
}

/// Update a project's descriptive fields. Manager only.
#[put("/{project_id}")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
    data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let project = load_project(&pool, *project_id, user_id.0, Access::Write).await?;

    sqlx::query(
        "UPDATE projects SET project_name = $1, client_name = $2, description = $3 WHERE id = $4",
    )
    .bind(&data.project_name)
    .bind(&data.client_name)
    .bind(&data.description)
    .bind(project.id)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Project updated"
    })))
}

/// Delete a project and everything under it. Manager only.
#[delete("/{project_id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = load_project(&pool, *project_id, user_id.0, Access::Write).await?;

    // Tasks, members, and notes cascade at the schema level.
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Project deleted"
    })))
}
