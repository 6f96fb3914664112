use crate::{
    auth::extractors::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput, TaskStatusInput},
    projects::{load_project, Access},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Fetches a task, scoped to the already-authorized project. A task id that
/// exists under a different project is reported as missing.
async fn find_project_task(
    pool: &PgPool,
    project_id: Uuid,
    task_id: Uuid,
) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, project_id, name, description, status, created_at, updated_at \
         FROM tasks WHERE id = $1 AND project_id = $2",
    )
    .bind(task_id)
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Create a task in a project. Manager only.
#[post("/{project_id}/tasks")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
    data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let project = load_project(&pool, *project_id, user_id.0, Access::Write).await?;
    let task = Task::new(data.into_inner(), project.id);

    sqlx::query(
        "INSERT INTO tasks (id, project_id, name, description, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(task.id)
    .bind(task.project_id)
    .bind(&task.name)
    .bind(&task.description)
    .bind(&task.status)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully"
    })))
}

/// List the tasks of a project. Manager or team member.
#[get("/{project_id}/tasks")]
pub async fn get_project_tasks(
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

    Ok(HttpResponse::Ok().json(tasks))
}

/// Fetch a single task. Manager or team member.
#[get("/{project_id}/tasks/{task_id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;

    let task = find_project_task(&pool, project.id, task_id).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Update a task's name and description. Manager only.
#[put("/{project_id}/tasks/{task_id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Write).await?;
    let task = find_project_task(&pool, project.id, task_id).await?;

    sqlx::query("UPDATE tasks SET name = $1, description = $2, updated_at = now() WHERE id = $3")
        .bind(&data.name)
        .bind(&data.description)
        .bind(task.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated"
    })))
}

/// Delete a task. Manager only.
#[delete("/{project_id}/tasks/{task_id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Write).await?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
        .bind(task_id)
        .bind(project.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted"
    })))
}

/// Move a task through the workflow. Any team member may change status.
#[post("/{project_id}/tasks/{task_id}/status")]
pub async fn update_task_status(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<TaskStatusInput>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;
    let task = find_project_task(&pool, project.id, task_id).await?;

    sqlx::query("UPDATE tasks SET status = $1, updated_at = now() WHERE id = $2")
        .bind(&data.status)
        .bind(task.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task status updated"
    })))
}
