use crate::{
    auth::extractors::AuthenticatedUserId,
    error::AppError,
    models::{Note, NoteInput},
    projects::{load_project, Access},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Confirms the task belongs to the already-authorized project.
async fn task_in_project(pool: &PgPool, project_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    let task: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?;

    task.map(|_| ())
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Add a note to a task. Any team member.
#[post("/{project_id}/tasks/{task_id}/notes")]
pub async fn create_note(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<NoteInput>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;
    task_in_project(&pool, project.id, task_id).await?;

    let note = Note::new(data.into_inner(), task_id, user_id.0);

    sqlx::query(
        "INSERT INTO notes (id, task_id, content, created_by, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(note.id)
    .bind(note.task_id)
    .bind(&note.content)
    .bind(note.created_by)
    .bind(note.created_at)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Note created successfully"
    })))
}

/// List the notes of a task. Any team member.
#[get("/{project_id}/tasks/{task_id}/notes")]
pub async fn get_task_notes(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;
    task_in_project(&pool, project.id, task_id).await?;

    let notes = sqlx::query_as::<_, Note>(
        "SELECT id, task_id, content, created_by, created_at \
         FROM notes WHERE task_id = $1 ORDER BY created_at",
    )
    .bind(task_id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(notes))
}

/// Delete a note. Only its creator may; anyone else sees the same not-found
/// a missing note produces.
#[delete("/{project_id}/tasks/{task_id}/notes/{note_id}")]
pub async fn delete_note(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, task_id, note_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;
    task_in_project(&pool, project.id, task_id).await?;

    let note: Option<(Uuid,)> =
        sqlx::query_as("SELECT created_by FROM notes WHERE id = $1 AND task_id = $2")
            .bind(note_id)
            .bind(task_id)
            .fetch_optional(&**pool)
            .await?;

    match note {
        Some((created_by,)) if created_by == user_id.0 => {
            sqlx::query("DELETE FROM notes WHERE id = $1")
                .bind(note_id)
                .execute(&**pool)
                .await?;

            Ok(HttpResponse::Ok().json(json!({
                "message": "Note deleted"
            })))
        }
        _ => Err(AppError::NotFound("Note not found".into())),
    }
}
