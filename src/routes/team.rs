use crate::{
    auth::extractors::AuthenticatedUserId,
    error::AppError,
    models::UserProfile,
    projects::{load_project, Access},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct FindMemberRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub id: Uuid,
}

/// Look up a registered user by email, to add them to the team.
#[post("/{project_id}/team/find")]
pub async fn find_member(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
    data: web::Json<FindMemberRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    load_project(&pool, *project_id, user_id.0, Access::Read).await?;

    let member = sqlx::query_as::<_, UserProfile>(
        "SELECT id, name, email FROM users WHERE email = $1",
    )
    .bind(data.email.to_lowercase())
    .fetch_optional(&**pool)
    .await?;

    match member {
        Some(member) => Ok(HttpResponse::Ok().json(member)),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// List a project's team members.
#[get("/{project_id}/team")]
pub async fn get_team(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = load_project(&pool, *project_id, user_id.0, Access::Read).await?;

    let team = sqlx::query_as::<_, UserProfile>(
        "SELECT u.id, u.name, u.email \
         FROM users u \
         JOIN project_members m ON m.user_id = u.id \
         WHERE m.project_id = $1",
    )
    .bind(project.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(team))
}

/// Add a user to the team by id.
#[post("/{project_id}/team")]
pub async fn add_member(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    project_id: web::Path<Uuid>,
    data: web::Json<AddMemberRequest>,
) -> Result<impl Responder, AppError> {
    let project = load_project(&pool, *project_id, user_id.0, Access::Read).await?;

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(data.id)
        .fetch_optional(&**pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }

    if project.team.contains(&data.id) {
        return Err(AppError::Conflict("User already exists in the project".into()));
    }

    sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
        .bind(project.id)
        .bind(data.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User added to the project"
    })))
}

/// Remove a team member by id.
#[delete("/{project_id}/team/{member_id}")]
pub async fn remove_member(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (project_id, member_id) = path.into_inner();
    let project = load_project(&pool, project_id, user_id.0, Access::Read).await?;

    let result =
        sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project.id)
            .bind(member_id)
            .execute(&**pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User does not exist in the project".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "User removed from the project"
    })))
}
