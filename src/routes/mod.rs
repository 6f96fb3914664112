pub mod auth;
pub mod health;
pub mod notes;
pub mod projects;
pub mod tasks;
pub mod team;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::create_account)
            .service(auth::confirm_account)
            .service(auth::login)
            .service(auth::request_code)
            .service(auth::forgot_password)
            .service(auth::validate_token)
            .service(auth::update_password_with_token)
            .service(auth::user)
            .service(auth::update_profile)
            .service(auth::update_password)
            .service(auth::check_password),
    )
    .service(
        web::scope("/projects")
            .service(projects::create_project)
            .service(projects::get_projects)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(tasks::create_task)
            .service(tasks::get_project_tasks)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::update_task_status)
            .service(team::find_member)
            .service(team::get_team)
            .service(team::add_member)
            .service(team::remove_member)
            .service(notes::create_note)
            .service(notes::get_task_notes)
            .service(notes::delete_note),
    );
}
