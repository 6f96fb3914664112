use crate::{
    auth::{
        extractors::AuthenticatedUserId, AuthResponse, CheckPasswordRequest, EmailRequest,
        LoginRequest, NewPasswordRequest, RegisterRequest, TokenRequest, UpdatePasswordRequest,
        UpdateProfileRequest,
    },
    error::AppError,
    AppAuthService,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new account.
///
/// The account starts unconfirmed; a confirmation code is dispatched by email.
/// The response acknowledges the registration and never carries the code.
#[post("/create-account")]
pub async fn create_account(
    service: web::Data<AppAuthService>,
    data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service
        .register(&data.email, &data.name, &data.password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account created, check your email to confirm it"
    })))
}

/// Confirm an account with an emailed code.
#[post("/confirm-account")]
pub async fn confirm_account(
    service: web::Data<AppAuthService>,
    data: web::Json<TokenRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.confirm_account(&data.token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account confirmed successfully"
    })))
}

/// Authenticate and receive a session token.
///
/// An unconfirmed account is rejected with 401 after a fresh confirmation
/// code has been issued and mailed.
#[post("/login")]
pub async fn login(
    service: web::Data<AppAuthService>,
    data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    let token = service.login(&data.email, &data.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Re-send a confirmation code to a pending account.
#[post("/request-code")]
pub async fn request_code(
    service: web::Data<AppAuthService>,
    data: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.request_confirmation_code(&data.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "A new token was sent to your email"
    })))
}

/// Start the password-reset flow.
#[post("/forgot-password")]
pub async fn forgot_password(
    service: web::Data<AppAuthService>,
    data: web::Json<EmailRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.forgot_password(&data.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Check your email for instructions to reset your password"
    })))
}

/// Check a reset code without consuming it, so the client can prompt for the
/// new password only when the code is good.
#[post("/validate-token")]
pub async fn validate_token(
    service: web::Data<AppAuthService>,
    data: web::Json<TokenRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.validate_reset_token(&data.token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Valid token, set your new password"
    })))
}

/// Consume a reset code and set the new password.
#[post("/update-password/{token}")]
pub async fn update_password_with_token(
    service: web::Data<AppAuthService>,
    token: web::Path<String>,
    data: web::Json<NewPasswordRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.reset_password(&token, &data.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password updated successfully"
    })))
}

/// Return the acting user's profile.
#[get("/user")]
pub async fn user(
    service: web::Data<AppAuthService>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let profile = service.current_user(user_id.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Update the acting user's name and email.
#[put("/profile")]
pub async fn update_profile(
    service: web::Data<AppAuthService>,
    user_id: AuthenticatedUserId,
    data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service
        .update_profile(user_id.0, &data.name, &data.email)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully"
    })))
}

/// Change the acting user's password after re-verifying the current one.
#[post("/update-password")]
pub async fn update_password(
    service: web::Data<AppAuthService>,
    user_id: AuthenticatedUserId,
    data: web::Json<UpdatePasswordRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service
        .change_password(user_id.0, &data.current_password, &data.password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password updated successfully"
    })))
}

/// Step-up re-auth: verify the acting user's password without changing state.
#[post("/check-password")]
pub async fn check_password(
    service: web::Data<AppAuthService>,
    user_id: AuthenticatedUserId,
    data: web::Json<CheckPasswordRequest>,
) -> Result<impl Responder, AppError> {
    data.validate()?;

    service.check_password(user_id.0, &data.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password is correct"
    })))
}
