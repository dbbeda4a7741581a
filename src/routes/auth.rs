use crate::{
    auth::{AuthGateway, CurrentUser, LoginForm, SignupRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account and returns a bearer token together with the public profile.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type, expires_in, user}`.
/// - `400 Bad Request`: the username is already taken.
/// - `422 Unprocessable Entity`: the body is malformed or fails validation.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthGateway>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let response = auth.signup(signup_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Login user
///
/// Accepts a form-encoded `username` and `password` and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type, expires_in}`.
/// - `400 Bad Request`: unknown username or wrong password (same message for both).
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthGateway>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();
    let token = auth.login(&form.username, &form.password).await?;
    Ok(HttpResponse::Ok().json(token))
}

/// Profile of the authenticated caller. Mounted behind `AuthMiddleware`.
pub async fn me(
    auth: web::Data<AuthGateway>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(auth.profile(&user).await?))
}
