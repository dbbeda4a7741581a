#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test};
use serde_json::{json, Value};
use study_tasks::config::Config;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Configuration for an isolated in-memory database and cheap bcrypt.
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Signs a user up and returns the issued token.
pub async fn signup_user<S, B>(app: &S, username: &str, password: &str) -> Result<String, String>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to sign up {}. Status: {}. Body: {}",
            username,
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let json: Value = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse signup response: {}", e))?;
    json["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("signup response has no token: {}", json))
}
