#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use chrono::Duration;
use serde_json::json;

use taskpilot::auth::{AuthMiddleware, AuthResponse, PasswordHasher, TokenService};
use taskpilot::config::AiConfig;
use taskpilot::routes::{self, health};
use taskpilot::store::{MemoryStore, Store};
use taskpilot::suggestions::SuggestionClient;

pub const TEST_SECRET: &str = "integration-test-secret";
// Lowest cost bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn tokens() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::hours(1))
}

pub fn unconfigured_suggestions() -> SuggestionClient {
    SuggestionClient::from_config(&AiConfig::default()).expect("client builds")
}

pub fn suggestions_for(base_url: &str) -> SuggestionClient {
    SuggestionClient::from_config(&AiConfig {
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .expect("client builds")
}

/// The full application, wired the way `main` wires it, over the given store.
pub async fn init_app(
    store: MemoryStore,
    suggestions: SuggestionClient,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let store: Arc<dyn Store> = Arc::new(store);
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(tokens()))
            .app_data(web::Data::new(PasswordHasher::new(TEST_BCRYPT_COST).unwrap()))
            .app_data(web::Data::new(suggestions))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(tokens()))
                    .configure(routes::config),
            ),
    )
    .await
}

pub struct TestUser {
    pub id: uuid::Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub async fn register_user<S, B>(app: &S, username: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "registration of {} failed: {}",
        username,
        String::from_utf8_lossy(&body)
    );

    let auth: AuthResponse = serde_json::from_slice(&body).expect("valid AuthResponse");
    TestUser {
        id: auth.user.id,
        token: auth.token,
    }
}

pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("response body is JSON")
}
