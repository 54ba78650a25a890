use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, web, App, HttpServer};
use chrono::Duration;

use taskpilot::auth::{AuthMiddleware, PasswordHasher, TokenService};
use taskpilot::config::Config;
use taskpilot::routes::{self, health};
use taskpilot::store::{MemoryStore, PgStore, Store};
use taskpilot::suggestions::SuggestionClient;

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pg = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            log::info!("connected to PostgreSQL, migrations applied");
            Arc::new(pg)
        }
        None => {
            log::warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = TokenService::new(
        &config.jwt_secret,
        Duration::hours(config.jwt_expiration_hours),
    );
    let hasher = PasswordHasher::new(config.bcrypt_cost)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let suggestions = SuggestionClient::from_config(&config.ai)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    if !suggestions.is_configured() {
        log::warn!("AI_API_KEY not set; subtask suggestions will answer 503");
    }

    let store = web::Data::from(store);
    let tokens_data = web::Data::new(tokens.clone());
    let hasher = web::Data::new(hasher);
    let suggestions = web::Data::new(suggestions);
    let allowed_origin = config.cors_allowed_origin.clone();

    log::info!("starting Taskpilot server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens_data.clone())
            .app_data(hasher.clone())
            .app_data(suggestions.clone())
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(tokens.clone()))
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
