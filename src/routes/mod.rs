pub mod auth;
pub mod health;
pub mod suggestions;
pub mod tasks;

use actix_web::web;

use crate::error::AppError;

/// Registers every `/api` route. Expects the `Store`, `TokenService`, `PasswordHasher`
/// and `SuggestionClient` app data to be present.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register)
                .service(auth::me),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(web::scope("/ai").service(suggestions::suggest_subtasks));
}

/// Malformed or incomplete JSON bodies become `400` with the usual `{"error": ...}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Path segments that do not parse (e.g. a task id that is not a UUID) cannot name an
/// existing resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Resource not found".into()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
