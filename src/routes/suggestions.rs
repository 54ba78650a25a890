use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    suggestions::{SuggestionClient, SuggestionRequest, SuggestionResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Suggest subtasks
///
/// Forwards the task's title and description to the AI service and returns the
/// suggested subtasks.
///
/// ## Responses:
/// - `200 OK`: `{"subtasks": [...]}`.
/// - `422 Unprocessable Entity`: validation failed.
/// - `502 Bad Gateway`: the AI service failed or answered with an unexpected shape.
/// - `503 Service Unavailable`: no AI API key configured.
#[post("/subtasks")]
pub async fn suggest_subtasks(
    client: web::Data<SuggestionClient>,
    request: web::Json<SuggestionRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    request.validate()?;

    let subtasks = client.suggest(&request).await.map_err(|err| {
        log::warn!("subtask suggestion for user {} failed: {}", user.id(), err);
        err
    })?;

    Ok(HttpResponse::Ok().json(SuggestionResponse { subtasks }))
}
