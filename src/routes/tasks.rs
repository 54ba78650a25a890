use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, Task, TaskQuery, TaskUpdate},
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Fetches a task and checks it belongs to `user`.
///
/// Someone else's task is reported exactly like a missing one, so ids of other users'
/// tasks cannot be probed.
async fn owned_task(store: &dyn Store, id: Uuid, user: AuthenticatedUser) -> Result<Task, AppError> {
    match store.find_task(id).await? {
        Some(task) if task.is_owned_by(user.id()) => Ok(task),
        Some(_) => {
            log::debug!("user {} denied access to task {}", user.id(), id);
            Err(AppError::NotFound("Task not found".into()))
        }
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `completed`.
/// - `priority` (optional): `low`, `medium` or `high`.
/// - `search` (optional): case-insensitive match against title and description.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.list_tasks(user.id(), &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: malformed JSON or missing `title`.
/// - `422 Unprocessable Entity`: validation failed (e.g. empty title).
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    task_data: web::Json<NewTask>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.id());
    store.insert_task(&task).await?;
    log::debug!("user {} created task {}", user.id(), task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = owned_task(store.get_ref(), task_id.into_inner(), user).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task the authenticated user owns.
///
/// Only the fields present in the body change; `"due_date": null` clears the due date.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no such task, or it belongs to someone else.
/// - `422 Unprocessable Entity`: validation failed.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut task = owned_task(store.get_ref(), task_id.into_inner(), user).await?;
    task.apply(task_data.into_inner());
    store.update_task(&task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = owned_task(store.get_ref(), task_id.into_inner(), user).await?;

    if !store.delete_task(task.id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    log::debug!("user {} deleted task {}", user.id(), task.id);

    Ok(HttpResponse::NoContent().finish())
}
