use crate::{
    auth::{
        AuthResponse, AuthenticatedUser, LoginRequest, PasswordHasher, RegisterRequest,
        TokenService,
    },
    error::AppError,
    models::{user::normalize_email, User},
    store::Store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` with the token and the new user's profile.
/// - `400 Bad Request`: email or username already in use, or malformed JSON.
/// - `422 Unprocessable Entity`: validation failed.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = register_data.into_inner();

    if store
        .find_user_by_email(&normalize_email(&email))
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    if store.find_user_by_username(username.trim()).await?.is_some() {
        return Err(AppError::BadRequest("Username already taken".into()));
    }

    let password_hash = hasher.hash(password).await?;
    let user = User::new(&username, &email, password_hash);
    store.insert_user(&user).await?;
    log::info!("registered user {}", user.id);

    let token = tokens.generate(user.id)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.profile(),
    }))
}

/// Login user
///
/// Authenticates by email and password and returns an authentication token.
/// Unknown emails and wrong passwords are indistinguishable to the caller (`401`).
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    hasher: web::Data<PasswordHasher>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();

    let user = match store.find_user_by_email(&normalize_email(&email)).await? {
        Some(user) => user,
        None => {
            log::warn!("login attempt for unknown email");
            hasher.verify_decoy(password).await?;
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !hasher.verify(password, user.password_hash.clone()).await? {
        log::warn!("failed login for user {}", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    log::info!("user {} logged in", user.id);
    let token = tokens.generate(user.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.profile(),
    }))
}

/// Current user
///
/// Returns the profile of the token's owner, or `404` if the account no longer exists.
#[get("/me")]
pub async fn me(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    match store.find_user_by_id(user.id()).await? {
        Some(found) => Ok(HttpResponse::Ok().json(found.profile())),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
