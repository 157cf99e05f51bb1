//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.com"}
//! POST /api/v1/logout
//! POST /api/v1/users {"email":"ada@example.com","name":"Ada"}
//! GET /api/v1/users
//! GET /api/v1/users/admin/{email}
//! PATCH /api/v1/users/admin/{id}
//! GET|PUT|DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::domain::ports::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::{
    Document, EmailValidationError, Error, ListingQuery, LoginCredentials, NoFilters,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::query::ListingParams;
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, DocumentSchema, ErrorSchema, InsertOutcomeSchema, UpdateOutcomeSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_document_id, parse_email};

const ROLE_FIELD: &str = "role";
const EMAIL_FIELD: &str = "email";

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Email of a registered user.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Identity established by a successful login.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Session identity.
    pub email: String,
}

/// Outcome of `POST /api/v1/logout`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    /// Always `true`.
    pub success: bool,
}

/// Body of `GET /api/v1/users/admin/{email}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminStatusResponse {
    /// Whether the user holds the admin role.
    pub admin: bool,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = EmailValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_email(&value.email)
    }
}

fn map_login_validation_error(err: &EmailValidationError) -> Error {
    let code = match err {
        EmailValidationError::Empty => "empty_email",
        EmailValidationError::MissingAt => "invalid_email",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "email", "code": code }))
}

/// Authenticate a registered user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let email = state.login.authenticate(&credentials).await?;
    session.persist_identity(&email)?;
    Ok(web::Json(LoginResponse {
        email: email.into(),
    }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared", body = LogoutResponse)),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<LogoutResponse> {
    session.clear();
    web::Json(LogoutResponse { success: true })
}

/// Register a user. The role is always `user`.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "User registered", body = InsertOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let outcome = state.users().register(payload.into_inner()).await?;
    info!(user_id = %outcome.inserted_id, "user registered");
    Ok(web::Json(outcome))
}

/// List users. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListingParams),
    responses(
        (status = 200, description = "Users", body = [DocumentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    listing: web::Query<ListingParams>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let identity = session.require_identity()?;
    state.access().require_admin(&identity).await?;
    let query = ListingQuery::build(&NoFilters, &listing.into_inner().into())?;
    let users = state.users().records().list(&query).await?;
    Ok(web::Json(users))
}

/// Whether the named user is an admin. Callers may only ask about themselves.
#[utoipa::path(
    get,
    path = "/api/v1/users/admin/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Admin status", body = AdminStatusResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "adminStatus"
)]
#[get("/users/admin/{email}")]
pub async fn admin_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AdminStatusResponse>> {
    let identity = session.require_identity()?;
    let email = parse_email(EMAIL_FIELD, &path.into_inner())?;
    if !identity.matches(email.as_str()) {
        return Err(Error::forbidden("forbidden access"));
    }
    let admin = state.users().is_admin(&email).await?;
    Ok(web::Json(AdminStatusResponse { admin }))
}

/// Grant the admin role. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/users/admin/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Role updated", body = UpdateOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "promoteUser"
)]
#[patch("/users/admin/{id}")]
pub async fn make_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    let id = parse_document_id(&path.into_inner())?;
    state.access().require_admin(&identity).await?;
    let outcome = state.users().promote(&id).await?;
    info!(user_id = %id, promoted_by = %identity, "user promoted to admin");
    Ok(web::Json(outcome))
}

/// Fetch a user. Callers may read their own record; admins any record.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = DocumentSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Document>> {
    let identity = session.require_identity()?;
    let id = parse_document_id(&path.into_inner())?;
    let user = state.users().records().find(&id).await?;
    state.access().ensure_owner(&identity, Some(&user)).await?;
    Ok(web::Json(user))
}

/// Update a user without upserting. Only admins may change `role`.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = DocumentSchema,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcomeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let identity = session.require_identity()?;
    let id = parse_document_id(&path.into_inner())?;
    let changes = payload.into_inner();
    let access = state.access();
    let users = state.users();
    let records = users.records();

    let existing = records.find_optional(&id).await?;
    access.ensure_owner(&identity, existing.as_ref()).await?;
    if changes.contains_key(ROLE_FIELD) {
        access.require_admin(&identity).await?;
    }
    access.ensure_owner_change(&identity, &changes).await?;
    if let Some(raw) = changes.get(EMAIL_FIELD).and_then(Value::as_str) {
        let email = parse_email(EMAIL_FIELD, raw)?;
        users.ensure_email_free(&email, &id).await?;
    }
    let outcome = records.update_existing(&id, changes).await?;
    Ok(web::Json(outcome))
}

/// Delete a user. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcomeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let identity = session.require_identity()?;
    let id = parse_document_id(&path.into_inner())?;
    state.access().require_admin(&identity).await?;
    let outcome = state.users().records().delete(&id).await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests;
