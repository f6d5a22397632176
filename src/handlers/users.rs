use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{blank_or_email, blocking, ListResponse, Sales};
use crate::domain::filters::{Params, UserFilter};
use crate::domain::pagination::PageRequest;
use crate::domain::sales::{User, UserInput};
use crate::errors::AppError;

fn active_by_default() -> bool {
    true
}

/// A seller account. Only the directory fields are kept; there is no
/// password or session handling.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub email: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
}

impl UserRequest {
    fn into_input(self) -> Result<UserInput, AppError> {
        let req = Self {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            is_active: self.is_active,
            is_staff: self.is_staff,
        };
        req.validate()?;
        Ok(UserInput {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            is_active: req.is_active,
            is_staff: req.is_staff,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    /// RFC 3339 timestamp.
    pub date_joined: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            is_active: u.is_active,
            is_staff: u.is_staff,
            date_joined: u.date_joined.to_rfc3339(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("search" = Option<String>, Query, description = "Matches username, first or last name"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of users", body = ListResponse<UserResponse>),
    ),
    tag = "users"
)]
pub async fn list_users(
    service: web::Data<Sales>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = UserFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_users(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<UserResponse>::from(result)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "users"
)]
pub async fn create_user(
    service: web::Data<Sales>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let user = blocking(move || service.create_user(input)).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let user = blocking(move || service.get_user(id)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "users"
)]
pub async fn update_user(
    service: web::Data<Sales>,
    path: web::Path<i32>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let user = blocking(move || service.update_user(id, input)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Deleting a seller also deletes the sales they recorded.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User and their sales deleted"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_user(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
