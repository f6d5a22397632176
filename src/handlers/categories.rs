use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::products::ProductResponse;
use super::{blocking, non_blank, Catalog, ListResponse};
use crate::domain::catalog::{Category, CategoryInput};
use crate::domain::filters::{NameFilter, Params};
use crate::domain::pagination::PageRequest;
use crate::errors::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    fn into_input(mut self) -> Result<CategoryInput, AppError> {
        self.name = self.name.trim().to_string();
        self.validate()?;
        Ok(CategoryInput {
            name: self.name,
            description: non_blank(self.description),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on the name"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of categories", body = ListResponse<CategoryResponse>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    service: web::Data<Catalog>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = NameFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_categories(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<CategoryResponse>::from(result)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A category with that name already exists"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    service: web::Data<Catalog>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let category = blocking(move || service.create_category(input)).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let category = blocking(move || service.get_category(id)).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "A category with that name already exists"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let category = blocking(move || service.update_category(id, input)).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// Products in the category are kept; their `category_id` becomes null.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_category(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/products",
    params(
        ("id" = i32, Path, description = "Category id"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Products in the category", body = ListResponse<ProductResponse>),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn category_products(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let page = PageRequest::from_params(&query);

    let result = blocking(move || service.category_products(id, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ProductResponse>::from(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_description_is_stored_as_null() {
        let input = CategoryRequest {
            name: "Periféricos".into(),
            description: Some("   ".into()),
        }
        .into_input()
        .unwrap();
        assert_eq!(input.description, None);
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = CategoryRequest {
            name: String::new(),
            description: None,
        }
        .into_input()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
