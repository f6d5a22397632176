use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::products::ProductResponse;
use super::{blocking, Catalog, ListResponse};
use crate::domain::catalog::{Brand, BrandInput};
use crate::domain::filters::{NameFilter, Params};
use crate::domain::pagination::PageRequest;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BrandRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl BrandRequest {
    fn into_input(mut self) -> Result<BrandInput, AppError> {
        self.name = self.name.trim().to_string();
        self.validate()?;
        Ok(BrandInput { name: self.name })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
}

impl From<Brand> for BrandResponse {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id,
            name: b.name,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/brands
#[utoipa::path(
    get,
    path = "/api/brands",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on the name"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of brands", body = ListResponse<BrandResponse>),
    ),
    tag = "brands"
)]
pub async fn list_brands(
    service: web::Data<Catalog>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = NameFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_brands(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<BrandResponse>::from(result)))
}

/// POST /api/brands
#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = BrandRequest,
    responses(
        (status = 201, description = "Brand created", body = BrandResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A brand with that name already exists"),
    ),
    tag = "brands"
)]
pub async fn create_brand(
    service: web::Data<Catalog>,
    body: web::Json<BrandRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let brand = blocking(move || service.create_brand(input)).await?;
    Ok(HttpResponse::Created().json(BrandResponse::from(brand)))
}

/// GET /api/brands/{id}
#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand found", body = BrandResponse),
        (status = 404, description = "Brand not found"),
    ),
    tag = "brands"
)]
pub async fn get_brand(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let brand = blocking(move || service.get_brand(id)).await?;
    Ok(HttpResponse::Ok().json(BrandResponse::from(brand)))
}

/// PUT /api/brands/{id}
#[utoipa::path(
    put,
    path = "/api/brands/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    request_body = BrandRequest,
    responses(
        (status = 200, description = "Brand updated", body = BrandResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Brand not found"),
        (status = 409, description = "A brand with that name already exists"),
    ),
    tag = "brands"
)]
pub async fn update_brand(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    body: web::Json<BrandRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let brand = blocking(move || service.update_brand(id, input)).await?;
    Ok(HttpResponse::Ok().json(BrandResponse::from(brand)))
}

/// DELETE /api/brands/{id}
///
/// Deletes the brand and every product that belongs to it.
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 204, description = "Brand and its products deleted"),
        (status = 404, description = "Brand not found"),
    ),
    tag = "brands"
)]
pub async fn delete_brand(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_brand(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/brands/{id}/products
#[utoipa::path(
    get,
    path = "/api/brands/{id}/products",
    params(
        ("id" = i32, Path, description = "Brand id"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Products of the brand", body = ListResponse<ProductResponse>),
        (status = 404, description = "Brand not found"),
    ),
    tag = "brands"
)]
pub async fn brand_products(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let page = PageRequest::from_params(&query);

    let result = blocking(move || service.brand_products(id, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ProductResponse>::from(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_before_validation() {
        let input = BrandRequest {
            name: "  Logitech ".into(),
        }
        .into_input()
        .unwrap();
        assert_eq!(input.name, "Logitech");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = BrandRequest { name: "   ".into() }.into_input().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = BrandRequest {
            name: "x".repeat(101),
        }
        .into_input()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
