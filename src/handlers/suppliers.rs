use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::products::ProductResponse;
use super::{blank_or_email, blocking, Catalog, ListResponse};
use crate::domain::catalog::{Supplier, SupplierInput};
use crate::domain::filters::{Params, SupplierFilter};
use crate::domain::pagination::PageRequest;
use crate::errors::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SupplierRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default)]
    #[validate(custom = "blank_or_email")]
    pub email: String,
}

impl SupplierRequest {
    fn into_input(self) -> Result<SupplierInput, AppError> {
        let req = Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
        };
        req.validate()?;
        Ok(SupplierInput {
            name: req.name,
            phone: req.phone,
            email: req.email,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
            phone: s.phone,
            email: s.email,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    params(
        ("search" = Option<String>, Query, description = "Matches name or email"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of suppliers", body = ListResponse<SupplierResponse>),
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    service: web::Data<Catalog>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = SupplierFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_suppliers(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SupplierResponse>::from(result)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = SupplierResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A supplier with that name already exists"),
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    service: web::Data<Catalog>,
    body: web::Json<SupplierRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let supplier = blocking(move || service.create_supplier(input)).await?;
    Ok(HttpResponse::Created().json(SupplierResponse::from(supplier)))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier found", body = SupplierResponse),
        (status = 404, description = "Supplier not found"),
    ),
    tag = "suppliers"
)]
pub async fn get_supplier(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let supplier = blocking(move || service.get_supplier(id)).await?;
    Ok(HttpResponse::Ok().json(SupplierResponse::from(supplier)))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier id")),
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = SupplierResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Supplier not found"),
        (status = 409, description = "A supplier with that name already exists"),
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    body: web::Json<SupplierRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let supplier = blocking(move || service.update_supplier(id, input)).await?;
    Ok(HttpResponse::Ok().json(SupplierResponse::from(supplier)))
}

/// Removes the supplier along with every product it supplies.
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier id")),
    responses(
        (status = 204, description = "Supplier and its products deleted"),
        (status = 404, description = "Supplier not found"),
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_supplier(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}/products",
    params(
        ("id" = i32, Path, description = "Supplier id"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Products of the supplier", body = ListResponse<ProductResponse>),
        (status = 404, description = "Supplier not found"),
    ),
    tag = "suppliers"
)]
pub async fn supplier_products(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let page = PageRequest::from_params(&query);

    let result = blocking(move || service.supplier_products(id, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ProductResponse>::from(result)))
}
