use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{blocking, Catalog, ListResponse};
use crate::domain::catalog::{Product, ProductInput};
use crate::domain::filters::{Params, ProductFilter};
use crate::domain::money::{render, PRICE, STAT_PLACES};
use crate::domain::pagination::PageRequest;
use crate::domain::stats::ProductStats;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Decimal string with at most two fractional digits.
    #[schema(example = "19.99")]
    pub price: String,
    #[serde(default)]
    pub description: String,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl ProductRequest {
    fn into_input(mut self) -> Result<ProductInput, AppError> {
        self.name = self.name.trim().to_string();
        self.validate()?;
        let price = PRICE.parse("price", &self.price)?;
        Ok(ProductInput {
            name: self.name,
            price,
            description: self.description.trim().to_string(),
            brand_id: self.brand_id,
            supplier_id: self.supplier_id,
            category_id: self.category_id,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    #[schema(example = "19.99")]
    pub price: String,
    pub description: String,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: render(&p.price, PRICE.decimal_places),
            description: p.description,
            brand_id: p.brand_id,
            supplier_id: p.supplier_id,
            category_id: p.category_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductStatsResponse {
    pub count: i64,
    #[schema(example = "149.50")]
    pub average_price: String,
}

impl From<ProductStats> for ProductStatsResponse {
    fn from(s: ProductStats) -> Self {
        Self {
            count: s.count,
            average_price: render(&s.average_price, STAT_PLACES),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("search" = Option<String>, Query, description = "Matches name or description"),
        ("marca" = Option<i32>, Query, description = "Brand id (alias `brand`)"),
        ("proveedor" = Option<i32>, Query, description = "Supplier id (alias `supplier`)"),
        ("categoria" = Option<i32>, Query, description = "Category id (alias `category`)"),
        ("precio_min" = Option<String>, Query, description = "Inclusive lower price bound (alias `price_min`)"),
        ("precio_max" = Option<String>, Query, description = "Inclusive upper price bound (alias `price_max`)"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of products", body = ListResponse<ProductResponse>),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<Catalog>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = ProductFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_products(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ProductResponse>::from(result)))
}

/// GET /api/products/stats
///
/// Count and average price of the products matching the listing filters.
#[utoipa::path(
    get,
    path = "/api/products/stats",
    params(
        ("search" = Option<String>, Query, description = "Matches name or description"),
        ("marca" = Option<i32>, Query, description = "Brand id (alias `brand`)"),
        ("proveedor" = Option<i32>, Query, description = "Supplier id (alias `supplier`)"),
        ("categoria" = Option<i32>, Query, description = "Category id (alias `category`)"),
        ("precio_min" = Option<String>, Query, description = "Inclusive lower price bound (alias `price_min`)"),
        ("precio_max" = Option<String>, Query, description = "Inclusive upper price bound (alias `price_max`)"),
    ),
    responses(
        (status = 200, description = "Product statistics", body = ProductStatsResponse),
    ),
    tag = "products"
)]
pub async fn product_stats(
    service: web::Data<Catalog>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let filter = ProductFilter::from_params(&query);

    let stats = blocking(move || service.product_stats(&filter)).await?;
    Ok(HttpResponse::Ok().json(ProductStatsResponse::from(stats)))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input or unknown brand, supplier or category"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<Catalog>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let product = blocking(move || service.create_product(input)).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = blocking(move || service.get_product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PUT /api/products/{id}
///
/// Existing sales keep their stored totals until they are saved again.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input or unknown brand, supplier or category"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let product = blocking(move || service.update_product(id, input)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product and the sales of it deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<Catalog>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_product(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
