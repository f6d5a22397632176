use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{blocking, ListResponse, Sales};
use crate::domain::filters::{Params, SaleItemFilter};
use crate::domain::money::{render, WHOLE_AMOUNT};
use crate::domain::pagination::PageRequest;
use crate::domain::sales::{SaleItem, SaleItemInput};
use crate::errors::AppError;

/// A line item carries its own unit price, independent of the product's
/// current price.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaleItemRequest {
    pub sale_id: i32,
    pub product_id: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Whole units, no fractional digits.
    #[schema(example = "2500")]
    pub unit_price: String,
}

impl SaleItemRequest {
    fn into_input(self) -> Result<SaleItemInput, AppError> {
        self.validate()?;
        let unit_price = WHOLE_AMOUNT.parse("unit_price", &self.unit_price)?;
        Ok(SaleItemInput {
            sale_id: self.sale_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleItemResponse {
    pub id: i32,
    pub sale_id: i32,
    /// Null once the product has been deleted.
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: String,
    /// `quantity * unit_price`.
    pub subtotal: String,
}

impl From<SaleItem> for SaleItemResponse {
    fn from(item: SaleItem) -> Self {
        Self {
            subtotal: render(&item.subtotal(), WHOLE_AMOUNT.decimal_places),
            id: item.id,
            sale_id: item.sale_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: render(&item.unit_price, WHOLE_AMOUNT.decimal_places),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/sale-items",
    params(
        ("venta" = Option<i32>, Query, description = "Sale id (alias `sale`)"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of line items", body = ListResponse<SaleItemResponse>),
    ),
    tag = "sale-items"
)]
pub async fn list_sale_items(
    service: web::Data<Sales>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = SaleItemFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_sale_items(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SaleItemResponse>::from(result)))
}

#[utoipa::path(
    post,
    path = "/api/sale-items",
    request_body = SaleItemRequest,
    responses(
        (status = 201, description = "Line item created", body = SaleItemResponse),
        (status = 400, description = "Invalid input or unknown sale or product"),
    ),
    tag = "sale-items"
)]
pub async fn create_sale_item(
    service: web::Data<Sales>,
    body: web::Json<SaleItemRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let item = blocking(move || service.create_sale_item(input)).await?;
    Ok(HttpResponse::Created().json(SaleItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/api/sale-items/{id}",
    params(("id" = i32, Path, description = "Line item id")),
    responses(
        (status = 200, description = "Line item found", body = SaleItemResponse),
        (status = 404, description = "Line item not found"),
    ),
    tag = "sale-items"
)]
pub async fn get_sale_item(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let item = blocking(move || service.get_sale_item(id)).await?;
    Ok(HttpResponse::Ok().json(SaleItemResponse::from(item)))
}

#[utoipa::path(
    put,
    path = "/api/sale-items/{id}",
    params(("id" = i32, Path, description = "Line item id")),
    request_body = SaleItemRequest,
    responses(
        (status = 200, description = "Line item updated", body = SaleItemResponse),
        (status = 400, description = "Invalid input or unknown sale or product"),
        (status = 404, description = "Line item not found"),
    ),
    tag = "sale-items"
)]
pub async fn update_sale_item(
    service: web::Data<Sales>,
    path: web::Path<i32>,
    body: web::Json<SaleItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let item = blocking(move || service.update_sale_item(id, input)).await?;
    Ok(HttpResponse::Ok().json(SaleItemResponse::from(item)))
}

#[utoipa::path(
    delete,
    path = "/api/sale-items/{id}",
    params(("id" = i32, Path, description = "Line item id")),
    responses(
        (status = 204, description = "Line item deleted"),
        (status = 404, description = "Line item not found"),
    ),
    tag = "sale-items"
)]
pub async fn delete_sale_item(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_sale_item(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
