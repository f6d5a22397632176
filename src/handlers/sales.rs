use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{blocking, ListResponse, Sales};
use crate::domain::filters::{Params, SaleFilter};
use crate::domain::money::{render, STAT_PLACES, WHOLE_AMOUNT};
use crate::domain::pagination::PageRequest;
use crate::domain::sales::{NewSale, Sale, SaleLines};
use crate::domain::stats::SaleStats;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// The total is never accepted from the client; it is derived from the
/// product's price when the sale is stored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    pub seller_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

impl CreateSaleRequest {
    fn into_new_sale(self) -> Result<NewSale, AppError> {
        self.validate()?;
        Ok(NewSale {
            seller_id: self.seller_id,
            lines: SaleLines {
                client_id: self.client_id,
                product_id: self.product_id,
                quantity: self.quantity,
            },
        })
    }
}

/// Replacement for the editable part of a sale. The seller stays as recorded.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSaleRequest {
    pub client_id: i32,
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

impl UpdateSaleRequest {
    fn into_lines(self) -> Result<SaleLines, AppError> {
        self.validate()?;
        Ok(SaleLines {
            client_id: self.client_id,
            product_id: self.product_id,
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleResponse {
    pub id: i32,
    pub seller_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Whole-unit amount, null when the product had no price.
    #[schema(example = "450")]
    pub total: Option<String>,
    pub created_at: String,
}

impl From<Sale> for SaleResponse {
    fn from(s: Sale) -> Self {
        Self {
            id: s.id,
            seller_id: s.seller_id,
            client_id: s.client_id,
            product_id: s.product_id,
            quantity: s.quantity,
            total: s.total.map(|t| render(&t, WHOLE_AMOUNT.decimal_places)),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleStatsResponse {
    pub count: i64,
    #[schema(example = "1350")]
    pub total_sum: String,
    #[schema(example = "450.00")]
    pub average_total: String,
}

impl From<SaleStats> for SaleStatsResponse {
    fn from(s: SaleStats) -> Self {
        Self {
            count: s.count,
            total_sum: render(&s.total_sum, WHOLE_AMOUNT.decimal_places),
            average_total: render(&s.average_total, STAT_PLACES),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    params(
        ("search" = Option<String>, Query, description = "Matches client name or seller username"),
        ("vendedor" = Option<i32>, Query, description = "Seller id (alias `seller`)"),
        ("cliente" = Option<i32>, Query, description = "Client id (alias `client`)"),
        ("producto" = Option<i32>, Query, description = "Product id (alias `product`)"),
        ("fecha_desde" = Option<String>, Query, description = "First day included, YYYY-MM-DD (alias `date_from`)"),
        ("fecha_hasta" = Option<String>, Query, description = "Last day included, YYYY-MM-DD (alias `date_to`)"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of sales, newest first", body = ListResponse<SaleResponse>),
    ),
    tag = "sales"
)]
pub async fn list_sales(
    service: web::Data<Sales>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = SaleFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_sales(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SaleResponse>::from(result)))
}

/// GET /api/sales/stats
///
/// Count, sum and mean of the totals of the sales matching the listing
/// filters. Sales without a total count towards `count` only.
#[utoipa::path(
    get,
    path = "/api/sales/stats",
    params(
        ("search" = Option<String>, Query, description = "Matches client name or seller username"),
        ("vendedor" = Option<i32>, Query, description = "Seller id (alias `seller`)"),
        ("cliente" = Option<i32>, Query, description = "Client id (alias `client`)"),
        ("producto" = Option<i32>, Query, description = "Product id (alias `product`)"),
        ("fecha_desde" = Option<String>, Query, description = "First day included, YYYY-MM-DD (alias `date_from`)"),
        ("fecha_hasta" = Option<String>, Query, description = "Last day included, YYYY-MM-DD (alias `date_to`)"),
    ),
    responses(
        (status = 200, description = "Sale statistics", body = SaleStatsResponse),
    ),
    tag = "sales"
)]
pub async fn sale_stats(
    service: web::Data<Sales>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let filter = SaleFilter::from_params(&query);

    let stats = blocking(move || service.sale_stats(&filter)).await?;
    Ok(HttpResponse::Ok().json(SaleStatsResponse::from(stats)))
}

/// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded with its computed total", body = SaleResponse),
        (status = 400, description = "Invalid input or unknown seller, client or product"),
    ),
    tag = "sales"
)]
pub async fn create_sale(
    service: web::Data<Sales>,
    body: web::Json<CreateSaleRequest>,
) -> Result<HttpResponse, AppError> {
    let sale = body.into_inner().into_new_sale()?;

    let sale = blocking(move || service.create_sale(sale)).await?;
    Ok(HttpResponse::Created().json(SaleResponse::from(sale)))
}

/// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale found", body = SaleResponse),
        (status = 404, description = "Sale not found"),
    ),
    tag = "sales"
)]
pub async fn get_sale(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let sale = blocking(move || service.get_sale(id)).await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// PUT /api/sales/{id}
///
/// Replaces client, product and quantity and reprices the sale at the
/// product's current price.
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale id")),
    request_body = UpdateSaleRequest,
    responses(
        (status = 200, description = "Sale updated with a recomputed total", body = SaleResponse),
        (status = 400, description = "Invalid input or unknown client or product"),
        (status = 404, description = "Sale not found"),
    ),
    tag = "sales"
)]
pub async fn update_sale(
    service: web::Data<Sales>,
    path: web::Path<i32>,
    body: web::Json<UpdateSaleRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let lines = body.into_inner().into_lines()?;

    let sale = blocking(move || service.update_sale(id, lines)).await?;
    Ok(HttpResponse::Ok().json(SaleResponse::from(sale)))
}

/// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 204, description = "Sale and its line items deleted"),
        (status = 404, description = "Sale not found"),
    ),
    tag = "sales"
)]
pub async fn delete_sale(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_sale(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn zero_quantity_is_rejected() {
        let req = CreateSaleRequest {
            seller_id: 1,
            client_id: 2,
            product_id: 3,
            quantity: 0,
        };
        assert!(matches!(req.into_new_sale(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn negative_quantity_is_rejected_on_edit() {
        let req = UpdateSaleRequest {
            client_id: 2,
            product_id: 3,
            quantity: -4,
        };
        assert!(matches!(req.into_lines(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn total_in_body_is_ignored() {
        let req: CreateSaleRequest = serde_json::from_str(
            r#"{"seller_id": 1, "client_id": 2, "product_id": 3, "quantity": 2, "total": "1"}"#,
        )
        .unwrap();
        let sale = req.into_new_sale().unwrap();
        assert_eq!(sale.seller_id, 1);
        assert_eq!(sale.lines.quantity, 2);
    }

    #[test]
    fn response_keeps_null_total() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let resp = SaleResponse::from(Sale {
            id: 1,
            seller_id: 1,
            client_id: 2,
            product_id: 3,
            quantity: 2,
            total: None,
            created_at,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["total"], serde_json::Value::Null);
        assert_eq!(json["created_at"], "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn stats_render_as_strings() {
        let stats = SaleStats {
            count: 3,
            total_sum: BigDecimal::from_str("1350").unwrap(),
            average_total: BigDecimal::from_str("450.00").unwrap(),
        };
        let json = serde_json::to_value(SaleStatsResponse::from(stats)).unwrap();
        assert_eq!(json["total_sum"], "1350");
        assert_eq!(json["average_total"], "450.00");
    }

    #[test]
    fn empty_sale_stats_render_zero_amounts() {
        let json = serde_json::to_value(SaleStatsResponse::from(SaleStats::new(0, None, None)))
            .unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["total_sum"], "0");
        assert_eq!(json["average_total"], "0.00");
    }
}
