pub mod brands;
pub mod categories;
pub mod clients;
pub mod index;
pub mod products;
pub mod sale_items;
pub mod sales;
pub mod suppliers;
pub mod users;

use actix_web::{web, HttpRequest};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::application::{CatalogService, SalesService};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PAGE_SIZE};
use crate::errors::AppError;
use crate::infrastructure::{DieselCatalogRepository, DieselSalesRepository};

pub type Catalog = CatalogService<DieselCatalogRepository>;
pub type Sales = SalesService<DieselSalesRepository>;

/// Mount every API route on `cfg`. Fixed segments such as `/products/stats`
/// are registered ahead of `/{id}` so they are not captured by it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(index::api_index))
        .service(
            web::scope("/brands")
                .route("", web::get().to(brands::list_brands))
                .route("", web::post().to(brands::create_brand))
                .route("/{id}", web::get().to(brands::get_brand))
                .route("/{id}", web::put().to(brands::update_brand))
                .route("/{id}", web::delete().to(brands::delete_brand))
                .route("/{id}/products", web::get().to(brands::brand_products)),
        )
        .service(
            web::scope("/suppliers")
                .route("", web::get().to(suppliers::list_suppliers))
                .route("", web::post().to(suppliers::create_supplier))
                .route("/{id}", web::get().to(suppliers::get_supplier))
                .route("/{id}", web::put().to(suppliers::update_supplier))
                .route("/{id}", web::delete().to(suppliers::delete_supplier))
                .route("/{id}/products", web::get().to(suppliers::supplier_products)),
        )
        .service(
            web::scope("/categories")
                .route("", web::get().to(categories::list_categories))
                .route("", web::post().to(categories::create_category))
                .route("/{id}", web::get().to(categories::get_category))
                .route("/{id}", web::put().to(categories::update_category))
                .route("/{id}", web::delete().to(categories::delete_category))
                .route("/{id}/products", web::get().to(categories::category_products)),
        )
        .service(
            web::scope("/products")
                .route("", web::get().to(products::list_products))
                .route("", web::post().to(products::create_product))
                .route("/stats", web::get().to(products::product_stats))
                .route("/{id}", web::get().to(products::get_product))
                .route("/{id}", web::put().to(products::update_product))
                .route("/{id}", web::delete().to(products::delete_product)),
        )
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("", web::post().to(users::create_user))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}", web::delete().to(users::delete_user)),
        )
        .service(
            web::scope("/clients")
                .route("", web::get().to(clients::list_clients))
                .route("", web::post().to(clients::create_client))
                .route("/{id}", web::get().to(clients::get_client))
                .route("/{id}", web::put().to(clients::update_client))
                .route("/{id}", web::delete().to(clients::delete_client))
                .route("/{id}/purchases", web::get().to(clients::client_purchases)),
        )
        .service(
            web::scope("/sales")
                .route("", web::get().to(sales::list_sales))
                .route("", web::post().to(sales::create_sale))
                .route("/stats", web::get().to(sales::sale_stats))
                .route("/{id}", web::get().to(sales::get_sale))
                .route("/{id}", web::put().to(sales::update_sale))
                .route("/{id}", web::delete().to(sales::delete_sale)),
        )
        .service(
            web::scope("/sale-items")
                .route("", web::get().to(sale_items::list_sale_items))
                .route("", web::post().to(sale_items::create_sale_item))
                .route("/{id}", web::get().to(sale_items::get_sale_item))
                .route("/{id}", web::put().to(sale_items::update_sale_item))
                .route("/{id}", web::delete().to(sale_items::delete_sale_item)),
        );
}

/// Run a synchronous service call on the blocking pool. Diesel connections
/// must never be used from the async executor threads.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

/// Malformed JSON bodies are reported in the same `{"error": ...}` shape as
/// every other failure.
pub fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

// ── Pagination ───────────────────────────────────────────────────────────────

/// One page of a listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Number of records matching the filters, across all pages.
    pub count: i64,
    /// 1-based page actually served (out-of-range requests are clamped).
    pub page: i64,
    pub num_pages: i64,
    pub page_size: i64,
}

impl<T, U: Into<T>> From<Page<U>> for ListResponse<T> {
    fn from(page: Page<U>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            count: page.count,
            page: page.number,
            num_pages: page.num_pages,
            page_size: PAGE_SIZE,
        }
    }
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub(crate) fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || validator::validate_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Trimmed value, or `None` when nothing is left.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_allowed() {
        assert!(blank_or_email("").is_ok());
        assert!(blank_or_email("ventas@pcfactory.cl").is_ok());
        assert!(blank_or_email("not-an-email").is_err());
    }

    #[test]
    fn non_blank_drops_whitespace_only_values() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" +56 9 1234 ".into())), Some("+56 9 1234".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn list_response_reports_fixed_page_size() {
        let page = Page {
            items: vec![1i32, 2],
            count: 7,
            number: 2,
            num_pages: 2,
        };
        let resp: ListResponse<i64> = page.into();
        assert_eq!(resp.items, vec![1i64, 2]);
        assert_eq!(resp.page_size, 5);
        assert_eq!(resp.page, 2);
    }
}
