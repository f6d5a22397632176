use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    brands, categories, clients, index, products, sale_items, sales, suppliers, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop Service API",
        version = "0.1.0",
        description = "Catalog, clients and sales of a small shop. Sale totals are computed server side from the product price."
    ),
    paths(
        index::api_index,
        brands::list_brands,
        brands::create_brand,
        brands::get_brand,
        brands::update_brand,
        brands::delete_brand,
        brands::brand_products,
        suppliers::list_suppliers,
        suppliers::create_supplier,
        suppliers::get_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        suppliers::supplier_products,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        categories::category_products,
        products::list_products,
        products::product_stats,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        clients::list_clients,
        clients::create_client,
        clients::get_client,
        clients::update_client,
        clients::delete_client,
        clients::client_purchases,
        sales::list_sales,
        sales::sale_stats,
        sales::create_sale,
        sales::get_sale,
        sales::update_sale,
        sales::delete_sale,
        sale_items::list_sale_items,
        sale_items::create_sale_item,
        sale_items::get_sale_item,
        sale_items::update_sale_item,
        sale_items::delete_sale_item,
    ),
    tags(
        (name = "index", description = "Entry point"),
        (name = "brands", description = "Product brands"),
        (name = "suppliers", description = "Product suppliers"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Catalog and price statistics"),
        (name = "users", description = "Sellers"),
        (name = "clients", description = "Customers and their purchases"),
        (name = "sales", description = "Sales with computed totals"),
        (name = "sale-items", description = "Per-sale line items"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_stats_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/products/stats"));
        assert!(doc.paths.paths.contains_key("/api/sales/stats"));
        assert!(doc.paths.paths.contains_key("/api/clients/{id}/purchases"));
    }

    #[test]
    fn sale_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("CreateSaleRequest"));
        assert!(schemas.contains_key("SaleResponse"));
    }
}
