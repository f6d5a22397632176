use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiIndex {
    pub brands: String,
    pub suppliers: String,
    pub categories: String,
    pub products: String,
    pub users: String,
    pub clients: String,
    pub sales: String,
    pub sale_items: String,
    pub product_stats: String,
    pub sale_stats: String,
    pub openapi: String,
}

fn index() -> ApiIndex {
    ApiIndex {
        brands: "/api/brands".into(),
        suppliers: "/api/suppliers".into(),
        categories: "/api/categories".into(),
        products: "/api/products".into(),
        users: "/api/users".into(),
        clients: "/api/clients".into(),
        sales: "/api/sales".into(),
        sale_items: "/api/sale-items".into(),
        product_stats: "/api/products/stats".into(),
        sale_stats: "/api/sales/stats".into(),
        openapi: "/api-docs/openapi.json".into(),
    }
}

/// GET /api
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "Links to every collection", body = ApiIndex),
    ),
    tag = "index"
)]
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lists_collections() {
        let json = serde_json::to_value(index()).unwrap();
        assert_eq!(json["sales"], "/api/sales");
        assert_eq!(json["sale_items"], "/api/sale-items");
        assert_eq!(json.as_object().unwrap().len(), 11);
    }
}
