pub mod catalog_service;
pub mod sales_service;

pub use catalog_service::CatalogService;
pub use sales_service::SalesService;
