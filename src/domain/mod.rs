pub mod catalog;
pub mod errors;
pub mod filters;
pub mod money;
pub mod pagination;
pub mod ports;
pub mod sales;
pub mod stats;
