pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::application::{CatalogService, SalesService};
use crate::infrastructure::{DieselCatalogRepository, DieselSalesRepository};

pub use config::Settings;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`. Sale date
/// filters use calendar days of `time_zone`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
    time_zone: &str,
) -> std::io::Result<actix_web::dev::Server> {
    let catalog = web::Data::new(CatalogService::new(DieselCatalogRepository::new(pool.clone())));
    let sales = web::Data::new(SalesService::new(
        DieselSalesRepository::new(pool).with_time_zone(time_zone),
    ));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .app_data(sales.clone())
            .app_data(web::JsonConfig::default().error_handler(handlers::json_error))
            .wrap(Logger::default())
            .service(openapi::swagger_ui())
            .service(web::scope("/api").configure(handlers::configure))
    })
    .bind((host.to_string(), port))?
    .run())
}
