use dotenvy::dotenv;
use shop_service::infrastructure::check_time_zone;
use shop_service::{build_server, create_pool, run_migrations, Settings};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;

    let pool = create_pool(&settings.database_url, settings.db_pool_size)?;
    run_migrations(&pool).map_err(|e| format!("failed to run database migrations: {e}"))?;
    check_time_zone(&pool, &settings.time_zone)?;

    log::info!(
        "Starting server at http://{}:{} (pool size {}, sale dates in {})",
        settings.host,
        settings.port,
        settings.db_pool_size,
        settings.time_zone
    );

    build_server(pool, &settings.host, settings.port, &settings.time_zone)?.await?;
    Ok(())
}
