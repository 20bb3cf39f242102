use actix_web::{App, HttpServer, web};
use clap::Parser;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tracing::{error, info};

mod api;
use crate::api::{
    dashboard::{dashboard_config, DashboardService},
    health::health_config,
    validation,
};
mod cli;
use crate::cli::{Cli, Commands};
mod config;
mod db;
use crate::db::job_repository::PgJobRepository;
mod logging;
mod shutdown;
use crate::shutdown::ShutdownCoordinator;
mod tracker;
use crate::tracker::{deadline::local_today, SyncController};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = config::Config::from_env()
        .expect("Failed to load configuration");

    logging::init(&config.log_dir)
        .expect("Failed to initialize logging");

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections).await
        .expect("Failed to connect to database");
    info!("Database connection pool established");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, pool).await,
        Commands::Migrate => {
            db::migrations::run_migrations(&pool).await
                .expect("Failed to run database migrations");
            pool.close().await;
            Ok(())
        }
        Commands::List { status, urgent } => {
            let repository = PgJobRepository::new(pool.clone());
            let result = cli::list(&repository, status, urgent, local_today()).await;
            pool.close().await;
            match result {
                Ok(view) => {
                    print!("{}", view);
                    Ok(())
                }
                Err(e) => {
                    error!("Error fetching jobs: {}", e);
                    Err(std::io::Error::other(format!("데이터를 가져오는데 실패했습니다: {}", e)))
                }
            }
        }
    }
}

async fn serve(config: config::Config, pool: Pool<Postgres>) -> std::io::Result<()> {
    info!("Starting job-tracker dashboard");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Controller command buffer: {}", config.command_buffer);

    // Run migrations on startup (auto-migrate when starting server)
    db::migrations::run_migrations(&pool).await
        .expect("Failed to run database migrations");

    // One watch channel fans the shutdown signal out to the controller
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let repository = Arc::new(PgJobRepository::new(pool.clone()));
    let (controller, handle) = SyncController::new(repository, config.command_buffer);
    let controller_task = tokio::spawn(controller.run(shutdown_rx));
    info!("Sync controller spawned");

    let server_pool = pool.clone();
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        let dashboard = web::Data::new(DashboardService::new(handle.clone()));

        let payload_config = web::PayloadConfig::default()
            .limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(dashboard)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(dashboard_config)
    });

    info!("Server starting on http://{}:{}", config.listen_addr, config.listen_port);

    let server = server
        .bind((config.listen_addr.as_str(), config.listen_port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(
        server_handle,
        server_task,
        controller_task,
        shutdown_tx,
        pool,
    );

    coordinator.wait_for_shutdown().await
}
