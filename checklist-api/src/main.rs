use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use anyhow::Context;
use checklist_api::auth::hash_password;
use checklist_api::cli::{Cli, Commands};
use checklist_api::config::{ApiConfig, LoggingConfig};
use checklist_api::handlers::{self, AppState};
use checklist_api::import::Importer;
use checklist_api::storage::Database;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::HashPassword { password }) = &cli.command {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    let (config, config_path) =
        ApiConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(config.logging.as_ref())?;
    info!(config = %config_path.display(), "Loaded configuration");

    let database = Arc::new(
        Database::new(&config.database.path)
            .with_context(|| format!("Failed to open database {}", config.database.path.display()))?,
    );
    info!(path = %config.database.path.display(), "Database initialized");

    match cli.command {
        Some(Commands::Import { path, force }) => run_import(&database, &config, path, force).await,
        _ => serve(database, config).await,
    }
}

fn init_tracing(logging: Option<&LoggingConfig>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match logging.and_then(|l| l.directory.as_ref()) {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
            let appender = tracing_appender::rolling::daily(directory, "checklist-api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run_import(
    database: &Database,
    config: &ApiConfig,
    path: Option<PathBuf>,
    force: bool,
) -> anyhow::Result<()> {
    let path = path
        .or_else(|| config.import.seed_file.clone())
        .context("No workbook given and no [import] seed_file configured")?;

    let importer = Importer::new(database);
    let summary = if force {
        importer.force_reimport(&path).await?
    } else {
        importer.import(&path).await?
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn seed_on_startup(database: &Database, config: &ApiConfig) {
    let Some(seed_file) = config.import.seed_file.as_ref() else {
        info!("No seed file configured, skipping startup import");
        return;
    };
    if !seed_file.exists() {
        warn!(file = %seed_file.display(), "Seed file not found, starting without initial questions");
        return;
    }

    match Importer::new(database).import(seed_file).await {
        Ok(summary) if summary.skipped_existing => {}
        Ok(summary) => info!(
            file = %seed_file.display(),
            imported = summary.total_inserted,
            "Seeded questions"
        ),
        Err(e) => error!(
            file = %seed_file.display(),
            error = %e,
            "Startup import failed, continuing without initial questions"
        ),
    }
}

async fn serve(database: Arc<Database>, config: ApiConfig) -> anyhow::Result<()> {
    seed_on_startup(&database, &config).await;

    if config.admin.is_none() {
        warn!("No [admin] section configured, admin endpoints will reject every request");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let config = Arc::new(config);
    let app_state = web::Data::new(AppState::new(database, Arc::clone(&config)));
    let max_upload_bytes = config.import.max_upload_bytes;

    info!("Starting checklist-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);
        if let Some(cors_config) = &config.cors {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| handlers::configure(cfg, max_upload_bytes))
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
