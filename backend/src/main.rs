use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::env;
use std::sync::Arc;

use tumorscan::config::AppConfig;
use tumorscan::detection::HttpDetector;
use tumorscan::pipeline::ScanService;
use tumorscan::routes::configure_routes;
use tumorscan::visualization::ImageVisualizer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    config.storage.ensure_dirs()?;
    log::info!(
        "Uploads in {}, results in {}",
        config.storage.upload_dir.display(),
        config.storage.results_dir.display()
    );

    let endpoint = config
        .detector
        .endpoint()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let detector = HttpDetector::new(endpoint, config.detector.timeout()).map_err(|e| {
        log::error!("Failed to build detector client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    log::info!("Using tumor detector at {}", detector.endpoint());

    let service = ScanService::new(
        &config.storage,
        Arc::new(detector),
        Arc::new(ImageVisualizer::new()),
    )
    .with_upload_limit(config.server.max_upload_bytes);

    let bind_address = config.server.bind_address();
    let storage = config.storage.clone();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(service.clone()))
            .configure(|cfg| configure_routes(cfg, &storage))
    })
    .bind(&bind_address)?
    .run()
    .await
}
