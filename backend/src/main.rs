mod config;
mod error;
mod routes;
mod upstream;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::RelayConfig;
use routes::configure_routes;
use std::env;
use upstream::UpstreamClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = RelayConfig::load().map_err(|e| {
        log::error!("Failed to load relay configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    match &config.upstream_base_url {
        Some(url) => log::info!("Forwarding uploads to {}/upload", url),
        None => log::warn!(
            "UPSTREAM_BASE_URL is not set. Uploads will fail until an inference URL is configured."
        ),
    }
    log::info!("Serving client from {}", config.frontend_dir);

    let upstream = UpstreamClient::new(config.upstream_base_url.as_deref());
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .send_wildcard()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
                    // `OPTIONS /upload` answers preflights itself.
                    .disable_preflight()
                    .max_age(3600),
            )
            .app_data(web::Data::new(upstream.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
