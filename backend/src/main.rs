mod classify;
mod config;
mod inference;
mod live;
mod media;
mod routes;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use classify::UploadClassifier;
use config::Config;
use inference::{FrameClassifier, Model};
use live::{LivePoller, LiveState};
use media::{OpenCvDecoder, VideoDecoder};
use routes::configure_routes;
use std::env;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!("Configuration: {:?}", config);

    std::fs::create_dir_all(&config.upload_dir)?;

    let model = Model::load(&config.model_path).map_err(|e| {
        log::error!("Failed to load model at startup: {}", e);
        Error::other(format!("Model loading failed: {}", e))
    })?;

    let classifier: Arc<dyn FrameClassifier> = Arc::new(model);
    let decoder: Arc<dyn VideoDecoder> = Arc::new(OpenCvDecoder);
    let live_state = LiveState::new();

    LivePoller::new(
        classifier.clone(),
        decoder.clone(),
        live_state.clone(),
        &config,
    )
    .spawn()?;

    let uploads = UploadClassifier::new(classifier, decoder, config.frame_sample_stride);
    let bind_address = config.bind_address();

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
            .app_data(web::Data::new(live_state.clone()))
            .app_data(web::Data::new(uploads.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(|cfg| configure_routes(cfg, config.frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
