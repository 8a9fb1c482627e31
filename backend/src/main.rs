mod alert;
mod classifier;
mod config;
mod feedback;
mod pages;
mod pipeline;
mod routes;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use alert::AlertMailer;
use classifier::{Classifier, TorchClassifier};
use config::AppConfig;
use feedback::LoggingFeedbackSink;
use routes::{PipelineContext, configure_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Configuration error: {}", e),
            ));
        }
    };

    let mailer = AlertMailer::new(config.alert.clone());

    // The service must not come up without a working classifier.
    let classifier = match TorchClassifier::load(&config.model_dir) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!(
                "Failed to load classifier from {}: {}",
                config.model_dir.display(),
                e
            );
            mailer
                .send_critical(
                    "Classifier failed to load",
                    &format!(
                        "The service refused to start: could not load the model from {}: {}",
                        config.model_dir.display(),
                        e
                    ),
                )
                .await;
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Model loading failed: {}", e),
            ));
        }
    };
    log::info!(
        "Classifier ready; expecting {}x{} input across {} classes",
        classifier.input_width(),
        classifier.input_height(),
        classifier::CLASS_LABELS.len()
    );

    let context = web::Data::new(PipelineContext {
        classifier: Arc::new(classifier),
        feedback: Arc::new(LoggingFeedbackSink),
    });

    let bind_address = config.bind_address.clone();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
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
            .app_data(context.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
