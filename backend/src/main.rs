mod assessment;
mod config;
mod encoders;
mod error;
mod inference;
mod metadata;
mod preprocess;
mod routes;
mod state;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::Config;
use routes::configure_routes;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = Config::from_env();

    log::info!("Loading model and encoder artifacts...");
    let state = AppState::initialize(&config);
    if state.model.is_none() || state.encoders.is_none() {
        log::warn!(
            "Starting degraded: prediction requests will fail until the artifacts are restored"
        );
    }
    let state = web::Data::new(state);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);
    log::info!("Health check: http://localhost:{}/health", config.port);
    log::info!("Prediction endpoint: http://localhost:{}/predict", config.port);

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
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
