use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use signup::config::{self, AppConfig};
use signup::handlers;
use signup::registrar::{HttpRegistrar, Registrar};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // .env may set RUST_LOG, so load it before the logger
    let dotenv = config::load_dotenv();
    env_logger::init();
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {e}");
    }
    let app_config = AppConfig::from_env();

    let registrar = HttpRegistrar::new(&app_config.registration_url, app_config.registration_timeout)
        .map_err(std::io::Error::other)?;
    log::info!("Registration endpoint: {}", registrar.url());
    let registrar: Arc<dyn Registrar> = Arc::new(registrar);

    let secret_key = config::session_key();
    let bind_addr = app_config.bind_addr.clone();

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::from(registrar.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
