use std::io;

use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use sulu_cookie_consent::db::{establish_connection_pool, run_migrations};
use sulu_cookie_consent::models::config::ServerConfig;
use sulu_cookie_consent::repository::DieselRepository;
use sulu_cookie_consent::routes::categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
use sulu_cookie_consent::routes::consent::consent_config;
use sulu_cookie_consent::routes::cookies::{
    create_cookie, delete_cookie, get_cookie, list_cookies, update_cookie,
};
use sulu_cookie_consent::routes::import_export::{export_taxonomy, import_taxonomy};
use validator::Validate;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = server_config.banner.validate() {
        log::error!("Invalid banner settings: {e}");
        std::process::exit(1);
    }

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let bind = (server_config.bind_address.clone(), server_config.port);
    log::info!("Starting cookie-consent service on {}:{}", bind.0, bind.1);

    let repo = web::Data::new(DieselRepository::new(pool));
    let server_config = web::Data::new(server_config);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(server_config.clone())
            .service(consent_config)
            .service(list_categories)
            .service(get_category)
            .service(create_category)
            .service(update_category)
            .service(delete_category)
            .service(list_cookies)
            .service(get_cookie)
            .service(create_cookie)
            .service(update_cookie)
            .service(delete_cookie)
            .service(export_taxonomy)
            .service(import_taxonomy)
    })
    .bind(bind)?
    .run()
    .await
}
