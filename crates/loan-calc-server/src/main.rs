mod config;
mod error;
mod handler;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, middleware, web, App, HttpServer};
use tracing::{info, Level};

use crate::config::Config;
use crate::error::Error;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    info!("listening on {}:{}", config.host, config.port);

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let allowed = config.allowed_origins.clone();
        let cors_access_all = allowed.contains(&String::from("*"));
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                if cors_access_all {
                    return true;
                }
                if let Ok(origin) = origin.to_str() {
                    return allowed.contains(&origin.to_owned());
                }
                false
            })
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE]);

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(16 * 1024)
                    .error_handler(handler::json_error),
            )
            .service(handler::calculate)
            .service(handler::version)
            .service(Files::new("/", config.static_dir.clone()).index_file("index.html"))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
