use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use hospital_admin::app::{configure_app, AppServices};
use hospital_admin::auth::JwtManager;
use hospital_admin::config::AppConfig;
use hospital_admin::database;
use hospital_admin::openapi_config::api_doc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Initialize database
    let pool = database::initialize_database(&config.database_url).await?;

    let services = AppServices::new(pool);
    services
        .users
        .bootstrap_admin(&config.admin_username, &config.admin_password)
        .await?;

    let jwt_manager = web::Data::new(JwtManager::new(&config.jwt_secret, config.token_ttl_hours));

    tracing::info!("Hospital admin server listening on http://{}", config.bind_address);
    tracing::info!("API documentation: http://{}/swagger-ui/", config.bind_address);

    // Build the OpenAPI document once, outside the worker factory
    let openapi_doc = api_doc();

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi_doc.clone()),
            )
            .configure(|cfg| configure_app(cfg, &services, jwt_manager.clone()))
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
