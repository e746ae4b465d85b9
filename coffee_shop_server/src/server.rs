use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpServer,
};
use coffee_shop_engine::{prepare_database, traits::DrinkManagement, DrinksApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    helpers::{json_error_handler, path_error_handler},
    routes::{
        fallback,
        health,
        CreateDrinkRoute,
        DeleteDrinkRoute,
        DrinksDetailRoute,
        GetDrinksRoute,
        UpdateDrinkRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    prepare_database(&config.database_url, config.reset_database)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let verifier = TokenVerifier::from_config(&config.auth);
    let srv = create_server_instance(&config, db.clone(), verifier)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ Server has stopped. Closing the database.");
    db.close().await;
    result
}

pub fn create_server_instance(
    config: &ServerConfig,
    db: SqliteDatabase,
    verifier: TokenVerifier,
) -> Result<Server, ServerError> {
    let verifier = web::Data::new(verifier);
    let srv = HttpServer::new(move || {
        let drinks_api = DrinksApi::new(db.clone());
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("drinks::access_log"))
            .app_data(verifier.clone())
            .app_data(web::Data::new(drinks_api))
            .configure(configure_routes::<SqliteDatabase>)
            .default_service(web::route().to(fallback))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route of the drinks API, using `B` as the database backend.
///
/// The caller must also register a `web::Data<DrinksApi<B>>` and a `web::Data<TokenVerifier>`.
pub fn configure_routes<B: DrinkManagement + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health)
        .service(GetDrinksRoute::<B>::new())
        .service(DrinksDetailRoute::<B>::new())
        .service(CreateDrinkRoute::<B>::new())
        .service(UpdateDrinkRoute::<B>::new())
        .service(DeleteDrinkRoute::<B>::new());
}

/// Browser clients may call the API from any origin.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", "Content-Type,Authorization,true"))
        .add(("Access-Control-Allow-Methods", "GET,PATCH,POST,DELETE,OPTIONS"))
}
