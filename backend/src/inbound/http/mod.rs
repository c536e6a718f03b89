//! HTTP inbound adapter exposing REST endpoints.

mod accounts;
pub mod accounts_dto;
pub mod error;
pub mod health;
pub mod state;
pub mod user_clients;
pub mod user_stores;

use actix_web::web;

pub use error::ApiResult;

/// Register every account and health route.
///
/// Callers provide `web::Data<HttpState>` and `web::Data<HealthState>`.
/// Extractor failures (malformed JSON, query or path) are rendered through
/// the domain error payload.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use accounts::inbound::http::{configure, health::HealthState, state::HttpState};
///
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::fixtures()))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
///
/// [`HttpState`]: state::HttpState
/// [`HealthState`]: health::HealthState
pub fn configure(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api/v1")
        .service(user_clients::list_user_clients)
        .service(user_clients::create_user_client)
        .service(user_clients::get_user_client)
        .service(user_clients::update_user_client)
        .service(user_clients::delete_user_client)
        .service(user_clients::deposit_user_client)
        .service(user_clients::transfer_user_client)
        .service(user_stores::list_user_stores)
        .service(user_stores::create_user_store)
        .service(user_stores::get_user_store)
        .service(user_stores::update_user_store)
        .service(user_stores::delete_user_store)
        .service(user_stores::deposit_user_store);

    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(api)
        .service(health::ready)
        .service(health::live)
        .service(health::report);
}
