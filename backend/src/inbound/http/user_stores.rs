//! User store API handlers.
//!
//! ```text
//! GET    /api/v1/user-stores?page=1&limit=10
//! POST   /api/v1/user-stores {"fullName":"Padaria Central","cnpj":"12.345.678/0001-99",...}
//! GET    /api/v1/user-stores/{id}
//! PATCH  /api/v1/user-stores/{id} {"email":"vendas@padaria.com.br"}
//! DELETE /api/v1/user-stores/{id}
//! POST   /api/v1/user-stores/{id}/deposits {"amount":50.0}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::Cnpj;
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts;
use crate::inbound::http::accounts_dto::{
    CreateUserStoreRequest, DepositBody, ListQuery, UpdateUserStoreRequest, UserStoreListResponse,
    UserStoreResponse,
};
use crate::inbound::http::state::HttpState;

/// List stores, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/user-stores",
    params(ListQuery),
    responses(
        (status = 200, description = "Paged stores", body = UserStoreListResponse),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "listUserStores"
)]
#[get("/user-stores")]
pub async fn list_user_stores(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    accounts::list::<Cnpj>(&state, query.into_inner()).await
}

/// Register a store.
#[utoipa::path(
    post,
    path = "/api/v1/user-stores",
    request_body = CreateUserStoreRequest,
    responses(
        (status = 201, description = "Store created", body = UserStoreResponse),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "createUserStore"
)]
#[post("/user-stores")]
pub async fn create_user_store(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserStoreRequest>,
) -> ApiResult<HttpResponse> {
    accounts::create::<Cnpj>(&state, payload.into_inner()).await
}

/// Fetch one store.
#[utoipa::path(
    get,
    path = "/api/v1/user-stores/{id}",
    params(("id" = String, Path, description = "Store identifier (UUID)")),
    responses(
        (status = 200, description = "Store", body = UserStoreResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Store not found", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "getUserStore"
)]
#[get("/user-stores/{id}")]
pub async fn get_user_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    accounts::find::<Cnpj>(&state, &path.into_inner()).await
}

/// Change any subset of a store's name, CNPJ, email and password.
#[utoipa::path(
    patch,
    path = "/api/v1/user-stores/{id}",
    params(("id" = String, Path, description = "Store identifier (UUID)")),
    request_body = UpdateUserStoreRequest,
    responses(
        (status = 200, description = "Updated store", body = UserStoreResponse),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 404, description = "Store not found", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "updateUserStore"
)]
#[patch("/user-stores/{id}")]
pub async fn update_user_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserStoreRequest>,
) -> ApiResult<HttpResponse> {
    accounts::update::<Cnpj>(&state, path.into_inner(), payload.into_inner()).await
}

/// Remove a store.
#[utoipa::path(
    delete,
    path = "/api/v1/user-stores/{id}",
    params(("id" = String, Path, description = "Store identifier (UUID)")),
    responses(
        (status = 204, description = "Store deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Store not found", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "deleteUserStore"
)]
#[delete("/user-stores/{id}")]
pub async fn delete_user_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    accounts::delete::<Cnpj>(&state, &path.into_inner()).await
}

/// Credit a store's balance.
#[utoipa::path(
    post,
    path = "/api/v1/user-stores/{id}/deposits",
    params(("id" = String, Path, description = "Store identifier (UUID)")),
    request_body = DepositBody,
    responses(
        (status = 200, description = "Store after the deposit", body = UserStoreResponse),
        (status = 400, description = "Invalid amount", body = Error),
        (status = 404, description = "Store not found", body = Error)
    ),
    tags = ["user-stores"],
    operation_id = "depositUserStore"
)]
#[post("/user-stores/{id}/deposits")]
pub async fn deposit_user_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DepositBody>,
) -> ApiResult<HttpResponse> {
    accounts::deposit::<Cnpj>(&state, path.into_inner(), payload.into_inner()).await
}

#[cfg(test)]
#[path = "user_stores_tests.rs"]
mod tests;
