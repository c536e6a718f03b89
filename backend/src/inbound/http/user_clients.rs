//! User client API handlers.
//!
//! ```text
//! GET    /api/v1/user-clients?page=1&limit=10
//! POST   /api/v1/user-clients {"fullName":"Ada Lovelace","cpf":"123.456.789-01",...}
//! GET    /api/v1/user-clients/{id}
//! PATCH  /api/v1/user-clients/{id} {"email":"ada@example.org"}
//! DELETE /api/v1/user-clients/{id}
//! POST   /api/v1/user-clients/{id}/deposits {"amount":50.0}
//! POST   /api/v1/user-clients/{id}/transfers {"destinationId":"...","amount":10.0}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::Cpf;
use crate::domain::Error;
use crate::domain::ports::TransferRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts;
use crate::inbound::http::accounts_dto::{
    CreateUserClientRequest, DepositBody, ListQuery, MessageResponse, TransferBody,
    UpdateUserClientRequest, UserClientListResponse, UserClientResponse,
};
use crate::inbound::http::state::HttpState;

/// List clients, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/user-clients",
    params(ListQuery),
    responses(
        (status = 200, description = "Paged clients", body = UserClientListResponse),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "listUserClients"
)]
#[get("/user-clients")]
pub async fn list_user_clients(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    accounts::list::<Cpf>(&state, query.into_inner()).await
}

/// Register a client.
#[utoipa::path(
    post,
    path = "/api/v1/user-clients",
    request_body = CreateUserClientRequest,
    responses(
        (status = 201, description = "Client created", body = UserClientResponse),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "createUserClient"
)]
#[post("/user-clients")]
pub async fn create_user_client(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserClientRequest>,
) -> ApiResult<HttpResponse> {
    accounts::create::<Cpf>(&state, payload.into_inner()).await
}

/// Fetch one client.
#[utoipa::path(
    get,
    path = "/api/v1/user-clients/{id}",
    params(("id" = String, Path, description = "Client identifier (UUID)")),
    responses(
        (status = 200, description = "Client", body = UserClientResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "getUserClient"
)]
#[get("/user-clients/{id}")]
pub async fn get_user_client(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    accounts::find::<Cpf>(&state, &path.into_inner()).await
}

/// Change any subset of a client's name, CPF, email and password.
#[utoipa::path(
    patch,
    path = "/api/v1/user-clients/{id}",
    params(("id" = String, Path, description = "Client identifier (UUID)")),
    request_body = UpdateUserClientRequest,
    responses(
        (status = 200, description = "Updated client", body = UserClientResponse),
        (status = 400, description = "Invalid or duplicate data", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "updateUserClient"
)]
#[patch("/user-clients/{id}")]
pub async fn update_user_client(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserClientRequest>,
) -> ApiResult<HttpResponse> {
    accounts::update::<Cpf>(&state, path.into_inner(), payload.into_inner()).await
}

/// Remove a client.
#[utoipa::path(
    delete,
    path = "/api/v1/user-clients/{id}",
    params(("id" = String, Path, description = "Client identifier (UUID)")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "deleteUserClient"
)]
#[delete("/user-clients/{id}")]
pub async fn delete_user_client(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    accounts::delete::<Cpf>(&state, &path.into_inner()).await
}

/// Credit a client's balance.
#[utoipa::path(
    post,
    path = "/api/v1/user-clients/{id}/deposits",
    params(("id" = String, Path, description = "Client identifier (UUID)")),
    request_body = DepositBody,
    responses(
        (status = 200, description = "Client after the deposit", body = UserClientResponse),
        (status = 400, description = "Invalid amount", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "depositUserClient"
)]
#[post("/user-clients/{id}/deposits")]
pub async fn deposit_user_client(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DepositBody>,
) -> ApiResult<HttpResponse> {
    accounts::deposit::<Cpf>(&state, path.into_inner(), payload.into_inner()).await
}

/// Move funds from this client to another client.
#[utoipa::path(
    post,
    path = "/api/v1/user-clients/{id}/transfers",
    params(("id" = String, Path, description = "Sending client identifier (UUID)")),
    request_body = TransferBody,
    responses(
        (status = 200, description = "Transfer applied", body = MessageResponse),
        (status = 400, description = "Invalid amount, self transfer or insufficient balance", body = Error),
        (status = 404, description = "Sender or destination not found", body = Error)
    ),
    tags = ["user-clients"],
    operation_id = "transferUserClient"
)]
#[post("/user-clients/{id}/transfers")]
pub async fn transfer_user_client(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TransferBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let TransferBody {
        destination_id,
        amount,
    } = payload.into_inner();
    state
        .transfers
        .transfer(TransferRequest {
            sender_id: path.into_inner(),
            destination_id,
            amount,
        })
        .await?;
    Ok(web::Json(MessageResponse::new(
        "Transfer completed successfully",
    )))
}

#[cfg(test)]
#[path = "user_clients_tests.rs"]
mod tests;
