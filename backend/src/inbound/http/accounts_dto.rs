//! Request and response payloads for the account endpoints.
//!
//! Account JSON is camelCase and never carries the password digest. The
//! [`AccountResource`] trait ties each tax document to its wire shapes so the
//! handler logic in [`super::accounts`] stays generic over clients and stores.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::UpdateAccountRequest;
use crate::domain::{Account, AccountDraft, Cnpj, Cpf, TaxDocument, UserClient, UserStore};

/// Lenient `page`/`limit` query parameters.
///
/// Values are kept as text so absent, non-numeric or non-positive input falls
/// back to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// One-based page number (default 1).
    #[param(value_type = Option<u32>, example = 1)]
    pub page: Option<String>,
    /// Page size (default 10).
    #[param(value_type = Option<u32>, example = 10)]
    pub limit: Option<String>,
}

/// Client account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserClientResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "12345678901")]
    pub cpf: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 100.5)]
    pub balance: f64,
    #[schema(example = 10050)]
    pub balance_in_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&UserClient> for UserClientResponse {
    fn from(account: &UserClient) -> Self {
        Self {
            id: account.identity().to_string(),
            full_name: account.full_name().to_owned(),
            cpf: account.cpf().digits().to_owned(),
            email: account.email().as_ref().to_owned(),
            balance: account.balance().as_real(),
            balance_in_cents: account.balance().cents(),
            created_at: account.created_at(),
        }
    }
}

/// Store account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStoreResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Padaria Central")]
    pub full_name: String,
    #[schema(example = "12345678000199")]
    pub cnpj: String,
    #[schema(example = "contato@padaria.com.br")]
    pub email: String,
    #[schema(example = 0.0)]
    pub balance: f64,
    #[schema(example = 0)]
    pub balance_in_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&UserStore> for UserStoreResponse {
    fn from(account: &UserStore) -> Self {
        Self {
            id: account.identity().to_string(),
            full_name: account.full_name().to_owned(),
            cnpj: account.cnpj().digits().to_owned(),
            email: account.email().as_ref().to_owned(),
            balance: account.balance().as_real(),
            balance_in_cents: account.balance().cents(),
            created_at: account.created_at(),
        }
    }
}

/// Body for `POST /api/v1/user-clients`.
///
/// Missing fields deserialise as empty text so the account rules report
/// which value is invalid.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserClientRequest {
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "123.456.789-01")]
    pub cpf: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

/// Body for `POST /api/v1/user-stores`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserStoreRequest {
    #[schema(example = "Padaria Central")]
    pub full_name: String,
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,
    #[schema(example = "contato@padaria.com.br")]
    pub email: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

/// Body for `PATCH /api/v1/user-clients/{id}`. Absent fields are left as is.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserClientRequest {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for `PATCH /api/v1/user-stores/{id}`. Absent fields are left as is.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStoreRequest {
    pub full_name: Option<String>,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for the deposit endpoints. `amount` is in reais.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositBody {
    #[schema(example = 50.25)]
    pub amount: f64,
}

/// Body for `POST /api/v1/user-clients/{id}/transfers`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub destination_id: String,
    #[schema(example = 10.0)]
    pub amount: f64,
}

/// Plain acknowledgement payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Transfer completed successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// OpenAPI shape of the client list envelope.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserClientListResponse {
    #[schema(example = "User clients list successfully")]
    message: String,
    data: Vec<UserClientResponse>,
    #[schema(example = 10)]
    limit: u32,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 1)]
    total: u64,
}

/// OpenAPI shape of the store list envelope.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserStoreListResponse {
    #[schema(example = "User stores list successfully")]
    message: String,
    data: Vec<UserStoreResponse>,
    #[schema(example = 10)]
    limit: u32,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 1)]
    total: u64,
}

/// Wire shapes for one account kind.
pub trait AccountResource: TaxDocument {
    type Response: Serialize;
    type Create: DeserializeOwned;
    type Update: DeserializeOwned;

    fn respond(account: &Account<Self>) -> Self::Response;

    fn draft(body: Self::Create) -> AccountDraft;

    fn update(id: String, body: Self::Update) -> UpdateAccountRequest;
}

impl AccountResource for Cpf {
    type Response = UserClientResponse;
    type Create = CreateUserClientRequest;
    type Update = UpdateUserClientRequest;

    fn respond(account: &UserClient) -> UserClientResponse {
        UserClientResponse::from(account)
    }

    fn draft(body: CreateUserClientRequest) -> AccountDraft {
        AccountDraft {
            full_name: body.full_name,
            document: body.cpf,
            email: body.email,
            password: body.password,
        }
    }

    fn update(id: String, body: UpdateUserClientRequest) -> UpdateAccountRequest {
        UpdateAccountRequest {
            id,
            full_name: body.full_name,
            document: body.cpf,
            email: body.email,
            password: body.password,
        }
    }
}

impl AccountResource for Cnpj {
    type Response = UserStoreResponse;
    type Create = CreateUserStoreRequest;
    type Update = UpdateUserStoreRequest;

    fn respond(account: &UserStore) -> UserStoreResponse {
        UserStoreResponse::from(account)
    }

    fn draft(body: CreateUserStoreRequest) -> AccountDraft {
        AccountDraft {
            full_name: body.full_name,
            document: body.cnpj,
            email: body.email,
            password: body.password,
        }
    }

    fn update(id: String, body: UpdateUserStoreRequest) -> UpdateAccountRequest {
        UpdateAccountRequest {
            id,
            full_name: body.full_name,
            document: body.cnpj,
            email: body.email,
            password: body.password,
        }
    }
}
