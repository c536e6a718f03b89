//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every account and health endpoint together with the
//! request, response and error schemas they reference. The generated
//! document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts_dto::{
    CreateUserClientRequest, CreateUserStoreRequest, DepositBody, MessageResponse, TransferBody,
    UpdateUserClientRequest, UpdateUserStoreRequest, UserClientListResponse, UserClientResponse,
    UserStoreListResponse, UserStoreResponse,
};
use crate::inbound::http::health::{CheckStatus, DependencyCheck, HealthChecks, HealthReport};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts API",
        description = "Client and store accounts with deposits, transfers and health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::user_clients::list_user_clients,
        crate::inbound::http::user_clients::create_user_client,
        crate::inbound::http::user_clients::get_user_client,
        crate::inbound::http::user_clients::update_user_client,
        crate::inbound::http::user_clients::delete_user_client,
        crate::inbound::http::user_clients::deposit_user_client,
        crate::inbound::http::user_clients::transfer_user_client,
        crate::inbound::http::user_stores::list_user_stores,
        crate::inbound::http::user_stores::create_user_store,
        crate::inbound::http::user_stores::get_user_store,
        crate::inbound::http::user_stores::update_user_store,
        crate::inbound::http::user_stores::delete_user_store,
        crate::inbound::http::user_stores::deposit_user_store,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::report,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserClientResponse,
        UserStoreResponse,
        UserClientListResponse,
        UserStoreListResponse,
        CreateUserClientRequest,
        CreateUserStoreRequest,
        UpdateUserClientRequest,
        UpdateUserStoreRequest,
        DepositBody,
        TransferBody,
        MessageResponse,
        HealthReport,
        HealthChecks,
        DependencyCheck,
        CheckStatus,
    )),
    tags(
        (name = "user-clients", description = "Accounts identified by CPF"),
        (name = "user-stores", description = "Accounts identified by CNPJ"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("UserClientResponse", "cpf")]
    #[case("UserClientResponse", "balanceInCents")]
    #[case("UserStoreResponse", "cnpj")]
    #[case("UserClientListResponse", "total")]
    fn schemas_expose_wire_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    fn account_schemas_never_expose_passwords() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["UserClientResponse", "UserStoreResponse"] {
            match schemas.get(name).expect("schema registered") {
                RefOr::T(Schema::Object(obj)) => {
                    assert!(!obj.properties.keys().any(|key| key.contains("password")));
                }
                _ => panic!("expected Object schema"),
            }
        }
    }

    #[rstest]
    #[case("/api/v1/user-clients/{id}/transfers")]
    #[case("/api/v1/user-stores/{id}/deposits")]
    #[case("/health")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path));
    }
}
