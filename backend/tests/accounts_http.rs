//! End-to-end account flows over the real Actix app backed by in-memory
//! repositories and a low-cost bcrypt hasher.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use accounts::inbound::http::health::HealthState;
use accounts::server::{ServerConfig, build_app, build_http_state_with_clock};
use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::{Value, json};

/// Clock advancing one second per reading so creation order is stable.
struct SteppingClock {
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::seconds(tick)
    }
}

async fn app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("literal address");
    let config = ServerConfig::new(addr).with_bcrypt_cost(4);
    let state = build_http_state_with_clock(
        &config,
        Arc::new(SteppingClock {
            ticks: AtomicI64::new(0),
        }),
    );
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(build_app(health, web::Data::new(state))).await
}

async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> (StatusCode, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

async fn create_client(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    cpf: &str,
    email: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/user-clients")
            .set_json(json!({
                "fullName": name,
                "cpf": cpf,
                "email": email,
                "password": "s3cret"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().expect("id").to_owned()
}

async fn deposit(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    id: &str,
    amount: f64,
) -> Value {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/user-clients/{id}/deposits"))
            .set_json(json!({ "amount": amount })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "deposit failed: {body}");
    body
}

#[rstest]
#[actix_web::test]
async fn client_lifecycle_round_trips_through_http() {
    let app = app().await;
    let id = create_client(&app, "Ada Lovelace", "123.456.789-01", "ada@example.com").await;

    let (status, fetched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["cpf"], "12345678901");
    assert_eq!(fetched["balanceInCents"], 0);
    assert!(fetched.get("password").is_none());

    let (status, updated) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/user-clients/{id}"))
            .set_json(json!({ "fullName": "  Augusta Ada King  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Augusta Ada King");

    let (status, _) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/user-clients/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, missing) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["message"], "User client not found.");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let app = app().await;
    create_client(&app, "Ada Lovelace", "12345678901", "ada@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user-clients")
            .set_json(json!({
                "fullName": "Another Ada",
                "cpf": "98765432100",
                "email": "ada@example.com",
                "password": "s3cret"
            })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists.");
}

#[rstest]
#[actix_web::test]
async fn transfer_moves_funds_between_clients() {
    let app = app().await;
    let sender = create_client(&app, "Ada Lovelace", "12345678901", "ada@example.com").await;
    let destination = create_client(&app, "Grace Hopper", "98765432100", "grace@example.com").await;
    deposit(&app, &sender, 100.0).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/user-clients/{sender}/transfers"))
            .set_json(json!({ "destinationId": destination, "amount": 40.25 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transfer completed successfully");

    let (_, sender_body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{sender}")),
    )
    .await;
    let (_, destination_body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{destination}")),
    )
    .await;
    assert_eq!(sender_body["balanceInCents"], 5_975);
    assert_eq!(destination_body["balanceInCents"], 4_025);
}

#[rstest]
#[actix_web::test]
async fn insufficient_balance_leaves_both_accounts_untouched() {
    let app = app().await;
    let sender = create_client(&app, "Ada Lovelace", "12345678901", "ada@example.com").await;
    let destination = create_client(&app, "Grace Hopper", "98765432100", "grace@example.com").await;
    deposit(&app, &sender, 100.0).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/user-clients/{sender}/transfers"))
            .set_json(json!({ "destinationId": destination, "amount": 200.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient balance.");

    let (_, sender_body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{sender}")),
    )
    .await;
    let (_, destination_body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/user-clients/{destination}")),
    )
    .await;
    assert_eq!(sender_body["balanceInCents"], 10_000);
    assert_eq!(destination_body["balanceInCents"], 0);
}

#[rstest]
#[actix_web::test]
async fn self_transfer_is_rejected() {
    let app = app().await;
    let id = create_client(&app, "Ada Lovelace", "12345678901", "ada@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/user-clients/{id}/transfers"))
            .set_json(json!({ "destinationId": id, "amount": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "self_transfer");
}

#[rstest]
#[actix_web::test]
async fn listing_pages_newest_first_with_lenient_query() {
    let app = app().await;
    for index in 1..=3 {
        create_client(
            &app,
            &format!("Client {index}"),
            &format!("{index:011}"),
            &format!("client{index}@example.com"),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/user-clients?page=1&limit=2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User clients list successfully");
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"][0]["fullName"], "Client 3");
    assert_eq!(body["data"][1]["fullName"], "Client 2");

    let (_, fallback) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/user-clients?page=-4&limit=zero"),
    )
    .await;
    assert_eq!((fallback["page"].clone(), fallback["limit"].clone()), (json!(1), json!(10)));
    assert_eq!(fallback["data"].as_array().map(Vec::len), Some(3));
}

#[rstest]
#[actix_web::test]
async fn clients_and_stores_are_isolated() {
    let app = app().await;
    create_client(&app, "Ada Lovelace", "12345678901", "ada@example.com").await;

    let (status, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user-stores")
            .set_json(json!({
                "fullName": "Padaria Central",
                "cnpj": "12.345.678/0001-99",
                "email": "ada@example.com",
                "password": "s3cret"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, stores) = send(&app, test::TestRequest::get().uri("/api/v1/user-stores")).await;
    assert_eq!(stores["message"], "User stores list successfully");
    assert_eq!(stores["total"], 1);
    assert_eq!(stores["data"][0]["cnpj"], "12345678000199");
}

#[rstest]
#[actix_web::test]
async fn responses_carry_trace_id_and_health_reports_ok() {
    let app = app().await;
    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/user-clients/not-a-uuid").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "ID invalid value.");
    assert!(body["traceId"].is_string());

    let (status, health) = send(&app, test::TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert!(health["checks"]["database"]["durationMs"].is_u64());

    let (status, _) = send(&app, test::TestRequest::get().uri("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
}
