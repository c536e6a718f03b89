//! Tests for the account service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{FixturePasswordHasher, MockAccountRepository, MockPasswordHasher};
use crate::domain::{AccountAttributes, Balance, Cnpj, Email, ErrorCode, MAX_CENTS, MAX_WRITE_ATTEMPTS};

const SENDER_ID: &str = "11111111-1111-4111-8111-111111111111";
const RECEIVER_ID: &str = "22222222-2222-4222-8222-222222222222";

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn make_service<D: TaxDocument>(
    repo: MockAccountRepository<D>,
) -> AccountService<D, MockAccountRepository<D>, FixturePasswordHasher> {
    AccountService::new(
        Arc::new(repo),
        Arc::new(FixturePasswordHasher),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    )
}

fn stored_client(id: &str, cpf: &str, email: &str, cents: i64) -> Account<Cpf> {
    let attributes = AccountAttributes::new(
        "Ada Lovelace",
        Cpf::new(cpf).expect("valid cpf"),
        Email::new(email).expect("valid email"),
        "fixture$secret",
        Balance::from_cents(cents).expect("valid balance"),
        fixture_timestamp(),
    );
    Account::restore(Identity::new(id).expect("valid id"), attributes)
}

#[fixture]
fn draft() -> AccountDraft {
    AccountDraft {
        full_name: "Ada Lovelace".into(),
        document: "123.456.789-01".into(),
        email: "ada@example.com".into(),
        password: "secret".into(),
    }
}

fn details_code(error: &Error) -> Option<&str> {
    error.details().and_then(|value| value["code"].as_str())
}

#[rstest]
#[tokio::test]
async fn create_registers_account_with_hashed_password(draft: AccountDraft) {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_email()
        .with(eq("ada@example.com"))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_find_by_document()
        .with(eq("12345678901"))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_create()
        .times(1)
        .returning(|account| Ok(account.clone()));

    let account = make_service(repo).create(draft).await.expect("create succeeds");

    assert_eq!(account.cpf().digits(), "12345678901");
    assert_eq!(account.password(), "fixture$secret");
    assert_eq!(account.created_at(), fixture_timestamp());
    assert_eq!(account.balance(), Balance::ZERO);
}

#[rstest]
#[tokio::test]
async fn create_rejects_taken_email_before_checking_document(draft: AccountDraft) {
    let existing = stored_client(SENDER_ID, "98765432100", "ada@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_find_by_document().times(0);
    repo.expect_create().times(0);

    let error = make_service(repo).create(draft).await.expect_err("email taken");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Email already exists.");
    assert_eq!(details_code(&error), Some("email_taken"));
}

#[rstest]
#[tokio::test]
async fn create_rejects_taken_cpf(draft: AccountDraft) {
    let existing = stored_client(SENDER_ID, "12345678901", "other@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_find_by_document()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_create().times(0);

    let error = make_service(repo).create(draft).await.expect_err("cpf taken");

    assert_eq!(error.message(), "CPF already exists.");
}

#[rstest]
#[tokio::test]
async fn create_store_uses_cnpj_label() {
    let existing = Account::<Cnpj>::register(
        AccountDraft {
            full_name: "Loja".into(),
            document: "12345678000195".into(),
            email: "loja@example.com".into(),
            password: "secret".into(),
        },
        fixture_timestamp(),
    )
    .expect("valid store");
    let mut repo = MockAccountRepository::<Cnpj>::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_find_by_document()
        .with(eq("12345678000195"))
        .return_once(move |_| Ok(Some(existing)));

    let error = make_service(repo)
        .create(AccountDraft {
            full_name: "Outra Loja".into(),
            document: "12.345.678/0001-95".into(),
            email: "outra@example.com".into(),
            password: "secret".into(),
        })
        .await
        .expect_err("cnpj taken");

    assert_eq!(error.message(), "CNPJ already exists.");
}

#[rstest]
#[case::email("broken", "123.456.789-01", "Invalid Email.", "invalid_email")]
#[case::document("ada@example.com", "123", "Invalid CPF.", "invalid_cpf")]
#[tokio::test]
async fn create_surfaces_validation_failures(
    #[case] email: &str,
    #[case] document: &str,
    #[case] message: &str,
    #[case] code: &str,
) {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_find_by_document().return_once(|_| Ok(None));
    repo.expect_create().times(0);

    let error = make_service(repo)
        .create(AccountDraft {
            full_name: "Ada Lovelace".into(),
            document: document.into(),
            email: email.into(),
            password: "secret".into(),
        })
        .await
        .expect_err("validation fails");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
    assert_eq!(details_code(&error), Some(code));
}

#[rstest]
#[tokio::test]
async fn create_maps_hasher_failure_to_internal_error(draft: AccountDraft) {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));
    repo.expect_find_by_document().return_once(|_| Ok(None));
    repo.expect_create().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Err(PasswordHasherError::hash("cost out of range")));
    let service = AccountService::new(
        Arc::new(repo),
        Arc::new(hasher),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    );

    let error = service.create(draft).await.expect_err("hash fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn update_rejects_malformed_id() {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().times(0);

    let error = make_service(repo)
        .update(UpdateAccountRequest {
            id: "not-an-id".into(),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect_err("bad id");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "ID invalid value.");
}

#[rstest]
#[tokio::test]
async fn update_reports_missing_client() {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_save().times(0);

    let error = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User client not found.");
}

#[rstest]
#[tokio::test]
async fn update_skips_uniqueness_checks_for_unchanged_values() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_find_by_email().times(0);
    repo.expect_find_by_document().times(0);
    repo.expect_save()
        .withf(|account, read| account.full_name() == "Augusta Ada" && *read == Balance::ZERO)
        .times(1)
        .return_once(|_, _| Ok(()));

    let account = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            full_name: Some("Augusta Ada".into()),
            document: Some("123.456.789-01".into()),
            email: Some("ada@example.com".into()),
            password: None,
        })
        .await
        .expect("update succeeds");

    assert_eq!(account.full_name(), "Augusta Ada");
    assert_eq!(account.password(), "fixture$secret");
}

#[rstest]
#[tokio::test]
async fn update_rejects_email_owned_by_another_client() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let other = stored_client(RECEIVER_ID, "10987654321", "grace@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_find_by_email()
        .with(eq("grace@example.com"))
        .return_once(move |_| Ok(Some(other)));
    repo.expect_save().times(0);

    let error = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            email: Some("grace@example.com".into()),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect_err("email taken");

    assert_eq!(error.message(), "Email already exists for another user.");
}

#[rstest]
#[tokio::test]
async fn update_rejects_cpf_owned_by_another_client() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let other = stored_client(RECEIVER_ID, "10987654321", "grace@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_find_by_document()
        .with(eq("10987654321"))
        .return_once(move |_| Ok(Some(other)));
    repo.expect_save().times(0);

    let error = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            document: Some("109.876.543-21".into()),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect_err("cpf taken");

    assert_eq!(error.message(), "CPF already exists for another user.");
}

#[rstest]
#[tokio::test]
async fn update_hashes_new_password_and_changes_document() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_find_by_document().return_once(|_| Ok(None));
    repo.expect_save().times(1).return_once(|_, _| Ok(()));

    let account = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            document: Some("109.876.543-21".into()),
            password: Some("  n3w-pass ".into()),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect("update succeeds");

    assert_eq!(account.cpf().digits(), "10987654321");
    assert_eq!(account.password(), "fixture$n3w-pass");
}

#[rstest]
#[tokio::test]
async fn update_ignores_empty_fields() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_find_by_email().times(0);
    repo.expect_find_by_document().times(0);
    repo.expect_save().times(1).return_once(|_, _| Ok(()));

    let account = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            full_name: Some(String::new()),
            document: Some(String::new()),
            email: Some(String::new()),
            password: Some(String::new()),
        })
        .await
        .expect("empty fields are skipped");

    assert_eq!(account.full_name(), "Ada Lovelace");
    assert_eq!(account.cpf().digits(), "12345678901");
    assert_eq!(account.email().as_ref(), "ada@example.com");
    assert_eq!(account.password(), "fixture$secret");
}

#[rstest]
#[tokio::test]
async fn update_rejects_short_password_without_saving() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save().times(0);

    let error = make_service(repo)
        .update(UpdateAccountRequest {
            id: SENDER_ID.into(),
            password: Some("abc".into()),
            ..UpdateAccountRequest::default()
        })
        .await
        .expect_err("short password");

    assert_eq!(error.message(), "Password invalid.");
}

#[rstest]
#[tokio::test]
async fn delete_removes_existing_client() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let expected_id = stored.identity();
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_delete()
        .with(eq(expected_id))
        .times(1)
        .return_once(|_| Ok(()));

    make_service(repo)
        .delete(SENDER_ID)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_store() {
    let mut repo = MockAccountRepository::<Cnpj>::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_delete().times(0);

    let error = make_service(repo)
        .delete(SENDER_ID)
        .await
        .expect_err("missing");

    assert_eq!(error.message(), "User store not found.");
}

#[rstest]
#[case("")]
#[case("123")]
#[tokio::test]
async fn find_rejects_invalid_ids(#[case] id: &str) {
    let error = make_service(MockAccountRepository::<Cpf>::new())
        .find(id)
        .await
        .expect_err("invalid id");

    assert_eq!(error.message(), "ID invalid value.");
    assert_eq!(details_code(&error), Some("invalid_id"));
}

#[rstest]
#[case(AccountRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(AccountRepositoryError::query("syntax error"), ErrorCode::InternalError)]
#[case(AccountRepositoryError::corrupt("bad cpf"), ErrorCode::InternalError)]
#[tokio::test]
async fn find_maps_repository_failures(
    #[case] failure: AccountRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().return_once(move |_| Err(failure));

    let error = make_service(repo)
        .find(SENDER_ID)
        .await
        .expect_err("repository fails");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn list_forwards_page_request() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 0);
    let request = PageRequest::new(2, 5);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_list_all()
        .with(eq(request))
        .times(1)
        .return_once(move |request| Ok(Page::new(vec![stored], 6, request)));

    let page = make_service(repo).list(request).await.expect("list succeeds");

    assert_eq!((page.page, page.limit, page.total), (2, 5, 6));
    assert_eq!(page.data.len(), 1);
}

#[rstest]
#[tokio::test]
async fn deposit_credits_and_saves() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 1_000);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save()
        .withf(|account, read| account.balance().cents() == 3_550 && read.cents() == 1_000)
        .times(1)
        .return_once(|_, _| Ok(()));

    let account = make_service(repo)
        .deposit(DepositRequest {
            id: SENDER_ID.into(),
            amount: 25.5,
        })
        .await
        .expect("deposit succeeds");

    assert_eq!(account.balance().cents(), 3_550);
}

#[rstest]
#[tokio::test]
async fn deposit_replays_from_fresh_balance_after_conflict() {
    let reads = AtomicUsize::new(0);
    let writes = AtomicUsize::new(0);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().times(2).returning(move |_| {
        let cents = if reads.fetch_add(1, Ordering::SeqCst) == 0 {
            1_000
        } else {
            2_000
        };
        Ok(Some(stored_client(SENDER_ID, "12345678901", "ada@example.com", cents)))
    });
    repo.expect_save().times(2).returning(move |account, read| {
        if writes.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(AccountRepositoryError::conflict("balance moved"));
        }
        assert_eq!(read.cents(), 2_000);
        assert_eq!(account.balance().cents(), 4_550);
        Ok(())
    });

    let account = make_service(repo)
        .deposit(DepositRequest {
            id: SENDER_ID.into(),
            amount: 25.5,
        })
        .await
        .expect("deposit succeeds on replay");

    assert_eq!(account.balance().cents(), 4_550);
}

#[rstest]
#[tokio::test]
async fn deposit_rejects_non_positive_amount() {
    let stored = stored_client(SENDER_ID, "12345678901", "ada@example.com", 1_000);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_save().times(0);

    let error = make_service(repo)
        .deposit(DepositRequest {
            id: SENDER_ID.into(),
            amount: 0.0,
        })
        .await
        .expect_err("zero deposit");

    assert_eq!(error.message(), "Amount must be positive.");
    assert_eq!(details_code(&error), Some("invalid_balance"));
}

fn transfer_request(amount: f64) -> TransferRequest {
    TransferRequest {
        sender_id: SENDER_ID.into(),
        destination_id: RECEIVER_ID.into(),
        amount,
    }
}

fn repo_with_parties(sender_cents: i64, receiver_cents: i64) -> MockAccountRepository<Cpf> {
    let sender = stored_client(SENDER_ID, "12345678901", "ada@example.com", sender_cents);
    let receiver = stored_client(RECEIVER_ID, "10987654321", "grace@example.com", receiver_cents);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().returning(move |id| {
        Ok([&sender, &receiver]
            .into_iter()
            .find(|account| account.identity() == *id)
            .cloned())
    });
    repo
}

#[rstest]
#[tokio::test]
async fn transfer_saves_both_balances() {
    let mut repo = repo_with_parties(10_000, 0);
    repo.expect_save_transfer()
        .withf(|sender, destination, read| {
            sender.balance().cents() == 7_000
                && destination.balance().cents() == 3_000
                && read.0.cents() == 10_000
                && read.1 == Balance::ZERO
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    make_service(repo)
        .transfer(transfer_request(30.0))
        .await
        .expect("transfer succeeds");
}

#[rstest]
#[tokio::test]
async fn transfer_rejects_insufficient_balance() {
    let mut repo = repo_with_parties(10_000, 0);
    repo.expect_save_transfer().times(0);

    let error = make_service(repo)
        .transfer(transfer_request(200.0))
        .await
        .expect_err("insufficient");

    assert_eq!(error.message(), "Insufficient balance.");
}

#[rstest]
#[tokio::test]
async fn transfer_does_not_persist_failed_credit() {
    let mut repo = repo_with_parties(10_000, MAX_CENTS);
    repo.expect_save_transfer().times(0);

    let error = make_service(repo)
        .transfer(transfer_request(1.0))
        .await
        .expect_err("credit overflows");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Balance exceeds the supported range.");
}

#[rstest]
#[tokio::test]
async fn transfer_rejects_same_account() {
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id().times(0);

    let error = make_service(repo)
        .transfer(TransferRequest {
            sender_id: SENDER_ID.into(),
            destination_id: SENDER_ID.to_uppercase(),
            amount: 1.0,
        })
        .await
        .expect_err("self transfer");

    assert_eq!(error.message(), "Cannot transfer to the same account.");
}

#[rstest]
#[tokio::test]
async fn transfer_reports_missing_destination() {
    let sender = stored_client(SENDER_ID, "12345678901", "ada@example.com", 10_000);
    let mut repo = MockAccountRepository::<Cpf>::new();
    repo.expect_find_by_id()
        .with(eq(sender.identity()))
        .return_once(move |_| Ok(Some(sender)));
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(repo)
        .transfer(transfer_request(1.0))
        .await
        .expect_err("missing destination");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User client not found.");
}

#[rstest]
#[tokio::test]
async fn transfer_reports_busy_account_after_repeated_conflicts() {
    let mut repo = repo_with_parties(10_000, 0);
    repo.expect_save_transfer()
        .times(MAX_WRITE_ATTEMPTS)
        .returning(|_, _, _| Err(AccountRepositoryError::conflict("balance moved")));

    let error = make_service(repo)
        .transfer(transfer_request(30.0))
        .await
        .expect_err("account stays busy");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(details_code(&error), Some("write_conflict"));
}
