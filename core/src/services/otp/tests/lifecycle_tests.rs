//! Tests for the OTP lifecycle: issuance, cooldown, verification, lockout
//! and rollback.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use crate::domain::entities::otp_code::{OtpPurpose, OtpStatus};
use crate::errors::DomainError;
use crate::repositories::{InMemoryLockoutRepository, InMemoryOtpRepository, OtpRepository};
use crate::services::clock::{Clock, FixedClock};
use crate::services::otp::{IssueOutcome, OtpConfig, OtpLifecycle, VerifyOutcome};

use super::mocks::{wrong_code, MockEmailService};

struct Fixture {
    lifecycle: OtpLifecycle<
        InMemoryOtpRepository,
        InMemoryLockoutRepository,
        MockEmailService,
        FixedClock,
    >,
    otp_repo: Arc<InMemoryOtpRepository>,
    email: Arc<MockEmailService>,
    clock: Arc<FixedClock>,
}

fn fixture_with(config: OtpConfig) -> Fixture {
    let otp_repo = Arc::new(InMemoryOtpRepository::new());
    let lockouts = Arc::new(InMemoryLockoutRepository::new());
    let email = Arc::new(MockEmailService::new());
    let clock = Arc::new(FixedClock::at_now());
    let lifecycle = OtpLifecycle::new(
        otp_repo.clone(),
        lockouts,
        email.clone(),
        clock.clone(),
        config,
    );
    Fixture {
        lifecycle,
        otp_repo,
        email,
        clock,
    }
}

fn fixture() -> Fixture {
    fixture_with(OtpConfig::default())
}

const ALICE: &str = "alice@example.com";

#[tokio::test]
async fn test_issue_sends_six_digit_code_and_stores_hash() {
    let fx = fixture();

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };

    let sent = fx.email.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, ALICE);
    assert_eq!(sent[0].code.len(), 6);
    assert!(sent[0].code.chars().all(|c| c.is_ascii_digit()));

    let record = fx.otp_repo.get(issued.otp_id).await.unwrap();
    assert_eq!(record.status, OtpStatus::Active);
    assert_ne!(record.code_hash, sent[0].code);
    assert_eq!(record.expires_at, fx.clock.now() + Duration::minutes(5));
}

#[tokio::test]
async fn test_resend_inside_cooldown_is_blocked_without_side_effects() {
    let fx = fixture();

    fx.lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    fx.clock.advance(Duration::seconds(10));

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    match outcome {
        IssueOutcome::Blocked {
            retry_after_seconds,
        } => assert_eq!(retry_after_seconds, 50),
        other => panic!("expected Blocked, got {:?}", other),
    }

    // Nothing was stored or sent for the refused request
    assert_eq!(fx.otp_repo.len().await, 1);
    assert_eq!(fx.email.sent().await.len(), 1);

    // The original code is still perfectly verifiable
    let code = fx.email.last_code().await.unwrap();
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert!(verified.is_success());
}

#[tokio::test]
async fn test_resend_after_cooldown_supersedes_old_code() {
    let fx = fixture();

    fx.lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let old_code = fx.email.last_code().await.unwrap();

    fx.clock.advance(Duration::seconds(61));
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    assert!(outcome.is_sent());

    // Exactly one active record remains
    assert_eq!(fx.otp_repo.len().await, 2);
    let active = fx
        .otp_repo
        .find_active(ALICE, OtpPurpose::Signup)
        .await
        .unwrap()
        .unwrap();
    let new_code = fx.email.last_code().await.unwrap();
    assert!(active.matches(&new_code));

    // The superseded code no longer verifies
    if old_code != new_code {
        let verified = fx
            .lifecycle
            .verify(ALICE, OtpPurpose::Signup, &old_code)
            .await
            .unwrap();
        assert_eq!(verified, VerifyOutcome::InvalidCode);
    }

    // The replacement still does
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &new_code)
        .await
        .unwrap();
    assert!(verified.is_success());
}

#[tokio::test]
async fn test_purposes_do_not_share_cooldowns_or_codes() {
    let fx = fixture();

    fx.lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let signup_code = fx.email.last_code().await.unwrap();

    // A password-reset request right away is not throttled by the signup one
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::PasswordReset, None)
        .await
        .unwrap();
    assert!(outcome.is_sent());

    // The signup code does not verify the reset purpose
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::PasswordReset, &signup_code)
        .await
        .unwrap();
    let reset_code = fx.email.last_code().await.unwrap();
    if signup_code != reset_code {
        assert_eq!(verified, VerifyOutcome::InvalidCode);
    }
}

#[tokio::test]
async fn test_verify_success_consumes_the_code_exactly_once() {
    let fx = fixture();

    let payload = json!({"first_name": "Alice"});
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, Some(payload.clone()))
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };
    let code = fx.email.last_code().await.unwrap();

    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert_eq!(
        verified,
        VerifyOutcome::Success {
            payload: Some(payload)
        }
    );

    let record = fx.otp_repo.get(issued.otp_id).await.unwrap();
    assert_eq!(record.status, OtpStatus::Consumed);

    // Replaying the same code finds no active record
    let replayed = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert_eq!(replayed, VerifyOutcome::InvalidCode);
}

#[tokio::test]
async fn test_wrong_guess_costs_an_attempt_but_true_code_still_works() {
    let fx = fixture();

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };
    let code = fx.email.last_code().await.unwrap();

    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, wrong_code(&code))
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::InvalidCode);
    assert_eq!(fx.otp_repo.get(issued.otp_id).await.unwrap().attempts, 1);

    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert!(verified.is_success());
}

#[tokio::test]
async fn test_fifth_wrong_guess_locks_the_code_for_good() {
    let fx = fixture();

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };
    let code = fx.email.last_code().await.unwrap();
    let wrong = wrong_code(&code);

    for _ in 0..4 {
        let verified = fx
            .lifecycle
            .verify(ALICE, OtpPurpose::Signup, wrong)
            .await
            .unwrap();
        assert_eq!(verified, VerifyOutcome::InvalidCode);
    }

    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, wrong)
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::AttemptsExceeded);
    assert_eq!(
        fx.otp_repo.get(issued.otp_id).await.unwrap().status,
        OtpStatus::Locked
    );

    // Even the true code is refused once the record is locked
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::AttemptsExceeded);

    // A fresh code can still be requested once the cooldown allows
    fx.clock.advance(Duration::seconds(61));
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    assert!(outcome.is_sent());
    let fresh = fx.email.last_code().await.unwrap();
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &fresh)
        .await
        .unwrap();
    assert!(verified.is_success());
}

#[tokio::test]
async fn test_expired_code_reports_expired_even_when_correct() {
    let fx = fixture();

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::PasswordReset, None)
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };
    let code = fx.email.last_code().await.unwrap();

    fx.clock.advance(Duration::minutes(5) + Duration::seconds(1));
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::PasswordReset, &code)
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::Expired);
    assert_eq!(
        fx.otp_repo.get(issued.otp_id).await.unwrap().status,
        OtpStatus::Expired
    );
}

#[tokio::test]
async fn test_malformed_submission_costs_no_attempt() {
    let fx = fixture();

    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let issued = match outcome {
        IssueOutcome::Sent(issued) => issued,
        other => panic!("expected Sent, got {:?}", other),
    };

    for bad in ["12345", "1234567", "12345a", "", "......"] {
        let verified = fx
            .lifecycle
            .verify(ALICE, OtpPurpose::Signup, bad)
            .await
            .unwrap();
        assert_eq!(verified, VerifyOutcome::InvalidCode);
    }
    assert_eq!(fx.otp_repo.get(issued.otp_id).await.unwrap().attempts, 0);
}

#[tokio::test]
async fn test_verify_without_any_code_is_invalid() {
    let fx = fixture();
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, "123456")
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::InvalidCode);
}

#[tokio::test]
async fn test_notifier_failure_rolls_the_record_back() {
    let fx = fixture();
    fx.email.set_should_fail(true).await;

    let result = fx.lifecycle.issue(ALICE, OtpPurpose::Signup, None).await;
    assert!(matches!(result, Err(DomainError::Notification { .. })));
    assert_eq!(fx.otp_repo.len().await, 0);

    // The failed attempt left no cooldown behind; a retry works immediately
    fx.email.set_should_fail(false).await;
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    assert!(outcome.is_sent());
}

#[tokio::test]
async fn test_identity_lockout_survives_reissued_codes() {
    let fx = fixture_with(OtpConfig {
        identity_lockout_enabled: true,
        ..OtpConfig::default()
    });

    fx.lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let code = fx.email.last_code().await.unwrap();
    let wrong = wrong_code(&code);

    // Three failures against the first code
    for _ in 0..3 {
        fx.lifecycle
            .verify(ALICE, OtpPurpose::Signup, wrong)
            .await
            .unwrap();
    }

    // A fresh code resets the per-record counter but not the identity's
    fx.clock.advance(Duration::seconds(61));
    fx.lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    let code = fx.email.last_code().await.unwrap();
    let wrong = wrong_code(&code);

    fx.lifecycle
        .verify(ALICE, OtpPurpose::Signup, wrong)
        .await
        .unwrap();
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, wrong)
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::InvalidCode);

    // Fifth cross-code failure locked the identity; even the true code fails
    let verified = fx
        .lifecycle
        .verify(ALICE, OtpPurpose::Signup, &code)
        .await
        .unwrap();
    assert_eq!(verified, VerifyOutcome::AttemptsExceeded);

    // And issuance is refused while the lock holds
    fx.clock.advance(Duration::seconds(61));
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    assert!(matches!(outcome, IssueOutcome::Locked { .. }));

    // The lock lapses after its window
    fx.clock.advance(Duration::minutes(15));
    let outcome = fx
        .lifecycle
        .issue(ALICE, OtpPurpose::Signup, None)
        .await
        .unwrap();
    assert!(outcome.is_sent());
}
