mod common;

use std::time::Duration;

use common::{find_app_error, FakePage, NEVER};
use robot_order::services::order_form::PREVIEW_BUTTON;
use robot_order::services::{submit_with_retry, RetryPolicy, SubmitOutcome};
use robot_order::{AppError, PageDriver};
use tokio::time::Instant;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 10,
        pause: Duration::from_secs(1),
        ready_timeout: Duration::from_millis(0),
    }
}

async fn prepared(page: FakePage) -> FakePage {
    // 预览点击标志着一个新订单的开始
    page.click(PREVIEW_BUTTON).await.unwrap();
    page
}

#[tokio::test(start_paused = true)]
async fn error_clearing_on_attempt_k_takes_exactly_k_attempts() {
    for k in 1..=10 {
        let page = prepared(FakePage::new().clearing_on(k)).await;
        let outcome = submit_with_retry(&page, &policy(), "1").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Accepted { attempts: k });
        assert_eq!(page.total_attempts(), k);
    }
}

#[tokio::test(start_paused = true)]
async fn never_exceeds_ten_attempts() {
    let page = prepared(FakePage::new().clearing_on(NEVER)).await;
    let outcome = submit_with_retry(&page, &policy(), "7").await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Exhausted { attempts: 10 });
    assert!(!outcome.is_accepted());
    assert_eq!(page.total_attempts(), 10);
}

#[tokio::test(start_paused = true)]
async fn pauses_one_second_between_attempts() {
    let page = prepared(FakePage::new().clearing_on(4)).await;
    let start = Instant::now();
    submit_with_retry(&page, &policy(), "1").await.unwrap();
    let elapsed = start.elapsed();

    // 4 次尝试之间有 3 次停顿
    assert!(elapsed >= Duration::from_secs(3), "elapsed: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "elapsed: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn first_attempt_success_does_not_pause() {
    let page = prepared(FakePage::new()).await;
    let start = Instant::now();
    let outcome = submit_with_retry(&page, &policy(), "1").await.unwrap();

    assert_eq!(outcome.attempts(), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn retries_wait_for_the_receipt_while_the_old_alert_is_showing() {
    let page = prepared(FakePage::new().clearing_on(3)).await;
    submit_with_retry(&page, &policy(), "1").await.unwrap();

    let receipt_or_alert = vec!["#receipt".to_string(), ".alert-danger".to_string()];
    let receipt_only = vec!["#receipt".to_string()];
    assert_eq!(
        page.waits(),
        vec![receipt_or_alert, receipt_only.clone(), receipt_only]
    );
}

#[tokio::test]
async fn missing_order_button_is_fatal_not_retried() {
    let page = prepared(FakePage::new().without("#order")).await;
    let err = submit_with_retry(&page, &policy(), "1").await.unwrap_err();

    assert!(matches!(
        find_app_error(&err),
        Some(AppError::ElementNotFound { selector }) if selector == "#order"
    ));
    assert_eq!(page.total_attempts(), 0);
}

#[tokio::test]
async fn custom_ceiling_is_respected() {
    let page = prepared(FakePage::new().clearing_on(NEVER)).await;
    let policy = RetryPolicy {
        max_attempts: 3,
        pause: Duration::ZERO,
        ready_timeout: Duration::ZERO,
    };
    let outcome = tokio_test::assert_ok!(submit_with_retry(&page, &policy, "1").await);
    assert_eq!(outcome, SubmitOutcome::Exhausted { attempts: 3 });
}
