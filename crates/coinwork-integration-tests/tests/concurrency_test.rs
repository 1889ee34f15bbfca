//! Concurrency tests for contended marketplace operations.
//!
//! Exercises the invariants that matter under racing requests:
//! 1. A task with N slots accepts at most N concurrent submissions
//! 2. Racing approvals of one submission credit the worker once
//! 3. Racing approvals of one withdrawal debit the worker once
//! 4. Replayed payment confirmations credit once

use std::sync::Arc;
use std::thread;

use coinwork_core::{Identity, Role};
use coinwork_market::{MarketError, MarketService};

fn seeded_service() -> Arc<MarketService> {
    let service = Arc::new(MarketService::in_memory());
    service
        .register("b@x.com", "Bea", "Buyer", None, None)
        .unwrap();
    service
        .register("w@x.com", "Wes", "Worker", None, None)
        .unwrap();
    service
}

#[test]
fn concurrent_submissions_never_oversubscribe_a_task() {
    let service = seeded_service();
    for i in 0..8 {
        service
            .register(&format!("w{i}@x.com"), "W", "Worker", None, None)
            .unwrap();
    }
    let task = service
        .create_task("b@x.com", "t", "d", 5, 3, None)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            let task_id = task.id.clone();
            thread::spawn(move || service.submit_work(&task_id, &format!("w{i}@x.com"), "done"))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let accepted = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(accepted, 3);
    for result in results.iter().filter(|result| result.is_err()) {
        assert!(matches!(
            result.as_ref().unwrap_err(),
            MarketError::TaskExhausted(_)
        ));
    }
    assert_eq!(service.task(&task.id).unwrap().required_workers, 0);
}

#[test]
fn racing_approvals_credit_the_worker_once() {
    let service = seeded_service();
    let task = service
        .create_task("b@x.com", "t", "d", 5, 1, None)
        .unwrap();
    let submission = service.submit_work(&task.id, "w@x.com", "done").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let submission_id = submission.id.clone();
            thread::spawn(move || service.approve_submission(&submission_id))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(service.account("w@x.com").unwrap().coin, 15);
}

#[test]
fn racing_withdrawal_approvals_debit_once() {
    let service = seeded_service();
    let withdrawal = service
        .request_withdrawal("w@x.com", "Wes", 8, 40, "bkash", "017")
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let withdrawal_id = withdrawal.id.clone();
            thread::spawn(move || {
                let admin = Identity::new("a@x.com", Role::Admin);
                service.approve_withdrawal(&admin, &withdrawal_id)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(service.account("w@x.com").unwrap().coin, 2);
}

#[test]
fn replayed_payment_confirmations_credit_once() {
    let service = seeded_service();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.record_payment("b@x.com", 100, 1000, "txn_race"))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(service.account("b@x.com").unwrap().coin, 150);
    assert_eq!(service.payment_history("b@x.com").len(), 1);
}

#[test]
fn mixed_credit_and_debit_traffic_balances_out() {
    let service = seeded_service();
    let task = service
        .create_task("b@x.com", "t", "d", 1, 40, None)
        .unwrap();

    let submissions: Vec<_> = (0..40)
        .map(|i| {
            service
                .submit_work(&task.id, "w@x.com", &format!("item {i}"))
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = submissions
        .into_iter()
        .enumerate()
        .map(|(i, submission)| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                if i % 2 == 0 {
                    service.approve_submission(&submission.id).map(|_| ())
                } else {
                    service.reject_submission(&submission.id).map(|_| ())
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // 20 approvals at 1 coin each on top of the starting 10.
    assert_eq!(service.account("w@x.com").unwrap().coin, 30);
    // 20 rejected slots returned to the task.
    assert_eq!(service.task(&task.id).unwrap().required_workers, 20);
}
