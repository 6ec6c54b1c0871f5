//! Queue Flow Integration Tests
//!
//! Drives the queue service end to end: check-in, call-next, status,
//! configure, status changes and the predictor override.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use clinicq_core::application::queue_service::{
    CheckInRequest, ConfigureRequest, UpdateStatusRequest,
};
use clinicq_core::application::{QueueRegistry, QueueService, RegistryConfig};
use clinicq_core::domain::queue::waiting_ids;
use clinicq_core::domain::{EntryStatus, Priority};
use clinicq_core::port::time_provider::SteppingTimeProvider;
use clinicq_core::port::{PredictionContext, PredictionError, WaitPrediction, WaitTimePredictor};
use clinicq_core::ErrorKind;

fn setup(config: RegistryConfig) -> QueueService {
    let clock = Arc::new(SteppingTimeProvider::new(1_700_000_000_000, 1_000));
    let registry = Arc::new(QueueRegistry::new(config, clock.clone()).unwrap());
    QueueService::new(registry, clock)
}

fn check_in(department: &str, entity_id: &str, priority: &str) -> CheckInRequest {
    CheckInRequest {
        department: department.to_string(),
        entity_id: entity_id.to_string(),
        priority: Some(priority.to_string()),
    }
}

/// Predictor that answers a fixed value and counts calls
struct FixedPredictor {
    minutes: f64,
    calls: AtomicUsize,
}

#[async_trait]
impl WaitTimePredictor for FixedPredictor {
    async fn predict(
        &self,
        _ctx: &PredictionContext,
    ) -> Result<Option<WaitPrediction>, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(WaitPrediction {
            estimated_wait_time: self.minutes,
            confidence_score: Some(0.6),
        }))
    }
}

#[tokio::test]
async fn test_cardiology_scenario() {
    let service = setup(RegistryConfig::default());

    for (id, priority) in [("A", "medium"), ("B", "emergency"), ("C", "medium")] {
        service
            .check_in(check_in("cardiology", id, priority))
            .await
            .unwrap();
    }

    {
        let queue = service.registry().get("cardiology").unwrap();
        let guard = queue.read().await;
        assert_eq!(waiting_ids(&guard), vec!["B", "A", "C"]);
    }

    let next = service.call_next("cardiology").await.unwrap();
    assert_eq!(next.entity_id, "B");
    assert_eq!(next.status, EntryStatus::InProgress);

    let a = service.status("cardiology", "A").await.unwrap();
    let c = service.status("cardiology", "C").await.unwrap();
    assert_eq!(a.position, Some(0));
    assert_eq!(a.entry.estimated_wait_time, 0);
    assert_eq!(c.position, Some(1));
    assert_eq!(c.entry.estimated_wait_time, 15);
}

#[tokio::test]
async fn test_tickets_are_monotonic_and_idempotent() {
    let service = setup(RegistryConfig::default());

    let t1 = service.check_in(check_in("er", "p1", "low")).await.unwrap();
    let t2 = service.check_in(check_in("er", "p2", "high")).await.unwrap();
    let dup = service.check_in(check_in("er", "p1", "low")).await.unwrap();
    let t3 = service.check_in(check_in("er", "p3", "medium")).await.unwrap();

    assert_eq!(
        (t1.ticket_number, t2.ticket_number, t3.ticket_number),
        (1, 2, 3)
    );
    assert_eq!(dup.ticket_number, 1);
    assert!(dup.already_checked_in);

    let snapshot = &service.list(Some("er")).await.unwrap()[0];
    assert_eq!(snapshot.current_number, 3);
    assert_eq!(snapshot.stats.waiting, 3);
}

#[tokio::test]
async fn test_strict_priority_then_fifo_service_order() {
    let service = setup(RegistryConfig::default());
    let arrivals = [
        ("l1", "low"),
        ("m1", "medium"),
        ("h1", "high"),
        ("m2", "medium"),
        ("e1", "emergency"),
        ("h2", "high"),
    ];
    for (id, p) in arrivals {
        service.check_in(check_in("er", id, p)).await.unwrap();
    }

    let mut served = Vec::new();
    while let Ok(entry) = service.call_next("er").await {
        served.push(entry.entity_id);
    }
    assert_eq!(served, vec!["e1", "h1", "h2", "m1", "m2", "l1"]);
}

#[tokio::test]
async fn test_low_priority_not_starved() {
    let service = setup(RegistryConfig::default());
    service.check_in(check_in("er", "only", "low")).await.unwrap();

    let next = service.call_next("er").await.unwrap();
    assert_eq!(next.entity_id, "only");
    assert_eq!(next.priority, Priority::Low);
}

#[tokio::test]
async fn test_configure_changes_estimates() {
    let service = setup(RegistryConfig::default());
    service.check_in(check_in("er", "p1", "high")).await.unwrap();
    service.check_in(check_in("er", "p2", "high")).await.unwrap();
    service.check_in(check_in("er", "p3", "high")).await.unwrap();
    service.check_in(check_in("er", "p4", "high")).await.unwrap();

    // round(3 * 15 * 0.8)
    assert_eq!(
        service.status("er", "p4").await.unwrap().entry.estimated_wait_time,
        36
    );

    let snapshot = service
        .configure(ConfigureRequest {
            department: "er".to_string(),
            average_wait_time: 10.0,
        })
        .await
        .unwrap();
    assert_eq!(snapshot.average_wait_time, 10);
    assert_eq!(
        service.status("er", "p4").await.unwrap().entry.estimated_wait_time,
        24
    );
}

#[tokio::test]
async fn test_no_show_and_completion() {
    let service = setup(RegistryConfig::default());
    service.check_in(check_in("er", "p1", "medium")).await.unwrap();
    service.check_in(check_in("er", "p2", "medium")).await.unwrap();

    let gone = service
        .update_status(UpdateStatusRequest {
            department: "er".to_string(),
            entity_id: "p1".to_string(),
            status: "no-show".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(gone.entry.status, EntryStatus::NoShow);

    let p2 = service.status("er", "p2").await.unwrap();
    assert_eq!(p2.position, Some(0));
    assert_eq!(p2.entry.estimated_wait_time, 0);

    service.call_next("er").await.unwrap();
    let err = service
        .update_status(UpdateStatusRequest {
            department: "er".to_string(),
            entity_id: "p2".to_string(),
            status: "no-show".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    service
        .update_status(UpdateStatusRequest {
            department: "er".to_string(),
            entity_id: "p2".to_string(),
            status: "completed".to_string(),
        })
        .await
        .unwrap();

    let snapshot = &service.list(Some("er")).await.unwrap()[0];
    assert_eq!(snapshot.stats.completed, 1);
    assert_eq!(snapshot.stats.no_show, 1);
    assert_eq!(snapshot.stats.waiting, 0);
}

#[tokio::test]
async fn test_strict_registry() {
    let service = setup(RegistryConfig {
        allow_implicit_departments: false,
        ..Default::default()
    });

    let err = service
        .check_in(check_in("cardiology", "p1", "low"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    service.registry().register("cardiology").unwrap();
    assert!(service
        .check_in(check_in("cardiology", "p1", "low"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_invalid_priority_has_no_effect() {
    let service = setup(RegistryConfig::default());
    let err = service
        .check_in(check_in("er", "p1", "whenever"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPriority);
    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn test_predictor_override_initial_only() {
    let predictor = Arc::new(FixedPredictor {
        minutes: 42.0,
        calls: AtomicUsize::new(0),
    });
    let service = setup(RegistryConfig::default()).with_predictor(predictor.clone());

    let first = service.check_in(check_in("er", "p1", "low")).await.unwrap();
    assert_eq!(first.estimated_wait_time, 42);

    // duplicate does not consult the predictor
    service.check_in(check_in("er", "p1", "low")).await.unwrap();
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);

    service.check_in(check_in("er", "p2", "low")).await.unwrap();
    assert_eq!(
        service.status("er", "p1").await.unwrap().entry.estimated_wait_time,
        0
    );
    assert_eq!(
        service.status("er", "p2").await.unwrap().entry.estimated_wait_time,
        42
    );

    service.call_next("er").await.unwrap();
    assert_eq!(
        service.status("er", "p2").await.unwrap().entry.estimated_wait_time,
        0
    );
}
