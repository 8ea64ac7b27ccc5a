use std::sync::{Arc, Mutex};

use text_layout_harness::cases::text_layout_consistency;
use text_layout_harness::config::StageConfig;
use text_layout_harness::harness::{HarnessError, InteractiveDriver, Trigger};

#[tokio::test]
async fn rapid_triggers_are_applied_in_order() {
    let (mut harness, nodes) = text_layout_consistency::build(&StageConfig::default()).unwrap();
    harness.seek(0).unwrap();
    let harness = harness.into_shared();

    let failures = Arc::new(Mutex::new(0usize));
    let sink = failures.clone();
    let binding = InteractiveDriver::new(harness.clone()).bind(move |_| {
        *sink.lock().unwrap() += 1;
    })
    .await
    .unwrap();

    // 1, 2, 3, 4, 0, 1, 2
    for _ in 0..7 {
        assert!(binding.trigger(Trigger::Advance));
    }
    binding.drain().await;

    let h = harness.lock().await;
    assert_eq!(h.current_index(), 2);
    assert_eq!(h.entities().node(nodes.index_info).unwrap().text, "3");
    assert_eq!(*failures.lock().unwrap(), 0);
}

#[tokio::test]
async fn shutdown_without_triggers_applies_nothing() {
    let (harness, _) = text_layout_consistency::build(&StageConfig::default()).unwrap();
    let harness = harness.into_shared();
    let binding = InteractiveDriver::new(harness.clone())
        .bind(|_| {})
        .await
        .unwrap();

    assert!(binding.is_active());
    binding.shutdown().await;

    assert_eq!(harness.lock().await.current_index(), 0);
}

#[tokio::test]
async fn one_live_binding_per_harness() {
    let (harness, _) = text_layout_consistency::build(&StageConfig::default()).unwrap();
    let harness = harness.into_shared();

    let first = InteractiveDriver::new(harness.clone())
        .bind(|_| {})
        .await
        .unwrap();
    assert!(harness.lock().await.is_bound());
    assert!(matches!(
        InteractiveDriver::new(harness.clone()).bind(|_| {}).await,
        Err(HarnessError::AlreadyBound)
    ));

    drop(first);
    assert!(!harness.lock().await.is_bound());
}
