//! Integration tests for the registry → publisher → transport pipeline.
//!
//! These run on the host and verify the full attribute-sync chain from an
//! application write down to the serialized broker frame, including the
//! connectivity and cadence gates.

use crate::mock_platform::{MockBroker, MockLink};

use cloudlink::app::ports::DeviceMode;
use cloudlink::app::service::{SyncService, TickOutcome};
use cloudlink::config::SyncConfig;
use cloudlink::state::{Value, ValueType};
use cloudlink::{Error, RegistryError};

fn make_service(config: &SyncConfig) -> (SyncService, MockLink, MockBroker) {
    let svc = SyncService::new(config).unwrap();
    (svc, MockLink::up(), MockBroker::new())
}

// ── Capacity scenario: telemetry capped at 2 ─────────────────

#[test]
fn third_distinct_key_fails_leaving_first_two_dirty() {
    let config = SyncConfig {
        max_telemetry_elements: 2,
        ..SyncConfig::default()
    };
    let (mut svc, link, mut broker) = make_service(&config);

    svc.update_telemetry("temp", Value::Int(22), 100).unwrap();
    svc.update_telemetry("hum", Value::Float(48.5), 100).unwrap();

    let err = svc
        .update_telemetry("pressure", Value::Int(1013), 120)
        .unwrap_err();
    assert_eq!(err, Error::Registry(RegistryError::CapacityExceeded));

    assert_eq!(svc.telemetry().len(), 2);
    assert_eq!(svc.telemetry().dirty_count(), 2);

    // Both survivors go out on the next tick, the phantom key never does.
    let outcome = svc.tick(200, &link, &mut broker).unwrap();
    assert_eq!(outcome, TickOutcome::Published { records: 2 });
    assert!(broker.updates.iter().any(|f| f.contains("\"temp\"")));
    assert!(broker.updates.iter().any(|f| f.contains("\"hum\"")));
    assert!(!broker.updates.iter().any(|f| f.contains("pressure")));
}

// ── Disconnected window: held back, then flushed ─────────────

#[test]
fn updates_during_outage_flush_on_reconnect() {
    let (mut svc, mut link, mut broker) = make_service(&SyncConfig::default());

    link.connected = false;
    svc.update_telemetry("temp", Value::Int(20), 0).unwrap();
    assert_eq!(svc.tick(0, &link, &mut broker).unwrap(), TickOutcome::LinkDown);

    // More churn while offline — only the latest value matters.
    svc.update_telemetry("temp", Value::Int(25), 3000).unwrap();
    svc.update_telemetry("hum", Value::Float(51.0), 3200).unwrap();
    assert_eq!(
        svc.tick(3400, &link, &mut broker).unwrap(),
        TickOutcome::LinkDown
    );
    assert!(broker.updates.is_empty());

    link.connected = true;
    let outcome = svc.tick(4000, &link, &mut broker).unwrap();
    assert_eq!(outcome, TickOutcome::Published { records: 2 });
    assert!(
        broker
            .updates
            .iter()
            .any(|f| f.contains("\"temp\"") && f.contains(":25")),
        "reconnect flush carries the latest offline value: {:?}",
        broker.updates
    );
}

// ── Periodic cadence over a simulated session ────────────────

#[test]
fn five_second_cadence_over_simulated_session() {
    let (mut svc, link, mut broker) = make_service(&SyncConfig::default());

    // Refresh readings once per publish window, tick every 200 ms for 20 s.
    let mut temp = 20;
    let mut published_ticks = Vec::new();
    svc.update_telemetry("temp", Value::Int(temp), 0).unwrap();

    for step in 0..100u64 {
        let now = step * 200;
        match svc.tick(now, &link, &mut broker).unwrap() {
            TickOutcome::Published { records } => {
                assert_eq!(records, 1);
                published_ticks.push(now);
                temp += 1;
                svc.update_telemetry("temp", Value::Int(temp), now).unwrap();
            }
            TickOutcome::NotDue => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    // t=0 plus every 5000 ms afterwards.
    assert_eq!(published_ticks, [0, 5000, 10000, 15000]);
    assert_eq!(broker.updates.len(), 4);
    assert_eq!(svc.published_total(), 4);
}

// ── Metadata: registration, observation, separate space ──────

#[test]
fn observed_metadata_fires_hook_and_publishes() {
    use std::sync::atomic::{AtomicU32, Ordering};
    static FIRES: AtomicU32 = AtomicU32::new(0);
    fn on_change(_key: &str, _value: &Value) {
        FIRES.fetch_add(1, Ordering::Relaxed);
    }

    let (mut svc, link, mut broker) = make_service(&SyncConfig::default());

    svc.register_metadata_observed("testMeta", ValueType::Text, on_change)
        .unwrap();
    assert_eq!(FIRES.load(Ordering::Relaxed), 0);
    assert_eq!(svc.metadata().dirty_count(), 0, "pre-declared, not dirty");

    svc.update_metadata("testMeta", Value::text("provisioned").unwrap(), 50)
        .unwrap();
    assert_eq!(FIRES.load(Ordering::Relaxed), 1);

    let outcome = svc.tick(100, &link, &mut broker).unwrap();
    assert_eq!(outcome, TickOutcome::Published { records: 1 });
    assert!(broker.updates[0].contains("testMeta"));
    assert!(broker.updates[0].contains("provisioned"));
}

#[test]
fn boot_metadata_snapshot_goes_out_with_first_flush() {
    let (mut svc, link, mut broker) = make_service(&SyncConfig::default());

    // First-run block: platform string + boot timestamp.
    svc.update_metadata("platform", Value::text("ESP32").unwrap(), 0)
        .unwrap();
    svc.update_metadata("bootTime", Value::Int(0), 0).unwrap();
    svc.update_telemetry("temp", Value::Int(20), 0).unwrap();

    let outcome = svc.tick(0, &link, &mut broker).unwrap();
    assert_eq!(outcome, TickOutcome::Published { records: 3 });
    assert!(broker.updates.iter().any(|f| f.contains("ESP32")));
}

// ── Mode gate ────────────────────────────────────────────────

#[test]
fn provisioning_mode_suspends_sync_without_losing_state() {
    let (mut svc, mut link, mut broker) = make_service(&SyncConfig::default());
    link.mode = DeviceMode::Provisioning;

    svc.update_telemetry("temp", Value::Int(20), 0).unwrap();
    assert_eq!(
        svc.tick(0, &link, &mut broker).unwrap(),
        TickOutcome::ModeGated(DeviceMode::Provisioning)
    );
    assert!(broker.updates.is_empty());

    link.mode = DeviceMode::Normal;
    assert_eq!(
        svc.tick(200, &link, &mut broker).unwrap(),
        TickOutcome::Published { records: 1 }
    );
}
