//! Integration tests for the command intake → dispatch → ack pipeline.
//!
//! These run on the host and verify the full chain from a raw broker
//! frame through handler execution down to the correlated status result,
//! including the LED blink scenario the device examples ship with.

use crate::mock_platform::{MockBroker, MockOutput};

use cloudlink::app::blink::{Blinker, parse_count};
use cloudlink::command::status::{CommandStatus, STATUS_BAD_REQUEST};
use cloudlink::command::{
    CommandDispatcher, CommandEnvelope, CommandInvocation, DispatchOutcome, StatusReporter,
};
use cloudlink::{Error, TransportError};

// ── Device context the handlers mutate ───────────────────────

struct DeviceCtx {
    blinker: Blinker,
    led: MockOutput,
}

impl DeviceCtx {
    fn new() -> Self {
        Self {
            blinker: Blinker::new(500),
            led: MockOutput::new(),
        }
    }
}

fn led_handler(ctx: &mut DeviceCtx, inv: &CommandInvocation<'_>) -> CommandStatus {
    ctx.blinker.command(parse_count(inv.payload), &mut ctx.led);
    CommandStatus::ok()
}

fn reject_handler(_ctx: &mut DeviceCtx, _inv: &CommandInvocation<'_>) -> CommandStatus {
    CommandStatus::new(STATUS_BAD_REQUEST, "unsupported while provisioning")
}

fn make_dispatcher() -> CommandDispatcher<DeviceCtx> {
    let mut dispatcher = CommandDispatcher::new(4);
    dispatcher.register("LED", led_handler).unwrap();
    dispatcher
}

// ── LED scenario: "3" → 6 toggles at ~500 ms, settling LOW ───

#[test]
fn led_command_blinks_doubled_count_then_settles_off() {
    let mut dispatcher = make_dispatcher();
    let mut ctx = DeviceCtx::new();
    let mut reporter = StatusReporter::new();
    let mut broker = MockBroker::new();

    let frame = br#"{"id":"17","name":"LED","payload":"3"}"#;
    let envelope = CommandEnvelope::from_json(frame).unwrap();
    let outcome = dispatcher
        .handle_incoming(&mut ctx, &envelope, &mut reporter, &mut broker)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Dispatched);

    // Exactly one ack, correlated by id, code 200 / "Ok".
    assert_eq!(broker.statuses.len(), 1);
    assert_eq!(
        broker.statuses[0],
        r#"{"name":"LED","id":"17","payload":"3","code":200,"message":"Ok"}"#
    );

    // Drive the 200 ms loop for 5 simulated seconds.
    for step in 0..25u64 {
        let now = step * 200;
        ctx.led.now_ms = now;
        ctx.blinker.tick(now, &mut ctx.led);
    }

    let levels: Vec<bool> = ctx.led.writes.iter().map(|(_, on)| *on).collect();
    assert_eq!(levels, [true, false, true, false, true, false]);
    let times: Vec<u64> = ctx.led.writes.iter().map(|(at, _)| *at).collect();
    assert_eq!(times, [0, 600, 1200, 1800, 2400, 3000]);
    assert!(!ctx.blinker.is_active(), "sequence exhausted");
    assert!(!ctx.led.level(), "stabilizes LOW");
}

#[test]
fn led_zero_and_one_set_level_without_blinking() {
    let mut dispatcher = make_dispatcher();
    let mut ctx = DeviceCtx::new();
    let mut reporter = StatusReporter::new();
    let mut broker = MockBroker::new();

    let on = CommandEnvelope::new("1", "LED", "1").unwrap();
    dispatcher
        .handle_incoming(&mut ctx, &on, &mut reporter, &mut broker)
        .unwrap();
    assert!(ctx.led.level());
    assert!(!ctx.blinker.is_active());

    let off = CommandEnvelope::new("2", "LED", "0").unwrap();
    dispatcher
        .handle_incoming(&mut ctx, &off, &mut reporter, &mut broker)
        .unwrap();
    assert!(!ctx.led.level());
    assert_eq!(broker.statuses.len(), 2);
}

// ── Unknown command: acked, never dispatched ─────────────────

#[test]
fn unknown_command_is_acked_not_dropped() {
    let mut dispatcher = make_dispatcher();
    let mut ctx = DeviceCtx::new();
    let mut reporter = StatusReporter::new();
    let mut broker = MockBroker::new();

    let envelope = CommandEnvelope::new("3", "REBOOT", "now").unwrap();
    let outcome = dispatcher
        .handle_incoming(&mut ctx, &envelope, &mut reporter, &mut broker)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Unrecognized);
    assert!(ctx.led.writes.is_empty(), "no handler side effects");
    assert_eq!(broker.statuses.len(), 1, "must be emitted, not dropped");
    assert!(broker.statuses[0].contains(r#""code":404"#));
    assert!(broker.statuses[0].contains(r#""id":"3""#));
}

// ── Handler-reported failure codes pass through ──────────────

#[test]
fn handler_failure_code_reaches_the_broker() {
    let mut dispatcher = make_dispatcher();
    dispatcher.register("CONFIG", reject_handler).unwrap();
    let mut ctx = DeviceCtx::new();
    let mut reporter = StatusReporter::new();
    let mut broker = MockBroker::new();

    let envelope = CommandEnvelope::new("4", "CONFIG", "{}").unwrap();
    dispatcher
        .handle_incoming(&mut ctx, &envelope, &mut reporter, &mut broker)
        .unwrap();

    assert!(broker.statuses[0].contains(r#""code":400"#));
    assert!(broker.statuses[0].contains("unsupported while provisioning"));
}

// ── Ack transport failure: surfaced, command not re-run ──────

#[test]
fn ack_failure_is_surfaced_without_redispatch() {
    let mut dispatcher = make_dispatcher();
    let mut ctx = DeviceCtx::new();
    let mut reporter = StatusReporter::new();
    let mut broker = MockBroker {
        fail_statuses: true,
        ..MockBroker::new()
    };

    let envelope = CommandEnvelope::new("5", "LED", "2").unwrap();
    let err = dispatcher
        .handle_incoming(&mut ctx, &envelope, &mut reporter, &mut broker)
        .unwrap_err();

    assert_eq!(err, Error::Transport(TransportError::PublishFailed));
    // The handler ran exactly once; nothing re-executes it.
    assert_eq!(ctx.blinker.remaining(), 4);
    assert_eq!(dispatcher.dispatched_total(), 1);
    assert_eq!(reporter.sent_total(), 0);
}

// ── Raw frame parsing feeds dispatch ─────────────────────────

#[test]
fn malformed_frame_never_reaches_dispatch() {
    let err = CommandEnvelope::from_json(b"{\"id\":17}").unwrap_err();
    assert_eq!(err, Error::Wire("malformed command envelope"));
}
