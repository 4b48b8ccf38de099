//! End-to-end link tests: bytes in, hardware effects and wire bytes out.

use uartrpc::app::commands::{CommandEntry, Dispatch, OutputId, SensorId};
use uartrpc::app::events::LinkEvent;
use uartrpc::config::{LinkConfig, UnknownCommandPolicy};
use uartrpc::error::{Error, FrameError};
use uartrpc::rpc::codec::DecoderState;
use uartrpc::rpc::engine::{FrameOutcome, RpcEngine};
use uartrpc::rpc::packet::{Packet, Response};

use crate::mock_hw::{MockBoard, RecordingSink, Wire};

const ACK: u8 = 0x06;
const NACK: u8 = 0x15;

fn frame(command_id: u8, payload: &[u8]) -> Vec<u8> {
    Packet::new(command_id, payload).unwrap().encode().to_vec()
}

struct Rig {
    engine: RpcEngine,
    board: MockBoard,
    sink: RecordingSink,
    wire: Wire,
}

impl Rig {
    fn new(config: LinkConfig) -> Self {
        Self {
            engine: RpcEngine::new(&config),
            board: MockBoard::new(),
            sink: RecordingSink::default(),
            wire: Wire::default(),
        }
    }

    fn feed_at(&mut self, bytes: &[u8], now_ms: u64) -> usize {
        self.engine
            .process_bytes(bytes, now_ms, &mut self.board, &mut self.sink, &mut self.wire)
            .unwrap()
    }

    fn feed(&mut self, bytes: &[u8]) -> usize {
        self.feed_at(bytes, 0)
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new(LinkConfig::default())
    }
}

// ── Reference scenarios ───────────────────────────────────────

#[test]
fn led_on_frame_is_applied_and_acked() {
    let mut rig = Rig::default();
    assert_eq!(rig.feed(&[0xAA, 0x01, 0x01, 0x01, 0xAD]), 1);
    assert!(rig.board.led);
    assert_eq!(rig.wire.take(), vec![ACK]);
    assert_eq!(rig.wire.flushes, 1);
}

#[test]
fn led_off_frame_clears_led() {
    let mut rig = Rig::default();
    rig.feed(&frame(0x01, &[1]));
    rig.feed(&frame(0x01, &[0]));
    assert!(!rig.board.led);
    assert_eq!(rig.board.set_calls, vec![(OutputId::StatusLed, true), (OutputId::StatusLed, false)]);
}

#[test]
fn corrupted_checksum_is_nacked_without_side_effect() {
    let mut rig = Rig::default();
    rig.feed(&[0xAA, 0x01, 0x01, 0x01, 0x00]);
    assert!(rig.board.untouched());
    assert_eq!(rig.wire.take(), vec![NACK]);
    assert_eq!(rig.engine.stats().checksum_rejects, 1);
}

#[test]
fn oversized_length_is_nacked_on_the_length_byte() {
    let mut rig = Rig::default();
    rig.feed(&[0xAA, 0x01]);
    assert!(rig.wire.sent.is_empty());
    rig.feed(&[0x0B]);
    assert_eq!(rig.wire.take(), vec![NACK]);
    assert!(rig.engine.decoder().is_idle());
    assert_eq!(rig.engine.stats().length_rejects, 1);

    // Leftover payload bytes are treated as noise; the next frame still works.
    rig.feed(&[0x01, 0x02]);
    rig.feed(&frame(0x01, &[1]));
    assert!(rig.board.led);
    assert_eq!(rig.wire.take(), vec![ACK]);
}

#[test]
fn temperature_request_replies_before_ack() {
    let mut rig = Rig::default();
    rig.feed(&[0xAA, 0x03, 0x00, 0xAD]);
    assert_eq!(
        rig.wire.take(),
        vec![0xAA, 0x03, 0x04, 0x00, 0x00, 0xCC, 0x41, 0xBE, ACK]
    );
    assert_eq!(rig.engine.stats().replies_sent, 1);
    assert!(rig.sink.events.contains(&LinkEvent::ReplySent {
        command_id: 0x03,
        value: 25.5,
    }));
}

// ── Framing robustness ────────────────────────────────────────

#[test]
fn leading_noise_is_counted_and_skipped() {
    let mut rig = Rig::default();
    let mut bytes = vec![0x00, 0xFF, 0x13];
    bytes.extend(frame(0x01, &[1]));
    assert_eq!(rig.feed(&bytes), 1);
    assert!(rig.board.led);
    assert_eq!(rig.engine.stats().noise_bytes, 3);
    assert_eq!(rig.engine.stats().bytes_received, 8);
}

#[test]
fn back_to_back_frames_in_one_read() {
    let mut rig = Rig::default();
    let mut bytes = frame(0x01, &[1]);
    bytes.extend(frame(0x03, &[]));
    assert_eq!(rig.feed(&bytes), 2);

    let sent = rig.wire.take();
    assert_eq!(sent[0], ACK);
    assert_eq!(&sent[1..], &[0xAA, 0x03, 0x04, 0x00, 0x00, 0xCC, 0x41, 0xBE, ACK]);
}

#[test]
fn frame_split_across_reads_is_reassembled() {
    let mut rig = Rig::default();
    let bytes = frame(0x01, &[1]);
    for b in &bytes[..4] {
        assert_eq!(rig.feed(core::slice::from_ref(b)), 0);
    }
    assert!(rig.wire.sent.is_empty());
    assert_eq!(rig.feed(&bytes[4..]), 1);
    assert_eq!(rig.wire.take(), vec![ACK]);
}

#[test]
fn empty_setter_payload_is_acked_without_effect() {
    let mut rig = Rig::default();
    rig.feed(&[0xAA, 0x01, 0x00, 0xAB]);
    assert!(rig.board.untouched());
    assert_eq!(rig.wire.take(), vec![ACK]);
    assert!(rig
        .sink
        .events
        .contains(&LinkEvent::MissingArgument { command_id: 0x01 }));
}

// ── Unknown commands ──────────────────────────────────────────

#[test]
fn unknown_command_is_acked_by_default() {
    let mut rig = Rig::default();
    rig.feed(&frame(0x09, &[]));
    assert_eq!(rig.wire.take(), vec![ACK]);
    assert!(rig.board.untouched());
    assert_eq!(rig.engine.stats().unknown_commands, 1);
}

#[test]
fn unknown_command_nack_policy() {
    let mut rig = Rig::new(LinkConfig {
        unknown_command: UnknownCommandPolicy::Nack,
        ..LinkConfig::default()
    });
    rig.feed(&frame(0x09, &[7]));
    assert_eq!(rig.wire.take(), vec![NACK]);
    assert!(rig.sink.events.contains(&LinkEvent::UnknownCommand {
        command_id: 0x09,
        nacked: true,
    }));
}

// ── Command table ─────────────────────────────────────────────

#[test]
fn registered_commands_dispatch_through_the_engine() {
    let mut rig = Rig::default();
    rig.engine
        .commands_mut()
        .register(CommandEntry::setter(0x10, OutputId::StatusLed))
        .unwrap();
    rig.engine
        .commands_mut()
        .register(CommandEntry::getter(0x20, SensorId::Temperature, 0x21))
        .unwrap();

    rig.feed(&frame(0x10, &[1]));
    assert!(rig.board.led);
    assert_eq!(rig.wire.take(), vec![ACK]);

    rig.board.temperature = -4.0;
    rig.feed(&frame(0x20, &[]));
    let mut expected = Packet::from_f32(0x21, -4.0).encode().to_vec();
    expected.push(ACK);
    assert_eq!(rig.wire.take(), expected);
}

#[test]
fn single_byte_outcomes_are_reported() {
    let mut rig = Rig::default();
    let bytes = frame(0x01, &[1]);
    let (last, head) = bytes.split_last().unwrap();
    for &b in head {
        let out = rig
            .engine
            .process_byte(b, 0, &mut rig.board, &mut rig.sink, &mut rig.wire)
            .unwrap();
        assert!(out.is_none());
    }
    let out = rig
        .engine
        .process_byte(*last, 0, &mut rig.board, &mut rig.sink, &mut rig.wire)
        .unwrap();
    assert_eq!(
        out,
        Some(FrameOutcome::Accepted {
            command_id: 0x01,
            dispatch: Dispatch::Applied {
                output: OutputId::StatusLed,
                on: true,
            },
            response: Response::Ack,
        })
    );

    let out = rig
        .engine
        .process_byte(0xAA, 0, &mut rig.board, &mut rig.sink, &mut rig.wire)
        .unwrap();
    assert!(out.is_none());
    rig.engine
        .process_byte(0x01, 0, &mut rig.board, &mut rig.sink, &mut rig.wire)
        .unwrap();
    let out = rig
        .engine
        .process_byte(0x20, 0, &mut rig.board, &mut rig.sink, &mut rig.wire)
        .unwrap();
    assert_eq!(out, Some(FrameOutcome::Rejected(FrameError::LengthOverflow(0x20))));
}

// ── Inactivity timeout ────────────────────────────────────────

#[test]
fn stale_partial_frame_is_dropped_silently() {
    let mut rig = Rig::new(LinkConfig {
        frame_timeout_ms: 100,
        ..LinkConfig::default()
    });
    rig.feed_at(&[0xAA, 0x01], 0);
    rig.feed_at(&frame(0x01, &[1]), 500);

    assert!(rig.board.led);
    assert_eq!(rig.wire.take(), vec![ACK]);
    assert_eq!(rig.engine.stats().timeouts, 1);
    assert!(rig.sink.events.contains(&LinkEvent::FrameTimedOut {
        state: DecoderState::ReadLength,
        idle_ms: 500,
    }));
}

#[test]
fn without_timeout_a_stale_prefix_corrupts_the_next_frame() {
    let mut rig = Rig::default();
    rig.feed_at(&[0xAA, 0x01], 0);
    rig.feed_at(&frame(0x01, &[1]), 500);

    // 0xAA is read as the length byte and rejected.
    assert!(!rig.board.led);
    assert_eq!(rig.wire.take()[0], NACK);
    assert_eq!(rig.engine.stats().timeouts, 0);
}

#[test]
fn poll_idle_expires_partial_frame() {
    let mut rig = Rig::new(LinkConfig {
        frame_timeout_ms: 100,
        ..LinkConfig::default()
    });
    rig.feed_at(&[0xAA, 0x01, 0x01], 1_000);

    assert!(!rig.engine.poll_idle(1_100, &mut rig.sink));
    assert!(!rig.engine.decoder().is_idle());
    assert!(rig.engine.poll_idle(1_101, &mut rig.sink));
    assert!(rig.engine.decoder().is_idle());
    assert!(rig.wire.sent.is_empty(), "timeouts send no response byte");

    // Nothing in flight, nothing to expire.
    assert!(!rig.engine.poll_idle(5_000, &mut rig.sink));
}

#[test]
fn slow_but_steady_bytes_do_not_time_out() {
    let mut rig = Rig::new(LinkConfig {
        frame_timeout_ms: 100,
        ..LinkConfig::default()
    });
    for (i, b) in frame(0x01, &[1]).into_iter().enumerate() {
        rig.feed_at(&[b], i as u64 * 90);
    }
    assert!(rig.board.led);
    assert_eq!(rig.engine.stats().timeouts, 0);
}

// ── Transport failures and stats ──────────────────────────────

#[test]
fn broken_transport_surfaces_as_error() {
    let mut rig = Rig::default();
    rig.wire.broken = true;
    let result = rig.engine.process_bytes(
        &frame(0x01, &[1]),
        0,
        &mut rig.board,
        &mut rig.sink,
        &mut rig.wire,
    );
    assert_eq!(result, Err(Error::Transport));
    // The command was applied before the ACK failed.
    assert!(rig.board.led);
    assert!(rig.engine.decoder().is_idle());
}

#[test]
fn failed_reply_send_skips_ack_and_leaves_link_usable() {
    let mut rig = Rig::default();
    rig.wire.broken = true;
    let result = rig.engine.process_bytes(
        &frame(0x03, &[]),
        0,
        &mut rig.board,
        &mut rig.sink,
        &mut rig.wire,
    );
    assert_eq!(result, Err(Error::Transport));

    // The sensor was read, but neither the reply nor the ACK went out.
    assert_eq!(rig.board.reads, 1);
    assert!(rig.wire.sent.is_empty());
    assert_eq!(rig.engine.stats().replies_sent, 0);
    assert!(!rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, LinkEvent::ReplySent { .. })));
    assert!(rig.engine.decoder().is_idle());

    rig.wire.broken = false;
    rig.feed(&frame(0x03, &[]));
    assert_eq!(
        rig.wire.take(),
        vec![0xAA, 0x03, 0x04, 0x00, 0x00, 0xCC, 0x41, 0xBE, ACK]
    );
}

#[test]
fn stats_serialise_to_json_and_reset() {
    let mut rig = Rig::default();
    rig.feed(&frame(0x01, &[1]));
    rig.feed(&[0xAA, 0x01, 0x01, 0x01, 0x00]);

    let json = rig.engine.stats().to_json();
    assert!(json.contains("\"frames_accepted\":1"));
    assert!(json.contains("\"checksum_rejects\":1"));
    assert_eq!(rig.engine.stats().frames_rejected(), 1);

    rig.engine.reset_stats();
    assert_eq!(rig.engine.stats().frames_accepted, 0);
}

#[test]
fn engine_reset_drops_partial_frame() {
    let mut rig = Rig::default();
    rig.feed(&[0xAA, 0x01, 0x01]);
    rig.engine.reset();
    assert!(rig.engine.decoder().is_idle());
    rig.feed(&frame(0x01, &[1]));
    assert_eq!(rig.wire.take(), vec![ACK]);
}
