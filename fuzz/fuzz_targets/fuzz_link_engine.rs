//! Fuzz target: `RpcEngine::process_bytes`
//!
//! Arbitrary wire input must never panic, and every completed frame
//! attempt must produce exactly one response byte (plus any reply frame).
//!
//! cargo fuzz run fuzz_link_engine

#![no_main]

use libfuzzer_sys::fuzz_target;
use uartrpc::app::commands::{OutputId, SensorId};
use uartrpc::app::ports::{ActuatorPort, NullSink, SensorPort};
use uartrpc::config::LinkConfig;
use uartrpc::rpc::engine::RpcEngine;
use uartrpc::rpc::transport::Transport;

struct Board {
    led: bool,
}

impl ActuatorPort for Board {
    fn set_output(&mut self, _output: OutputId, on: bool) {
        self.led = on;
    }

    fn output_state(&self, _output: OutputId) -> bool {
        self.led
    }
}

impl SensorPort for Board {
    fn read_sensor(&mut self, _sensor: SensorId) -> f32 {
        21.0
    }
}

/// Counts response bytes and reply frames.
#[derive(Default)]
struct Counter {
    writes: usize,
}

impl Transport for Counter {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.writes += 1;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

fuzz_target!(|data: &[u8]| {
    let mut engine = RpcEngine::new(&LinkConfig::default());
    let mut board = Board { led: false };
    let mut tx = Counter::default();

    let completed = engine
        .process_bytes(data, 0, &mut board, &mut NullSink, &mut tx)
        .expect("infallible transport");

    let stats = engine.stats();
    assert_eq!(tx.writes, completed + stats.replies_sent as usize);
    assert_eq!(
        completed as u32,
        stats.frames_accepted + stats.frames_rejected()
    );
    assert_eq!(stats.bytes_received as usize, data.len());
});
