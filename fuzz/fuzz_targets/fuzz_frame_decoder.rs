//! Fuzz target: `FrameDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming frame decoder and
//! asserts that it never panics, never yields an oversized payload, and is
//! back in its initial state after every completed attempt.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use uartrpc::rpc::codec::{FrameDecoder, encode_frame};
use uartrpc::rpc::packet::{MAX_FRAME_SIZE, MAX_PAYLOAD};

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();

    for &b in data {
        match decoder.feed(b) {
            None => {}
            Some(Ok(packet)) => {
                assert!(packet.payload().len() <= MAX_PAYLOAD);

                // Whatever decoded must re-encode to a frame that decodes
                // to the same packet.
                let mut buf = [0u8; MAX_FRAME_SIZE];
                let n = encode_frame(packet.command_id(), packet.payload(), &mut buf)
                    .expect("decoded payload fits a frame");
                let mut replay = FrameDecoder::new();
                let again = buf[..n].iter().find_map(|&b| replay.feed(b));
                assert_eq!(again, Some(Ok(packet)));
                assert!(decoder.is_idle());
            }
            Some(Err(_)) => assert!(decoder.is_idle()),
        }
    }

    // After a reset the decoder must match a fresh one.
    decoder.reset();
    assert_eq!(decoder, FrameDecoder::new());
});
