//! Transport-agnostic command link.
//!
//! Checksummed single-byte-at-a-time framing over a serial line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Link Stack                           │
//! │                                                             │
//! │  ┌──────────┐   ┌───────────┐   ┌──────────────────────┐   │
//! │  │ RxRing / │──▶│  Codec    │──▶│ Engine (dispatcher)  │   │
//! │  │ Transport│   │ (decoder) │   │ → CommandTable       │   │
//! │  └──────────┘   └───────────┘   └──────────────────────┘   │
//! │       ▲                                   │                 │
//! │       │        reply frame + ACK/NACK     │                 │
//! │       └───────────────────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod engine;
pub mod packet;
pub mod ring;
pub mod transport;
