//! UART command link firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  UartTransport   HardwareAdapter      LogEventSink       │
//! │  (Transport)     (Actuator+Sensor)    (EventSink)        │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ──────────────       │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │  RpcEngine: FrameDecoder · CommandTable        │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::{info, warn};

use uartrpc::adapters::hardware::HardwareAdapter;
use uartrpc::adapters::log_sink::LogEventSink;
use uartrpc::adapters::time::MonotonicClock;
use uartrpc::adapters::uart::UartTransport;
use uartrpc::config::LinkConfig;
use uartrpc::drivers::status_led::StatusLed;
use uartrpc::rpc::engine::RpcEngine;
use uartrpc::sensors::temperature::TemperatureSensor;

const NVS_NAMESPACE: &str = "uartrpc";
const NVS_CONFIG_KEY: &str = "linkcfg";

/// Upper bound on a stored config blob.
const CONFIG_BLOB_MAX: usize = 64;

/// How long one UART read may block before the idle checks run.
const IDLE_POLL_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("uartrpc v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let mut nvs = EspNvs::new(nvs_partition, NVS_NAMESPACE, true)?;
    let config = load_config(&mut nvs);
    info!(
        "Link config: {} baud, frame timeout {} ms, unknown commands {:?}",
        config.baud_rate, config.frame_timeout_ms, config.unknown_command
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let uart_cfg = UartConfig::default().baudrate(Hertz(config.baud_rate));
    let uart = UartDriver::new(
        peripherals.uart1,
        pins.gpio17,
        pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )?;
    let mut transport = UartTransport::new(uart, config.tx_timeout_ms);

    let led = StatusLed::new(PinDriver::output(pins.gpio2)?, config.led_active_low);
    let temperature = TemperatureSensor::new()?;
    let mut hw = HardwareAdapter::new(led, temperature);

    // ── 4. Engine ─────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut engine = RpcEngine::new(&config);
    let clock = MonotonicClock::new();

    let stats_interval_ms = u64::from(config.stats_interval_secs) * 1_000;
    let mut last_stats_ms = clock.now_ms();
    let mut rx_buf = [0u8; 64];

    info!("Link ready. Entering receive loop.");

    // ── 5. Receive loop ───────────────────────────────────────
    loop {
        let n = match transport.read_timeout(&mut rx_buf, IDLE_POLL_MS) {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read failed: {}", e);
                0
            }
        };
        let now = clock.now_ms();

        if n > 0 {
            if let Err(e) =
                engine.process_bytes(&rx_buf[..n], now, &mut hw, &mut sink, &mut transport)
            {
                warn!("Reply dropped: {}", e);
            }
        } else {
            engine.poll_idle(now, &mut sink);
        }

        if stats_interval_ms > 0 && now.saturating_sub(last_stats_ms) >= stats_interval_ms {
            info!("STATS | {}", engine.stats().to_json());
            last_stats_ms = now;
        }
    }
}

/// Read the persisted link config, falling back to (and storing) defaults
/// when the blob is missing or fails validation.
fn load_config(nvs: &mut EspNvs<NvsDefault>) -> LinkConfig {
    let mut buf = [0u8; CONFIG_BLOB_MAX];
    match nvs.get_raw(NVS_CONFIG_KEY, &mut buf) {
        Ok(Some(bytes)) => match LinkConfig::from_bytes(bytes) {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                return cfg;
            }
            Err(e) => warn!("Stored config rejected ({}), using defaults", e),
        },
        Ok(None) => info!("No stored config, writing defaults"),
        Err(e) => warn!("NVS read failed ({}), using defaults", e),
    }

    let cfg = LinkConfig::default();
    match cfg.to_bytes() {
        Ok(bytes) => {
            if let Err(e) = nvs.set_raw(NVS_CONFIG_KEY, &bytes) {
                warn!("NVS write failed: {}", e);
            }
        }
        Err(e) => warn!("Config encode failed: {}", e),
    }
    cfg
}
