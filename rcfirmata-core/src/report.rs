//! Receive reports
//!
//! Receivers are filled from the receive interrupt while the main loop
//! reads them. There is no lock: the loop checks `available`, copies what
//! it needs, then clears the flag. The interrupt may overwrite the raw
//! timing buffer during the copy, which makes the raw block a best-effort
//! snapshot. On targets with real concurrency primitives this is where a
//! single-producer/single-consumer queue would go; the report format would
//! stay the same.

use rcfirmata_protocol::messages::{RAW_BLOCK_LEN, RAW_TIMINGS_LEN, RCINPUT_DATA, SUB_MESSAGE};
use rcfirmata_protocol::ReportHeader;

use crate::diag::{DiagEvent, DiagnosticSink};
use crate::dispatch::reply;
use crate::registry::PinRegistry;
use crate::traits::{FirmataHost, RcSwitch};

/// One received code as pulled from a receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    /// Value, bit count, delay and protocol
    pub header: ReportHeader,
    /// Pulse intervals, present when raw reporting is on
    pub raw: Option<[u16; RAW_TIMINGS_LEN]>,
}

impl ReportRecord {
    /// Poll `receiver`; if a code is waiting, snapshot it and mark it consumed
    pub fn take<D: RcSwitch>(receiver: &mut D, with_raw: bool) -> Option<Self> {
        if !receiver.available() {
            return None;
        }
        let header = ReportHeader {
            value: receiver.received_value(),
            bit_count: receiver.received_bit_length(),
            delay: receiver.received_delay(),
            protocol: receiver.received_protocol(),
        };
        let raw = with_raw.then(|| {
            let mut timings = [0u16; RAW_TIMINGS_LEN];
            receiver.received_raw_data(&mut timings);
            timings
        });
        receiver.reset_available();
        Some(Self { header, raw })
    }

    /// Raw timings as little-endian bytes, empty when absent
    fn raw_bytes(&self, out: &mut [u8; RAW_BLOCK_LEN]) -> usize {
        match &self.raw {
            Some(timings) => {
                for (chunk, timing) in out.chunks_exact_mut(2).zip(timings.iter()) {
                    chunk.copy_from_slice(&timing.to_le_bytes());
                }
                RAW_BLOCK_LEN
            }
            None => 0,
        }
    }

    /// Write this record as an input `MESSAGE` for `pin`
    pub fn send<H: FirmataHost>(&self, host: &mut H, pin: u8) {
        let header = self.header.to_bytes();
        let mut raw = [0u8; RAW_BLOCK_LEN];
        let raw_len = self.raw_bytes(&mut raw);
        reply::send_message(host, RCINPUT_DATA, SUB_MESSAGE, pin, &[&header, &raw[..raw_len]]);
    }
}

/// Report every receiver that has a code waiting
///
/// Returns the number of reports written.
pub fn report_all<D, H, S, const N: usize>(
    registry: &mut PinRegistry<D, N>,
    raw_data_enabled: bool,
    host: &mut H,
    sink: &mut S,
) -> usize
where
    D: RcSwitch + Default,
    H: FirmataHost,
    S: DiagnosticSink,
{
    let mut count = 0;
    for (pin, receiver) in registry.receivers_mut() {
        if let Some(record) = ReportRecord::take(receiver, raw_data_enabled) {
            record.send(host, pin);
            sink.event(&DiagEvent::Reported {
                pin,
                header: record.header,
                raw: record.raw.is_some(),
            });
            count += 1;
        }
    }
    count
}
