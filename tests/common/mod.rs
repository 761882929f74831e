//! Mock peripherals shared by the driver integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the mocks")]

use embassy_time::Duration;
use strip_envoy::one_wire::PulseChannel;
use strip_envoy::pulse::PulseSymbol;
use strip_envoy::two_wire::ClockedSerial;
use strip_envoy::{Error, Result};

/// 20 MHz symbol counter: one tick is 50 ns, so the WS281x profiles land on
/// exact tick counts.
pub const MOCK_CLOCK_HZ: u32 = 20_000_000;

/// A pulse peripheral that records every symbol written into its ring.
pub struct MockPulse {
    pub clock_hz: u32,
    pub ring: [PulseSymbol; 64],
    /// Every `write_symbol` call in order, as `(slot, symbol)`.
    pub writes: Vec<(usize, PulseSymbol)>,
    pub starts: usize,
    pub fail_start: bool,
}

impl MockPulse {
    pub fn new() -> Self {
        Self {
            clock_hz: MOCK_CLOCK_HZ,
            ring: [PulseSymbol::IDLE; 64],
            writes: Vec::new(),
            starts: 0,
            fail_start: false,
        }
    }

    /// The symbols written so far, in write order.
    pub fn symbols(&self) -> Vec<PulseSymbol> {
        self.writes.iter().map(|&(_, symbol)| symbol).collect()
    }

    /// The ring slots written so far, in write order.
    pub fn slots(&self) -> Vec<usize> {
        self.writes.iter().map(|&(slot, _)| slot).collect()
    }
}

impl PulseChannel for MockPulse {
    const SYMBOL_CAPACITY: usize = 64;

    fn counter_clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn write_symbol(&mut self, slot: usize, symbol: PulseSymbol) {
        self.ring[slot] = symbol;
        self.writes.push((slot, symbol));
    }

    fn start(&mut self) -> Result<()> {
        if self.fail_start {
            return Err(Error::Peripheral {
                reason: "start rejected",
            });
        }
        self.starts += 1;
        Ok(())
    }
}

/// A clocked-serial peripheral that records queued transfers and completes
/// them on demand.
pub struct MockSerial {
    /// Every queued transfer's bytes, in queue order.
    pub transfers: Vec<Vec<u8>>,
    /// Transfers already reported complete by `transfer_done`.
    pub completed: usize,
    /// Completions `transfer_done` may hand out before timing out.
    pub ready: usize,
    /// Reject enqueues once this many transfers are queued.
    pub reject_at: Option<usize>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self {
            transfers: Vec::new(),
            completed: 0,
            ready: usize::MAX,
            reject_at: None,
        }
    }
}

impl ClockedSerial for MockSerial {
    const QUEUE_DEPTH: usize = 16;

    fn enqueue(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(limit) = self.reject_at {
            if self.transfers.len() >= limit {
                return Err(Error::Peripheral {
                    reason: "transfer queue rejected",
                });
            }
        }
        self.transfers.push(bytes.to_vec());
        Ok(())
    }

    async fn transfer_done(&mut self, _timeout: Duration) -> Result<()> {
        if self.completed < self.ready.min(self.transfers.len()) {
            self.completed += 1;
            Ok(())
        } else {
            Err(Error::Timeout)
        }
    }
}
