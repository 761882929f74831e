//! Driver for one-wire pulse-timed LED strips (WS281x, SK6812, …).
//!
//! The pulse-generation peripheral behind [`PulseChannel`] owns a small
//! ring of waveform symbols — far smaller than a frame — and raises a
//! *threshold* event each time half of the ring drains. [`OneWireDriver`]
//! keeps the encoded frame bytes in a [`OneWireStatic`] cell, primes the
//! ring when a frame starts, and tops it up half-block by half-block from
//! interrupt context, routed through [`crate::dispatch`]. A *done* event
//! releases the single-slot completion flag that [`OneWireDriver::wait`]
//! blocks on.
//!
//! While a frame is in flight, the symbol ring and translation cursor are
//! mutated exclusively from the interrupt path; the application thread only
//! reads the `transmitting` flag and the completion signal. That
//! single-writer split is what makes the refill path lock-light.
//!
//! # Example
//!
//! ```no_run
//! use strip_envoy::color::colors;
//! use strip_envoy::dispatch::ChannelId;
//! use strip_envoy::one_wire::{OneWireConfig, OneWireDriver, OneWireStatic, PulseChannel};
//! use strip_envoy::pulse::PulseSymbol;
//! use strip_envoy::timing::LedFamily;
//! use strip_envoy::{BufferMode, Duration, Result, Rgb};
//!
//! // Bind the crate's seam to the platform's pulse peripheral.
//! struct RmtChannel0 {
//!     // handle from the platform HAL
//! }
//!
//! impl PulseChannel for RmtChannel0 {
//!     const SYMBOL_CAPACITY: usize = 64;
//!
//!     fn counter_clock_hz(&self) -> u32 {
//!         20_000_000
//!     }
//!
//!     fn write_symbol(&mut self, _slot: usize, _symbol: PulseSymbol) {
//!         // MMIO write into the symbol ring
//!     }
//!
//!     fn start(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! static STRIP: OneWireStatic<RmtChannel0, { 48 * 3 }> = OneWireStatic::new();
//!
//! async fn example() -> Result<()> {
//!     let config = OneWireConfig::new(ChannelId::new(0)?, LedFamily::Ws2812b)
//!         .buffer_mode(BufferMode::Double);
//!     let mut strip = OneWireDriver::<_, Rgb, 48, { 48 * 3 }>::new(
//!         &STRIP,
//!         RmtChannel0 {},
//!         config,
//!     )?;
//!
//!     strip.fill(colors::BLUE);
//!     strip.show()?;
//!     // Double buffering: draw the next frame while this one transmits.
//!     strip.fill(colors::GRAY);
//!     strip.wait(Duration::from_millis(20)).await?;
//!     strip.show()?;
//!     strip.wait(Duration::from_millis(20)).await
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, with_timeout};
use portable_atomic::{AtomicBool, Ordering};

use crate::BufferMode;
use crate::dispatch::{self, ChannelId, EventSink};
use crate::error::{Error, Result};
use crate::pixel::{ChannelOrder, LedPixel, encode_frame};
use crate::pulse::{PulseEncoder, PulseSymbol, SymbolCursor};
use crate::timing::LedFamily;

/// The pulse-generation peripheral collaborator.
///
/// Pin muxing, clock routing and interrupt installation are the platform
/// integration's responsibility; this trait only covers what the driver
/// consumes at runtime. The integration must also forward the peripheral's
/// threshold and done interrupts to [`crate::dispatch::on_threshold`] and
/// [`crate::dispatch::on_done`].
pub trait PulseChannel {
    /// Slots in the hardware symbol ring. Must be even; the driver refills
    /// it in two half-blocks.
    const SYMBOL_CAPACITY: usize;

    /// Frequency of the symbol duration counter, in hertz.
    fn counter_clock_hz(&self) -> u32;

    /// Writes one symbol into the ring at `slot`.
    fn write_symbol(&mut self, slot: usize, symbol: PulseSymbol);

    /// Begins transmitting from slot 0.
    fn start(&mut self) -> Result<()>;
}

/// Construction parameters for a [`OneWireDriver`].
#[derive(Clone, Copy, Debug)]
pub struct OneWireConfig {
    channel: ChannelId,
    family: LedFamily,
    order: ChannelOrder,
    mode: BufferMode,
}

impl OneWireConfig {
    /// Configuration for `family` on hardware channel `channel`, with the
    /// family's native channel order and single buffering.
    #[must_use]
    pub fn new(channel: ChannelId, family: LedFamily) -> Self {
        Self {
            channel,
            family,
            order: family.default_order(),
            mode: BufferMode::Single,
        }
    }

    /// Overrides the wire channel order.
    #[must_use]
    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    /// Selects single or double buffering.
    #[must_use]
    pub fn buffer_mode(mut self, mode: BufferMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Interrupt-shared transmission state.
struct Core<P, const BUF: usize> {
    peripheral: P,
    encoder: PulseEncoder,
    bytes: [u8; BUF],
    frame_len: usize,
    cursor: SymbolCursor,
    half_index: usize,
}

impl<P: PulseChannel, const BUF: usize> Core<P, BUF> {
    /// Fills the next half of the symbol ring, alternating halves.
    ///
    /// Once the frame is drained the rest of the half is filled with
    /// [`PulseSymbol::IDLE`] so stale symbols are never replayed.
    fn refill_half_block(&mut self) {
        let half = P::SYMBOL_CAPACITY / 2;
        let offset = self.half_index * half;
        self.half_index ^= 1;

        for slot in offset..offset + half {
            let symbol = self
                .encoder
                .next_symbol(&self.bytes[..self.frame_len], &mut self.cursor)
                .unwrap_or(PulseSymbol::IDLE);
            self.peripheral.write_symbol(slot, symbol);
        }
    }
}

/// Statically allocated shared state for one [`OneWireDriver`].
///
/// The interrupt dispatcher needs a `'static` place to deliver events to,
/// so the driver's transmission state lives in one of these cells rather
/// than in the driver handle. Allocate one per strip:
///
/// ```ignore
/// static STRIP: OneWireStatic<RmtChannel0, { 48 * 3 }> = OneWireStatic::new();
/// ```
///
/// `BUF` is the encoded-frame capacity in bytes: pixel count times the
/// channel order's stride (3 or 4).
pub struct OneWireStatic<P, const BUF: usize> {
    core: Mutex<CriticalSectionRawMutex, RefCell<Option<Core<P, BUF>>>>,
    done: Signal<CriticalSectionRawMutex, ()>,
    transmitting: AtomicBool,
}

impl<P, const BUF: usize> OneWireStatic<P, BUF> {
    /// Creates an empty cell, claimed later by [`OneWireDriver::new`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            core: Mutex::new(RefCell::new(None)),
            done: Signal::new(),
            transmitting: AtomicBool::new(false),
        }
    }

    /// Whether a transmission is currently in flight.
    #[must_use]
    pub fn is_transmitting(&self) -> bool {
        self.transmitting.load(Ordering::Acquire)
    }
}

impl<P, const BUF: usize> Default for OneWireStatic<P, BUF> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PulseChannel, const BUF: usize> OneWireStatic<P, BUF> {
    fn with_core<R>(&self, f: impl FnOnce(&mut Core<P, BUF>) -> R) -> R {
        self.core.lock(|cell| {
            let mut cell = cell.borrow_mut();
            let core = cell
                .as_mut()
                .expect("driver state initialized at construction");
            f(core)
        })
    }
}

impl<P: PulseChannel + Send, const BUF: usize> EventSink for OneWireStatic<P, BUF> {
    fn on_threshold(&self) {
        if !self.is_transmitting() {
            return;
        }
        self.core.lock(|cell| {
            if let Some(core) = cell.borrow_mut().as_mut() {
                core.refill_half_block();
            }
        });
    }

    fn on_done(&self) {
        // Sole writer of the completion flag; one signal per transmission.
        if self.transmitting.swap(false, Ordering::AcqRel) {
            self.done.signal(());
        }
    }
}

/// Application-side handle for one one-wire LED strip.
///
/// Owns two pixel buffers of `N` pixels each. The front buffer is the one
/// the application draws into; in double-buffered mode the buffers swap on
/// every [`show`](Self::show) (an index flip, never a copy), so drawing can
/// continue while the previous frame transmits. In single-buffered mode
/// there is no swap and a frame must be waited on before the next `show`.
pub struct OneWireDriver<P: 'static, C, const N: usize, const BUF: usize> {
    shared: &'static OneWireStatic<P, BUF>,
    channel: ChannelId,
    order: ChannelOrder,
    mode: BufferMode,
    buffers: [[C; N]; 2],
    front: usize,
    awaiting_wait: bool,
}

impl<P, C, const N: usize, const BUF: usize> OneWireDriver<P, C, N, BUF>
where
    P: PulseChannel + Send + 'static,
    C: LedPixel,
{
    /// Number of pixels on the strip.
    pub const LEN: usize = N;

    /// Claims `shared` and `config.channel`, and prepares the pulse encoder
    /// for the configured family at the peripheral's counter clock.
    ///
    /// Fails if `BUF` cannot hold the encoded frame, if a timing value is
    /// unrepresentable at the counter clock, if `shared` is already
    /// claimed, or if the channel already has a live owner.
    pub fn new(
        shared: &'static OneWireStatic<P, BUF>,
        peripheral: P,
        config: OneWireConfig,
    ) -> Result<Self> {
        const {
            assert!(
                P::SYMBOL_CAPACITY >= 2 && P::SYMBOL_CAPACITY % 2 == 0,
                "symbol ring must split into two equal halves"
            );
        }

        let needed = N * config.order.bytes_per_pixel();
        if needed > BUF {
            return Err(Error::BufferTooSmall {
                needed,
                capacity: BUF,
            });
        }

        let encoder = PulseEncoder::new(&config.family.timing(), peripheral.counter_clock_hz())?;

        shared.core.lock(|cell| {
            let mut cell = cell.borrow_mut();
            if cell.is_some() {
                return Err(Error::SharedStateInUse);
            }
            *cell = Some(Core {
                peripheral,
                encoder,
                bytes: [0; BUF],
                frame_len: 0,
                cursor: SymbolCursor::start(),
                half_index: 0,
            });
            Ok(())
        })?;

        if let Err(error) = dispatch::register(config.channel, shared) {
            shared.core.lock(|cell| {
                cell.borrow_mut().take();
            });
            return Err(error);
        }

        Ok(Self {
            shared,
            channel: config.channel,
            order: config.order,
            mode: config.mode,
            buffers: [[C::default(); N]; 2],
            front: 0,
            awaiting_wait: false,
        })
    }

    /// The hardware channel this driver owns.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// The wire channel order frames are encoded with.
    #[must_use]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Whether a transmission is currently in flight.
    #[must_use]
    pub fn is_transmitting(&self) -> bool {
        self.shared.is_transmitting()
    }

    /// Number of pixels on the strip.
    #[must_use]
    #[allow(clippy::len_without_is_empty, reason = "a strip is not a container")]
    pub const fn len(&self) -> usize {
        N
    }

    /// Read access to the front pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[C; N] {
        &self.buffers[self.front]
    }

    /// Mutable access to the front pixel buffer.
    ///
    /// In double-buffered mode this is always safe to draw into, even while
    /// the previous frame transmits; the in-flight data was snapshotted by
    /// [`show`](Self::show).
    pub fn pixels_mut(&mut self) -> &mut [C; N] {
        &mut self.buffers[self.front]
    }

    /// Returns the pixel at `index` in the front buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[must_use]
    pub fn pixel(&self, index: usize) -> C {
        self.buffers[self.front][index]
    }

    /// Sets the pixel at `index` in the front buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set_pixel(&mut self, index: usize, color: C) {
        self.buffers[self.front][index] = color;
    }

    /// Fills the front buffer with one color.
    pub fn fill(&mut self, color: C) {
        self.buffers[self.front].fill(color);
    }

    /// Starts transmitting the front buffer.
    ///
    /// Encodes the front buffer into the shared byte buffer, primes the
    /// symbol ring with one or two half-blocks, and starts the peripheral;
    /// the rest of the frame is streamed from interrupt context. In
    /// double-buffered mode the pixel buffers swap before returning, so the
    /// caller may immediately draw the next frame.
    ///
    /// Fails with [`Error::TransmissionInFlight`] if the previous frame is
    /// still transmitting — or, in single-buffered mode, if it has not been
    /// successfully waited on; a single-buffered caller must treat that as
    /// a fatal programming error.
    pub fn show(&mut self) -> Result<()> {
        if self.mode == BufferMode::Single && self.awaiting_wait {
            return Err(Error::TransmissionInFlight);
        }
        if self.is_transmitting() {
            return Err(Error::TransmissionInFlight);
        }

        let front = &self.buffers[self.front];
        self.shared.with_core(|core| {
            core.frame_len = encode_frame(front, self.order, &mut core.bytes)?;
            core.cursor = SymbolCursor::start();
            core.half_index = 0;

            // Prime the ring; the second half only if bytes remain, so a
            // short frame's end marker is not overwritten.
            core.refill_half_block();
            if !core.cursor.is_finished(core.frame_len) {
                core.refill_half_block();
            }

            // Drop any completion the caller never waited on, then start.
            self.shared.done.reset();
            self.shared.transmitting.store(true, Ordering::Release);
            if let Err(error) = core.peripheral.start() {
                self.shared.transmitting.store(false, Ordering::Release);
                return Err(error);
            }
            Ok(())
        })?;

        if self.mode == BufferMode::Double {
            self.front ^= 1;
        }
        self.awaiting_wait = true;
        Ok(())
    }

    /// Blocks until the in-flight frame completes or `timeout` elapses.
    ///
    /// Consumes at most one completion per [`show`](Self::show).
    /// [`Error::Timeout`] is recoverable: retry `wait`, but do not call
    /// `show` again until a completion has been observed.
    pub async fn wait(&mut self, timeout: Duration) -> Result<()> {
        match with_timeout(timeout, self.shared.done.wait()).await {
            Ok(()) => {
                self.awaiting_wait = false;
                Ok(())
            }
            Err(_) => Err(Error::Timeout),
        }
    }

    /// Consumes a pending completion without blocking.
    ///
    /// Returns `true` if the frame had completed and the completion was
    /// taken.
    pub fn try_wait(&mut self) -> bool {
        if self.shared.done.try_take().is_some() {
            self.awaiting_wait = false;
            true
        } else {
            false
        }
    }

    /// Runs `f` with exclusive access to the peripheral.
    ///
    /// Executes inside a critical section; keep `f` short.
    pub fn with_peripheral<R>(&mut self, f: impl FnOnce(&mut P) -> R) -> R {
        self.shared.with_core(|core| f(&mut core.peripheral))
    }

    /// Waits out any in-flight frame, releases the channel, and returns the
    /// peripheral.
    ///
    /// On [`Error::Timeout`] the driver is dropped instead, which abandons
    /// the frame (see [`Drop`] notes on the type).
    pub async fn shutdown(mut self, timeout: Duration) -> Result<P> {
        if self.is_transmitting() {
            self.wait(timeout).await?;
        }
        let taken = self.shared.core.lock(|cell| cell.borrow_mut().take());
        dispatch::deregister(self.channel);
        self.shared.done.reset();
        core::mem::forget(self);
        let taken = taken.expect("driver state initialized at construction");
        Ok(taken.peripheral)
    }
}

impl<P, C, const N: usize, const BUF: usize> Drop for OneWireDriver<P, C, N, BUF> {
    /// Releases the channel and the shared state cell.
    ///
    /// Dropping while a frame is in flight abandons it: events stop being
    /// routed and the peripheral drains whatever is left in its ring.
    /// Prefer [`shutdown`](Self::shutdown) to tear down cleanly.
    fn drop(&mut self) {
        dispatch::deregister(self.channel);
        self.shared.core.lock(|cell| {
            cell.borrow_mut().take();
        });
        self.shared.transmitting.store(false, Ordering::Release);
        self.shared.done.reset();
    }
}
