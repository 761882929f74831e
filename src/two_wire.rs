//! Driver for two-wire clocked LED strips (APA102 / DotStar style).
//!
//! Clocked strips have no timing-critical waveform: data and clock are
//! separate lines, so frames are plain byte streams handed to a
//! clocked-serial peripheral as queued transfers. One frame is a 32-bit
//! zero start frame, four bytes per pixel (a `0b111xxxxx` header carrying
//! 5-bit global brightness, then three color bytes), and enough all-ones
//! clock filler to latch the data through every pixel — each pixel forwards
//! the stream with half a clock of delay, so at least `count / 2` extra
//! clocks must follow the data.
//!
//! [`TwoWireDriver::show`] queues the transfers without blocking;
//! [`TwoWireDriver::wait`] polls their completion in FIFO order.

use embassy_time::Duration;

use crate::BufferMode;
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::pixel::{ChannelOrder, write_ordered};

/// The clocked-serial peripheral collaborator.
///
/// Bus and pin bring-up happen in the platform integration; the driver only
/// queues transfers and polls their completion.
pub trait ClockedSerial {
    /// Transfers the peripheral can hold queued at once.
    const QUEUE_DEPTH: usize;

    /// Queues one transfer. Must not block; a full queue or rejected
    /// transfer is an error.
    fn enqueue(&mut self, bytes: &[u8]) -> Result<()>;

    /// Waits for the next queued transfer (FIFO order) to complete, or for
    /// `timeout` to elapse.
    async fn transfer_done(&mut self, timeout: Duration) -> Result<()>;
}

/// The 32-bit all-zero frame that precedes pixel data.
pub const START_FRAME: [u8; 4] = [0x00; 4];

/// One 128-bit all-ones latch chunk; repeated after the pixel data.
pub const END_FRAME_CHUNK: [u8; 16] = [0xFF; 16];

/// Fixed marker bits in every pixel's header byte.
const HEADER_MARKER: u8 = 0xE0;

/// Largest value the 5-bit brightness field can carry.
pub const BRIGHTNESS_MAX: u8 = 31;

/// Construction parameters for a [`TwoWireDriver`].
#[derive(Clone, Copy, Debug)]
pub struct TwoWireConfig {
    order: ChannelOrder,
    brightness: u8,
    mode: BufferMode,
}

impl TwoWireConfig {
    /// Red-green-blue order, full brightness, single buffering.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: ChannelOrder::Rgb,
            brightness: BRIGHTNESS_MAX,
            mode: BufferMode::Single,
        }
    }

    /// Overrides the color byte order. Must be a three-byte order; the
    /// fourth wire byte is the brightness header.
    #[must_use]
    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the global 5-bit brightness (0–31) written into every pixel
    /// header.
    #[must_use]
    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    /// Selects single or double buffering.
    #[must_use]
    pub fn buffer_mode(mut self, mode: BufferMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for TwoWireConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-side handle for one two-wire LED strip.
///
/// `N` is the pixel count, `BUF` the data-frame capacity in bytes
/// (`N * 4`). As with the one-wire driver, double buffering swaps the two
/// pixel buffers on every [`show`](Self::show) so the next frame can be
/// drawn while transfers are outstanding.
pub struct TwoWireDriver<S, const N: usize, const BUF: usize> {
    serial: S,
    order: ChannelOrder,
    brightness: u8,
    mode: BufferMode,
    buffers: [[Rgb; N]; 2],
    front: usize,
    data: [u8; BUF],
    pending: usize,
}

impl<S: ClockedSerial, const N: usize, const BUF: usize> TwoWireDriver<S, N, BUF> {
    /// Number of pixels on the strip.
    pub const LEN: usize = N;

    /// Latch chunks appended after the pixel data of one frame.
    const END_CHUNKS: usize = 1 + N / 128;

    /// Transfers one `show` queues: start, data, and the latch chunks.
    const TRANSFERS_PER_SHOW: usize = 2 + Self::END_CHUNKS;

    /// Creates a driver over `serial`.
    ///
    /// Fails if the configured order carries a white channel (the header
    /// byte occupies that slot), if the brightness exceeds 5 bits, if `BUF`
    /// cannot hold the data frame, or if one frame would queue more
    /// transfers than the peripheral allows.
    pub fn new(serial: S, config: TwoWireConfig) -> Result<Self> {
        if config.order.bytes_per_pixel() != 3 {
            return Err(Error::UnsupportedChannelOrder);
        }
        if config.brightness > BRIGHTNESS_MAX {
            return Err(Error::BrightnessOutOfRange {
                value: config.brightness,
            });
        }
        let needed = N * 4;
        if needed > BUF {
            return Err(Error::BufferTooSmall {
                needed,
                capacity: BUF,
            });
        }
        if Self::TRANSFERS_PER_SHOW > S::QUEUE_DEPTH {
            return Err(Error::QueueDepthExceeded {
                needed: Self::TRANSFERS_PER_SHOW,
                capacity: S::QUEUE_DEPTH,
            });
        }

        Ok(Self {
            serial,
            order: config.order,
            brightness: config.brightness,
            mode: config.mode,
            buffers: [[Rgb::default(); N]; 2],
            front: 0,
            data: [0; BUF],
            pending: 0,
        })
    }

    /// Number of pixels on the strip.
    #[must_use]
    #[allow(clippy::len_without_is_empty, reason = "a strip is not a container")]
    pub const fn len(&self) -> usize {
        N
    }

    /// Read access to the front pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb; N] {
        &self.buffers[self.front]
    }

    /// Mutable access to the front pixel buffer.
    pub fn pixels_mut(&mut self) -> &mut [Rgb; N] {
        &mut self.buffers[self.front]
    }

    /// Returns the pixel at `index` in the front buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[must_use]
    pub fn pixel(&self, index: usize) -> Rgb {
        self.buffers[self.front][index]
    }

    /// Sets the pixel at `index` in the front buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.buffers[self.front][index] = color;
    }

    /// Fills the front buffer with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.buffers[self.front].fill(color);
    }

    /// Shared access to the peripheral.
    #[must_use]
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Exclusive access to the peripheral.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Transfers queued by `show` and not yet observed complete.
    #[must_use]
    pub fn pending_transfers(&self) -> usize {
        self.pending
    }

    /// Encodes the front buffer and queues the frame's transfers.
    ///
    /// Does not block. Any queuing failure surfaces here, not from
    /// [`wait`](Self::wait); transfers queued before the failure remain
    /// drainable by `wait`. In double-buffered mode the pixel buffers swap
    /// before returning.
    ///
    /// Fails with [`Error::TransmissionInFlight`] while transfers from the
    /// previous frame are still pending.
    pub fn show(&mut self) -> Result<()> {
        if self.pending > 0 {
            return Err(Error::TransmissionInFlight);
        }

        for index in 0..N {
            let pixel = self.buffers[self.front][index];
            let at = index * 4;
            self.data[at] = HEADER_MARKER | self.brightness;
            write_ordered(
                self.order,
                pixel.r,
                pixel.g,
                pixel.b,
                0,
                &mut self.data[at + 1..at + 4],
            );
        }

        self.serial.enqueue(&START_FRAME)?;
        self.pending = 1;
        self.serial.enqueue(&self.data[..N * 4])?;
        self.pending += 1;
        for _ in 0..Self::END_CHUNKS {
            self.serial.enqueue(&END_FRAME_CHUNK)?;
            self.pending += 1;
        }

        if self.mode == BufferMode::Double {
            self.front ^= 1;
        }
        Ok(())
    }

    /// Polls every outstanding transfer to completion, in FIFO order.
    ///
    /// Each transfer gets up to `timeout`; a [`Error::Timeout`] leaves the
    /// remaining transfers pending, so `wait` can be retried.
    pub async fn wait(&mut self, timeout: Duration) -> Result<()> {
        while self.pending > 0 {
            self.serial.transfer_done(timeout).await?;
            self.pending -= 1;
        }
        Ok(())
    }

    /// Releases the driver and returns the peripheral.
    #[must_use]
    pub fn release(self) -> S {
        self.serial
    }
}
