//! Shift-register transport: push a frame of coil-command bytes, then
//! pulse the latch line so the panel chain adopts it.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

pub trait FlipDotTransport {
    type Error;

    /// Shift `frame` out, element 0 first.
    fn push_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the latch line so the shifted-in frame takes effect.
    fn latch(&mut self) -> Result<(), Self::Error>;
}

/// Drives any `embedded-hal` SPI bus plus a GPIO latch pin.
pub struct SpiTransport<SPI, LATCH> {
    spi: SPI,
    latch_pin: LATCH,
}

impl<SPI, LATCH> SpiTransport<SPI, LATCH> {
    pub fn new(spi: SPI, latch_pin: LATCH) -> Self {
        Self { spi, latch_pin }
    }
}

impl<SPI, LATCH> FlipDotTransport for SpiTransport<SPI, LATCH>
where
    SPI: SpiBus<u8>,
    LATCH: OutputPin,
{
    type Error = TransportError<SPI::Error, LATCH::Error>;

    fn push_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(frame).map_err(TransportError::Spi)
    }

    fn latch(&mut self) -> Result<(), Self::Error> {
        self.latch_pin
            .set_high()
            .map_err(TransportError::Latch)?;
        self.latch_pin.set_low().map_err(TransportError::Latch)
    }
}

#[derive(Debug)]
pub enum TransportError<SpiE, PinE> {
    Spi(SpiE),
    Latch(PinE),
}

impl<SpiE, PinE> From<SpiE> for TransportError<SpiE, PinE> {
    fn from(e: SpiE) -> Self {
        TransportError::Spi(e)
    }
}

/// Records pushed frames and latch pulses for host-side unit tests.
/// Keeps only the most recent frame — callers asserting on history
/// should capture after each `tick()` instead.
#[cfg(test)]
pub struct MockTransport {
    pub last_frame: heapless::Vec<u8, { crate::config::REQLEN }>,
    pub latch_count: usize,
    pub push_count: usize,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            last_frame: heapless::Vec::new(),
            latch_count: 0,
            push_count: 0,
        }
    }
}

#[cfg(test)]
impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FlipDotTransport for MockTransport {
    type Error = ();

    fn push_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame).map_err(|_| ())?;
        self.push_count += 1;
        Ok(())
    }

    fn latch(&mut self) -> Result<(), Self::Error> {
        self.latch_count += 1;
        Ok(())
    }
}
