use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Drives the status LED: high for a fixed time, then low again.
///
/// The pin is driven low on construction and after every pulse.
pub struct AckPulse<P, D> {
    pin: P,
    delay: D,
    duration: Duration,
}

impl<P: OutputPin, D: DelayNs> AckPulse<P, D> {
    pub fn new(mut pin: P, delay: D, duration: Duration) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            delay,
            duration,
        })
    }

    /// Blocks for the whole pulse.
    pub fn pulse(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        // `delay_ns` covers a little over 4s, longer pulses fall back to microseconds.
        match u32::try_from(self.duration.as_nanos()) {
            Ok(ns) => self.delay.delay_ns(ns),
            Err(_) => self
                .delay
                .delay_us(u32::try_from(self.duration.as_micros()).unwrap_or(u32::MAX)),
        }
        self.pin.set_low()
    }

    /// Gives back the pin and the delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

/// [`DelayNs`] on top of `std::thread::sleep`, for hosted targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}
