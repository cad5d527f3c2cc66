//! Two-button (hour/minute) debounce, generic over `embedded_hal` pins
//! so it can run against a host-side mock in tests.

use bitflags::bitflags;
use embedded_hal::digital::InputPin;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ButtonEdges: u8 {
        const MINUTE_RELEASED = 1 << 0;
        const MINUTE_PRESSED  = 1 << 1;
        const HOUR_RELEASED   = 1 << 2;
        const HOUR_PRESSED    = 1 << 3;
    }
}

/// What the foreground loop should do in response to one poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    None,
    IncrementHour,
    IncrementMinute,
    /// Both buttons pressed on the same debounce window.
    ClearAndFlush,
}

/// Classifies a set of edges. The simultaneous-press combo takes
/// priority over either single press.
pub fn classify(edges: ButtonEdges) -> ButtonAction {
    if edges.contains(ButtonEdges::MINUTE_PRESSED | ButtonEdges::HOUR_PRESSED) {
        ButtonAction::ClearAndFlush
    } else if edges.contains(ButtonEdges::MINUTE_PRESSED) {
        ButtonAction::IncrementMinute
    } else if edges.contains(ButtonEdges::HOUR_PRESSED) {
        ButtonAction::IncrementHour
    } else {
        ButtonAction::None
    }
}

/// Debounces two active-low, pulled-up buttons by comparing consecutive
/// raw samples: an edge only counts once the pin has read the same
/// level on two consecutive polls.
pub struct Debouncer {
    prev_high: (bool, bool),
    state_high: (bool, bool),
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            prev_high: (true, true),
            state_high: (true, true),
        }
    }

    /// Call once per observed system tick.
    pub fn poll<MIN, HOUR>(
        &mut self,
        minute_pin: &mut MIN,
        hour_pin: &mut HOUR,
    ) -> Result<ButtonEdges, EitherError<MIN::Error, HOUR::Error>>
    where
        MIN: InputPin,
        HOUR: InputPin,
    {
        let min_high = minute_pin.is_high().map_err(EitherError::A)?;
        let hour_high = hour_pin.is_high().map_err(EitherError::B)?;
        let raw = (min_high, hour_high);
        let mut edges = ButtonEdges::empty();

        if raw == self.prev_high {
            if raw.0 != self.state_high.0 {
                edges.insert(if raw.0 {
                    ButtonEdges::MINUTE_RELEASED
                } else {
                    ButtonEdges::MINUTE_PRESSED
                });
            }
            if raw.1 != self.state_high.1 {
                edges.insert(if raw.1 {
                    ButtonEdges::HOUR_RELEASED
                } else {
                    ButtonEdges::HOUR_PRESSED
                });
            }
            self.state_high = raw;
        }
        self.prev_high = raw;
        Ok(edges)
    }
}

#[derive(Debug)]
pub enum EitherError<A, B> {
    A(A),
    B(B),
}
