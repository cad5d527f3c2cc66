//! Display status bit-field: `UPDATE`, `INVALIDATE`, `BUSY`, `ABORT`.
//!
//! Kept as a `bitflags` value rather than raw bit positions so callers
//! only see `trigger`/`flush`/`abort`/`is_*` operations.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// A sweep has been requested and is waiting for the engine to pick it up.
        const UPDATE     = 1 << 0;
        /// Force every pixel to be re-energized on the next sweep.
        const INVALIDATE = 1 << 1;
        /// A sweep is in progress.
        const BUSY       = 1 << 2;
        /// The in-progress sweep should end on the next tick with a full relax.
        const ABORT      = 1 << 3;
    }
}

impl Status {
    /// `trigger()`: request a sweep.
    #[inline]
    pub fn trigger(&mut self) {
        self.insert(Status::UPDATE);
    }

    /// `flush()`: force full re-energize on the next sweep.
    #[inline]
    pub fn flush(&mut self) {
        self.insert(Status::INVALIDATE);
    }

    /// `abort()`: cancel the in-progress sweep.
    #[inline]
    pub fn abort(&mut self) {
        self.insert(Status::ABORT);
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.contains(Status::BUSY)
    }

    #[inline]
    pub fn is_update_pending(&self) -> bool {
        self.contains(Status::UPDATE)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.is_busy() && !self.is_update_pending()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn trigger_and_flush_only_or_bits() {
        let mut s = Status::BUSY;
        s.trigger();
        s.flush();
        assert!(s.contains(Status::BUSY | Status::UPDATE | Status::INVALIDATE));
    }

    #[test]
    fn idle_requires_no_busy_and_no_update() {
        assert!(Status::empty().is_idle());
        assert!(!Status::BUSY.is_idle());
        assert!(!Status::UPDATE.is_idle());
    }
}
