//! Column-sweep animation engine: the per-tick state machine that
//! turns a pending `buf` update into a sequence of transmitted frames.

use crate::buffer::DisplayBuffers;
use crate::config::{COL_POWER, COL_OVER, REQLEN, W};
use crate::request::RequestFrame;
use crate::status::Status;
use crate::transport::FlipDotTransport;

/// Drives `DisplayBuffers` + `RequestFrame` + `Status` through one
/// IDLE/BUSY sweep per `tick()` call. Owns only the sweep cursor; the
/// buffers/flags it acts on are passed in each call so a single
/// `Engine` can be constructed once at startup and driven from the
/// foreground loop with no re-entrancy.
pub struct Engine {
    ck: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub const fn new() -> Self {
        Self { ck: 0 }
    }

    /// Zero every buffer and transmit one all-zero frame so every coil
    /// starts de-energized before any sweep runs.
    pub fn init<T: FlipDotTransport>(
        &mut self,
        bufs: &mut DisplayBuffers,
        req: &mut RequestFrame,
        status: &mut Status,
        transport: &mut T,
    ) -> Result<(), T::Error> {
        bufs.clear();
        bufs.invalidate();
        req.relax_all();
        *status = Status::empty();
        self.ck = 0;
        transport.push_frame(&req.req)?;
        transport.latch()
    }

    pub fn abort(&self, status: &mut Status) {
        status.abort();
    }

    /// Advance the state machine by one tick.
    pub fn tick<T: FlipDotTransport>(
        &mut self,
        bufs: &mut DisplayBuffers,
        req: &mut RequestFrame,
        status: &mut Status,
        transport: &mut T,
    ) -> Result<(), T::Error> {
        if !status.is_busy() {
            if status.is_update_pending() {
                if status.contains(Status::INVALIDATE) {
                    bufs.invalidate();
                    status.remove(Status::INVALIDATE);
                }
                status.remove(Status::UPDATE);
                status.insert(Status::BUSY);
                self.ck = 0;
            }
            return Ok(());
        }

        if status.contains(Status::ABORT) || self.ck > COL_OVER {
            req.relax_all();
            transport.push_frame(&req.req)?;
            transport.latch()?;
            if status.contains(Status::ABORT) {
                bufs.clear();
            }
            *status = Status::empty();
            return Ok(());
        }

        if self.ck < W {
            req.energize_column(bufs, self.ck);
        }
        if self.ck >= COL_POWER {
            req.relax_column(self.ck - COL_POWER);
        }
        transport.push_frame(&req.req)?;
        transport.latch()?;
        self.ck += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::transport::MockTransport;

    fn run_full_sweep(
        engine: &mut Engine,
        bufs: &mut DisplayBuffers,
        req: &mut RequestFrame,
        status: &mut Status,
        transport: &mut MockTransport,
    ) {
        status.trigger();
        // IDLE -> BUSY transition tick, then every BUSY tick until idle again.
        loop {
            engine.tick(bufs, req, status, transport).unwrap();
            if status.is_idle() {
                break;
            }
        }
    }

    #[test]
    fn push_frame_is_always_req_len_bytes() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        bufs.draw_char(b'A', 0);
        run_full_sweep(&mut engine, &mut bufs, &mut req, &mut status, &mut transport);
        assert_eq!(transport.last_frame.len(), REQLEN);
    }

    #[test]
    fn full_sweep_ends_with_a_trailing_relax_and_synced_cur() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        bufs.draw_char(b'A', 0);
        run_full_sweep(&mut engine, &mut bufs, &mut req, &mut status, &mut transport);
        assert!(transport.last_frame.iter().all(|&b| b == 0));
        assert_eq!(bufs.buf, bufs.cur);
        assert!(status.is_idle());
    }

    #[test]
    fn no_reserved_pattern_ever_appears_on_the_wire() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        bufs.fill(0xFF);
        status.trigger();
        status.flush();
        loop {
            engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
            for &byte in req.req.iter() {
                for shift in [0, 2, 4, 6] {
                    assert_ne!((byte >> shift) & 0b11, 0b11);
                }
            }
            if status.is_idle() {
                break;
            }
        }
    }

    #[test]
    fn abort_ends_the_sweep_early_with_a_global_relax_and_clears_buf() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        bufs.draw_char(b'A', 0);
        status.trigger();
        // IDLE -> BUSY
        engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
        // advance to ck = 2
        engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
        engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
        engine.abort(&mut status);
        engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
        assert!(status.is_idle());
        assert!(req.req.iter().all(|&b| b == 0));
        assert!(bufs.buf.iter().all(|&b| b == 0));
        assert!(transport.last_frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn flush_then_sweep_drives_every_pixel_according_to_buf() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        bufs.fill(0xFF);
        status.trigger();
        status.flush();
        run_full_sweep(&mut engine, &mut bufs, &mut req, &mut status, &mut transport);
        assert_eq!(bufs.buf, bufs.cur);
    }

    #[test]
    fn idle_with_no_update_never_transmits() {
        let mut engine = Engine::new();
        let mut bufs = DisplayBuffers::new();
        let mut req = RequestFrame::new();
        let mut status = Status::empty();
        let mut transport = MockTransport::new();
        engine.tick(&mut bufs, &mut req, &mut status, &mut transport).unwrap();
        assert_eq!(transport.push_count, 0);
        assert_eq!(transport.latch_count, 0);
    }
}
