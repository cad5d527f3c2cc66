//! Serial ingest ring buffer (ISR producer / foreground consumer) and
//! the host-protocol text interpreter.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::buffer::DisplayBuffers;
use crate::status::Status;

pub const RING_CAPACITY: usize = 32;
pub type RxQueue = Queue<u8, RING_CAPACITY>;
pub type RxProducer<'a> = Producer<'a, u8, RING_CAPACITY>;
pub type RxConsumer<'a> = Consumer<'a, u8, RING_CAPACITY>;

/// Substituted by the UART ISR for a framing or overrun error.
pub const NAK: u8 = 0x15;

/// Drives `cursor` and the pixel buffer from the control-byte protocol.
#[derive(Default)]
pub struct TextInterpreter {
    cursor: u8,
}

impl TextInterpreter {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Processes one received byte. Returns `true` if this byte set
    /// `Status::UPDATE`, the signal the foreground loop uses to stop
    /// draining the ring buffer.
    pub fn handle_byte(&mut self, byte: u8, bufs: &mut DisplayBuffers, status: &mut Status) -> bool {
        match byte {
            0x04 => {
                status.trigger();
            }
            0x07 => {
                bufs.fill(0xFF);
                status.flush();
                self.cursor = 0;
                status.trigger();
            }
            0x08 => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            0x09 => self.cursor = self.cursor.wrapping_add(4),
            0x0A => {
                self.cursor = 0;
                status.trigger();
            }
            0x0C => {
                self.cursor = 0;
                bufs.clear();
                status.flush();
                status.trigger();
            }
            0x0D => self.cursor = 0,
            0x10 => status.flush(),
            NAK => {}
            0x20 => self.cursor = self.cursor.wrapping_add(1),
            0x21..=0x7E => {
                if self.cursor == 0 {
                    bufs.clear();
                }
                bufs.draw_char(byte, self.cursor as usize);
                self.cursor = self.cursor.wrapping_add(4);
            }
            0x80..=0x9F => {
                bufs.draw_data(byte & 0x1F, self.cursor as usize);
                self.cursor = self.cursor.wrapping_add(1);
            }
            0xC0..=0xDF => self.cursor = byte & 0x1F,
            _ => {}
        }
        status.is_update_pending()
    }
}
