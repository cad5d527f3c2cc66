//! Flip-dot display firmware entry point.
//!
//! Wiring assumed:
//! - Shift-register chain: SPI (MOSI/SCK) + GPIO latch pin
//! - RTC: I2C (DS3231 at 0x68)
//! - Buttons: two GPIO inputs, pulled up, active low (minute, hour)
//! - Host link: UART0, 9600 8N1

//% CHIPS: esp32 esp32c2 esp32c3 esp32c6 esp32h2 esp32s2 esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use critical_section::Mutex;
use esp_backtrace as _;
use esp_hal::{
    gpio::{Input, InputConfig, Pull},
    handler, main, ram,
    i2c::master::{Config as I2cConfig, I2c},
    spi::master::{Config as SpiConfig, Spi},
    spi::Mode as SpiMode,
    time::Rate,
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart},
};

use flipdot_firmware::button::{self, ButtonAction, Debouncer};
use flipdot_firmware::buffer::DisplayBuffers;
use flipdot_firmware::engine::Engine;
use flipdot_firmware::request::RequestFrame;
use flipdot_firmware::rtc::{DateTime, Ds3231};
use flipdot_firmware::serial::{RxQueue, TextInterpreter, NAK};
use flipdot_firmware::status::Status;
use flipdot_firmware::transport::SpiTransport;

esp_bootloader_esp_idf::esp_app_desc!();

/// Free-running tick counter, advanced once per timer interrupt.
static TICK: AtomicU8 = AtomicU8::new(0);

static RX_QUEUE: Mutex<RefCell<RxQueue>> = Mutex::new(RefCell::new(RxQueue::new()));

static UART_RX: Mutex<RefCell<Option<Uart<'static, esp_hal::Blocking>>>> =
    Mutex::new(RefCell::new(None));

#[handler]
#[ram]
fn timer_handler() {
    TICK.fetch_add(1, Ordering::Relaxed);
    // Acknowledgment of the underlying timer peripheral's interrupt is
    // handled by esp-hal's timer driver on `wait`/next-match re-arm.
}

#[handler]
#[ram]
fn uart_handler() {
    critical_section::with(|cs| {
        let mut binding = UART_RX.borrow_ref_mut(cs);
        let Some(uart) = binding.as_mut() else { return };

        let mut byte = [0u8; 1];
        let received = match uart.read_bytes(&mut byte) {
            Ok(1) => byte[0],
            _ => NAK,
        };

        let mut queue = RX_QUEUE.borrow_ref_mut(cs);
        let _ = queue.enqueue(received);
        let _ = uart.write(&[received]);
    });
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let mut alarm = timg0.timer0;
    alarm.set_interrupt_handler(timer_handler);

    let uart_config = UartConfig::default().with_baudrate(9600);
    let mut uart = Uart::new(peripherals.UART0, uart_config)
        .unwrap()
        .with_rx(peripherals.GPIO44)
        .with_tx(peripherals.GPIO43);
    uart.set_interrupt_handler(uart_handler);
    uart.listen_rx_fifo_full();
    critical_section::with(|cs| {
        UART_RX.borrow_ref_mut(cs).replace(uart);
    });

    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_khz(500))
            .with_mode(SpiMode::_0),
    )
    .unwrap()
    .with_mosi(peripherals.GPIO11)
    .with_sck(peripherals.GPIO12);
    let latch_pin = esp_hal::gpio::Output::new(
        peripherals.GPIO10,
        esp_hal::gpio::Level::Low,
        esp_hal::gpio::OutputConfig::default(),
    );
    let mut transport = SpiTransport::new(spi, latch_pin);

    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .unwrap()
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9);
    let mut rtc = Ds3231::new(i2c);

    let button_cfg = InputConfig::default().with_pull(Pull::Up);
    let mut minute_pin = Input::new(peripherals.GPIO4, button_cfg);
    let mut hour_pin = Input::new(peripherals.GPIO5, button_cfg);

    let mut bufs = DisplayBuffers::new();
    let mut req = RequestFrame::new();
    let mut status = Status::empty();
    let mut engine = Engine::new();
    let mut interp = TextInterpreter::new();
    let mut debouncer = Debouncer::new();

    engine
        .init(&mut bufs, &mut req, &mut status, &mut transport)
        .ok();
    esp_println::println!("flipdot: display initialized, all coils relaxed");

    let mut last_tick = TICK.load(Ordering::Relaxed);
    let mut last_minute_seen: Option<u8> = None;

    loop {
        let current_tick = TICK.load(Ordering::Relaxed);
        if current_tick != last_tick {
            last_tick = current_tick;

            engine
                .tick(&mut bufs, &mut req, &mut status, &mut transport)
                .ok();

            if let Ok(edges) = debouncer.poll(&mut minute_pin, &mut hour_pin) {
                match button::classify(edges) {
                    ButtonAction::IncrementMinute => {
                        if let Ok((mut dt, _)) = rtc.read_datetime() {
                            dt.second = 0;
                            dt.minute = (dt.minute + 1) % 60;
                            if rtc.set_datetime(&dt).is_ok() {
                                esp_println::println!("flipdot: minute button -> {:02}:{:02}", dt.hour, dt.minute);
                            }
                        }
                    }
                    ButtonAction::IncrementHour => {
                        if let Ok((mut dt, _)) = rtc.read_datetime() {
                            dt.hour = (dt.hour + 1) % 24;
                            if rtc.set_datetime(&dt).is_ok() {
                                esp_println::println!("flipdot: hour button -> {:02}:{:02}", dt.hour, dt.minute);
                            }
                        }
                    }
                    ButtonAction::ClearAndFlush => {
                        esp_println::println!("flipdot: both buttons -> clear + flush");
                        status.trigger();
                        status.flush();
                        bufs.clear();
                    }
                    ButtonAction::None => {}
                }
            }

            if let Ok((dt, osf)) = rtc.read_datetime() {
                if !osf && status.is_idle() && Some(dt.minute) != last_minute_seen {
                    last_minute_seen = Some(dt.minute);
                    queue_time_update(&dt);
                }
            }
        }

        if status.is_idle() {
            while let Some(byte) = critical_section::with(|cs| RX_QUEUE.borrow_ref_mut(cs).dequeue())
            {
                if interp.handle_byte(byte, &mut bufs, &mut status) {
                    break;
                }
            }
        }
    }
}

/// Formats `HH:MM` as a sequence of control/data bytes and pushes them
/// onto the same ring buffer a host message would arrive on.
fn queue_time_update(dt: &DateTime) {
    let mut push = |byte: u8| {
        critical_section::with(|cs| {
            let _ = RX_QUEUE.borrow_ref_mut(cs).enqueue(byte);
        });
    };

    push(0x0D); // CR: cursor = 0
    // First glyph must land at cursor 0 so the 0x21..0x7E auto-clear in
    // serial.rs fires and the previous minute's pixels don't linger.
    push(b'0' + (dt.hour / 10));
    push(b'0' + (dt.hour % 10));
    push(0x08); // BS
    push(b':');
    push(0x08); // BS
    push(b'0' + (dt.minute / 10));
    push(b'0' + (dt.minute % 10));
    push(0x0A); // LF: trigger
}
