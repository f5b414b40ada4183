use avr_device::atmega128rfa1::USART0;
use core::cell::RefCell;
use critical_section::Mutex;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};
use crate::queue::BoundedQueue;

const RX_CAPACITY: usize = 32;

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

/// UCSR0A data register empty
const UDRE0: u8 = 1 << 5;
/// UCSR0B: RX complete interrupt, receiver and transmitter enabled
const RX_TX_ENABLE: u8 = (1 << 7) | (1 << 4) | (1 << 3);
/// UCSR0C: 8 data bits, no parity, one stop bit
const FRAME_8N1: u8 = 0b11 << 1;

/// Received bytes, filled by the RX interrupt. `None` until the UART is set up.
static RX_QUEUE: Mutex<RefCell<Option<BoundedQueue<u8, RX_CAPACITY>>>> =
    Mutex::new(RefCell::new(None));

/// USART0, polled transmit and interrupt-driven receive
pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new() -> Self {
        critical_section::with(|cs| {
            RX_QUEUE.borrow(cs).replace(Some(BoundedQueue::new()));
        });

        let usart = unsafe { &*USART0::ptr() };
        usart.ubrr0.write(|w| unsafe { w.bits(UBRR) });
        usart.ucsr0c.write(|w| unsafe { w.bits(FRAME_8N1) });
        usart.ucsr0b.write(|w| unsafe { w.bits(RX_TX_ENABLE) });
        Self { _private: () }
    }

    /// Handle to an already configured USART0
    pub(crate) fn attached() -> Self {
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        let usart = unsafe { &*USART0::ptr() };
        while usart.ucsr0a.read().bits() & UDRE0 == 0 {}
        usart.udr0.write(|w| unsafe { w.bits(byte) });
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        critical_section::with(|cs| {
            RX_QUEUE
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .and_then(|queue| queue.dequeue().ok())
        })
    }

    pub fn write_str(&mut self, s: &str) {
        s.bytes().for_each(|byte| self.write_byte(byte));
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

#[avr_device::interrupt(atmega128rfa1)]
fn USART0_RX() {
    let byte = unsafe { (*USART0::ptr()).udr0.read().bits() };
    critical_section::with(|cs| {
        if let Some(queue) = RX_QUEUE.borrow(cs).borrow_mut().as_mut() {
            // Dropped while full
            let _ = queue.enqueue(byte);
        }
    });
}
