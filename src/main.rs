//! SMART Response XE firmware image
//!
//! Wires the ATmega128RFA1 peripherals into the event kernel and runs a
//! small demo application that reports every event on screen.
#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use srxe_kernel::clock::{TimeSource, CLOCK};
    use srxe_kernel::drivers::{BatterySensor, Board, Display, Font, Power, PowerButton, SerialConsole};
    use srxe_kernel::hal::{self, Adc, BatteryChannel, Delay, PowerButtonPin};
    use srxe_kernel::logger::{self, Record};
    use srxe_kernel::{Context, Event, EventHandler, EventKind, HandlerError, Kernel, KernelConfig, PanicOutcome};
    use ufmt::uwrite;

    struct SrxePower {
        button: PowerButton<PowerButtonPin>,
        battery: BatterySensor<Adc, Adc, BatteryChannel>,
        sleep: hal::PowerDown,
    }

    impl Power for SrxePower {
        fn button_pressed(&mut self) -> bool {
            self.button.poll()
        }

        fn battery_level(&mut self) -> u16 {
            self.battery.level()
        }

        fn sleep(&mut self) {
            self.sleep.enter();
            self.button.resync();
        }
    }

    struct Srxe {
        console: SerialConsole,
        power: SrxePower,
        delay: Delay,
    }

    impl TimeSource for Srxe {
        fn now_ms(&self) -> u32 {
            CLOCK.now_ms()
        }
    }

    impl Board for Srxe {
        type Display = SerialConsole;
        type Keyboard = SerialConsole;
        type Power = SrxePower;
        type Delay = Delay;

        fn display(&mut self) -> &mut SerialConsole {
            &mut self.console
        }

        fn keyboard(&mut self) -> &mut SerialConsole {
            &mut self.console
        }

        fn power(&mut self) -> &mut SrxePower {
            &mut self.power
        }

        fn delay(&mut self) -> &mut Delay {
            &mut self.delay
        }

        fn reboot(&mut self) -> ! {
            hal::reboot()
        }
    }

    fn serial_sink(record: &Record<'_>) {
        let mut console = SerialConsole::attached();
        let _ = uwrite!(console, "[{} {}] ", record.level.tag(), record.timestamp_ms);
        console.write_line(record.text);
    }

    /// Demo application: shows the last event, a call counter and the last key
    struct EventMonitor {
        calls: u32,
    }

    impl EventHandler<Srxe> for EventMonitor {
        fn handle(&mut self, event: &Event, cx: &mut Context<'_, Srxe>) -> Result<(), HandlerError> {
            self.calls = self.calls.wrapping_add(1);
            let last_key = cx.last_pressed_key();
            let display = cx.display();

            if event.kind() == EventKind::KeyPress {
                display.clear();
            }
            display.set_font(Font::Medium);
            let row = display.font_height();

            let mut line = srxe_kernel::logger::LineBuffer::<32>::new();
            let w = &mut line;
            let _ = uwrite!(w, "{}", event);
            display.put_string("Last event:", 30, row);
            display.put_string(line.as_str(), 30, row * 2);

            line.clear();
            let w = &mut line;
            let _ = uwrite!(w, "calls {} key {}", self.calls, last_key);
            display.put_string(line.as_str(), 30, row * 3);
            Ok(())
        }
    }

    #[avr_device::entry]
    fn main() -> ! {
        hal::timer::init_timebase();

        let console = SerialConsole::new();
        logger::set_sink(serial_sink);

        let board = Srxe {
            console,
            power: SrxePower {
                button: PowerButton::new(PowerButtonPin::new()),
                battery: BatterySensor::new(Adc::new(), BatteryChannel),
                sleep: hal::PowerDown::new(),
            },
            delay: Delay::new(),
        };

        let mut app = EventMonitor { calls: 0 };
        let mut kernel: Kernel<'_, Srxe> = Kernel::new(board, KernelConfig::new());
        if let Err(err) = kernel.register_event_handler(&mut app) {
            match kernel.kernel_panic(err.message(), err.code(), true) {
                PanicOutcome::Resume => {}
                PanicOutcome::Reboot | PanicOutcome::PowerOff => kernel.board_mut().reboot(),
            }
        }
        kernel.set_refresh_timer(500);
        kernel.run()
    }
}

/// The firmware image only exists for AVR targets
#[cfg(not(target_arch = "avr"))]
fn main() {}
