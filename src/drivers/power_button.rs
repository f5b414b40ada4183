use embedded_hal::digital::v2::InputPin;

const DEBOUNCE_SAMPLES: u8 = 3;

/// Debounced, active-low power button.
///
/// [`PowerButton::poll`] reports each press once, on its falling edge, so a
/// button still held after waking the device does not put it straight back
/// to sleep.
pub struct PowerButton<P> {
    pin: P,
    pressed: bool,
    debounce_counter: u8,
}

impl<P: InputPin> PowerButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            pressed: false,
            debounce_counter: 0,
        }
    }

    pub fn poll(&mut self) -> bool {
        // A read error counts as released
        let raw_state = self.pin.is_low().unwrap_or(false);

        if raw_state != self.pressed {
            self.debounce_counter = self.debounce_counter.saturating_add(1);
            if self.debounce_counter >= DEBOUNCE_SAMPLES {
                self.pressed = raw_state;
                self.debounce_counter = 0;
                return raw_state;
            }
        } else {
            self.debounce_counter = 0;
        }
        false
    }

    /// Adopts the current pin level without reporting an edge.
    ///
    /// Call after waking from power-down: the press that woke the core is
    /// usually still held and must not count as a new press.
    pub fn resync(&mut self) {
        self.pressed = self.pin.is_low().unwrap_or(false);
        self.debounce_counter = 0;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn free(self) -> P {
        self.pin
    }
}
