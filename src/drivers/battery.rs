use core::marker::PhantomData;
use embedded_hal::adc::{Channel, OneShot};

/// Battery voltage read through one ADC channel
pub struct BatterySensor<ADC, A, C> {
    adc: A,
    channel: C,
    last_level: u16,
    _adc: PhantomData<ADC>,
}

impl<ADC, A, C> BatterySensor<ADC, A, C>
where
    A: OneShot<ADC, u16, C>,
    C: Channel<ADC>,
{
    pub fn new(adc: A, channel: C) -> Self {
        Self {
            adc,
            channel,
            last_level: 0,
            _adc: PhantomData,
        }
    }

    /// Runs one conversion, blocking until the ADC is done.
    ///
    /// A failed conversion repeats the previous reading so it never shows up
    /// as a battery change.
    pub fn level(&mut self) -> u16 {
        match nb::block!(self.adc.read(&mut self.channel)) {
            Ok(level) => self.last_level = level,
            Err(_) => warn!("battery conversion failed"),
        }
        self.last_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeAdc {
        readings: std::vec::Vec<nb::Result<u16, ()>>,
    }

    struct Vbat;

    impl Channel<FakeAdc> for Vbat {
        type ID = u8;

        fn channel() -> u8 {
            0
        }
    }

    impl OneShot<FakeAdc, u16, Vbat> for FakeAdc {
        type Error = ();

        fn read(&mut self, _pin: &mut Vbat) -> nb::Result<u16, ()> {
            self.readings.remove(0)
        }
    }

    #[test]
    fn blocks_until_conversion_completes() {
        let adc = FakeAdc {
            readings: std::vec![Err(nb::Error::WouldBlock), Err(nb::Error::WouldBlock), Ok(812)],
        };
        let mut sensor = BatterySensor::new(adc, Vbat);
        assert_eq!(sensor.level(), 812);
    }

    #[test]
    fn failed_conversion_repeats_previous_level() {
        let adc = FakeAdc {
            readings: std::vec![Ok(700), Err(nb::Error::Other(()))],
        };
        let mut sensor = BatterySensor::new(adc, Vbat);
        assert_eq!(sensor.level(), 700);
        assert_eq!(sensor.level(), 700);
    }
}
