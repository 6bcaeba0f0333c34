//! Multiplexed backends
//!
//! One set of segment lines is shared by all digits, and only one digit's
//! common line is active at a time. Each refresh services the next digit
//! in turn; the caller has to refresh often enough that every digit gets
//! lit roughly 100 times per second, or the display flickers.

pub mod gpio;
pub mod hc595;

pub use gpio::DynamicGpio;
pub use hc595::DynamicHc595;

/// Next digit to service after `current`
pub(crate) fn next_digit(current: usize, digits: usize) -> usize {
    if current + 1 >= digits {
        0
    } else {
        current + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Bus, Hc595Chain, MockPin};
    use crate::shift_register::ShiftRegister;
    use proptest::prelude::*;
    use sevseg_core::{Polarity, SegmentBackend, SegmentPattern};

    #[test]
    fn test_next_digit_wraps() {
        assert_eq!(next_digit(0, 4), 1);
        assert_eq!(next_digit(3, 4), 0);
        assert_eq!(next_digit(0, 1), 0);
    }

    proptest! {
        #[test]
        fn every_digit_serviced_once_per_round(digits in 2usize..=8, ticks in 0usize..60) {
            let bus = Bus::new();
            let register = ShiftRegister::new(
                MockPin::new(&bus, 0),
                MockPin::new(&bus, 1),
                MockPin::new(&bus, 2),
            );
            let mut display = DynamicHc595::new(register, digits, Polarity::CommonAnode).unwrap();
            let frame = [SegmentPattern::ALL; 8];

            bus.borrow_mut().log.clear();
            for _ in 0..ticks {
                display.refresh(&frame[..digits]).unwrap();
            }

            // Select byte of every latched tick
            let mut chain = Hc595Chain::<2>::new(0, 1, 2);
            let mut serviced = [0usize; 8];
            let mut previous = None;
            for event in bus.borrow().log.iter() {
                if chain.feed(event) {
                    let digit = chain.outputs[0].trailing_zeros() as usize;
                    prop_assert_ne!(previous, Some(digit));
                    serviced[digit] += 1;
                    previous = Some(digit);
                }
            }

            let most = serviced[..digits].iter().max().copied().unwrap_or(0);
            let least = serviced[..digits].iter().min().copied().unwrap_or(0);
            prop_assert!(most - least <= 1);
            prop_assert_eq!(serviced.iter().sum::<usize>(), ticks);
        }
    }
}
