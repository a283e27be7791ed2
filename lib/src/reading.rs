use std::fmt;

use crate::helpers::{decimal_digits, signed};
use crate::registers::Register;

/// A single measurement, ready to print.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub raw: i32,
    pub scaled: f64,
    pub unit: &'static str,
    pub digits: usize,
}

impl Reading {
    /// Undo the register's pre-scaling of the raw word.
    #[must_use]
    pub fn new(register: &Register, raw_word: u16) -> Reading {
        let raw = if register.signed {
            signed(raw_word)
        } else {
            i32::from(raw_word)
        };
        let multiplier = register.multiplier.max(1);
        Reading {
            raw,
            scaled: f64::from(raw) / f64::from(multiplier),
            unit: register.unit,
            digits: decimal_digits(multiplier),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.*}{}", self.digits, self.scaled, self.unit)
    }
}
