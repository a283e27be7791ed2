use std::fmt;

use crate::error::Error;

/// One named slot in the sensor's input-register space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Register {
    pub name: &'static str,
    pub index: u16,
    pub unit: &'static str,
    /// The physical value was multiplied by this before being stored.
    pub multiplier: u16,
    pub signed: bool,
}

impl Register {
    const fn new(name: &'static str, index: u16, unit: &'static str) -> Register {
        Register {
            name,
            index,
            unit,
            multiplier: 1,
            signed: false,
        }
    }

    const fn scaled(mut self, multiplier: u16) -> Register {
        self.multiplier = multiplier;
        self
    }

    const fn signed(mut self) -> Register {
        self.signed = true;
        self
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:<26} {:>3} {:<7} x{}",
            self.name, self.index, self.unit, self.multiplier
        )
    }
}

pub const REGISTERS: [Register; 21] = [
    // Climate, from the SHT4x
    Register::new("T", 0, "°C").scaled(10).signed(),
    Register::new("T_F", 1, "F").scaled(10).signed(),
    Register::new("RH", 2, "%"),

    // Gases
    Register::new("CO2", 3, "ppm"),
    Register::new("VOC_INDEX", 4, ""), // Sensirion index, 1 to 500, average 100
    Register::new("VOC_TICKS", 5, ""),

    // Particulate matter
    Register::new("PMC_MASS_1_0", 6, "ug/m^3"),
    Register::new("PMC_MASS_2_5", 7, "ug/m^3"),
    Register::new("PMC_MASS_4_0", 8, "ug/m^3"),
    Register::new("PMC_MASS_10_0", 9, "ug/m^3"),
    Register::new("PMC_NUMBER_0_5", 10, "1/m^3"),
    Register::new("PMC_NUMBER_1_0", 11, "1/m^3"),
    Register::new("PMC_NUMBER_2_5", 12, "1/m^3"),
    Register::new("PMC_NUMBER_4_0", 13, "1/m^3"),
    Register::new("PMC_NUMBER_10_0", 14, "1/m^3"),
    Register::new("PMC_TYPICAL_PARTICLE_SIZE", 15, "nm"),

    // Per-sensor error codes, 0 if no error
    Register::new("READ_ERR_T", 16, ""),
    Register::new("READ_ERR_RH", 17, ""),
    Register::new("READ_ERR_CO2", 18, ""),
    Register::new("READ_ERR_VOC", 19, ""),
    Register::new("READ_ERR_PMC", 20, ""),
];

#[must_use]
pub fn all() -> &'static [Register] {
    &REGISTERS
}

/// Look a register up by its exact name.
pub fn lookup(name: &str) -> Result<&'static Register, Error> {
    REGISTERS
        .iter()
        .find(|register| register.name == name)
        .ok_or_else(|| Error::InvalidRegister(name.to_owned()))
}
