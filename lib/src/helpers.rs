/// Some registers can go negative. The sensor stores them as two's complement
/// in an unsigned 16-bit word; the indication you haven't done this is values
/// close to 2^16, e.g. 6552.6°C for a frosty morning.
#[must_use]
pub fn signed(raw_value: u16) -> i32 {
    i32::from(raw_value.cast_signed())
}

/// Number of decimals that recover the precision a register was pre-scaled by.
/// A multiplier of 10 keeps one decimal, 100 keeps two, 20 needs two as well
/// (ceil(log10(20))). Multipliers of 0 or 1 give whole numbers.
#[must_use]
pub fn decimal_digits(multiplier: u16) -> usize {
    let mut digits = 0;
    let mut power: u32 = 1;
    while power < u32::from(multiplier) {
        power *= 10;
        digits += 1;
    }
    digits
}

/// Lock files live side by side in one directory, so a device name such as
/// `serial/by-id/usb-FTDI` must not introduce path separators.
#[must_use]
pub fn flat_name(device: &str) -> String {
    device.trim().trim_start_matches("/dev/").replace('/', "_")
}
