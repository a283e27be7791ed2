use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::Error;
use crate::lock::DeviceLock;
use crate::reading::Reading;
use crate::registers::Register;
use crate::sensor::{Connect, Sensor, SerialLink};

/// One register to read from one sensor.
#[derive(Clone, Debug)]
pub struct Request {
    pub register: &'static Register,
    pub link: SerialLink,
}

/// Lock the device, open it, read the register and scale the value.
///
/// The lock is held across the whole open-and-read sequence and released on
/// every return path, including failures inside it.
pub async fn read_value<C: Connect>(
    connector: &C,
    request: &Request,
    lock_dir: &Path,
    lock_timeout: Duration,
) -> Result<Reading, Error> {
    let _lock = DeviceLock::acquire_in(lock_dir, &request.link.device, lock_timeout).await?;

    let mut sensor = connector.connect(&request.link).await?;
    let raw = sensor.read_register(request.register.index).await?;
    debug!(
        "{} (register {}) on {} = {raw}",
        request.register.name, request.register.index, request.link.device
    );

    Ok(Reading::new(request.register, raw))
}
