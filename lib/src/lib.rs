pub mod error;
pub mod helpers;
pub mod lock;
pub mod reading;
pub mod readout;
pub mod registers;
pub mod sensor;

pub use error::Error;
pub use lock::DeviceLock;
pub use reading::Reading;
pub use readout::{Request, read_value};
pub use registers::{REGISTERS, Register};
pub use sensor::{Connect, ModbusSensor, Sensor, SerialConnector, SerialLink};
