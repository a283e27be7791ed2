pub mod modbus;
pub mod setup;
