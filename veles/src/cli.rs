use clap::Parser;
use veles_lib::{Error, Request, SerialLink, registers};

pub const DEFAULT_REGISTER: &str = "CO2";
pub const DEFAULT_ADDRESS: u8 = 109;
pub const DEFAULT_DEVICE: &str = "ttyUSB0";

#[derive(Debug, Parser)]
#[command(
    name = "veles",
    about = "Read one measurement register from a Modbus air-quality sensor",
    override_usage = "veles [register name] [address] [device name]",
    help_template = "usage: {usage}",
    disable_version_flag = true
)]
pub struct Cli {
    /// Register to read, e.g. CO2 or T
    #[arg(default_value = DEFAULT_REGISTER)]
    pub register: String,

    /// Modbus slave address of the sensor
    #[arg(default_value_t = DEFAULT_ADDRESS, value_parser = clap::value_parser!(u8).range(1..=247))]
    pub address: u8,

    /// Serial device below /dev
    #[arg(default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// List the known registers and exit
    #[arg(short, long)]
    pub list: bool,

    /// Log debug detail to syslog
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check the register name before anything touches the lock or the device.
    pub fn resolve(&self) -> Result<Request, Error> {
        let register = registers::lookup(&self.register)?;
        Ok(Request {
            register,
            link: SerialLink::new(self.address, &self.device),
        })
    }
}
