use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_modbus::client::{Context, Reader, rtu};
use tokio_modbus::{ExceptionCode, Slave};
use tokio_serial::{DataBits, Parity, SerialStream, StopBits};

use crate::error::Error;

pub const BAUD_RATE: u32 = 19200;
pub const DEV_DIR: &str = "/dev";
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);
const DATA_BITS: DataBits = DataBits::Eight;
const STOP_BITS: StopBits = StopBits::One;
const PARITY: Parity = Parity::None;

/// Read while negotiating; every sensor answers for its temperature.
const PROBE_REGISTER: u16 = 0;

/// Where and how to reach one sensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialLink {
    pub address: u8,
    pub baud_rate: u32,
    /// Device file name below `/dev`, e.g. `ttyUSB0`.
    pub device: String,
}

impl SerialLink {
    #[must_use]
    pub fn new(address: u8, device: &str) -> SerialLink {
        SerialLink {
            address,
            baud_rate: BAUD_RATE,
            device: device.to_owned(),
        }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        PathBuf::from(DEV_DIR).join(&self.device)
    }
}

#[async_trait]
pub trait Sensor: Send {
    async fn read_register(&mut self, index: u16) -> Result<u16, Error>;
}

#[async_trait]
pub trait Connect: Sync {
    type Sensor: Sensor;

    /// Open the link and make sure something answers on it.
    async fn connect(&self, link: &SerialLink) -> Result<Self::Sensor, Error>;
}

/// A sensor on a Modbus RTU link.
pub struct ModbusSensor {
    ctx: Context,
    device: String,
    response_timeout: Duration,
}

impl fmt::Debug for ModbusSensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ModbusSensor")
            .field("device", &self.device)
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}

impl ModbusSensor {
    pub fn attach<T>(transport: T, link: &SerialLink) -> ModbusSensor
    where
        T: AsyncRead + AsyncWrite + Debug + Unpin + Send + 'static,
    {
        ModbusSensor {
            ctx: rtu::attach_slave(transport, Slave(link.address)),
            device: link.device.clone(),
            response_timeout: RESPONSE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_response_timeout(mut self, response_timeout: Duration) -> ModbusSensor {
        self.response_timeout = response_timeout;
        self
    }

    /// A sensor that does not answer a well-known register is treated as busy,
    /// whatever the reason.
    pub async fn negotiate(&mut self) -> Result<(), Error> {
        match self.read_register(PROBE_REGISTER).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("{} did not answer the probe: {e}", self.device);
                Err(Error::busy(&self.device, e))
            }
        }
    }
}

#[async_trait]
impl Sensor for ModbusSensor {
    async fn read_register(&mut self, index: u16) -> Result<u16, Error> {
        let limit = self.response_timeout;
        let response = tokio::time::timeout(limit, self.ctx.read_input_registers(index, 1))
            .await
            .map_err(|_| Error::NoResponse {
                index,
                reason: format!("no answer within {limit:?}"),
            })?;

        match response {
            Ok(Ok(words)) => words.first().copied().ok_or_else(|| Error::NoResponse {
                index,
                reason: "empty response".to_owned(),
            }),
            Ok(Err(code)) => Err(exception_error(&self.device, index, code)),
            Err(e) => Err(Error::NoResponse {
                index,
                reason: e.to_string(),
            }),
        }
    }
}

fn exception_error(device: &str, index: u16, code: ExceptionCode) -> Error {
    let reason = format!("{code:?}");
    match code {
        ExceptionCode::IllegalFunction
        | ExceptionCode::IllegalDataAddress
        | ExceptionCode::IllegalDataValue => Error::IllegalRequest { index, reason },
        ExceptionCode::ServerDeviceBusy => {
            Error::busy(device, format!("{reason} reading register {index}"))
        }
        _ => Error::DeviceFault { index, reason },
    }
}

/// Opens sensors on real serial ports.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialConnector;

#[async_trait]
impl Connect for SerialConnector {
    type Sensor = ModbusSensor;

    async fn connect(&self, link: &SerialLink) -> Result<ModbusSensor, Error> {
        let path = link.path();
        let builder = tokio_serial::new(path.to_string_lossy(), link.baud_rate)
            .data_bits(DATA_BITS)
            .stop_bits(STOP_BITS)
            .parity(PARITY)
            .timeout(RESPONSE_TIMEOUT);
        let port = SerialStream::open(&builder).map_err(|e| {
            warn!("Could not open port {}: {e}", path.display());
            Error::busy(&link.device, e)
        })?;
        debug!(
            "Opened {} at {} baud, slave {}.",
            path.display(),
            link.baud_rate,
            link.address
        );

        let mut sensor = ModbusSensor::attach(port, link);
        sensor.negotiate().await?;
        Ok(sensor)
    }
}
