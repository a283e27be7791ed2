use crate::modbus::ModbusServer;
use async_trait::async_trait;
use std::sync::Mutex;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio_serial::SerialStream;
use veles_lib::{Connect, Error, ModbusSensor, SerialLink};

pub const TEST_ADDRESS: u8 = 109;
pub const TEST_DEVICE: &str = "ttyUSB0";

/// Hands out the client end of the pseudo-terminal instead of opening `/dev`.
pub struct PtyConnector {
    port: Mutex<Option<SerialStream>>,
}

#[async_trait]
impl Connect for PtyConnector {
    type Sensor = ModbusSensor;

    async fn connect(&self, link: &SerialLink) -> Result<ModbusSensor, Error> {
        let port = self
            .port
            .lock()
            .expect("connector poisoned")
            .take()
            .ok_or_else(|| Error::DeviceBusy {
                device: link.device.clone(),
                reason: "port already opened".to_owned(),
            })?;
        let mut sensor = ModbusSensor::attach(port, link);
        sensor.negotiate().await?;
        Ok(sensor)
    }
}

pub struct TestContext {
    pub modbus_server: ModbusServer,
    pub connector: PtyConnector,
    pub lock_dir: TempDir,
}

impl TestContext {
    pub fn link(&self) -> SerialLink {
        SerialLink::new(TEST_ADDRESS, TEST_DEVICE)
    }
}

#[async_trait]
impl AsyncTestContext for TestContext {
    async fn setup() -> TestContext {
        let (modbus_server, client_port) = ModbusServer::start();
        TestContext {
            modbus_server,
            connector: PtyConnector {
                port: Mutex::new(Some(client_port)),
            },
            lock_dir: TempDir::new().expect("unable to create a lock directory"),
        }
    }
}
