use futures::future;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_modbus::prelude::*;
use tokio_serial::SerialStream;

pub type InputRegisters = Arc<Mutex<HashMap<u16, u16>>>;

/// Serves input registers from a shared map. Reading anything not in the map
/// gets `IllegalDataAddress`, like a sensor asked for a register it lacks.
struct ModbusService {
    input_registers: InputRegisters,
}

impl tokio_modbus::server::Service for ModbusService {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, req: Self::Request) -> Self::Future {
        let res = match req {
            Request::ReadInputRegisters(addr, cnt) => {
                let values = self
                    .input_registers
                    .lock()
                    .expect("mock register map poisoned");
                (addr..addr.saturating_add(cnt))
                    .map(|reg| values.get(&reg).copied())
                    .collect::<Option<Vec<u16>>>()
                    .map(Response::ReadInputRegisters)
                    .ok_or(ExceptionCode::IllegalDataAddress)
            }
            _ => Err(ExceptionCode::IllegalFunction),
        };
        future::ready(res)
    }
}

/// A Modbus RTU server on one end of a pseudo-terminal pair. The other end is
/// handed to the client under test.
pub struct ModbusServer {
    pub input_registers: InputRegisters,
    pub(crate) join_handle: JoinHandle<io::Result<()>>,
}

impl ModbusServer {
    pub fn start() -> (ModbusServer, SerialStream) {
        let (server_port, client_port) =
            SerialStream::pair().expect("unable to create a pseudo-terminal pair");

        let input_registers = InputRegisters::default();
        let service = ModbusService {
            input_registers: input_registers.clone(),
        };
        let server = tokio_modbus::server::rtu::Server::new(server_port).serve_forever(service);

        let modbus_server = ModbusServer {
            input_registers,
            join_handle: tokio::spawn(server),
        };
        (modbus_server, client_port)
    }

    pub fn set(&self, values: &[(u16, u16)]) {
        let mut registers = self
            .input_registers
            .lock()
            .expect("mock register map poisoned");
        registers.extend(values.iter().copied());
    }
}

impl Drop for ModbusServer {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}
