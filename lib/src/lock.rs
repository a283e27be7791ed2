//! Advisory per-device lock.
//!
//! Every tool that talks to a serial device first takes an exclusive `flock`
//! on `/tmp/veles_<device>.lock`. Only cooperating processes respect it; the
//! serial port itself is never opened exclusively. The lock is released when
//! the [`DeviceLock`] is dropped, or by the kernel when the process exits.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use crate::error::Error;
use crate::helpers::flat_name;

pub const LOCK_DIR: &str = "/tmp";
pub const LOCK_TIMEOUT: Duration = Duration::from_millis(1500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct DeviceLock {
    file: File,
    path: PathBuf,
}

impl DeviceLock {
    /// Where the lock for `device` lives inside `dir`.
    #[must_use]
    pub fn path_in(dir: &Path, device: &str) -> PathBuf {
        dir.join(format!("veles_{}.lock", flat_name(device)))
    }

    pub async fn acquire(device: &str, timeout: Duration) -> Result<DeviceLock, Error> {
        Self::acquire_in(Path::new(LOCK_DIR), device, timeout).await
    }

    /// Wait up to `timeout` for the lock on `device`, first come first served.
    pub async fn acquire_in(
        dir: &Path,
        device: &str,
        timeout: Duration,
    ) -> Result<DeviceLock, Error> {
        let path = Self::path_in(dir, device);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| Error::LockFile {
                path: path.display().to_string(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock() {
                Ok(()) => {
                    debug!("Locked {}.", path.display());
                    return Ok(DeviceLock { file, path });
                }
                Err(TryLockError::WouldBlock) => {}
                Err(TryLockError::Error(source)) => {
                    return Err(Error::LockFile {
                        path: path.display().to_string(),
                        source,
                    });
                }
            }

            if Instant::now() >= deadline {
                warn!("Gave up waiting {timeout:?} for {}.", path.display());
                return Err(Error::busy(
                    device,
                    format!("{} still held after {timeout:?}", path.display()),
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DeviceLock {
    fn drop(&mut self) {
        // Closing the file would release it too; unlock explicitly so the
        // release is logged where it happens.
        match self.file.unlock() {
            Ok(()) => debug!("Released {}.", self.path.display()),
            Err(e) => warn!("Could not release {}: {e}", self.path.display()),
        }
    }
}
