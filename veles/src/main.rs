mod cli;
mod logging;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use log::warn;
use veles_lib::lock::{LOCK_DIR, LOCK_TIMEOUT};
use veles_lib::{Error, Reading, SerialConnector, read_value, registers};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            // Nowhere left to report a failed write of the usage line.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let err = Error::InvalidArgument(format!("{:?}", e.kind()));
            return print(&[err.diagnostic()], ExitCode::FAILURE);
        }
    };

    logging::init(cli.verbose);

    if cli.list {
        return print(registers::all(), ExitCode::SUCCESS);
    }

    match run(&cli).await {
        Ok(reading) => print(&[reading], ExitCode::SUCCESS),
        Err(e) => {
            warn!("{e}");
            print(&[e.diagnostic()], ExitCode::FAILURE)
        }
    }
}

/// The device lock is released by the time this returns.
async fn run(cli: &Cli) -> Result<Reading, Error> {
    let request = cli.resolve()?;
    read_value(&SerialConnector, &request, Path::new(LOCK_DIR), LOCK_TIMEOUT).await
}

fn print<T: Display>(lines: &[T], code: ExitCode) -> ExitCode {
    match write_lines(&mut io::stdout().lock(), lines) {
        Ok(()) => code,
        Err(e) => {
            warn!("Could not write to stdout: {e}");
            ExitCode::FAILURE
        }
    }
}

/// One line per item. A reader that hangs up early, as `head` does, is not a
/// failure.
fn write_lines<W: Write, T: Display>(out: &mut W, lines: &[T]) -> io::Result<()> {
    let written = lines
        .iter()
        .try_for_each(|line| writeln!(out, "{line}"))
        .and_then(|()| out.flush());
    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
