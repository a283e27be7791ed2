use log::LevelFilter;
use syslog::{BasicLogger, Facility, Formatter3164};

/// Send log records to syslog. Without a syslog socket the tool still runs,
/// it just doesn't log.
pub fn init(verbose: bool) {
    let syslog_formatter = Formatter3164 {
        facility: Facility::LOG_USER,
        hostname: None,
        process: env!("CARGO_PKG_NAME").into(),
        pid: std::process::id(),
    };

    let Ok(syslog_writer) = syslog::unix(syslog_formatter) else {
        return;
    };

    if log::set_boxed_logger(Box::new(BasicLogger::new(syslog_writer))).is_ok() {
        log::set_max_level(max_level(verbose));
    }
}

fn max_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}
