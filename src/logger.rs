//! Global leveled logger: a hand-rolled `log::Log` installed once via
//! `log::set_boxed_logger`, writing to a plain file sink. The terminal is
//! owned by the renderer and must never receive incidental log output
//! while in raw mode.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

pub struct FileLogger {
    sink: Option<Mutex<BufWriter<File>>>,
}

impl FileLogger {
    fn discarding() -> Self {
        Self { sink: None }
    }

    fn writing_to(file: File) -> Self {
        Self {
            sink: Some(Mutex::new(BufWriter::new(file))),
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let Some(sink) = &self.sink else { return };
        let mut writer = sink.lock();
        let _ = writeln!(
            writer,
            "{} {}: {}",
            level_as_str(record.level()),
            record.target(),
            record.args()
        );
        let _ = writer.flush();
    }

    fn flush(&self) {
        if let Some(sink) = &self.sink {
            let _ = sink.lock().flush();
        }
    }
}

fn level_as_str(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

/// Install the global logger from the resolved configuration. Must run
/// before any subsystem thread is spawned.
pub fn install(log_file: Option<&Path>) -> io::Result<()> {
    let logger = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            FileLogger::writing_to(file)
        }
        None => FileLogger::discarding(),
    };
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(LevelFilter::Info))
        .map_err(|err| io::Error::other(err.to_string()))
}
