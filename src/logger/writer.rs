//! Log writer module
//!
//! Diagnostic sink handed to a route handler. Cheap to clone; every clone
//! writes to the same target.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Callback type for sinks supplied by an embedding server
pub type LogFn = dyn Fn(&str) + Send + Sync;

/// Where handler diagnostics go
#[derive(Clone, Default)]
pub enum LogSink {
    /// Discard everything
    #[default]
    Off,
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Append to a file
    File(Arc<Mutex<File>>),
    /// Emit `tracing` events under the `static_route` target
    Tracing,
    /// Hand each message to a caller-supplied function
    Custom(Arc<LogFn>),
}

impl LogSink {
    /// Open or create `path` for appending, creating parent directories
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = open_log_file(path.as_ref())?;
        Ok(Self::File(Arc::new(Mutex::new(file))))
    }

    /// Wrap a closure as a sink
    pub fn custom(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Pick a sink by name: `off`, `stdout`, `stderr` or `tracing`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" | "none" => Some(Self::Off),
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            "tracing" => Some(Self::Tracing),
            _ => None,
        }
    }

    pub const fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// Write one diagnostic line
    pub fn write(&self, message: &str) {
        match self {
            Self::Off => {}
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
            Self::Tracing => tracing::debug!(target: "static_route", "{message}"),
            Self::Custom(f) => f(message),
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "Off",
            Self::Stdout => "Stdout",
            Self::Stderr => "Stderr",
            Self::File(_) => "File",
            Self::Tracing => "Tracing",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
