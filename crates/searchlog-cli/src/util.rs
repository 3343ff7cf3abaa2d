use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use searchlog_analysis::event::EventLog;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `searchlog=trace`).
const LOG_ENV: &str = "SEARCHLOG_LOG";

/// Installs the stderr log subscriber. Reports go to stdout, logs to stderr.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.finish()
    }

    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Reads a search log CSV file.
///
/// # Errors
///
/// Returns error if the file cannot be opened or a record is malformed
pub fn read_event_log<P>(path: P) -> anyhow::Result<EventLog>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::info!("Loading events from {}...", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open event log file: {}", path.display()))?;
    let log = EventLog::from_csv_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse event log file: {}", path.display()))?;
    tracing::info!(
        events = log.len(),
        days = log.days().len(),
        "Loaded event log"
    );
    if log.is_empty() {
        tracing::warn!("Event log {} contains no events", path.display());
    }
    Ok(log)
}

/// Formats a ratio as a percentage, or `N/A` when undefined.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(Some(0.25)), "25.00%");
        assert_eq!(percent(Some(0.0)), "0.00%");
        assert_eq!(percent(None), "N/A");
    }

    #[test]
    fn test_read_event_log_missing_file() {
        let err = read_event_log("/nonexistent/searchlog/events.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open event log file"));
    }

    #[test]
    fn test_read_event_log_from_file() {
        let path = std::env::temp_dir().join(format!("searchlog-util-{}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "timestamp,session_id,group,action,n_results").unwrap();
        writeln!(file, "20160301000000,s1,a,searchResultPage,4").unwrap();
        drop(file);

        let log = read_event_log(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_read_event_log_reports_parse_error() {
        let path =
            std::env::temp_dir().join(format!("searchlog-util-bad-{}.csv", std::process::id()));
        std::fs::write(&path, "timestamp,session_id,group,action\nnope,s1,a,visitPage\n").unwrap();

        let err = read_event_log(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Failed to parse event log file"));
        assert!(format!("{err:#}").contains("invalid timestamp"));
    }
}
