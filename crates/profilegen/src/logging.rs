use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Append handle on `debug.log`. If the file disappears while we run (the
/// user cleared their logs), the next write starts a fresh one.
struct DebugLog {
    path: PathBuf,
    file: File,
}

impl DebugLog {
    /// Open for appending, cutting the file down to its newest half first
    /// when it has grown past `max_size` bytes.
    fn open(path: PathBuf, max_size: u64) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        keep_recent_half(&path, max_size)?;
        let file = append_to(&path)?;
        Ok(Self { path, file })
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for DebugLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.path.exists() {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            self.file = append_to(&self.path)?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Drop the older half of an oversized log, cutting at a line boundary.
fn keep_recent_half(path: &Path, max_size: u64) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.len() > max_size => {}
        Ok(_) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    }

    let contents = fs::read(path)?;
    let middle = contents.len() / 2;
    let start = contents[middle..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(middle, |newline| middle + newline + 1);
    fs::write(path, &contents[start..])
}

/// Log to `log_file`, and to stderr when `verbose` is set or in debug
/// builds. Stdout is left alone for command output.
pub fn init_logging(log_file: Option<PathBuf>, debug_enabled: bool, verbose: bool, max_size: u64) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("profilegen")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose || cfg!(debug_assertions) {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    let opened = log_file.and_then(|path| match DebugLog::open(path.clone(), max_size) {
        Ok(log) => Some((path, log)),
        Err(e) => {
            eprintln!("warning: cannot open {}: {e}", path.display());
            None
        }
    });
    let log_path = opened.map(|(path, log)| {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, log));
        path
    });

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }

    set_logging_enabled(debug_enabled || verbose);

    if let Some(path) = log_path
        && debug_enabled
    {
        log::info!("Debug logging to {}", path.display());
    }
}

pub fn set_logging_enabled(enabled: bool) {
    log::set_max_level(if enabled {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{DebugLog, keep_recent_half, set_logging_enabled};

    #[test]
    fn deleted_log_is_recreated_on_next_write() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("debug.log");
        let mut log = DebugLog::open(path.clone(), 1024).expect("open debug log");

        log.write_all(b"first\n").expect("first write");
        std::fs::remove_file(&path).expect("remove debug log");
        log.write_all(b"second\n").expect("write after removal");

        let contents = std::fs::read_to_string(&path).expect("read recreated log");
        assert_eq!(contents, "second\n");
    }

    #[test]
    fn open_creates_missing_data_directory() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("data").join("profilegen").join("debug.log");

        DebugLog::open(path.clone(), 1024).expect("open debug log");

        assert!(path.is_file());
    }

    #[test]
    fn opening_oversized_log_keeps_newest_lines() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("debug.log");
        std::fs::write(&path, "line-1\nline-2\nline-3\nline-4\nline-5\n").expect("seed log");

        let mut log = DebugLog::open(path.clone(), 10).expect("open debug log");
        log.write_all(b"line-6\n").expect("append");

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert!(!contents.contains("line-1"));
        assert!(contents.ends_with("line-5\nline-6\n"));
    }

    #[test]
    fn small_and_missing_logs_are_left_alone() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("debug.log");

        keep_recent_half(&path, 10).expect("missing log is fine");
        assert!(!path.exists());

        std::fs::write(&path, "line-1\n").expect("seed log");
        keep_recent_half(&path, 1024).expect("small log is fine");
        assert_eq!(std::fs::read_to_string(&path).expect("read log"), "line-1\n");
    }

    #[test]
    fn set_logging_enabled_updates_global_level() {
        set_logging_enabled(true);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);

        set_logging_enabled(false);
        assert_eq!(log::max_level(), log::LevelFilter::Off);
    }
}
