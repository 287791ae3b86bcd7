//! Modulo per la gestione centralizzata dei log su file
//!
//! Durante l'esecuzione della TUI i log non possono andare sul terminale,
//! quindi vengono scritti su un file per ogni esecuzione.

use std::path::{Path, PathBuf};
use std::fs::{self, File};
use std::io::Write;
use std::sync::Mutex;
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use log::LevelFilter;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<(PathBuf, File)>> = Mutex::new(None);
}

/// Inizializza il sistema di logging su file (solo su file, non su console)
///
/// Restituisce il percorso del file creato.
pub fn init_file_logger(log_dir: &str, level: LevelFilter) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_file_path = Path::new(log_dir).join(format!("data-catalog_{}.log", timestamp));

    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .context("Failed to open log file")?;

    {
        let mut guard = LOG_FILE.lock().map_err(|_| anyhow!("Failed to lock log file"))?;
        *guard = Some((log_file_path.clone(), file));
    }

    log::set_boxed_logger(Box::new(FileLogger { level }))
        .map(|()| log::set_max_level(level))
        .context("Failed to set logger")?;

    log::info!("Logger initialized, writing to: {:?}", log_file_path);
    Ok(log_file_path)
}

/// Percorso del file di log corrente, se il logger su file è attivo
pub fn current_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok()
        .and_then(|guard| guard.as_ref().map(|(path, _)| path.clone()))
}

/// Logger che scrive solo sul file aperto da `init_file_logger`
struct FileLogger {
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let formatted = format!(
            "[{}] {} {}: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        );

        if let Ok(guard) = LOG_FILE.lock() {
            if let Some((_, file)) = guard.as_ref() {
                let mut file = file;
                let _ = file.write_all(formatted.as_bytes());
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(guard) = LOG_FILE.lock() {
            if let Some((_, file)) = guard.as_ref() {
                let mut file = file;
                let _ = file.flush();
            }
        }
    }
}
