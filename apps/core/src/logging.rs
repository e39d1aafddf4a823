use std::any::Any;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "quicklaunch.log";
const ARCHIVE_PREFIX: &str = "quicklaunch-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static INITIALIZED: OnceLock<()> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Routes `tracing` output to `<log_dir>/quicklaunch.log`. `RUST_LOG`
/// overrides `default_level`.
pub fn init(log_dir: &Path, default_level: &str) -> Result<(), io::Error> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let log = RotatingLog::open(log_dir, MAX_LOG_BYTES)?;
    let active = log.active_path();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log)
        .with_ansi(false)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = INITIALIZED.set(());
    }

    install_panic_hook();
    tracing::info!(path = %active.display(), "logging initialized");
    Ok(())
}

/// Log file that archives itself once it reaches `max_bytes`, keeping the
/// newest `MAX_ARCHIVES` archives next to it.
#[derive(Debug)]
pub struct RotatingLog {
    dir: PathBuf,
    max_bytes: u64,
    state: Mutex<ActiveFile>,
}

#[derive(Debug)]
struct ActiveFile {
    file: File,
    written: u64,
    rotations: u32,
}

impl RotatingLog {
    pub fn open(dir: &Path, max_bytes: u64) -> Result<Self, io::Error> {
        fs::create_dir_all(dir)?;
        let file = append_to(&dir.join(LOG_FILE_NAME))?;
        let written = file.metadata()?.len();
        let log = Self {
            dir: dir.to_path_buf(),
            max_bytes,
            state: Mutex::new(ActiveFile {
                file,
                written,
                rotations: 0,
            }),
        };
        if written >= max_bytes {
            log.rotate(&mut log.lock())?;
        }
        Ok(log)
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn rotate(&self, active: &mut ActiveFile) -> Result<(), io::Error> {
        active.file.flush()?;
        let archive = self.dir.join(format!(
            "{ARCHIVE_PREFIX}{:013}-{:04}.log",
            unix_millis(),
            active.rotations
        ));
        fs::rename(self.active_path(), archive)?;
        prune_old_archives(&self.dir)?;

        active.file = append_to(&self.active_path())?;
        active.written = 0;
        active.rotations = active.rotations.wrapping_add(1);
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingLog {
    type Writer = RotatingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriter {
            log: self,
            active: self.lock(),
        }
    }
}

/// One event's worth of output; holds the file lock until dropped.
pub struct RotatingWriter<'a> {
    log: &'a RotatingLog,
    active: MutexGuard<'a, ActiveFile>,
}

impl Write for RotatingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.active.file.write(buf)?;
        self.active.written += written as u64;
        if self.active.written >= self.log.max_bytes {
            let log = self.log;
            log.rotate(&mut self.active)?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.active.file.flush()
    }
}

fn append_to(path: &Path) -> Result<File, io::Error> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
}

fn prune_old_archives(log_dir: &Path) -> Result<(), io::Error> {
    let mut archives: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_archive(path))
        .collect();
    if archives.len() <= MAX_ARCHIVES {
        return Ok(());
    }

    archives.sort();
    let excess = archives.len() - MAX_ARCHIVES;
    // Runs under the writer lock, so failures cannot be logged from here.
    for stale in &archives[..excess] {
        let _ = fs::remove_file(stale);
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Sends panics through `tracing` before the default hook prints them.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            match info.location() {
                Some(at) => tracing::error!(
                    file = at.file(),
                    line = at.line(),
                    payload = panic_message(info.payload()),
                    "panic"
                ),
                None => tracing::error!(payload = panic_message(info.payload()), "panic"),
            }
            previous(info);
        }));
    });
}
