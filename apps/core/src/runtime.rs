use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::host::{CallLog, CatalogFileHost, LauncherHost};
use crate::session::{Session, SessionOptions};
use crate::transport::handle_json;

const USAGE: &str = "usage: quicklaunch-core [--config PATH] --catalog PATH";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub catalog_path: PathBuf,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config_path = None;
    let mut catalog_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("--config requires a path. {USAGE}"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--catalog" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("--catalog requires a path. {USAGE}"))?;
                catalog_path = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument '{other}'. {USAGE}")),
        }
    }

    let catalog_path = catalog_path.ok_or_else(|| format!("missing --catalog. {USAGE}"))?;
    Ok(CliOptions {
        config_path,
        catalog_path,
    })
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    if let Err(error) = crate::logging::init(&config.logs_dir, &config.log_level) {
        eprintln!("[quicklaunch-core] logging disabled: {error}");
    }
    let host = CatalogFileHost::new(options.catalog_path);
    tracing::info!(
        config_path = %config.config_path.display(),
        catalog_path = %host.catalog_path().display(),
        "startup"
    );

    let mut session = Session::start(host, SessionOptions::from(&config));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let handled = run_event_loop(&mut session, stdin.lock(), stdout.lock())?;
    tracing::info!(events = handled, "input closed; shutting down");
    Ok(())
}

/// Reads one JSON event per line and writes one JSON response per line.
/// Blank lines are skipped. Returns the number of events handled.
pub fn run_event_loop<H, R, W>(
    session: &mut Session<H>,
    input: R,
    mut output: W,
) -> Result<usize, std::io::Error>
where
    H: LauncherHost + CallLog,
    R: BufRead,
    W: Write,
{
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }

        let response = handle_json(session, payload);
        writeln!(output, "{response}")?;
        output.flush()?;
        handled += 1;
    }
    Ok(handled)
}
