use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "gitcz_cli=debug,gitcz_core=debug,gitcz_tui=debug";

static HOOK_ONCE: Once = Once::new();
static LOG_FILE: OnceLock<Mutex<Option<(PathBuf, Arc<File>)>>> = OnceLock::new();

fn log_file() -> &'static Mutex<Option<(PathBuf, Arc<File>)>> {
    LOG_FILE.get_or_init(|| Mutex::new(None))
}

pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    /// Installs the panic hook and, when `enabled`, a tracing subscriber
    /// that writes to a fresh log file. Without it nothing is logged, since
    /// the dialogue owns the terminal.
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self { path: None });
        }

        let path = create_diagnostics_log_path()?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;

        writeln!(
            file,
            "git-cz diagnostics start\nversion={}\nstart_epoch_ms={}\npid={}",
            env!("CARGO_PKG_VERSION"),
            epoch_millis(),
            std::process::id()
        )
        .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;

        let file = Arc::new(file);
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::clone(&file))
            .with_ansi(false)
            .try_init()
            .map_err(|error| anyhow!("failed to install diagnostics logger: {error}"))?;

        *log_file()
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some((path.clone(), file));

        tracing::info!(argv = ?std::env::args().collect::<Vec<String>>(), "diagnostics enabled");
        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let payload = panic_payload(panic_info);
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let backtrace = Backtrace::force_capture();

            let state = log_file()
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);

            eprintln!("Fatal internal error in git-cz.");
            match state.as_ref() {
                Some((path, file)) => {
                    let mut file = file.as_ref();
                    let _ = writeln!(
                        file,
                        "[{}] panic captured\npanic_message={payload}\npanic_location={location}\npanic_backtrace={backtrace:?}",
                        epoch_millis()
                    );
                    let _ = file.flush();
                    eprintln!("Diagnostics written to {}", path.display());
                }
                None => {
                    eprintln!("Run `git-cz --diagnostics` to capture a diagnostics log.");
                }
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn create_diagnostics_log_path() -> Result<PathBuf> {
    let config_path = gitcz_core::config::resolve_config_path()
        .context("failed to resolve git-cz config path for diagnostics")?;
    let config_dir = config_path.parent().ok_or_else(|| {
        anyhow!(
            "failed to resolve diagnostics directory from config path {}",
            config_path.display()
        )
    })?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    Ok(diagnostics_dir.join(format!("{}.log", epoch_millis())))
}
