use crate::config::{
    get_dictionary_file_path, get_pid_file_path, is_daemon_running, load_config, Config,
};
use crate::dictionary::{load_dictionary_or_empty, DictionaryHandle};
use crate::engine::ExpansionEngine;
use crate::error::{Result, TexpandError};
use crate::keyboard::{classify, parse_key_name, EnigoSynth, ModifierTracker};

use std::fs::{self, File};
use std::io::Write;
use std::process;

/// Start the daemon process
pub fn start_daemon(foreground: bool) -> Result<()> {
    // Check if daemon is already running
    if let Some(pid) = is_daemon_running()? {
        return Err(TexpandError::DaemonAlreadyRunning(pid));
    }

    // Config problems are fatal here, before any hook is installed.
    let config = load_config()?;

    if config.startup.print_banner {
        print_banner(&config);
    }

    if foreground {
        return run_daemon_worker(config);
    }

    // Fork to background on Unix systems
    #[cfg(unix)]
    {
        use daemonize::Daemonize;
        println!("Starting texpand daemon in the background");

        let log_file = crate::config::get_log_file_path();

        let daemonize = Daemonize::new()
            .working_directory("/tmp")
            .stdout(File::create(&log_file)?)
            .stderr(File::create(&log_file)?);

        match daemonize.start() {
            Ok(_) => run_daemon_worker(config), // We're now in the daemon process
            Err(e) => {
                let msg = format!("Error starting daemon: {}", e);
                Err(TexpandError::Other(msg))
            }
        }
    }

    #[cfg(not(unix))]
    {
        println!("Starting texpand daemon in the foreground (background not supported on this OS)");
        run_daemon_worker(config)
    }
}

/// The actual daemon worker process
pub fn run_daemon_worker(config: Config) -> Result<()> {
    init_tracing();

    // Create PID file
    let pid_file = get_pid_file_path();
    let mut file = File::create(&pid_file)?;
    write!(file, "{}", process::id())?;

    // validate() checked this name already
    let accept_key = parse_key_name(&config.accept_key)
        .ok_or_else(|| TexpandError::Config(format!("unknown accept_key '{}'", config.accept_key)))?;

    // Initial dictionary load; with no previous mapping to retain, any
    // load problem means starting with an empty one.
    let dictionary_path = get_dictionary_file_path();
    let entries = load_dictionary_or_empty(&dictionary_path);
    if config.startup.print_dictionary_count {
        tracing::info!("dictionary loaded: {} entries", entries.len());
    }
    let dictionary = DictionaryHandle::new(entries);

    let synth = EnigoSynth::new()?;
    let mut engine = ExpansionEngine::new(&config, dictionary, dictionary_path, synth);
    let mut mods = ModifierTracker::default();

    tracing::info!(
        "texpand daemon started (accept: {}, reload: ctrl+alt+r)",
        config.accept_key
    );

    // The hook delivers events serially; the engine runs to completion on
    // each one, including the full blocking replacement sequence.
    let listen_result = rdev::listen(move |event| {
        mods.observe(&event);
        if let Some(key_event) = classify(&event, accept_key, &mods) {
            engine.handle_event(key_event);
        }
    });

    // Cleanup
    if let Err(e) = fs::remove_file(&pid_file) {
        tracing::warn!("error removing PID file: {}", e);
    }

    listen_result.map_err(|e| TexpandError::Keyboard(format!("{:?}", e)))
}

/// Stop the daemon if it's running
pub fn stop_daemon() -> Result<()> {
    let pid_file = get_pid_file_path();

    if !pid_file.exists() {
        return Err(TexpandError::DaemonNotRunning);
    }

    let pid_str = fs::read_to_string(&pid_file)?;
    let pid = pid_str
        .trim()
        .parse::<u32>()
        .map_err(|_| TexpandError::InvalidPid)?;

    #[cfg(unix)]
    {
        let status = std::process::Command::new("kill")
            .arg(pid.to_string())
            .status();

        if let Ok(status) = status {
            if status.success() {
                println!("Stopped texpand daemon with PID {}", pid);
                fs::remove_file(&pid_file)?;
                return Ok(());
            }
        }

        Err(TexpandError::Other(format!(
            "Failed to stop daemon with PID {}",
            pid
        )))
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let status = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .status();

        if let Ok(status) = status {
            if status.success() {
                println!("Stopped texpand daemon with PID {}", pid);
                fs::remove_file(&pid_file)?;
                return Ok(());
            }
        }

        Err(TexpandError::Other(format!(
            "Failed to stop daemon with PID {}",
            pid
        )))
    }

    #[cfg(not(any(unix, windows)))]
    {
        Err(TexpandError::Other(
            "Stopping daemon not supported on this platform".to_string(),
        ))
    }
}

/// Check daemon status
pub fn daemon_status() -> Result<()> {
    match is_daemon_running()? {
        Some(pid) => {
            println!("texpand daemon is running with PID {}", pid);
            Ok(())
        }
        None => {
            println!("texpand daemon is not running");
            Ok(())
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init in the same process (e.g. tests) is harmless.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn print_banner(config: &Config) {
    println!("{}", "-".repeat(30));
    println!("texpand v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "-".repeat(30));
    println!(
        "Accept: {} | Reload: CTRL+ALT+R",
        config.accept_key.to_uppercase()
    );
    println!("{}", "-".repeat(30));
}
