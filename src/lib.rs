//! Texpand - a real-time abbreviation expansion daemon.
//!
//! Texpand watches the system-wide key stream, matches the trailing
//! characters typed against a user-defined abbreviation dictionary, and on
//! the accept key erases the abbreviation and retypes its expansion.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod keyboard;
pub mod matcher;

// Re-export
pub use config::{get_config_dir, initialize, is_daemon_running, load_config, Config};
pub use daemon::{daemon_status, run_daemon_worker, start_daemon, stop_daemon};
pub use dictionary::{
    add_entry, list_entries, load_dictionary, load_dictionary_or_empty, remove_entry,
    DictionaryHandle,
};
pub use engine::ExpansionEngine;
pub use error::{Result, TexpandError};
pub use keyboard::{KeyEvent, KeySynth};
pub use matcher::{longest_suffix_match, InputBuffer, Suggestion};
