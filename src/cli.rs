use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "texpand - real-time abbreviation expansion",
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config directory with a default config and dictionary
    Init,
    /// Start the texpand daemon
    Start {
        #[clap(long, short, help = "Stay attached to the terminal")]
        foreground: bool,
    },
    /// Stop the texpand daemon
    Stop,
    /// Check if the daemon is running
    Status,
    /// Add an abbreviation to the dictionary
    Add {
        #[clap(help = "The abbreviation to expand")]
        abbreviation: String,

        #[clap(help = "The expansion text")]
        expansion: String,
    },
    /// Remove an abbreviation from the dictionary
    Remove {
        #[clap(help = "The abbreviation to remove")]
        abbreviation: String,
    },
    /// List dictionary entries
    List,
}
