use clap::Parser;
use texpand::cli::{Cli, Commands};
use texpand::config::get_dictionary_file_path;
use texpand::{
    add_entry, daemon_status, initialize, list_entries, remove_entry, start_daemon, stop_daemon,
};

use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => initialize().map(|dir| {
            println!("Initialized texpand in {}", dir.display());
        }),
        Commands::Start { foreground } => start_daemon(foreground),
        Commands::Stop => stop_daemon(),
        Commands::Status => daemon_status(),
        Commands::Add {
            abbreviation,
            expansion,
        } => add_entry(&get_dictionary_file_path(), &abbreviation, &expansion).map(|_| {
            println!("Added '{}'", abbreviation.to_lowercase());
        }),
        Commands::Remove { abbreviation } => {
            remove_entry(&get_dictionary_file_path(), &abbreviation).map(|removed| {
                if removed {
                    println!("Removed '{}'", abbreviation.to_lowercase());
                } else {
                    println!("No entry for '{}'", abbreviation.to_lowercase());
                }
            })
        }
        Commands::List => list_entries(&get_dictionary_file_path()).map(|entries| {
            for (abbreviation, expansion) in entries {
                println!("{}={}", abbreviation, expansion);
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
