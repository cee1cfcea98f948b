mod console;
mod data;
mod error;
mod input;
mod pager;
mod report;
mod session;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::Console;
use session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "bikeshare-explorer",
    version,
    about = "Explore US bikeshare trip data interactively"
)]
struct Cli {
    /// Directory holding chicago, new_york_city and washington datasets
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("data directory: {}", cli.data_dir.display());

    let console = Console::new(io::stdin().lock(), io::stdout().lock());
    let mut session = Session::new(console, cli.data_dir);

    let outcome = session.run();
    if let Err(e) = &outcome {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(exit_status(&outcome))
}

/// 0 when the user ended the session, 1 when an error (such as closed
/// input) cut it short.
fn exit_status(outcome: &anyhow::Result<()>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
