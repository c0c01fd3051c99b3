use blogdeck::cli::commands::Cli;
use blogdeck::cli::handlers;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    // No subcommand launches the TUI; dispatch handles both.
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
