use clap::{Parser, Subcommand};
use relm4::prelude::*;
use rondel::config;
use rondel::gui::app::AppModel;
use rondel::sys::{runtime, server};

#[derive(Parser, Debug)]
#[command(version, about = "Hierarchical radial menu overlay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the running daemon to open the menu, optionally at a nested
    /// level path like "2/0"
    Open { path: Option<String> },
    /// Ask the running daemon to close the menu
    Close,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Some(Command::Open { path }) => {
            let line = match path {
                Some(p) => format!("open {p}"),
                None => "open".to_string(),
            };
            server::send_command(&line)?;
        }
        Some(Command::Close) => server::send_command("close")?,
        None => {
            let config = config::load_or_setup();
            let (tx, rx) = async_channel::bounded(32);

            // Start Background Services
            runtime::start_background_services(tx);

            let app = RelmApp::new("org.troia.rondel").with_args(Vec::new());
            app.run::<AppModel>((config, rx));
        }
    }

    Ok(())
}
