//! Entry point: parse the command line, load the transcript, run the UI and
//! restore the terminal however the loop ends.

use answer_term::app::{App, Collaborators};
use answer_term::config::{Cli, Config};
use answer_term::transcript;
use answer_term::utils;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::utils::guard::Guard;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before anything else
    utils::logger::init_logging();

    // Fail on bad input before the terminal switches screens
    let config = Config::resolve(&cli)?;
    let messages = transcript::load(&cli.transcript)?;
    let collaborators = Collaborators::from_config(&config)?;

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Guard ensures cleanup on both normal exit and panic
    let _guard = Guard::with(|| {
        if let Err(e) = execute!(std::io::stdout(), DisableMouseCapture) {
            tracing::error!("Failed to disable mouse capture: {}", e);
        }
        ratatui::restore();
    });

    let mut app = App::new(messages, config.trusted(), collaborators);
    // draw 1st frame
    app.draw(&mut terminal)?;
    app.run(&mut terminal).await
}
