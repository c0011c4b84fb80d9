//! Academy Admin
//!
//! Console entry point: `academy-admin [ROUTE]`

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use academy_admin::{
    config::Settings,
    handlers::{Flow, Session, HELP},
    router::Route,
    state::AppContext,
    ui::Console,
    utils::logging,
    ApiHandle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", academy_admin::info());

    let api = ApiHandle::new(settings.api.clone());
    let client = match api.ready().await {
        Ok(client) => client.clone(),
        Err(e) => {
            error!(error = %e, "Backend not available");
            return Err(e.into());
        }
    };

    let console = Arc::new(Console::stdout());
    let ctx = AppContext::from_client(settings, client, console.clone()).await;
    let mut session = Session::new(ctx, Arc::clone(&console));

    match std::env::args().nth(1) {
        Some(path) => {
            let route = Route::parse(&path)?;
            if let Err(e) = session.open(route).await {
                error!(error = %e, "Failed to open initial screen");
            }
        }
        None => {
            for line in HELP.lines() {
                console.line(line);
            }
        }
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(session.prompt().as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if session.dispatch(&line).await == Flow::Quit {
            break;
        }
    }

    info!("Academy admin stopped");
    Ok(())
}
