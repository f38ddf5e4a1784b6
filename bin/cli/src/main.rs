//! Terminal front-end for the Lendora support chat.
//!
//! A thin rendering collaborator around the conversation core: it loads
//! configuration, constructs the responder and controller, and runs a
//! line-based loop. All behavioral contracts live in the library crates.

mod config;
mod error;

use config::CliConfig;
use error::CliError;
use lendora_conversation::{ConversationController, Message, Sender, SubmitOutcome};
use lendora_responder::HttpResponder;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(report) = run().await {
        tracing::error!(error = ?report, "chat session failed");
        std::process::exit(1);
    }
}

async fn run() -> lendora_core::Result<(), CliError> {
    let config = CliConfig::from_env().map_err(|e| CliError::Config {
        reason: e.to_string(),
    })?;
    tracing::debug!(base_url = %config.responder.base_url, "loaded configuration");

    let responder = HttpResponder::new(&config.responder).map_err(CliError::from)?;
    let controller = ConversationController::open(responder, config.seed.as_deref()).await;

    for message in &controller.snapshot().messages {
        render(message)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.map_err(|e| CliError::Io {
            reason: e.to_string(),
        })?
        else {
            break;
        };

        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }

        match controller.submit(&line).await {
            SubmitOutcome::Answered => {
                if let Some(message) = controller.snapshot().last_message() {
                    render(message)?;
                }
            }
            SubmitOutcome::RejectedEmpty => {}
            outcome => tracing::debug!(?outcome, "submission rejected"),
        }
    }

    controller.close();
    Ok(())
}

fn render(message: &Message) -> Result<(), CliError> {
    let label = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "lendora",
    };
    writeln!(std::io::stdout(), "{label}> {}", message.text).map_err(|e| CliError::Io {
        reason: e.to_string(),
    })
}

fn prompt() -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    write!(stdout, "you> ")
        .and_then(|()| stdout.flush())
        .map_err(|e| CliError::Io {
            reason: e.to_string(),
        })
}
