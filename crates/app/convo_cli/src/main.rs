// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::io::Read;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands};
use convo_core::{DispatchTable, Intent, WebhookRequest};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Intents => {
            for intent in Intent::ALL {
                println!("{intent}");
            }
        }
        Commands::Fulfill {
            intent,
            option,
            media_status,
            pretty,
        } => {
            let mut request = WebhookRequest::for_action(intent);
            if let Some(option) = option {
                request = request.with_selected_option(option);
            }
            if let Some(status) = media_status {
                request = request.with_media_status(status);
            }
            render(&request, pretty)?;
        }
        Commands::Replay { path, pretty } => {
            let request: WebhookRequest = serde_json::from_str(&read_body(&path)?)?;
            render(&request, pretty)?;
        }
    }

    Ok(())
}

fn read_body(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn render(request: &WebhookRequest, pretty: bool) -> Result<()> {
    let table = DispatchTable::new()?;
    let fulfillment = table.fulfill(request);
    if let Some(e) = &fulfillment.error {
        log::warn!("sending fallback reply: {}", e);
    }

    let response = fulfillment.reply.into_webhook_response();
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    Ok(())
}
