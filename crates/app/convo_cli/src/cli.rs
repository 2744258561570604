use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "convo_cli",
    version,
    about = "Render conversation components webhook replies without running the server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// List the intents the webhook fulfills.
    Intents,

    /// Render the webhook response for an intent.
    Fulfill {
        /// Intent (Dialogflow action) name, e.g. `basic.card`.
        intent: String,

        /// Selected list/carousel key, for `item.selected`.
        #[arg(long)]
        option: Option<String>,

        /// Media status, e.g. `FINISHED`, for `media.status`.
        #[arg(long)]
        media_status: Option<String>,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Render the webhook response for a recorded request body (`-` reads stdin).
    Replay {
        path: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
}
