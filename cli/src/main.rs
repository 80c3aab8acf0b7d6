//! AI Chatbot terminal client
mod commands;

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ai_chatbot_core::chat::GeminiClient;
use ai_chatbot_core::core::{create_store, Config};
use ai_chatbot_core::{Error, UserId};

#[derive(Parser, Debug)]
#[command(name = "ai-chatbot")]
#[command(version)]
#[command(about = "Chat with the language model; history is kept per user", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<String>,

    /// Signed-in user id
    #[arg(short = 'u', long = "user", env = "CHATBOT_USER", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat (prompts from stdin)
    Chat,
    /// List the user's chats, newest first
    List,
    /// Print a chat's messages
    Show {
        /// Position in `list`, chat id or unique id prefix
        chat: String,
    },
    /// Delete a chat and its messages
    Delete {
        /// Position in `list`, chat id or unique id prefix
        chat: String,
    },
    /// Move pre-namespacing records into the user's namespace
    Migrate,
    /// Remove everything stored for the user
    Clear,
    /// List models available to the configured API key
    Models,
}

fn require_user(user: Option<String>) -> Result<UserId, Error> {
    user.and_then(UserId::new)
        .ok_or_else(|| Error::invalid_input("no user given; pass --user or set CHATBOT_USER"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Command::Models = args.cmd {
        return commands::models(&GeminiClient::new(&config.llm), &mut out).await;
    }

    let user = require_user(args.user)?;
    let store = create_store(&config.storage)?;

    match args.cmd {
        Command::Chat => {
            let model = GeminiClient::new(&config.llm);
            commands::chat(&store, &user, &model, io::stdin().lock(), &mut out).await?
        }
        Command::List => commands::list(&store, &user, &mut out)?,
        Command::Show { chat } => commands::show(&store, &user, &chat, &mut out)?,
        Command::Delete { chat } => commands::delete(&store, &user, &chat, &mut out)?,
        Command::Migrate => commands::migrate(&store, &user, &mut out)?,
        Command::Clear => commands::clear(&store, &user, &mut out)?,
        Command::Models => {}
    }

    out.flush()?;
    Ok(())
}
