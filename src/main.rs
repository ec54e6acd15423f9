//! bible-trilingual-rs: trilingual Bible reader service and CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bible_trilingual::api::{start_reader_api, ReaderApiState};
use bible_trilingual::canon::{self, Testament};
use bible_trilingual::config::Config;
use bible_trilingual::navigation::ChapterNavigator;
use bible_trilingual::speech::{AudioRequest, Language, RodioOutput};
use bible_trilingual::Reader;

#[derive(Parser, Debug)]
#[command(name = "bible-trilingual-rs", about = "Trilingual Bible reader backed by Gemini")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// Override api.port from config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch one chapter and print it as JSON
    Chapter { book: String, chapter: u32 },
    /// Speak text in en, zh or ja
    Speak {
        language: Language,
        text: String,
        /// Write a WAV file instead of playing
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List the canon
    Books {
        #[arg(short, long)]
        testament: Option<Testament>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(args.config.as_deref());
    let reader = Reader::new(&config, Arc::new(RodioOutput::new()))?;

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            info!(
                "bible-trilingual-rs starting (content: {}, speech: {} / {})",
                config.provider.content_model, config.provider.speech_model, config.provider.voice
            );
            if !config.api.enabled && port.is_none() {
                info!("API disabled in config, nothing to serve");
                return Ok(());
            }
            let state = ReaderApiState::new(ChapterNavigator::new(reader.content), reader.speech);
            let server = start_reader_api(state, port.unwrap_or(config.api.port)).await?;
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
                _ = server => {}
            }
        }
        Command::Chapter { book, chapter } => {
            let document = reader.content.fetch(&book, chapter).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Speak { language, text, save } => {
            let request = AudioRequest::new(text, language)?;
            if let Some(path) = save {
                let audio = reader.speech.fetch_audio(&request).await?;
                audio.write_wav(&path)?;
                info!(
                    "Saved {:.1}s of audio to {}",
                    audio.duration().as_secs_f64(),
                    path.display()
                );
            } else {
                let handle = reader.speech.synthesize(&request).await?;
                // Playback is fire-and-forget; keep the process alive until it drains.
                tokio::time::sleep(handle.duration + std::time::Duration::from_millis(250)).await;
            }
        }
        Command::Books { testament } => {
            for book in canon::books(testament) {
                println!("{:<16} {:>3}", book.name, book.chapters);
            }
        }
    }

    Ok(())
}
