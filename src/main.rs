use clap::{Parser, Subcommand};
use sentiment_classifier::lines::classify_lines;
use sentiment_classifier::web::{self, AppState, DEFAULT_TITLE};
use sentiment_classifier::{DevicePreference, InferenceService};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Classify text with a pre-trained BERT sentiment model.
#[derive(Parser)]
#[command(name = "sentiment-classifier", version, about)]
struct Args {
    /// Model directory or Hugging Face Hub repository id.
    #[arg(short, long, env = "MODEL_PATH", default_value = "bert-base-uncased-sentiment")]
    model: String,

    /// Hub revision, ignored for local directories.
    #[arg(long, env = "MODEL_REVISION", default_value = "main")]
    revision: String,

    /// Do not probe for CUDA or Metal.
    #[arg(long, env = "FORCE_CPU")]
    cpu: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web form.
    Serve {
        #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
        bind: String,

        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
    },
    /// Read lines from stdin and print one JSON result per line.
    Classify,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let preference = if args.cpu {
        DevicePreference::Cpu
    } else {
        DevicePreference::Auto
    };
    let service = InferenceService::load(&args.model, &args.revision, preference)
        .inspect_err(|e| tracing::error!(error = %e, "startup failed"))?;

    match args.command {
        Command::Serve { bind, title } => {
            let state = AppState::new(Arc::new(service))?.with_title(title);
            actix_web::rt::System::new().block_on(web::serve(state, &bind))?;
        }
        Command::Classify => {
            classify_lines(&service, std::io::stdin().lock(), std::io::stdout().lock())?
        }
    }
    Ok(())
}
