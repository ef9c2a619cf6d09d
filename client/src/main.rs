use std::fs::OpenOptions;
use std::io::{self, BufRead, BufWriter};
use std::thread;

use anyhow::{Context, Result};
use charla_client::{
    ChatApp, ChatClient, ChatHandle, Config, HtmlTranscript, Outcome, TerminalView, TransportEvent,
    View,
};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they stay out of the chat on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charla=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let server = config.server_url();
    tracing::info!(server = %server, "charla v{}", env!("CARGO_PKG_VERSION"));

    let client = ChatClient::start(&server, &config.client_config())?;
    let (handle, mut events) = client.into_parts();
    let input = spawn_input_reader();
    let terminal = TerminalView::new(io::stdout());

    let outcome = match &config.transcript {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open transcript {}", path.display()))?;
            let view = (terminal, HtmlTranscript::new(BufWriter::new(file)));
            run(view, handle, &mut events, input, &config).await
        }
        None => run(terminal, handle, &mut events, input, &config).await,
    };

    match outcome {
        Outcome::ConnectFailed => anyhow::bail!("Could not connect to {}", server),
        Outcome::Quit | Outcome::Disconnected => Ok(()),
    }
}

async fn run<V: View>(
    view: V,
    handle: ChatHandle,
    events: &mut mpsc::Receiver<TransportEvent>,
    mut input: mpsc::Receiver<String>,
    config: &Config,
) -> Outcome {
    let mut app = ChatApp::new(handle, view)
        .with_auto_join(config.name.clone())
        .with_status_timeout(config.status_timeout());

    app.run(events, &mut input).await
}

/// Read stdin on a plain thread; a pending blocking read must not keep the
/// runtime from shutting down.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}
