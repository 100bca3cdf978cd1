use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use assistant_core::{
    event_channel,
    transport::{HttpCatalog, HttpInterpreter},
    view::ViewModel,
    Assistant, AssistantRuntime, CatalogService, CommandInterpreter, MissingCommandInterpreter,
    UiAction,
};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod devices;
mod input;
mod render;

use config::{load_settings, ConsoleSettings, DEFAULT_CONFIG_FILE};
use devices::{ConsoleRecognizer, ConsoleSynthesizer, PendingPhrase};
use input::{parse_line, ConsoleInput, HELP};

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; missing files are skipped.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Base URL of the recipe backend.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    voice_lang: Option<String>,
    /// Filter categories offered in the list view; repeat for several.
    #[arg(long = "filter")]
    filters: Vec<String>,
    /// Run without the command interpreter; every spoken command fails.
    #[arg(long)]
    no_interpreter: bool,
}

impl Args {
    fn apply(&self, settings: &mut ConsoleSettings) {
        if let Some(v) = self.base_url.as_ref().filter(|v| !v.trim().is_empty()) {
            settings.base_url = v.clone();
        }
        if let Some(v) = self.timeout_secs.filter(|v| *v > 0) {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = self.voice_lang.as_ref().filter(|v| !v.trim().is_empty()) {
            settings.voice_lang = v.clone();
        }
        if !self.filters.is_empty() {
            settings.filters = self.filters.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    args.apply(&mut settings);
    info!(
        base_url = %settings.base_url,
        timeout_secs = settings.request_timeout_secs,
        voice_lang = %settings.voice_lang,
        "starting kitchen console"
    );

    let timeout = Duration::from_secs(settings.request_timeout_secs);
    let catalog: Arc<dyn CatalogService> = Arc::new(
        HttpCatalog::new(&settings.base_url, timeout).context("failed to set up recipe catalog")?,
    );
    let interpreter: Arc<dyn CommandInterpreter> = if args.no_interpreter {
        warn!("command interpreter disabled");
        Arc::new(MissingCommandInterpreter)
    } else {
        Arc::new(
            HttpInterpreter::new(&settings.base_url, timeout)
                .context("failed to set up command interpreter")?,
        )
    };

    let (events, inbox) = event_channel();
    let pending = PendingPhrase::default();
    let synthesizer = ConsoleSynthesizer::new(events.clone(), settings.voice_lang.clone());
    let recognizer = ConsoleRecognizer::new(events.clone(), pending.clone());
    let assistant = Assistant::with_filters(
        Box::new(synthesizer),
        Box::new(recognizer),
        &settings.filters,
    );

    let runtime = AssistantRuntime::new(assistant, catalog, interpreter, (events, inbox));
    let handle = runtime.handle();
    let views = runtime.subscribe_views();
    let runtime_task = tokio::spawn(runtime.run());
    let printer = tokio::spawn(print_views(views));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        match parse_line(&line) {
            Ok(ConsoleInput::Empty) => {}
            Ok(ConsoleInput::Help) => println!("{HELP}"),
            Ok(ConsoleInput::Quit) => break,
            Ok(ConsoleInput::Action(action)) => handle.send(action)?,
            Ok(ConsoleInput::Say(text)) => {
                pending.replace(text);
                handle.send(UiAction::StartListening)?;
            }
            Err(err) => println!("{err}"),
        }
    }

    if handle.shutdown().is_err() {
        warn!("assistant runtime already stopped");
    }
    let assistant = runtime_task.await.context("assistant runtime panicked")?;
    if let Some(error) = assistant.last_error() {
        info!(%error, "last assistant error");
    }
    let _ = printer.await;
    Ok(())
}

/// Prints every rendered view that differs from the previous one.
async fn print_views(mut views: broadcast::Receiver<ViewModel>) {
    let mut last: Option<String> = None;
    loop {
        match views.recv().await {
            Ok(view) => {
                let text = render::render_view(&view);
                if last.as_deref() != Some(text.as_str()) {
                    println!("\n{text}");
                    last = Some(text);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "view printer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
