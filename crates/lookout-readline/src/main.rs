use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;

use lookout_core::config::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use lookout_core::normalizer::Lemmatizer;
use lookout_core::search::ContentAggregator;
use lookout_core::{AggregationLimits, LookoutConfig, OutputSink, SessionState, prompt};
use lookout_execution::{QueueScheduler, TaskProcessor};
use lookout_infrastructure::{DuckDuckGoSearch, HttpPageScraper};
use lookout_interaction::{ConversationEngine, OllamaApiAgent};

mod command;
mod helper;
mod terminal;

use command::ShellCommand;
use helper::CliHelper;
use terminal::TerminalSink;

type LineEditor = Editor<CliHelper, DefaultHistory>;

#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(about = "Lookout - chat with a local model, grounded by web search", long_about = None)]
struct Args {
    /// Ollama model name
    #[arg(long, env = "LOOKOUT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the Ollama server
    #[arg(long, env = "LOOKOUT_OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Seconds of terminal silence before background results are shown
    #[arg(long, env = "LOOKOUT_IDLE_WAIT_SECS", default_value_t = 5)]
    idle_wait_secs: u64,

    /// Seconds between deep-queue polls when it is empty
    #[arg(long, env = "LOOKOUT_DEEP_POLL_SECS", default_value_t = 2)]
    deep_poll_secs: u64,

    /// Results scraped between word-count checks
    #[arg(long, env = "LOOKOUT_BATCH_SIZE", default_value_t = 10)]
    batch_size: usize,

    /// Merged word count that ends a search early
    #[arg(long, env = "LOOKOUT_MIN_WORDS", default_value_t = 500)]
    min_words: usize,

    /// Maximum search results considered per search
    #[arg(long, env = "LOOKOUT_HARD_PAGE_LIMIT", default_value_t = 10)]
    hard_page_limit: usize,
}

impl Args {
    fn into_config(self) -> LookoutConfig {
        LookoutConfig {
            model: self.model,
            ollama_url: self.ollama_url,
            idle_wait: Duration::from_secs(self.idle_wait_secs),
            deep_poll_interval: Duration::from_secs(self.deep_poll_secs),
            aggregation: AggregationLimits {
                batch_size: self.batch_size,
                min_words: self.min_words,
                hard_page_limit: self.hard_page_limit,
            },
            ..LookoutConfig::default()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wires the collaborators together around one session.
fn build_scheduler(
    config: &LookoutConfig,
    session: Arc<SessionState>,
    sink: Arc<dyn OutputSink>,
) -> Result<Arc<QueueScheduler>> {
    let search = Arc::new(DuckDuckGoSearch::new(config.search_timeout)?);
    let scraper = Arc::new(HttpPageScraper::new(config.scrape_timeout)?);
    let backend = Arc::new(OllamaApiAgent::new(&config.ollama_url, &config.model));

    let aggregator = ContentAggregator::new(search, scraper);
    let engine = ConversationEngine::new(backend, session.clone(), sink.clone());
    let processor = TaskProcessor::new(Arc::new(Lemmatizer::new()), aggregator, engine, sink.clone())
        .with_limits(config.aggregation)
        .with_context_char_limit(config.context_char_limit);

    Ok(Arc::new(QueueScheduler::new(
        Arc::new(processor),
        session,
        sink,
        config.idle_wait,
        config.deep_poll_interval,
    )))
}

/// Reads one line without stalling the runtime's other tasks.
fn read_line(rl: &mut LineEditor, prompt: &str) -> rustyline::Result<String> {
    tokio::task::block_in_place(|| rl.readline(prompt))
}

/// Collects tasks until an empty line, handing each to `enqueue`.
fn read_tasks(rl: &mut LineEditor, deep: bool, mut enqueue: impl FnMut(String)) {
    println!(
        "{}",
        "👉 Enter tasks one by one. Press Enter on an empty line to finish.".bright_black()
    );
    loop {
        match read_line(rl, "TASK: ") {
            Ok(task) if task.trim().is_empty() => break,
            Ok(task) => {
                let _ = rl.add_history_entry(&task);
                let confirmation = if deep {
                    format!("✅ Queued task (deep): {task}")
                } else {
                    format!("✅ Queued task: {task}")
                };
                enqueue(task);
                println!("{}", confirmation.green());
            }
            Err(_) => break,
        }
    }
}

/// The main entry point for the Lookout REPL.
///
/// Starts the deep-queue worker, then loops: show at most one buffered
/// background result if the terminal has been idle, read a line, dispatch it.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Args::parse().into_config();
    config.validate()?;
    tracing::info!(model = %config.model, url = %config.ollama_url, "Starting lookout");

    let persona = prompt::default_persona();
    let session = Arc::new(SessionState::new(persona.clone()));
    let sink: Arc<dyn OutputSink> = Arc::new(TerminalSink);
    let scheduler = build_scheduler(&config, session, sink)?;
    let worker = scheduler.spawn_worker();

    let mut rl: LineEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Lookout ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/queue' or '/deepqueue' to queue tasks, '/<text>' to force a search, or 'quit' to exit."
            .bright_black()
    );
    println!("{} {}", "ASSISTANT:".bright_magenta().bold(), persona.bright_blue());

    loop {
        scheduler.flush_idle_one();

        let line = match read_line(&mut rl, "USER: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Exit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ShellCommand::Empty => continue,
            ShellCommand::Queue => {
                read_tasks(&mut rl, false, |task| scheduler.enqueue_immediate(task));
                scheduler.drain_immediate().await;
            }
            ShellCommand::DeepQueue => {
                read_tasks(&mut rl, true, |task| scheduler.enqueue_deep(task));
            }
            ShellCommand::Task(task) => {
                let _ = rl.add_history_entry(&task);
                scheduler.run_foreground(&task).await;
            }
        }
    }

    worker.abort();
    Ok(())
}
