use anyhow::Result;
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::style;
use std::sync::Arc;

use tandem::adapters::configs::{AdapterConfig, AnthropicAdapterConfig, OpenAiAdapterConfig};
use tandem::adapters::factory::get_adapter;
use tandem::orchestrator::Orchestrator;
use tandem::registry::ToolRegistry;

mod session;
mod stations;

use session::{ChatSession, TurnOutcome};
use stations::StationToolSession;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider variant (anthropic or open-ai)
    #[arg(short, long, default_value = "anthropic")]
    #[arg(value_enum)]
    provider: ProviderVariant,

    /// Model to use (defaults to the provider's default model)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tokens per completion
    #[arg(long)]
    max_tokens: Option<i32>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ProviderVariant {
    Anthropic,
    OpenAi,
}

fn get_config(cli: &Cli) -> Result<AdapterConfig> {
    match cli.provider {
        ProviderVariant::Anthropic => {
            let mut config = AnthropicAdapterConfig::from_env()?;
            if let Some(model) = &cli.model {
                config.model = model.clone();
            }
            if let Some(max_tokens) = cli.max_tokens {
                config.max_tokens = max_tokens;
            }
            Ok(AdapterConfig::Anthropic(config))
        }
        ProviderVariant::OpenAi => {
            let mut config = OpenAiAdapterConfig::from_env()?;
            if let Some(model) = &cli.model {
                config.model = model.clone();
            }
            if let Some(max_tokens) = cli.max_tokens {
                config.max_tokens = max_tokens;
            }
            Ok(AdapterConfig::OpenAi(config))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let adapter = get_adapter(get_config(&cli)?)?;
    let registry = ToolRegistry::connect(Arc::new(StationToolSession)).await?;
    let mut chat = ChatSession::new(Orchestrator::new(adapter, registry));

    println!("{}", style("Connected to tool session.").green());
    println!("Type your queries or 'quit' to exit.");

    let result = chat_loop(&mut chat).await;
    // The session is released on every exit path, error or not.
    chat.close().await;
    result
}

async fn chat_loop(chat: &mut ChatSession) -> Result<()> {
    loop {
        let line: String = input("Query").interact()?;

        let progress = spinner();
        progress.start("Thinking...");
        let outcome = chat.handle_line(&line).await;
        progress.stop("");

        match outcome {
            TurnOutcome::Quit => return Ok(()),
            TurnOutcome::Answer(answer) => render_answer(&answer),
            TurnOutcome::Failed(message) => {
                println!("{}", style(format!("Error: {}", message)).red())
            }
        }
    }
}

fn render_answer(answer: &str) {
    let rendered = PrettyPrinter::new()
        .input_from_bytes(answer.as_bytes())
        .language("markdown")
        .print();
    if rendered.is_err() {
        println!("{}", answer);
    }
    println!();
}
