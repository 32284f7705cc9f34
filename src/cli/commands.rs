use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "unillm", version, about = "Chat completions across LLM vendors, addressed as provider:model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML file with per-provider options
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a chat completion request
    Chat(ChatArgs),
    /// List supported providers and their credential variables
    Providers,
}

#[derive(Args, Clone)]
pub struct ChatArgs {
    /// Model identifier, e.g. openai:gpt-4o or anthropic:claude-3-5-sonnet-20240620
    #[arg(short, long)]
    pub model: String,

    /// System prompt sent before the user messages
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Extra vendor option as key=value (value parsed as JSON, else string)
    #[arg(short, long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Print the normalized response as JSON
    #[arg(long)]
    pub json: bool,

    /// User messages, sent in order
    #[arg(required = true)]
    pub messages: Vec<String>,
}
