use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::provider::ProviderKind;

#[derive(Parser, Debug)]
#[command(name = "xlate")]
#[command(about = "Translate text from the terminal with Google, DeepL, Azure or LibreTranslate")]
#[command(version)]
pub struct Args {
    /// Text to translate (reads stdin when omitted and input is piped)
    #[arg(conflicts_with_all = ["file", "interactive"])]
    pub text: Vec<String>,

    /// Source language code, or "auto" to detect it
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Target language code (e.g. es, ja, zh-CN)
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Translation provider: google, deepl, azure or libretranslate
    #[arg(short = 'p', long)]
    pub provider: Option<ProviderKind>,

    /// Translate a UTF-8 text file
    #[arg(short = 'f', long, conflicts_with = "interactive")]
    pub file: Option<PathBuf>,

    /// Where to write the translated file (default: <name>.<target>.<ext>)
    #[arg(short = 'o', long, requires = "file")]
    pub output: Option<PathBuf>,

    /// Start an interactive translation session
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Show languages, confidence, provider and time with the translation
    #[arg(short = 'd', long)]
    pub details: bool,

    /// Do not record this translation in history
    #[arg(long)]
    pub no_history: bool,

    /// Suppress status output and colors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported languages
    Languages {
        /// Show the catalog of this provider instead of the configured one
        #[arg(short = 'p', long)]
        provider: Option<ProviderKind>,

        /// Query the provider for its current catalog (cached for 24 hours)
        #[arg(long)]
        live: bool,
    },
    /// Show recent translations
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Only show translations from or to this language
        #[arg(short = 'l', long)]
        lang: Option<String>,

        #[command(subcommand)]
        command: Option<HistoryCommand>,
    },
    /// List translation providers and whether credentials are available
    Providers,
    /// Set up the provider, API key and default languages
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Delete all recorded translations
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}
