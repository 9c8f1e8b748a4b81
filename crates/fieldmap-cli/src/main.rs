//! fieldmap command-line client
//!
//! Previews and applies entity rules to a form's field definitions and shows
//! the resulting section grouping.

mod commands;
mod formatter;

use clap::{Parser, Subcommand};
use commands::CliError;
use fieldmap_core::config::{
    DEFAULT_HIDDEN_GROUP_PREFIX, DEFAULT_REGEX_SIZE_LIMIT, DEFAULT_SECTION_PREVIEW_LIMIT,
};
use fieldmap_core::FieldmapConfig;
use formatter::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// fieldmap command-line client
#[derive(Parser, Debug)]
#[command(name = "fieldmap")]
#[command(version, about = "Assign form fields to entities with ordered rules")]
pub struct Args {
    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Group prefix marking merged fields hidden from sections
    #[arg(long, global = true, default_value = DEFAULT_HIDDEN_GROUP_PREFIX)]
    pub hidden_prefix: String,

    /// Labels listed per section before "+N more"
    #[arg(long, global = true, default_value_t = DEFAULT_SECTION_PREVIEW_LIMIT)]
    pub preview_limit: usize,

    /// Compiled-size limit in bytes for regex rules; larger patterns match nothing
    #[arg(long, global = true, default_value_t = DEFAULT_REGEX_SIZE_LIMIT)]
    pub regex_size_limit: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which fields the rules would regroup
    Preview {
        /// Field definitions (JSON object keyed by field)
        #[arg(long)]
        fields: PathBuf,

        /// Rules file (JSON array); the built-in rules when omitted
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Regroup fields and write the updated definitions
    Apply {
        /// Field definitions (JSON object keyed by field)
        #[arg(long)]
        fields: PathBuf,

        /// Rules file (JSON array); the built-in rules when omitted
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Destination file; the fields file is overwritten when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show fields grouped by their current entity
    Sections {
        /// Field definitions (JSON object keyed by field)
        #[arg(long)]
        fields: PathBuf,

        /// Display names (JSON object of field key to label)
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Print the built-in rules
    Rules,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "fieldmap_cli=info".parse().unwrap_or_else(|_| tracing::Level::INFO.into()),
        ))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<String, CliError> {
    let config = FieldmapConfig::new()
        .with_hidden_group_prefix(args.hidden_prefix)
        .with_section_preview_limit(args.preview_limit)
        .with_regex_size_limit(args.regex_size_limit);
    let formatter = formatter::create_formatter(args.format);

    match args.command {
        Command::Preview { fields, rules } => {
            commands::preview(&fields, rules.as_deref(), config, &*formatter)
        }
        Command::Apply {
            fields,
            rules,
            output,
        } => commands::apply(&fields, rules.as_deref(), output.as_deref(), config, &*formatter),
        Command::Sections { fields, aliases } => {
            commands::sections(&fields, aliases.as_deref(), &config, &*formatter)
        }
        Command::Rules => Ok(commands::rules(&*formatter)),
    }
}
