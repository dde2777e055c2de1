use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wrapgen::commands::{
    analyze_command, dispatch_command, fingerprint_command, rules_command, virtuals_command,
};
use wrapgen::{init_tracing, FilterOverrides};

/// Binding generator function classification CLI.
///
/// This CLI is a thin wrapper around `wrapgen-core` (exposed in code as `wrapgen_core`).
/// All substantive logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "wrapgen",
    version = wrapgen_core::version(),
    about = "Classify C++ functions for binding generation",
    long_about = None
)]
struct Cli {
    /// Log resolver decisions to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct FilterArgs {
    /// Engine config file (JSON or YAML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Restrict output to the minimal binding surface.
    #[arg(long, default_value_t = false)]
    minimal: bool,

    /// Library version being bound (selects version-pinned rules).
    #[arg(long)]
    target_version: Option<String>,
}

impl FilterArgs {
    fn overrides(&self) -> FilterOverrides {
        FilterOverrides { minimal: self.minimal, target_version: self.target_version.clone() }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every function of a metadata model.
    Analyze {
        /// Metadata model file (JSON or YAML).
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Only list functions that survive the filter.
        #[arg(long, default_value_t = false)]
        supported_only: bool,
    },

    /// Show runtime dispatch candidates for one function.
    Dispatch {
        #[arg(long)]
        model: PathBuf,

        /// Qualified function name, e.g. `QWidget::setParent`.
        #[arg(long)]
        function: String,

        /// Upstream overload number to pick among same-named functions.
        #[arg(long)]
        overload: Option<u32>,

        /// Probe the implicit receiver instead of the parameters.
        #[arg(long, default_value_t = false)]
        receiver: bool,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show inherited virtual/pure-virtual requirements for one function.
    Virtuals {
        #[arg(long)]
        model: PathBuf,

        #[arg(long)]
        function: String,

        #[arg(long)]
        overload: Option<u32>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the exclusion rules in evaluation order.
    Rules {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the SHA-256 fingerprint of the analysis report.
    Fingerprint {
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze { model, filter, json, supported_only } => analyze_command(
            &model,
            filter.config.as_deref(),
            &filter.overrides(),
            json,
            supported_only,
        )?,
        Command::Dispatch { model, function, overload, receiver, json } => {
            dispatch_command(&model, &function, overload, receiver, json)?
        }
        Command::Virtuals { model, function, overload, json } => {
            virtuals_command(&model, &function, overload, json)?
        }
        Command::Rules { filter, json } => {
            rules_command(filter.config.as_deref(), &filter.overrides(), json)?
        }
        Command::Fingerprint { model, filter } => {
            fingerprint_command(&model, filter.config.as_deref(), &filter.overrides())?
        }
    }

    Ok(())
}
