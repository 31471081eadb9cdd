//! action-params CLI - render alert action parameters offline

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use action_params::input::{load_params, load_scope};
use action_params::{
    collect_references, validate_references, EscapePolicy, FixSuggestion, MissingPolicy,
    Namespace, ParamsConfig, ParamsError, Scopes, Transformer,
};

#[derive(Parser)]
#[command(name = "action-params")]
#[command(about = "Render alert action parameters against state and context")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a parameter file and print the result as JSON
    Render {
        /// Parameter tree (JSON or YAML)
        #[arg(short, long)]
        params: PathBuf,

        /// Alert state scope (JSON or YAML object)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Firing context scope (JSON or YAML object)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Escape substituted values (none, html, json)
        #[arg(short, long)]
        escape: Option<EscapePolicy>,

        /// Fail on unresolved references instead of rendering them empty
        #[arg(long)]
        strict: bool,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the placeholder references used by a parameter file
    Refs {
        /// Parameter tree (JSON or YAML)
        file: PathBuf,

        /// Fail if any reference uses a namespace other than state/context
        #[arg(long)]
        check: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so rendered output stays pipeable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            params,
            state,
            context,
            escape,
            strict,
            compact,
        } => render_params(
            &params,
            state.as_deref(),
            context.as_deref(),
            escape,
            strict,
            compact,
        ),
        Commands::Refs { file, check } => list_refs(&file, check),
        Commands::Config { action } => handle_config_command(action),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn render_params(
    params_path: &Path,
    state_path: Option<&Path>,
    context_path: Option<&Path>,
    escape_override: Option<EscapePolicy>,
    strict: bool,
    compact: bool,
) -> Result<(), ParamsError> {
    let mut config = ParamsConfig::load()?.with_env();

    // Apply CLI overrides
    if let Some(escape) = escape_override {
        config.render.escape = Some(escape);
    }
    if strict {
        config.render.missing = Some(MissingPolicy::Strict);
    }
    let transformer = Transformer::from_config(&config);
    let options = transformer.options();

    let params = load_params(params_path)?;
    let state = load_scope(state_path, Namespace::State)?;
    let context = load_scope(context_path, Namespace::Context)?;

    info!(
        escape = %options.escape,
        missing = %options.missing,
        state_vars = state.len(),
        context_vars = context.len(),
        "rendering action params"
    );

    let rendered = transformer.transform(&params, &Scopes::new(&state, &context))?;

    let output = if compact {
        serde_json::to_string(&rendered)?
    } else {
        serde_json::to_string_pretty(&rendered)?
    };
    println!("{}", output);

    Ok(())
}

fn list_refs(file: &Path, check: bool) -> Result<(), ParamsError> {
    let params = load_params(file)?;

    if check {
        validate_references(&params)?;
    }

    let mut seen = Vec::new();
    for reference in collect_references(&params) {
        let name = reference.to_string();
        if !seen.contains(&name) {
            println!("{}", name);
            seen.push(name);
        }
    }

    if check {
        eprintln!("{} {} reference(s) OK", "✓".green(), seen.len());
    }

    Ok(())
}

fn handle_config_command(action: ConfigAction) -> Result<(), ParamsError> {
    match action {
        ConfigAction::Show => {
            let path = ParamsConfig::config_path();
            let config = ParamsConfig::load()?.with_env();
            let options = config.render_options();

            println!("{} {}", "Config:".cyan().bold(), path.display());
            println!("  escape:  {}", options.escape);
            println!("  missing: {}", options.missing);
        }
        ConfigAction::Init { force } => {
            let path = ParamsConfig::config_path();
            if path.exists() && !force {
                return Err(ParamsError::ConfigError {
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }

            let mut config = ParamsConfig::default();
            config.render.escape = Some(EscapePolicy::default());
            config.render.missing = Some(MissingPolicy::default());
            config.save()?;

            println!("{} Wrote {}", "✓".green(), path.display());
        }
    }

    Ok(())
}
