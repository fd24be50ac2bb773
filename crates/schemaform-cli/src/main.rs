mod commands;
mod reader;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schemaform_core::CompileOptions;

#[derive(Parser)]
#[command(
    name = "schemaform",
    version,
    about = "Schemaform compiler: turn read/write schemas and x- annotations into form configurations"
)]
struct Cli {
    /// Log compiler decisions (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-compile overrides; these win over schemaform.config.yaml.
#[derive(Args)]
struct OptionArgs {
    /// Write model id (default: x-save-model, else Save + read id stem)
    #[arg(long)]
    write_model: Option<String>,

    /// Entity label
    #[arg(long)]
    label: Option<String>,

    /// Entity plural label
    #[arg(long)]
    plural_label: Option<String>,

    /// Primary key field name
    #[arg(long)]
    primary_key: Option<String>,

    /// Detail route path
    #[arg(long)]
    route_path: Option<String>,

    /// List route path
    #[arg(long)]
    list_path: Option<String>,
}

impl From<OptionArgs> for CompileOptions {
    fn from(args: OptionArgs) -> Self {
        CompileOptions {
            write_model_id: args.write_model,
            label: args.label,
            plural_label: args.plural_label,
            primary_key_field: args.primary_key,
            route_path: args.route_path,
            list_path: args.list_path,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one read model and output its configuration as JSON
    Compile {
        /// Read model id, e.g. QueryProductModel
        model: String,

        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Compile every read model and report invariant diagnostics
    Check {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Print a human-readable form layout for one read model
    Describe {
        /// Read model id, e.g. QueryProductModel
        model: String,

        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile {
            model,
            path,
            output,
            options,
        } => match commands::compile::run_compile(&path, &model, options.into(), output.as_deref())
            .await
        {
            Ok(json) => {
                if output.is_none() {
                    println!("{json}");
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Commands::Check { path, format } => match commands::check::run_check(&path, &format).await
        {
            Ok((output, error_count)) => {
                println!("{output}");
                if error_count > 0 {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Commands::Describe {
            model,
            path,
            options,
        } => match commands::describe::run_describe(&path, &model, options.into()).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
    }
}
