use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use refsweep::commands;
use refsweep::init_logging;
use refsweep::report::ReportFormat;
use refsweep_core::config::DEFAULT_PREFIX;

#[derive(Parser, Debug)]
#[command(name = "refsweep")]
#[command(about = "Parameter sweeps over an external refinement checker")]
struct Args {
    /// Working directory holding the template, rendered files and artifacts
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Log file name, created in the working directory
    #[arg(long, global = true, default_value = "refsweep.log")]
    log_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sweep, optionally resuming from an index
    Run {
        /// Index to resume from (see `plan`)
        #[arg(allow_negative_numbers = true)]
        start: Option<String>,

        /// Sweep file (default: sweep.yaml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Tabulate stored artifacts against one parameter
    Summarise {
        /// Parameter to report on
        param: String,

        /// Leave out the column listing the other parameters
        #[arg(long)]
        hide_context: bool,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,

        /// File name prefix of the artifacts
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },

    /// List every index with its parameters and file, without running anything
    Plan {
        /// Sweep file (default: sweep.yaml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();

    init_logging(&args.dir, &args.log_file, &args.log_level)?;

    match args.command {
        Command::Run { start, config } => {
            commands::run(&args.dir, config.as_deref(), start.as_deref())
        }
        Command::Summarise {
            param,
            hide_context,
            format,
            prefix,
        } => commands::summarise(&args.dir, &prefix, &param, format, hide_context),
        Command::Plan { config } => commands::plan(&args.dir, config.as_deref()),
    }
}
