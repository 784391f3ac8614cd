mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand};
use commands::Command;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arus")]
#[command(about = "Arus backtesting CLI", version, arg_required_else_help = true)]
#[command(
    after_help = "Examples:\n  arus backtest --config configs/sample.toml --out runs/\n  arus validate --config configs/sample.toml\n  arus report --input runs/bbca_jk_rsi_oversold/\n"
)]
struct Cli {
    /// Default log filter when ARUS_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// Log output format: text or json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
    /// Expose prometheus metrics on this host:port.
    #[arg(long, global = true)]
    metrics_addr: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    Backtest {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init(&cli.log_level, &cli.log_format, cli.metrics_addr.as_deref()) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }

    let command = match cli.command {
        CliCommand::Backtest { config, out } => Command::Backtest { config, out },
        CliCommand::Validate { config } => Command::Validate { config },
        CliCommand::Report { input } => Command::Report { input },
    };

    if let Err(err) = commands::run(command) {
        let envelope = arus_application::backtesting::error_report(&err);
        println!("{}", envelope);
        std::process::exit(1);
    }
}
