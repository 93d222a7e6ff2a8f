use std::process::ExitCode;

use clap::Parser;
use sysmute::{app, cli::Cli, utils::tracing::init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_deref());

    app::run(&cli)
}
