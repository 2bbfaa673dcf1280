mod cli;
mod commands;
mod error_fmt;
mod logging;

use clap::Parser;
use cli::{Cli, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = try_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn try_main(cli: Cli) -> eyre::Result<()> {
    let cfg = commands::load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "warn".to_string());
    logging::init(&level, cli.json, &cfg.logging);
    tracing::debug!(?cli.cmd, "starting");

    commands::run(cli.cmd, &cfg, cli.json)
}
