use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use release_branch::cli::Cli;
use release_branch::ui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.setup_logging();

    let result = cli.run();

    ui::display_result_summary(&result);
    ui::emit_result(&mut io::stdout().lock(), &result).context("Failed to write result")?;

    std::process::exit(result.exit_code());
}
