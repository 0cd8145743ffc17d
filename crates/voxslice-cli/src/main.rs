//! voxslice - voxelize a textured mesh into PNG slices.

use std::process::ExitCode;

use clap::Parser;
use voxslice_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures.
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    match run(&cli) {
        Ok(summary) => {
            let stats = &summary.stats;
            println!(
                "Voxelized {} into {} ({} surface, {} filled cells)",
                cli.model.display(),
                stats.dim,
                stats.surface_cells,
                stats.fill.filled_cells
            );
            println!(
                "Wrote {} image(s) starting at {}",
                summary.files.len(),
                summary
                    .files
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
