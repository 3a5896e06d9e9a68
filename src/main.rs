use clap::Parser;
use tracing_subscriber::EnvFilter;

mod align;
mod catalog;
mod cli;
mod core;
mod model;
mod parsing;
mod typing;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("geno_solver=debug,info")
    } else {
        EnvFilter::new("geno_solver=warn")
    };

    // Logs go to stderr; stdout carries only the report stream.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Genotype(args) => {
            cli::genotype::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Panel(args) => {
            cli::panel::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
