use clap::Parser;
use eva_commons::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("eva_commons=debug,info")
    } else {
        EnvFilter::new("eva_commons=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Region(args) => {
            cli::region::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Beacon(args) => {
            cli::beacon::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Boundaries(args) => {
            cli::summary::run_boundaries(args, cli.format)?;
        }
        cli::Commands::Count(args) => {
            cli::summary::run_count(args, cli.format)?;
        }
        cli::Commands::Annotations(args) => {
            cli::summary::run_annotations(args, cli.format)?;
        }
    }

    Ok(())
}
