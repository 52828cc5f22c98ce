use clap::Parser;
use jump_to::cli::commands::{cmd_commands, cmd_labels, cmd_replay, cmd_run};
use jump_to::cli::config::{Cli, Commands, load_config, merge_overrides};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Replay {
            page,
            keys,
            reposition_delay_ms,
        } => {
            let config = merge_overrides(config, cli.trace.as_deref(), reposition_delay_ms);
            cmd_replay(&page, &keys, &config)?;
        }
        Commands::Run {
            scenario,
            format,
            output,
        } => {
            let config = merge_overrides(config, cli.trace.as_deref(), None);
            let all_passed = cmd_run(&scenario, &format, output.as_deref(), &config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Labels { count } => cmd_labels(count),
        Commands::Commands => cmd_commands(&config),
    }

    Ok(())
}
