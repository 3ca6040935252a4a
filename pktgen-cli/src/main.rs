use pktgen_cli::{Cli, Commands};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> pktgen_core::Result<()> {
    match cli.command {
        Commands::Send { stream_file, iface } => {
            let stats = pktgen_cli::send(stream_file, iface)?;
            info!(%stats, "Done");
        }
        Commands::Build { stream_file, hex } => {
            pktgen_cli::build(stream_file, hex, &mut io::stdout().lock())?;
        }
        Commands::Interfaces => pktgen_cli::interfaces(&mut io::stdout().lock())?,
        Commands::Prompt => pktgen_cli::prompt::run()?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pktgen failed");
            ExitCode::FAILURE
        }
    }
}
