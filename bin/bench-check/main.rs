use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use benchlink::{load_config_or_default, Oscilloscope, ScpiClient};

/// Bench instrument health check
#[derive(Parser, Debug)]
#[command(name = "bench-check")]
#[command(about = "Identify a bench oscilloscope and report its error status", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Instrument address (overrides the selector)
    #[arg(short, long, value_name = "ADDR")]
    address: Option<String>,

    /// Selector key into the configured oscilloscope table
    #[arg(short, long, default_value_t = 1)]
    selector: u32,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config_or_default(args.config.as_deref());

    let log_level = args
        .log_level
        .unwrap_or_else(|| config.logging.log_level.clone());
    env_logger::Builder::from_env(Env::default().default_filter_or(&log_level)).init();

    let mut builder = ScpiClient::builder()
        .selector_table(config.instruments.oscilloscope_table())
        .config(config.connection.to_connection_config());
    builder = match &args.address {
        Some(address) => builder.address(address),
        None => builder.selector(args.selector),
    };
    if let Some(trace_path) = &config.logging.trace_path {
        builder = builder
            .trace_path(trace_path.clone())
            .trace_buffer(config.logging.trace_buffer);
    }

    let client = builder.build()?;
    info!("Connected to {}", client.address());

    let mut scope = Oscilloscope::new(client);
    println!("identity: {}", scope.idn()?);
    println!("last command error: {}", scope.read_clear_error()?);

    Ok(())
}
