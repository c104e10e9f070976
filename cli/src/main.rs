// bearcat -- command-line tool for Uniden Bearcat scanners.
//
// Usage:
//   bearcat models
//   bearcat --model BC125AT --port /dev/ttyACM0 info
//   bearcat --model BC75XLT --port 192.168.1.20 status
//   bearcat --port /dev/ttyACM0 volume 8
//   bearcat --port /dev/ttyACM0 channel 12
//   bearcat --port /dev/ttyACM0 relay --bind 0.0.0.0 --listen-port 65125
//   bearcat --port /dev/ttyACM0 probe
//
// BEARCAT_PORT and BEARCAT_MODEL stand in for --port and --model.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bearcat::Error;
use bearcat::transport::DEFAULT_RELAY_PORT;
use bearcat::uniden::models::{ScannerModel, model_by_name};
use bearcat::uniden::{Scanner, ScannerBuilder};

/// Mnemonics the probe never sends: they erase memory, switch the scanner
/// off, or change program mode.
const PROBE_SKIP: &[&str] = &["CLR", "EPG", "POF", "PRG"];

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Inspect, configure and share Uniden Bearcat scanners.
#[derive(Parser)]
#[command(name = "bearcat", version, about)]
struct Cli {
    /// Scanner model (BC125AT or BC75XLT).
    #[arg(long, env = "BEARCAT_MODEL", default_value = "BC125AT")]
    model: String,

    /// Serial device (/dev/ttyACM0, COM3), relay host:port, or a bare IPv4
    /// address for a relay on the default port.
    #[arg(long, env = "BEARCAT_PORT")]
    port: Option<String>,

    /// Override the model's default baud rate.
    #[arg(long)]
    baud: Option<u32>,

    /// Response timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// More logging (-v debug, -vv trace). RUST_LOG applies otherwise.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the supported scanner models.
    Models,

    /// Print model name, firmware version and serial number.
    Info,

    /// Print the display and what is being received.
    Status,

    /// Read the volume, or set it (0-15).
    Volume { level: Option<u8> },

    /// Read the squelch, or set it (0-15).
    Squelch { level: Option<u8> },

    /// Print a stored channel.
    Channel { index: u16 },

    /// Share the scanner over TCP until Ctrl-C.
    Relay {
        /// Address to listen on.
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        #[arg(long, default_value_t = DEFAULT_RELAY_PORT)]
        listen_port: u16,
    },

    /// Send every three-letter mnemonic and list the ones the scanner knows.
    Probe,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn lookup_model(name: &str) -> Result<ScannerModel> {
    model_by_name(name).with_context(|| {
        let known: Vec<_> = bearcat::supported_models().iter().map(|m| m.name).collect();
        format!("unknown model '{name}'. Supported: {}", known.join(", "))
    })
}

async fn connect(cli: &Cli) -> Result<Scanner> {
    let Some(port) = cli.port.as_deref() else {
        bail!("--port (or BEARCAT_PORT) is required for this command");
    };

    let mut builder = ScannerBuilder::new(lookup_model(&cli.model)?).address(port);
    if let Some(baud) = cli.baud {
        builder = builder.baud_rate(baud);
    }
    if let Some(ms) = cli.timeout_ms {
        builder = builder.response_timeout(Duration::from_millis(ms));
    }

    builder
        .build()
        .await
        .with_context(|| format!("failed to connect to {port}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `models` does not need a scanner.
    if matches!(cli.command, Command::Models) {
        return cmd_models();
    }

    let scanner = connect(&cli).await?;

    match &cli.command {
        Command::Models => unreachable!("models handled above"),
        Command::Info => cmd_info(&scanner).await,
        Command::Status => cmd_status(&scanner).await,
        Command::Volume { level } => cmd_volume(&scanner, *level).await,
        Command::Squelch { level } => cmd_squelch(&scanner, *level).await,
        Command::Channel { index } => cmd_channel(&scanner, *index).await,
        Command::Relay { bind, listen_port } => cmd_relay(&scanner, bind, *listen_port).await,
        Command::Probe => cmd_probe(&scanner).await,
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_models() -> Result<()> {
    println!("{:<10}  {:>8}  {:>12}  Baud rates", "Model", "Channels", "Coverage");
    println!("{:<10}  {:>8}  {:>12}  ----------", "-----", "--------", "--------");
    for model in bearcat::supported_models() {
        println!(
            "{:<10}  {:>8}  {:>5}-{:<3} MHz  {}",
            model.name,
            model.total_channels,
            model.min_frequency_hz / 1_000_000,
            model.max_frequency_hz / 1_000_000,
            model
                .baud_rates
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

async fn cmd_info(scanner: &Scanner) -> Result<()> {
    println!("Scanner Information");
    println!("  Model:          {}", scanner.get_model().await?);
    println!("  Firmware:       {}", scanner.get_version().await?);
    match scanner.get_electronic_serial_number().await {
        Ok((serial, product, _)) => {
            println!("  Serial number:  {serial}");
            println!("  Product code:   {product}");
        }
        Err(e) => println!("  Serial number:  unavailable ({e})"),
    }
    println!("  Channels:       {}", scanner.model().total_channels);
    Ok(())
}

async fn cmd_status(scanner: &Scanner) -> Result<()> {
    let status = scanner.get_status().await?;
    println!("{}", status.screen);
    println!(
        "squelch {}, mute {}",
        if status.squelched { "closed" } else { "open" },
        if status.muted { "on" } else { "off" },
    );

    let rx = scanner.get_reception_status().await?;
    if rx.state.frequency_hz == 0 {
        println!("Not receiving");
    } else {
        println!("Receiving: {}", rx.state);
    }
    Ok(())
}

async fn cmd_volume(scanner: &Scanner, level: Option<u8>) -> Result<()> {
    if let Some(level) = level {
        scanner.set_volume(level).await?;
    }
    println!("Volume: {}", scanner.get_volume().await?);
    Ok(())
}

async fn cmd_squelch(scanner: &Scanner, level: Option<u8>) -> Result<()> {
    if let Some(level) = level {
        scanner.set_squelch(level).await?;
    }
    println!("Squelch: {}", scanner.get_squelch().await?);
    Ok(())
}

async fn cmd_channel(scanner: &Scanner, index: u16) -> Result<()> {
    let channel = scanner.get_channel_info(index).await?;
    if channel.is_programmed() {
        println!("{channel}");
    } else {
        println!("Channel {index} is empty");
    }
    Ok(())
}

async fn cmd_relay(scanner: &Scanner, bind: &str, port: u16) -> Result<()> {
    let relay = scanner
        .listen(bind, port)
        .await
        .with_context(|| format!("failed to listen on {bind}:{port}"))?;
    println!("Relaying on {} (Ctrl-C to stop)", relay.local_addr());

    tokio::signal::ctrl_c().await?;
    relay.shutdown().await;
    Ok(())
}

async fn cmd_probe(scanner: &Scanner) -> Result<()> {
    let engine = scanner.engine();
    let mut found = Vec::new();

    for a in 'A'..='Z' {
        for b in 'A'..='Z' {
            for c in 'A'..='Z' {
                let mnemonic: String = [a, b, c].iter().collect();
                if PROBE_SKIP.contains(&mnemonic.as_str()) {
                    continue;
                }
                match engine.execute(&[mnemonic.as_str()]).await {
                    Err(Error::CommandNotFound(_)) => {}
                    Ok(fields) => {
                        println!("{mnemonic}: {}", fields.join(","));
                        found.push(mnemonic);
                    }
                    Err(e) => {
                        println!("{mnemonic}: {e}");
                        found.push(mnemonic);
                    }
                }
            }
        }
    }

    println!("{} commands found: {}", found.len(), found.join(" "));
    Ok(())
}
