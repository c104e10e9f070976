//! Program the NOAA weather frequencies into a bank.
//!
//! Demonstrates idempotent channel programming: each channel is read back
//! first and only written when it differs, so running the example twice
//! changes nothing the second time.
//!
//! # Requirements
//!
//! - A BC125AT on a USB port (adjust the path for your system)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p bearcat --example program_weather
//! ```

use bearcat::uniden::ScannerBuilder;
use bearcat::uniden::models::bc125at;
use bearcat::{Channel, Modulation};

/// First channel of bank 10.
const FIRST_CHANNEL: u16 = 451;

/// NOAA weather radio, WX1 - WX7.
const WEATHER_HZ: [u64; 7] = [
    162_550_000,
    162_400_000,
    162_475_000,
    162_425_000,
    162_450_000,
    162_500_000,
    162_525_000,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = "/dev/ttyACM0";
    println!("Connecting to BC125AT on {port}...");

    let scanner = ScannerBuilder::new(bc125at()).address(port).build().await?;
    println!("Connected: {} {}", scanner.get_model().await?, scanner.get_version().await?);

    // One program-mode session for the whole batch instead of one per
    // command.
    scanner.enter_program_mode().await?;
    for (i, freq) in WEATHER_HZ.iter().enumerate() {
        let channel = Channel::new(FIRST_CHANNEL + i as u16, *freq)
            .with_name(format!("NOAA WX{}", i + 1))
            .with_modulation(Modulation::Fm)
            .with_lockout(false);

        let written = scanner.update_channel(&channel).await?;
        println!("{channel}  {}", if written { "written" } else { "unchanged" });
    }
    scanner.exit_program_mode().await?;

    Ok(())
}
