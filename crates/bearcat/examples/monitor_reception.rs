//! Print what the scanner stops on while it scans.
//!
//! Polls the reception status twice a second and prints a line every time
//! the scanner lands on a new frequency, together with the signal level
//! where the model reports one.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p bearcat --example monitor_reception
//! ```

use std::time::Duration;

use bearcat::format_freq_mhz;
use bearcat::uniden::ScannerBuilder;
use bearcat::uniden::models::bc75xlt;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A relay address works just as well as a serial port here.
    let scanner = ScannerBuilder::new(bc75xlt())
        .address("/dev/ttyACM0")
        .build()
        .await?;

    let mut last = 0;
    loop {
        let rx = scanner.get_reception_status().await?;
        let freq = rx.state.frequency_hz;
        if freq != 0 && freq != last {
            match scanner.get_power().await {
                Ok((level, _)) => println!("{}  {:>3.0}%", format_freq_mhz(freq), level * 100.0),
                Err(_) => println!("{}", format_freq_mhz(freq)),
            }
        }
        last = freq;
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
