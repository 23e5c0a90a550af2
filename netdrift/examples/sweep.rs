//! Sweep example: check every device in a JSON inventory for interface drift.
//!
//! The inventory file is a JSON array of devices:
//!
//! ```json
//! [
//!   {
//!     "name": "edge1",
//!     "address": "192.168.1.1",
//!     "platform": "cisco_ios",
//!     "interfaces": [
//!       {"name": "GigabitEthernet0/0", "enabled": true},
//!       {"name": "GigabitEthernet0/1", "enabled": false}
//!     ]
//!   }
//! ]
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example sweep -- --inventory devices.json --user admin --password secret
//! ```
//!
//! Set `RUST_LOG=debug` for per-device progress. Press Ctrl-C to cancel a
//! running sweep; devices still in flight are reported as cancelled.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netdrift::driver::SshCliTransport;
use netdrift::inventory::StaticInventory;
use netdrift::sweep::{SweepConfig, Sweeper};
use netdrift::transport::{Credentials, HostKeyVerification};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let inventory: StaticInventory =
        serde_json::from_str(&std::fs::read_to_string(&args.inventory)?)?;
    eprintln!(
        "Loaded {} devices from {}",
        inventory.len(),
        args.inventory.display()
    );

    let credentials = if let Some(password) = &args.password {
        Credentials::password(&args.user, password)
    } else if let Some(key_path) = &args.key {
        Credentials::private_key(&args.user, key_path)
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    };

    let mut transport = SshCliTransport::builder()
        .port(args.port)
        .command_timeout(Duration::from_secs(args.timeout));
    if args.insecure {
        transport = transport.host_key_verification(HostKeyVerification::Disabled);
    }

    let config = SweepConfig::default()
        .with_max_concurrent_sessions(args.concurrency)
        .with_open_timeout(Duration::from_secs(args.timeout))
        .with_execute_timeout(Duration::from_secs(args.timeout));

    let sweeper = Sweeper::new(transport.build()?, inventory, credentials).with_config(config);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling sweep...");
            on_ctrl_c.cancel();
        }
    });

    let report = sweeper.run_sweep(&cancel).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    eprintln!("{}", "-".repeat(50));
    for result in &report.results {
        match &result.error {
            Some(error) => eprintln!("{:<20} {:?}: {}", result.device.name, result.connection_outcome, error),
            None => eprintln!(
                "{:<20} {} interfaces, {} drifted",
                result.device.name,
                result.verdicts.len(),
                result.drift_count()
            ),
        }
    }
    eprintln!(
        "{} devices: {} connected, {} failed, {} skipped, {} with drift",
        report.summary.devices,
        report.summary.connected,
        report.summary.failed,
        report.summary.not_attempted,
        report.summary.drifted_devices
    );

    if !report.is_clean() {
        std::process::exit(2);
    }
    Ok(())
}

/// Simple argument parser
struct Args {
    inventory: PathBuf,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    concurrency: usize,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();

        let mut inventory = None;
        let mut port = 22;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut timeout = 10;
        let mut concurrency = 5;
        let mut insecure = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--inventory" | "-i" => {
                    i += 1;
                    inventory = args.get(i).map(PathBuf::from);
                }
                "--port" | "-p" => {
                    i += 1;
                    port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(22);
                }
                "--user" | "-u" => {
                    i += 1;
                    if let Some(value) = args.get(i) {
                        user = value.clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    password = args.get(i).cloned();
                }
                "--key" | "-k" => {
                    i += 1;
                    key = args.get(i).map(PathBuf::from);
                }
                "--timeout" | "-t" => {
                    i += 1;
                    timeout = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(10);
                }
                "--concurrency" | "-c" => {
                    i += 1;
                    concurrency = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(5);
                }
                "--insecure" => insecure = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    print_help();
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        let Some(inventory) = inventory else {
            eprintln!("Error: --inventory is required");
            print_help();
            std::process::exit(1);
        };

        Self {
            inventory,
            port,
            user,
            password,
            key,
            timeout,
            concurrency,
            insecure,
        }
    }
}

fn print_help() {
    println!(
        r#"netdrift sweep example

Usage: cargo run --example sweep -- [OPTIONS]

Options:
  -i, --inventory <PATH>     JSON inventory file (required)
  -p, --port <PORT>          SSH port [default: 22]
  -u, --user <USER>          Username [default: $USER]
  -P, --password <PASS>      Password
  -k, --key <PATH>           Private key path
  -t, --timeout <SECS>       Open and command timeout [default: 10]
  -c, --concurrency <N>      Devices swept at once [default: 5]
      --insecure             Skip host key verification
  -h, --help                 Print help
"#
    );
}
