//! hd-keygen CLI
//!
//! Reads a 24-word mnemonic from stdin (or `--mnemonic-file`) and prints the
//! master extended keys plus Bitcoin and Ethereum keys and addresses for a
//! range of wallet indices.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hd_keygen::utils::logging::{set_max_level, LogLevel};
use hd_keygen::utils::run_config::{ExtendedKeyFormat, RunConfig, DEFAULT_WALLET_COUNT};
use hd_keygen::wallet::{generate_report, parse_mnemonic_strict, seed_from_mnemonic};
use hd_keygen::{log_debug, log_error, log_info, HdKeygenError, WalletReport};

#[derive(Parser)]
#[command(name = "hd-keygen")]
#[command(about = "Derive HD wallet keys and addresses from a BIP-39 mnemonic")]
#[command(version)]
struct Cli {
    /// Number of wallets to derive
    #[arg(short = 'n', long, default_value_t = DEFAULT_WALLET_COUNT)]
    wallet_count: u32,

    /// First wallet index
    #[arg(long, default_value_t = 0)]
    start_index: u32,

    /// Use testnet version bytes
    #[arg(long)]
    testnet: bool,

    /// Rendering of the master extended keys
    #[arg(long, value_enum, default_value_t = ExtendedKeyFormat::Base58)]
    xkey_format: ExtendedKeyFormat,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Read the mnemonic from a file instead of stdin
    #[arg(long)]
    mnemonic_file: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            mainnet: !self.testnet,
            wallet_count: self.wallet_count,
            start_index: self.start_index,
            xkey_format: self.xkey_format,
        }
    }

    fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Error
        } else {
            LogLevel::Info
        }
    }
}

fn read_mnemonic(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.mnemonic_file {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read mnemonic file {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter your 24-word mnemonic, then press Ctrl-D:");
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("failed to read mnemonic from stdin")?;
    Ok(buffer)
}

/// Record the failure in the log before anyhow prints it and exits
fn logged(error: HdKeygenError) -> HdKeygenError {
    log_error!("cli", "Run aborted", code = format!("{:?}", error.code));
    error
}

fn print_report(report: &WalletReport) {
    println!(
        "Extended Private Key (at {}): {}",
        report.master.path, report.master.extended_private_key
    );
    println!(
        "Extended Public Key (at {}): {}",
        report.master.path, report.master.extended_public_key
    );
    println!();

    for record in &report.wallets {
        println!("Wallet Index {} (at {})", record.wallet_index, record.path);
        println!("Public Key: {}", record.public_key);
        println!("Private Key: {}", record.private_key);
        println!("{} Address: {}", record.namespace.symbol(), record.address);
        println!();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_max_level(cli.log_level());

    let config = cli.run_config();
    config.validate().map_err(logged)?;

    if !cli.json {
        println!(
            "Generating addresses for wallet {} through {}",
            config.start_index,
            config.end_index()
        );
        println!();
    }

    let phrase = read_mnemonic(&cli)?;
    let mnemonic = parse_mnemonic_strict(&phrase).map_err(logged)?;
    let seed = seed_from_mnemonic(&mnemonic, "").map_err(logged)?;
    log_debug!("cli", "Seed ready", length = seed.len());

    let report = generate_report(&seed, &config).map_err(logged)?;
    log_info!(
        "cli",
        "Derived wallets",
        network = report.network,
        records = report.wallets.len()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
