// Path: crates/node/src/main.rs

#![forbid(unsafe_code)]

use ante_services::GenesisState;
use ante_types::app::{Event, ExecMode};
use ante_types::config::NodeConfig;
use ante_validator::{AdmissionEngine, AdmitResult};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(name = "ante-node", about = "Runs transactions through the admission pipeline.")]
struct Cli {
    #[clap(long, help = "Path to the node.toml configuration file.")]
    config: PathBuf,
    #[clap(long, help = "Path to the genesis JSON file.")]
    genesis: PathBuf,
    #[clap(long, help = "Install the Prometheus metrics sink and print the metrics after the run.")]
    metrics: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admits hex-encoded transactions, in order, in check or deliver mode.
    Admit {
        #[clap(long, value_enum, default_value = "check")]
        mode: ModeArg,
        /// Admit all transactions as one batch with shared signature verification.
        #[clap(long)]
        batch: bool,
        #[clap(required = true)]
        txs: Vec<String>,
    },
    /// Reports the gas a hex-encoded transaction would use. Nothing is kept.
    Simulate { tx: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Check,
    Deliver,
}

impl From<ModeArg> for ExecMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Check => ExecMode::Check,
            ModeArg::Deliver => ExecMode::Deliver,
        }
    }
}

/// One line of JSON output per transaction.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct Report {
    tx_hash: String,
    code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<&'static str>,
    log: String,
    gas_wanted: u64,
    gas_used: u64,
    events: Vec<Event>,
}

impl From<AdmitResult> for Report {
    fn from(result: AdmitResult) -> Self {
        match result {
            Ok(outcome) => Report {
                tx_hash: outcome.tx_hash,
                code: 0,
                class: None,
                log: String::new(),
                gas_wanted: outcome.gas_wanted,
                gas_used: outcome.gas_used,
                events: outcome.events,
            },
            Err(failure) => Report {
                tx_hash: failure.tx_hash,
                code: failure.error.code(),
                class: Some(failure.error.class().as_str()),
                log: failure.error.to_string(),
                gas_wanted: failure.gas_wanted,
                gas_used: failure.gas_used,
                events: Vec::new(),
            },
        }
    }
}

fn load_config(path: &Path) -> Result<NodeConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: NodeConfig = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_genesis(path: &Path) -> Result<GenesisState> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    GenesisState::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn decode_hex(tx: &str) -> Result<Vec<u8>> {
    let trimmed = tx.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| anyhow!("transaction is not valid hex: {e}"))
}

fn run(engine: &AdmissionEngine, command: Command) -> Result<Vec<Report>> {
    let reports = match command {
        Command::Admit { mode, batch, txs } => {
            let raws = txs.iter().map(|t| decode_hex(t)).collect::<Result<Vec<_>>>()?;
            let mode = ExecMode::from(mode);
            if batch {
                engine.admit_batch(&raws, mode).into_iter().map(Report::from).collect()
            } else {
                raws.iter()
                    .map(|raw| Report::from(engine.admit_transaction(raw, mode)))
                    .collect()
            }
        }
        Command::Simulate { tx } => {
            let raw = decode_hex(&tx)?;
            vec![Report::from(engine.admit_transaction(&raw, ExecMode::Simulate))]
        }
    };
    Ok(reports)
}

fn main() -> Result<()> {
    ante_telemetry::init::init_tracing().map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;
    let cli = Cli::parse();

    if cli.metrics {
        ante_validator::metrics::ADMISSION_SINK
            .set(ante_telemetry::prometheus::install())
            .map_err(|_| anyhow!("metrics sink already installed"))?;
    }

    let config = load_config(&cli.config)?;
    let genesis = load_genesis(&cli.genesis)?;
    let engine = AdmissionEngine::new(config, &genesis)?;
    tracing::info!(target: "node", chain_id = %engine.config().chain_id, "admission engine ready");

    for report in run(&engine, cli.command)? {
        println!("{}", serde_json::to_string(&report)?);
    }
    if engine.fault_count() > 0 {
        tracing::warn!(target: "node", faults = engine.fault_count(), "recovered from internal faults");
    }
    if cli.metrics {
        eprint!("{}", ante_telemetry::prometheus::render());
    }
    Ok(())
}
