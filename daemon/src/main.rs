//! Shadow Vote indexer daemon.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use shadow_chain::ChainClient;
use shadow_crypto::HashEngine;
use shadow_indexer::{
    init_logging, IndexerConfig, IndexerContext, IndexerError, IndexerMetrics, Poller,
    ShutdownController,
};
use shadow_rpc::{RpcError, RpcServer, RpcState};
use shadow_store_lmdb::LmdbEnvironment;
use shadow_types::ChainNetwork;
use tokio::task::JoinError;

#[derive(Parser)]
#[command(name = "shadow-indexer", about = "Shadow Vote commitment indexer")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "SHADOW_CONFIG")]
    config: Option<PathBuf>,

    /// Program whose transitions are indexed, e.g. "shadow_vote_v3.aleo".
    #[arg(long, env = "SHADOW_PROGRAM_ID")]
    program_id: Option<String>,

    /// Explorer API base URL.
    #[arg(long, env = "SHADOW_CHAIN_API_URL")]
    chain_api_url: Option<String>,

    /// Network: "mainnet", "testnet" or "canary".
    #[arg(long, env = "SHADOW_NETWORK")]
    network: Option<ChainNetwork>,

    /// Merkle tree depth.
    #[arg(long, env = "SHADOW_TREE_DEPTH")]
    tree_depth: Option<u32>,

    /// Seconds between polls once caught up.
    #[arg(long, env = "SHADOW_POLL_INTERVAL")]
    poll_interval_secs: Option<u64>,

    /// First height to index on a fresh database.
    #[arg(long, env = "SHADOW_START_HEIGHT")]
    start_height: Option<u64>,

    /// Blocks behind the head to start from on a fresh database.
    #[arg(long, env = "SHADOW_BACKFILL_MARGIN")]
    backfill_margin: Option<u64>,

    /// Blocks behind the head to restart from when the cursor is ahead of it.
    #[arg(long, env = "SHADOW_REORG_MARGIN")]
    reorg_margin: Option<u64>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "SHADOW_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the read API binds to.
    #[arg(long, env = "SHADOW_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Read API port.
    #[arg(long, env = "SHADOW_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Serve Prometheus metrics at /metrics.
    #[arg(long, env = "SHADOW_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SHADOW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SHADOW_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Index the program and serve proofs.
    Run,
    /// Print the effective configuration as TOML and exit.
    Config,
}

impl Cli {
    /// Layer CLI flags and env vars over `base`.
    fn apply(&self, base: IndexerConfig) -> IndexerConfig {
        IndexerConfig {
            program_id: self.program_id.clone().unwrap_or(base.program_id),
            chain_api_url: self.chain_api_url.clone().unwrap_or(base.chain_api_url),
            network: self.network.unwrap_or(base.network),
            tree_depth: self.tree_depth.unwrap_or(base.tree_depth),
            poll_interval_secs: self.poll_interval_secs.unwrap_or(base.poll_interval_secs),
            start_height: self.start_height.or(base.start_height),
            backfill_margin: self.backfill_margin.unwrap_or(base.backfill_margin),
            reorg_margin: self.reorg_margin.unwrap_or(base.reorg_margin),
            data_dir: self.data_dir.clone().unwrap_or(base.data_dir),
            bind_address: self.bind_address.clone().unwrap_or(base.bind_address),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            enable_metrics: self.metrics || base.enable_metrics,
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.clone().unwrap_or(base.log_format),
            ..base
        }
    }

    fn load_config(&self) -> anyhow::Result<IndexerConfig> {
        let base = match &self.config {
            Some(path) => IndexerConfig::from_toml_file(&path.to_string_lossy())
                .with_context(|| format!("loading config file {}", path.display()))?,
            None => IndexerConfig::default(),
        };
        let config = self.apply(base);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Which task finished first.
enum Stopped {
    Signal,
    Poller(Result<Result<(), IndexerError>, JoinError>),
    Rpc(Result<Result<(), RpcError>, JoinError>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run => {
            init_logging(config.log_format()?, &config.log_level)?;
            if let Some(path) = &cli.config {
                tracing::info!(path = %path.display(), "loaded config file");
            }
            run(config).await
        }
    }
}

async fn run(config: IndexerConfig) -> anyhow::Result<()> {
    tracing::info!(
        program = %config.program_id,
        network = %config.network,
        chain_api = %config.chain_api_url,
        depth = config.tree_depth,
        data_dir = %config.data_dir.display(),
        "starting Shadow Vote indexer"
    );

    let store = Arc::new(
        LmdbEnvironment::open_and_migrate(&config.data_dir)
            .with_context(|| format!("opening database in {}", config.data_dir.display()))?,
    );
    let engine = Arc::new(HashEngine::new()?);
    let metrics = Arc::new(IndexerMetrics::new()?);
    let ctx = IndexerContext::load(store, engine, config.tree_depth, metrics)?;
    let rpc_state = RpcState::from_context(&ctx, config.enable_metrics);

    let chain = ChainClient::new(
        &config.chain_api_url,
        config.network,
        config.request_timeout(),
    )?;
    let poller = Poller::new(chain, ctx, &config)?;

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.rpc_port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address))?;
    let server = RpcServer::new(addr);

    let shutdown = ShutdownController::new();
    let mut poller_task = tokio::spawn(poller.run(shutdown.subscribe()));
    let rpc_shutdown = shutdown.subscribe();
    let mut rpc_task = tokio::spawn(async move { server.serve(rpc_state, rpc_shutdown).await });

    let stopped = tokio::select! {
        res = shutdown.wait_for_signal() => {
            res.context("installing signal handlers")?;
            Stopped::Signal
        }
        res = &mut poller_task => Stopped::Poller(res),
        res = &mut rpc_task => Stopped::Rpc(res),
    };
    shutdown.shutdown();

    match stopped {
        Stopped::Signal => {
            let (poller_res, rpc_res) = tokio::join!(poller_task, rpc_task);
            match poller_res {
                Ok(Ok(())) => rpc_res??,
                failed => {
                    log_secondary_exit("read API", rpc_res);
                    failed??;
                }
            }
        }
        Stopped::Poller(res) => {
            log_secondary_exit("read API", rpc_task.await);
            res??;
            bail!("poller exited before shutdown was requested");
        }
        Stopped::Rpc(res) => {
            log_secondary_exit("poller", poller_task.await);
            res??;
            bail!("read API exited before shutdown was requested");
        }
    }

    tracing::info!("Shadow Vote indexer exited cleanly");
    Ok(())
}

/// Report how a task ended once another task has already decided the exit
/// status. Returns whether it failed.
fn log_secondary_exit<E: std::fmt::Display>(
    task: &str,
    res: Result<Result<(), E>, JoinError>,
) -> bool {
    match res {
        Ok(Ok(())) => {
            tracing::debug!(task, "stopped");
            false
        }
        Ok(Err(e)) => {
            tracing::warn!(task, error = %e, "also failed during shutdown");
            true
        }
        Err(e) => {
            tracing::warn!(task, error = %e, "task panicked or was cancelled");
            true
        }
    }
}
