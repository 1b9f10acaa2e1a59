use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};

use huobi_e2e::{
    config::{env, E2eConfig},
    logger::init_logger,
    services::GovernanceService,
    validators::{node_endpoint, BlockWait, KeypairsFile, ValidatorRotation, INIT_BP_NUM, INIT_NODE_NUM, RANDOM_ROUNDS},
};

/// Rotate the validator set of a local test network and check block production
#[derive(Parser, Clone, Debug)]
#[command(name = "change_validators")]
#[command(about = "Shrink, grow and shuffle the validator set through governance")]
pub struct Cli {
    /// Keypairs file generated for the network
    #[clap(long, default_value = "keypairs.json")]
    keypairs: PathBuf,

    /// Nodes running in the network
    #[clap(long, default_value_t = INIT_NODE_NUM)]
    node_num: usize,

    /// Block producers configured in genesis
    #[clap(long, default_value_t = INIT_BP_NUM)]
    bp_num: usize,

    /// Random validator sets tried after the deterministic rotation
    #[clap(long, default_value_t = RANDOM_ROUNDS)]
    random_rounds: usize,

    /// Node endpoint, defaults to MUTA_ENDPOINT or the first node of the docker network
    #[clap(long)]
    endpoint: Option<String>,

    /// Seed of the random rotation
    #[clap(long)]
    seed: Option<u64>,

    /// Block polls before giving up
    #[clap(long, default_value_t = 100)]
    block_polls: u32,

    /// Milliseconds between block polls
    #[clap(long, default_value_t = 200)]
    block_poll_interval_ms: u64,

    /// Set log level
    #[clap(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Disable the usage of colors in log
    #[clap(long)]
    disable_log_color: bool,
}

async fn run(cli: Cli) -> Result<()> {
    let keypairs = KeypairsFile::load(&cli.keypairs)?.truncate(cli.node_num);

    let mut config = E2eConfig::from_env().context("Invalid e2e configuration")?;
    // --endpoint, then MUTA_ENDPOINT, then the first node
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    } else if std::env::var(env::ENDPOINT).is_err() {
        let first = keypairs.keypairs.first().context("Keypairs file lists no node")?;
        config.endpoint = node_endpoint(first.index);
    }
    config.validate()?;

    let client = config.connect()?;
    let governance = GovernanceService::new(config.caller(client, config.admin()?));

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(
        "Rotating validators over {} nodes ({} producers) with seed {}",
        keypairs.keypairs.len(),
        cli.bp_num,
        seed
    );

    let rotation = ValidatorRotation::new(governance, keypairs.keypairs, cli.bp_num)
        .with_random_rounds(cli.random_rounds)
        .with_block_wait(BlockWait {
            polls: cli.block_polls,
            interval: Duration::from_millis(cli.block_poll_interval_ms),
        });
    rotation.run(&mut StdRng::seed_from_u64(seed)).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(module_path!(), cli.log_level, cli.disable_log_color)?;

    if let Err(e) = run(cli).await {
        error!("Validator rotation failed: {:#}", e);
        return Err(e);
    }

    info!("Validator rotation succeeded");
    Ok(())
}
