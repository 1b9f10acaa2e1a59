//! Validator set rotation scenario.
//!
//! Starting from the genesis block producers, the set is shrunk to a single
//! node, grown to every node, then replaced by random subsets. After each
//! change the chain must keep producing blocks with exactly the new set.

use std::{path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rand::{seq::index::sample, Rng};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use huobi_common::{
    crypto::Address,
    service::{UpdateValidatorsPayload, ValidatorExtend},
};

use crate::{assertions::assert_code, client::ChainClient, services::GovernanceService};

pub const INIT_NODE_NUM: usize = 5;
pub const INIT_BP_NUM: usize = 3;
pub const RANDOM_ROUNDS: usize = 50;

/// One node of the generated keypairs file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypairEntry {
    pub index: usize,
    pub address: Address,
    pub bls_public_key: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub peer_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeypairsFile {
    #[serde(default)]
    pub common_ref: String,
    pub keypairs: Vec<KeypairEntry>,
}

impl KeypairsFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keypairs file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid keypairs file {}", path.display()))
    }

    /// Keep the first `count` nodes, the ones the test network runs
    pub fn truncate(mut self, count: usize) -> Self {
        self.keypairs.truncate(count);
        self
    }
}

/// GraphQL endpoint of the node with the given index on the docker network
pub fn node_endpoint(index: usize) -> String {
    format!("http://173.20.0.{}:8000/graphql", index + 20)
}

/// Deterministic part of the rotation: shrink from the block producers
/// down to one node, then grow to every node
pub fn rotation_plan(init_bp_num: usize, node_num: usize) -> Vec<Vec<usize>> {
    let shrink = (1..init_bp_num).rev();
    let grow = 1..=node_num;
    shrink.chain(grow).map(|size| (0..size).collect()).collect()
}

/// Non-empty random subset of `0..node_num`, in sampled order
pub fn random_subset<R: Rng>(rng: &mut R, node_num: usize) -> Vec<usize> {
    let size = rng.gen_range(1..=node_num);
    sample(rng, node_num, size).into_vec()
}

/// How long to wait for a new block
#[derive(Clone, Debug)]
pub struct BlockWait {
    pub polls: u32,
    pub interval: Duration,
}

impl Default for BlockWait {
    fn default() -> Self {
        Self {
            polls: 100,
            interval: Duration::from_millis(200),
        }
    }
}

/// Wait until the executed height passes `from`, the current one when `None`.
/// Returns the new executed height.
pub async fn wait_for_new_block(client: &dyn ChainClient, from: Option<u64>, wait: &BlockWait) -> Result<u64> {
    let from = match from {
        Some(height) => height,
        None => client.get_block(None).await?.header.exec_height,
    };

    for _ in 0..wait.polls {
        sleep(wait.interval).await;
        let height = client.get_block(None).await?.header.exec_height;
        if height > from {
            debug!("Executed height moved from {} to {}", from, height);
            return Ok(height);
        }
    }

    bail!("Not producing block for {} loops", wait.polls)
}

/// The latest block must be produced by exactly `expected`, in order
pub async fn check_validators(client: &dyn ChainClient, expected: &[Address]) -> Result<()> {
    let block = client.get_block(None).await?;
    let actual = block.validator_addresses();
    if actual != expected {
        bail!(
            "Validators mismatch at height {}: expected {:?}, got {:?}",
            block.header.height,
            expected.iter().map(Address::to_hex).collect::<Vec<_>>(),
            actual.iter().map(Address::to_hex).collect::<Vec<_>>()
        );
    }
    Ok(())
}

/// Replace the validator set through governance. Returns the commit height.
pub async fn change_validators(governance: &GovernanceService, validators: &[&KeypairEntry]) -> Result<u64> {
    let payload = UpdateValidatorsPayload {
        verifier_list: validators
            .iter()
            .map(|v| ValidatorExtend::with_unit_weights(v.bls_public_key.clone(), v.address.clone()))
            .collect(),
    };

    let outcome = governance.update_validators(&payload).await?;
    assert_code(&outcome, 0).context("update_validators rejected")?;
    Ok(outcome.receipt.height)
}

pub struct ValidatorRotation {
    governance: GovernanceService,
    keypairs: Vec<KeypairEntry>,
    init_bp_num: usize,
    random_rounds: usize,
    wait: BlockWait,
}

impl ValidatorRotation {
    /// `governance` must be signed by the governance admin
    pub fn new(governance: GovernanceService, keypairs: Vec<KeypairEntry>, init_bp_num: usize) -> Self {
        Self {
            governance,
            keypairs,
            init_bp_num,
            random_rounds: RANDOM_ROUNDS,
            wait: BlockWait::default(),
        }
    }

    pub fn with_random_rounds(mut self, rounds: usize) -> Self {
        self.random_rounds = rounds;
        self
    }

    pub fn with_block_wait(mut self, wait: BlockWait) -> Self {
        self.wait = wait;
        self
    }

    fn client(&self) -> &dyn ChainClient {
        self.governance.caller().client()
    }

    fn select(&self, indices: &[usize]) -> Result<Vec<&KeypairEntry>> {
        indices
            .iter()
            .map(|&i| {
                self.keypairs
                    .get(i)
                    .with_context(|| format!("No keypair {} among {}", i, self.keypairs.len()))
            })
            .collect()
    }

    /// Every set the rotation goes through, after the initial one
    pub fn plan<R: Rng>(&self, rng: &mut R) -> Vec<Vec<usize>> {
        let node_num = self.keypairs.len();
        let mut plan = rotation_plan(self.init_bp_num, node_num);
        plan.extend((0..self.random_rounds).map(|_| random_subset(rng, node_num)));
        plan
    }

    pub async fn check(&self, indices: &[usize]) -> Result<()> {
        let expected: Vec<Address> = self
            .select(indices)?
            .into_iter()
            .map(|v| v.address.clone())
            .collect();
        check_validators(self.client(), &expected).await
    }

    pub async fn change_and_check(&self, indices: &[usize]) -> Result<()> {
        info!("Changing validators to {:?}", indices);
        let selected = self.select(indices)?;
        let height = change_validators(&self.governance, &selected).await?;
        wait_for_new_block(self.client(), Some(height), &self.wait).await?;
        self.check(indices)
            .await
            .with_context(|| format!("After changing validators to {:?}", indices))?;
        info!("Validators changed to {:?}", indices);
        Ok(())
    }

    pub async fn run<R: Rng>(&self, rng: &mut R) -> Result<()> {
        if self.keypairs.is_empty() || self.init_bp_num > self.keypairs.len() {
            bail!(
                "Cannot rotate {} block producers among {} nodes",
                self.init_bp_num,
                self.keypairs.len()
            );
        }

        wait_for_new_block(self.client(), None, &self.wait).await?;
        let initial: Vec<usize> = (0..self.init_bp_num).collect();
        self.check(&initial).await.context("Unexpected initial validators")?;
        info!(
            "Initial validators ok, {} producers among {} nodes",
            self.init_bp_num,
            self.keypairs.len()
        );

        let plan = self.plan(rng);
        for indices in &plan {
            self.change_and_check(indices).await?;
        }

        info!("Validator rotation finished after {} changes", plan.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{client::mock::MockChain, services::test_utils::mock_caller};

    fn keypairs(count: usize) -> Vec<KeypairEntry> {
        (0..count)
            .map(|index| KeypairEntry {
                index,
                address: Address::new([index as u8 + 1; 20]),
                bls_public_key: format!("0x04{:02x}", index),
                public_key: String::new(),
                peer_id: String::new(),
            })
            .collect()
    }

    fn fast_wait() -> BlockWait {
        BlockWait {
            polls: 5,
            interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_rotation_plan() {
        assert_eq!(
            rotation_plan(3, 5),
            vec![
                vec![0, 1],
                vec![0],
                vec![0],
                vec![0, 1],
                vec![0, 1, 2],
                vec![0, 1, 2, 3],
                vec![0, 1, 2, 3, 4],
            ]
        );
        assert_eq!(rotation_plan(1, 1), vec![vec![0]]);
    }

    #[test]
    fn test_random_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let subset = random_subset(&mut rng, 5);
            assert!(!subset.is_empty() && subset.len() <= 5);
            assert!(subset.iter().all(|&i| i < 5));
            let mut sorted = subset.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), subset.len());
        }
    }

    #[test]
    fn test_node_endpoint_and_keypairs_file() {
        assert_eq!(node_endpoint(0), "http://173.20.0.20:8000/graphql");
        assert_eq!(node_endpoint(4), "http://173.20.0.24:8000/graphql");

        let file: KeypairsFile = serde_json::from_str(
            r#"{
                "common_ref": "0x703873635a6b51513451",
                "keypairs": [
                    {"index": 0, "private_key": "0x01", "public_key": "0x02", "address": "0xf8389d774afdad8755ef8e629e5a154fddc6325a", "peer_id": "Qm", "bls_public_key": "0x04aa"},
                    {"index": 1, "address": "0x9e1d7c6e4bdd5b55c8d4ca8bb8e5f0f0d3f1a1a1", "bls_public_key": "0x04bb"}
                ]
            }"#,
        )
        .unwrap();
        let file = file.truncate(1);
        assert_eq!(file.keypairs.len(), 1);
        assert_eq!(file.keypairs[0].bls_public_key, "0x04aa");
    }

    #[tokio::test]
    async fn test_wait_for_new_block_times_out() {
        let chain = MockChain::with_height(3);
        let err = wait_for_new_block(&chain, None, &fast_wait()).await.unwrap_err();
        assert_eq!(err.to_string(), "Not producing block for 5 loops");

        chain.set_auto_advance(true);
        let height = wait_for_new_block(&chain, Some(3), &fast_wait()).await.unwrap();
        assert!(height > 3);
    }

    #[tokio::test]
    async fn test_check_validators() {
        let chain = MockChain::new();
        let nodes = keypairs(2);
        chain.set_validators(&[nodes[0].address.clone()]);

        assert!(check_validators(&chain, &[nodes[0].address.clone()]).await.is_ok());
        assert!(check_validators(&chain, &[nodes[1].address.clone()]).await.is_err());
    }

    #[tokio::test]
    async fn test_rotation_against_mock_chain() {
        let (chain, caller) = mock_caller();
        chain.set_auto_advance(true);
        let nodes = keypairs(INIT_NODE_NUM);
        let producers: Vec<Address> = nodes[..INIT_BP_NUM].iter().map(|n| n.address.clone()).collect();
        chain.set_validators(&producers);

        let rotation = ValidatorRotation::new(GovernanceService::new(caller), nodes.clone(), INIT_BP_NUM)
            .with_random_rounds(3)
            .with_block_wait(fast_wait());

        let mut rng = StdRng::seed_from_u64(42);
        let expected_last = rotation.plan(&mut StdRng::seed_from_u64(42)).pop().unwrap();
        rotation.run(&mut rng).await.unwrap();

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), rotation_plan(INIT_BP_NUM, INIT_NODE_NUM).len() + 3);
        let last: Vec<Address> = expected_last.iter().map(|&i| nodes[i].address.clone()).collect();
        assert_eq!(chain.validators(), last);
    }

    #[tokio::test]
    async fn test_rotation_rejects_bad_setup() {
        let (_chain, caller) = mock_caller();
        let rotation = ValidatorRotation::new(GovernanceService::new(caller), keypairs(2), 3)
            .with_block_wait(fast_wait());
        assert!(rotation.run(&mut StdRng::seed_from_u64(1)).await.is_err());
    }
}
