//! In-memory [`ChainClient`] with scripted service results.
//!
//! Transactions are verified the way a node would (hash, signer, timeout),
//! then committed in the next block with the next queued [`MockOutcome`].
//! Reads answer from responses registered per `(service, method)`.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use log::trace;
use parking_lot::Mutex;

use huobi_common::{
    api::{Block, BlockHeader, Event, Receipt, ReceiptResponse, ServiceResponse, TransactionView, Validator},
    config::{DEFAULT_CHAIN_ID, GOVERNANCE_SERVICE},
    crypto::{encode_hex, Address, Hash},
    fee::cycles::BASIC_FEE,
    service::UpdateValidatorsPayload,
    transaction::SignedTransaction,
};

use super::{ChainClient, ClientError, ServiceQuery};

/// Result a committed transaction gets
#[derive(Clone, Debug)]
pub struct MockOutcome {
    pub response: ServiceResponse,
    pub cycles_used: u64,
    pub events: Vec<Event>,
}

impl MockOutcome {
    pub fn success<D: Into<String>>(data: D) -> Self {
        Self {
            response: ServiceResponse {
                code: 0,
                succeed_data: data.into(),
                error_message: String::new(),
            },
            cycles_used: BASIC_FEE,
            events: Vec::new(),
        }
    }

    pub fn failure<M: Into<String>>(code: u64, message: M) -> Self {
        Self {
            response: ServiceResponse {
                code,
                succeed_data: String::new(),
                error_message: message.into(),
            },
            cycles_used: BASIC_FEE,
            events: Vec::new(),
        }
    }

    pub fn with_cycles(mut self, cycles_used: u64) -> Self {
        self.cycles_used = cycles_used;
        self
    }

    pub fn with_event<S: Into<String>, N: Into<String>, D: Into<String>>(
        mut self,
        service: S,
        name: N,
        data: D,
    ) -> Self {
        self.events.push(Event {
            service: service.into(),
            name: name.into(),
            data: data.into(),
        });
        self
    }
}

impl Default for MockOutcome {
    fn default() -> Self {
        Self::success("")
    }
}

#[derive(Default)]
struct MockState {
    height: u64,
    validators: Vec<Validator>,
    transactions: HashMap<Hash, SignedTransaction>,
    sent: Vec<Hash>,
    receipts: HashMap<Hash, Receipt>,
    // Polls left before a receipt becomes visible
    pending: HashMap<Hash, u32>,
    outcomes: VecDeque<MockOutcome>,
    query_responses: HashMap<(String, String), ServiceResponse>,
    queries: Vec<ServiceQuery>,
    send_failures: VecDeque<Vec<String>>,
    receipt_delay: u32,
    frozen: bool,
    auto_advance: bool,
}

/// Scripted chain, see the module docs
#[derive(Default)]
pub struct MockChain {
    state: Mutex<MockState>,
}

fn not_found(what: &str) -> ClientError {
    ClientError::GraphQl {
        messages: vec![format!("[ProtocolError] Kind: Storage Error: GetNone ({})", what)],
    }
}

fn rejected(reason: &str) -> ClientError {
    ClientError::GraphQl {
        messages: vec![format!("[ProtocolError] Kind: Mempool Error: {}", reason)],
    }
}

fn unit_validator(address: &Address) -> Validator {
    Validator {
        address: address.clone(),
        propose_weight: 1,
        vote_weight: 1,
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(height: u64) -> Self {
        let chain = Self::default();
        chain.state.lock().height = height;
        chain
    }

    pub fn height(&self) -> u64 {
        self.state.lock().height
    }

    pub fn advance(&self, blocks: u64) {
        self.state.lock().height += blocks;
    }

    /// Stop producing blocks, committed transactions then never get a receipt
    pub fn freeze(&self, frozen: bool) {
        self.state.lock().frozen = frozen;
    }

    /// Produce an empty block on every latest-block query
    pub fn set_auto_advance(&self, enabled: bool) {
        self.state.lock().auto_advance = enabled;
    }

    pub fn set_validators(&self, addresses: &[Address]) {
        self.state.lock().validators = addresses.iter().map(unit_validator).collect();
    }

    pub fn validators(&self) -> Vec<Address> {
        self.state
            .lock()
            .validators
            .iter()
            .map(|v| v.address.clone())
            .collect()
    }

    pub fn push_outcome(&self, outcome: MockOutcome) {
        self.state.lock().outcomes.push_back(outcome);
    }

    pub fn set_query_response<S: Into<String>, M: Into<String>>(
        &self,
        service: S,
        method: M,
        response: ServiceResponse,
    ) {
        self.state
            .lock()
            .query_responses
            .insert((service.into(), method.into()), response);
    }

    /// Reject the next submission with the given GraphQL error messages
    pub fn fail_next_send(&self, messages: Vec<String>) {
        self.state.lock().send_failures.push_back(messages);
    }

    /// Make every receipt invisible for the given number of polls
    pub fn delay_receipts(&self, polls: u32) {
        self.state.lock().receipt_delay = polls;
    }

    /// Submitted transactions in submission order
    pub fn sent_transactions(&self) -> Vec<SignedTransaction> {
        let state = self.state.lock();
        state
            .sent
            .iter()
            .filter_map(|hash| state.transactions.get(hash).cloned())
            .collect()
    }

    pub fn queries(&self) -> Vec<ServiceQuery> {
        self.state.lock().queries.clone()
    }

    fn header(state: &MockState, height: u64) -> BlockHeader {
        BlockHeader {
            chain_id: DEFAULT_CHAIN_ID,
            height,
            exec_height: height,
            prev_hash: Hash::zero(),
            timestamp: height,
            state_root: Hash::zero(),
            proposer: state
                .validators
                .first()
                .map(|v| v.address.clone())
                .unwrap_or_default(),
            validators: state.validators.clone(),
        }
    }
}

// Committed validator updates take effect like on the node
fn apply_side_effects(state: &mut MockState, tx: &SignedTransaction, outcome: &MockOutcome) {
    let request = &tx.raw.request;
    if outcome.response.is_error()
        || request.service_name != GOVERNANCE_SERVICE
        || request.method != "update_validators"
    {
        return;
    }

    if let Ok(payload) = serde_json::from_str::<UpdateValidatorsPayload>(&request.payload) {
        state.validators = payload
            .verifier_list
            .iter()
            .map(|v| Validator {
                address: v.address.clone(),
                propose_weight: v.propose_weight as u64,
                vote_weight: v.vote_weight as u64,
            })
            .collect();
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_block(&self, height: Option<u64>) -> Result<Block, ClientError> {
        let mut state = self.state.lock();
        if height.is_none() && state.auto_advance && !state.frozen {
            state.height += 1;
        }
        let height = height.unwrap_or(state.height);
        if height > state.height {
            return Err(not_found("block"));
        }

        Ok(Block {
            hash: Hash::zero(),
            ordered_tx_hashes: state
                .receipts
                .values()
                .filter(|r| r.height == height)
                .map(|r| r.tx_hash.clone())
                .collect(),
            header: Self::header(&state, height),
        })
    }

    async fn get_transaction(&self, hash: &Hash) -> Result<TransactionView, ClientError> {
        let state = self.state.lock();
        let tx = state
            .transactions
            .get(hash)
            .ok_or_else(|| not_found("transaction"))?;

        Ok(TransactionView {
            chain_id: tx.raw.chain_id.clone(),
            cycles_limit: tx.raw.cycles_limit,
            cycles_price: tx.raw.cycles_price,
            nonce: tx.raw.nonce.clone(),
            timeout: tx.raw.timeout,
            sender: tx.raw.sender.clone(),
            service_name: tx.raw.request.service_name.clone(),
            method: tx.raw.request.method.clone(),
            payload: tx.raw.request.payload.clone(),
            tx_hash: tx.tx_hash.clone(),
            pubkey: encode_hex(tx.encoded_pubkey()),
            signature: encode_hex(tx.encoded_signature()),
        })
    }

    async fn get_receipt(&self, hash: &Hash) -> Result<Option<Receipt>, ClientError> {
        let mut state = self.state.lock();
        if let Some(remaining) = state.pending.get_mut(hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }

        Ok(state.receipts.get(hash).cloned())
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<Hash, ClientError> {
        let mut state = self.state.lock();
        if let Some(messages) = state.send_failures.pop_front() {
            return Err(ClientError::GraphQl { messages });
        }

        tx.verify().map_err(|e| rejected(&e.to_string()))?;
        if tx.raw.chain_id != DEFAULT_CHAIN_ID {
            return Err(rejected("WrongChain"));
        }
        if tx.raw.timeout <= state.height {
            return Err(rejected("InvalidTimeout"));
        }
        if state.transactions.contains_key(&tx.tx_hash) {
            return Err(rejected("Dup"));
        }

        let hash = tx.tx_hash.clone();
        trace!("Mock chain accepted {}", hash);
        state.transactions.insert(hash.clone(), tx.clone());
        state.sent.push(hash.clone());
        if state.frozen {
            return Ok(hash);
        }

        state.height += 1;
        let outcome = state.outcomes.pop_front().unwrap_or_default();
        apply_side_effects(&mut state, tx, &outcome);

        let receipt = Receipt {
            state_root: Hash::zero(),
            height: state.height,
            tx_hash: hash.clone(),
            cycles_used: outcome.cycles_used,
            events: outcome.events,
            response: ReceiptResponse {
                service_name: tx.raw.request.service_name.clone(),
                method: tx.raw.request.method.clone(),
                response: outcome.response,
            },
        };
        state.receipts.insert(hash.clone(), receipt);
        let delay = state.receipt_delay;
        state.pending.insert(hash.clone(), delay);

        Ok(hash)
    }

    async fn query_service(&self, query: &ServiceQuery) -> Result<ServiceResponse, ClientError> {
        let mut state = self.state.lock();
        state.queries.push(query.clone());
        Ok(state
            .query_responses
            .get(&(query.service_name.clone(), query.method.clone()))
            .cloned()
            .unwrap_or_default())
    }
}
