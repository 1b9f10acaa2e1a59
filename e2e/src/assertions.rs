//! Assertions over outcomes that fail with a descriptive `anyhow` error
//! instead of panicking, so suites can propagate them with `?`.

use anyhow::{bail, Context, Result};

use crate::{
    client::ClientError,
    services::{ReadOutcome, WriteOutcome},
    transaction::CallError,
};

pub fn assert_code<T>(outcome: &WriteOutcome<T>, expected: u64) -> Result<()> {
    if outcome.code != expected {
        bail!(
            "Receipt code mismatch: expected {:#x}, got {:#x} ({})",
            expected,
            outcome.code,
            outcome.error_message
        );
    }
    Ok(())
}

pub fn assert_cycles_used<T>(outcome: &WriteOutcome<T>, expected: u64) -> Result<()> {
    if outcome.cycles_used != expected {
        bail!(
            "Cycles used mismatch: expected {}, got {}",
            expected,
            outcome.cycles_used
        );
    }
    Ok(())
}

/// Code then cycles, the pair nearly every write is checked on
pub fn assert_write<T>(outcome: &WriteOutcome<T>, code: u64, cycles_used: u64) -> Result<()> {
    assert_code(outcome, code)?;
    assert_cycles_used(outcome, cycles_used)
}

pub fn assert_query_code<T>(outcome: &ReadOutcome<T>, expected: u64) -> Result<()> {
    if outcome.code != expected {
        bail!(
            "Query code mismatch: expected {:#x}, got {:#x} ({})",
            expected,
            outcome.code,
            outcome.error_message
        );
    }
    Ok(())
}

/// Decoded data of a successful write
pub fn write_data<T>(outcome: &WriteOutcome<T>) -> Result<&T> {
    assert_code(outcome, 0)?;
    outcome.data.as_ref().context("Successful write carries no data")
}

/// Decoded data of a successful read
pub fn read_data<T>(outcome: &ReadOutcome<T>) -> Result<&T> {
    assert_query_code(outcome, 0)?;
    outcome.data.as_ref().context("Successful query carries no data")
}

/// The node must have rejected the call with a GraphQL error mentioning `needle`
pub fn assert_graphql_error_contains<T>(result: &Result<T, CallError>, needle: &str) -> Result<()> {
    match result {
        Ok(_) => bail!("Expected a GraphQL error containing '{}', call succeeded", needle),
        Err(CallError::Client(e)) if e.graphql_message_contains(needle) => Ok(()),
        Err(CallError::Client(e @ ClientError::GraphQl { .. })) => {
            bail!("GraphQL error does not mention '{}': {}", needle, e)
        }
        Err(e) => bail!("Expected a GraphQL error containing '{}', got: {}", needle, e),
    }
}

pub fn assert_balance_change(label: &str, before: u64, after: u64, expected_delta: i128) -> Result<()> {
    let delta = after as i128 - before as i128;
    if delta != expected_delta {
        bail!(
            "{} balance change mismatch: expected {}, got {} ({} -> {})",
            label,
            expected_delta,
            delta,
            before,
            after
        );
    }
    Ok(())
}
