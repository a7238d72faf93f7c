//! Built-in verification harness: exercises the buffer's boundary
//! conditions and reports each check as pass/fail.

use crate::errors::BufferError;
use crate::util::ring_buffer::RingBuffer;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_CAPACITIES: &[usize] = &[1, 2, 3, 8];

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name:   String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

type Check = Result<(), String>;

macro_rules! expect_eq {
    ($got:expr, $want:expr, $what:expr) => {{
        let got = $got;
        let want = $want;
        if got != want {
            return Err(format!("{}: expected {:?}, got {:?}", $what, want, got));
        }
    }};
}

fn new_buffer(cap: usize) -> Result<RingBuffer, String> {
    RingBuffer::new(cap).map_err(|e| e.to_string())
}

/// Run every property check for each capacity, then the fixed scenarios.
/// A capacity the buffer itself refuses is reported up front instead of
/// as a string of failed checks.
pub fn run_all(capacities: &[usize]) -> Result<Vec<CheckResult>, BufferError> {
    for &cap in capacities {
        RingBuffer::new(cap)?;
    }
    let mut results = Vec::new();
    let properties: [(&str, fn(usize) -> Check); 6] = [
        ("fresh buffer is empty", fresh_is_empty),
        ("push grows size by one", push_grows),
        ("push on full fails", push_on_full),
        ("pop on empty fails", pop_on_empty),
        ("fifo order", fifo_order),
        ("wraparound", wraparound),
    ];
    for &cap in capacities {
        for (name, f) in properties.iter() {
            results.push(record(format!("{} (capacity {})", name, cap), f(cap)));
        }
    }
    results.push(record("zero capacity rejected".into(), zero_capacity()));
    results.push(record("scenario 1: fresh".into(), scenario_fresh()));
    results.push(record("scenario 2-3: fill and drain".into(), scenario_fill_and_drain()));
    results.push(record("scenario 4: push/pop x3".into(), scenario_push_pop()));
    Ok(results)
}

fn record(name: String, outcome: Check) -> CheckResult {
    debug!(check = name.as_str(), passed = outcome.is_ok(), "check");
    match outcome {
        Ok(())     => CheckResult { name, passed: true,  detail: None },
        Err(msg)   => CheckResult { name, passed: false, detail: Some(msg) },
    }
}

// ── Properties ────────────────────────────────────────────────────────

fn fresh_is_empty(cap: usize) -> Check {
    let rb = new_buffer(cap)?;
    expect_eq!(rb.len(), 0, "size");
    expect_eq!(rb.is_empty(), true, "empty");
    // Queries are idempotent.
    expect_eq!(rb.len(), 0, "size (again)");
    expect_eq!(rb.is_empty(), true, "empty (again)");
    Ok(())
}

fn push_grows(cap: usize) -> Check {
    let mut rb = new_buffer(cap)?;
    for i in 0..cap {
        rb.push(i as i32).map_err(|e| e.to_string())?;
        expect_eq!(rb.len(), i + 1, "size after push");
        expect_eq!(rb.is_empty(), false, "empty after push");
    }
    Ok(())
}

fn push_on_full(cap: usize) -> Check {
    let mut rb = new_buffer(cap)?;
    for i in 0..cap {
        rb.push(i as i32).map_err(|e| e.to_string())?;
    }
    expect_eq!(rb.push(-1), Err(BufferError::Full), "push on full");
    expect_eq!(rb.len(), cap, "size after rejected push");
    Ok(())
}

fn pop_on_empty(cap: usize) -> Check {
    let mut rb = new_buffer(cap)?;
    expect_eq!(rb.pop(), Err(BufferError::Empty), "pop on fresh");
    expect_eq!(rb.len(), 0, "size after rejected pop");
    rb.push(1).map_err(|e| e.to_string())?;
    rb.pop().map_err(|e| e.to_string())?;
    expect_eq!(rb.pop(), Err(BufferError::Empty), "pop on drained");
    expect_eq!(rb.len(), 0, "size after rejected pop");
    Ok(())
}

fn fifo_order(cap: usize) -> Check {
    let mut rb = new_buffer(cap)?;
    let values: Vec<i32> = (0..cap as i32).map(|i| i * 7 - 3).collect();
    for &v in &values {
        rb.push(v).map_err(|e| e.to_string())?;
    }
    for &v in &values {
        expect_eq!(rb.pop(), Ok(v), "pop order");
    }
    Ok(())
}

fn wraparound(cap: usize) -> Check {
    let mut rb = new_buffer(cap)?;
    let mut next_in = 0i32;
    let mut next_out = 0i32;
    // Half-fill, then churn for several laps of the backing store.
    let live = cap / 2;
    for _ in 0..live {
        rb.push(next_in).map_err(|e| e.to_string())?;
        next_in += 1;
    }
    for _ in 0..cap * 3 + 1 {
        rb.push(next_in).map_err(|e| e.to_string())?;
        next_in += 1;
        expect_eq!(rb.pop(), Ok(next_out), "pop after wrap");
        next_out += 1;
        expect_eq!(rb.len(), live, "size after wrap");
    }
    while !rb.is_empty() {
        expect_eq!(rb.pop(), Ok(next_out), "drain after wrap");
        next_out += 1;
    }
    expect_eq!(next_out, next_in, "elements lost");
    Ok(())
}

fn zero_capacity() -> Check {
    match RingBuffer::new(0) {
        Err(BufferError::InvalidCapacity { capacity: 0 }) => Ok(()),
        other => Err(format!("expected InvalidCapacity, got {:?}", other)),
    }
}

// ── Fixed scenarios (capacity 3) ─────────────────────────────────────

fn scenario_fresh() -> Check {
    let rb = new_buffer(3)?;
    expect_eq!(rb.len(), 0, "size");
    expect_eq!(rb.is_empty(), true, "empty");
    Ok(())
}

fn scenario_fill_and_drain() -> Check {
    let mut rb = new_buffer(3)?;
    for v in 1..=3 {
        expect_eq!(rb.push(v), Ok(()), "push");
        expect_eq!(rb.len(), v as usize, "size");
    }
    expect_eq!(rb.is_empty(), false, "empty");
    expect_eq!(rb.push(4), Err(BufferError::Full), "push 4");
    expect_eq!(rb.len(), 3, "size after full");

    for (v, left) in [(1, 2), (2, 1), (3, 0)] {
        expect_eq!(rb.pop(), Ok(v), "pop");
        expect_eq!(rb.len(), left, "size");
    }
    expect_eq!(rb.is_empty(), true, "empty");
    expect_eq!(rb.pop(), Err(BufferError::Empty), "pop on empty");
    Ok(())
}

fn scenario_push_pop() -> Check {
    let mut rb = new_buffer(3)?;
    for v in 1..=3 {
        expect_eq!(rb.push(v), Ok(()), "push");
        expect_eq!(rb.pop(), Ok(v), "pop");
    }
    expect_eq!(rb.len(), 0, "size");
    expect_eq!(rb.is_empty(), true, "empty");
    Ok(())
}
