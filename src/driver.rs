use crate::errors::BufferError;
use crate::script::{Command, Step};
use crate::util::ring_buffer::RingBuffer;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// What a single command produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Value { value: i32 },
    Nothing,
    Count { count: usize },
    Flag  { flag: bool },
    Error { kind: &'static str, message: String },
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

impl From<BufferError> for Outcome {
    fn from(e: BufferError) -> Self {
        Outcome::Error { kind: e.kind(), message: e.to_string() }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok                   => f.write_str("ok"),
            Outcome::Value { value }      => write!(f, "{}", value),
            Outcome::Nothing              => f.write_str("none"),
            Outcome::Count { count }      => write!(f, "{}", count),
            Outcome::Flag  { flag }       => write!(f, "{}", flag),
            Outcome::Error { message, .. } => write!(f, "error: {}", message),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub line:    usize,
    pub command: Command,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Final buffer state after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub capacity: usize,
    pub size:     usize,
    pub empty:    bool,
    pub full:     bool,
}

/// Drives one buffer through a sequence of commands.
#[derive(Debug)]
pub struct Session {
    buffer:        RingBuffer,
    stop_on_error: bool,
    records:       Vec<Record>,
    stopped:       bool,
}

impl Session {
    pub fn new(capacity: usize, stop_on_error: bool) -> Result<Self, BufferError> {
        Ok(Self {
            buffer: RingBuffer::new(capacity)?,
            stop_on_error,
            records: Vec::new(),
            stopped: false,
        })
    }

    /// Execute a single command against the buffer.
    pub fn apply(&mut self, command: Command) -> Outcome {
        let rb = &mut self.buffer;
        match command {
            Command::Push(v)  => rb.push(v).map(|_| Outcome::Ok).unwrap_or_else(Outcome::from),
            Command::Pop      => rb.pop().map(|value| Outcome::Value { value }).unwrap_or_else(Outcome::from),
            Command::Peek     => rb.peek().map(|value| Outcome::Value { value }).unwrap_or(Outcome::Nothing),
            Command::Size     => Outcome::Count { count: rb.len() },
            Command::Capacity => Outcome::Count { count: rb.capacity() },
            Command::Empty    => Outcome::Flag { flag: rb.is_empty() },
            Command::Full     => Outcome::Flag { flag: rb.is_full() },
        }
    }

    /// Execute every step, recording outcomes. With `stop_on_error` set the
    /// run ends at the first Full/Empty rejection.
    pub fn run(&mut self, steps: &[Step]) -> &[Record] {
        info!(capacity = self.buffer.capacity(), steps = steps.len(), "session start");
        for step in steps {
            let outcome = self.apply(step.command);
            let failed = outcome.is_error();
            self.records.push(Record { line: step.line, command: step.command, outcome });
            if failed && self.stop_on_error {
                info!(line = step.line, "stopping at first error");
                self.stopped = true;
                break;
            }
        }
        info!(executed = self.records.len(), size = self.buffer.len(), "session end");
        &self.records
    }

    pub fn records(&self) -> &[Record] { &self.records }
    pub fn stopped(&self) -> bool { self.stopped }
    pub fn buffer(&self) -> &RingBuffer { &self.buffer }

    pub fn summary(&self) -> Summary {
        Summary {
            capacity: self.buffer.capacity(),
            size:     self.buffer.len(),
            empty:    self.buffer.is_empty(),
            full:     self.buffer.is_full(),
        }
    }
}
