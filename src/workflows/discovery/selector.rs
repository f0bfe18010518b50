use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::workflows::listings::Posting;
use crate::workflows::tracking::{AppliedJob, JobId, JobRepository, RepositoryError};

const PROMPT: &str = "Input value of job you applied for, or -1 to quit";
const QUIT: i64 = -1;

/// Why the selection loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every pending posting has been recorded.
    Exhausted,
    /// The operator entered `-1`.
    Declined,
    /// Input reached end of file.
    InputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub recorded: Vec<AppliedJob>,
    pub remaining: Vec<Posting>,
    pub stop: StopReason,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Quit,
    Pick(usize),
    Invalid,
}

fn parse_choice(raw: &str, len: usize) -> Choice {
    match raw.trim().parse::<i64>() {
        Ok(QUIT) => Choice::Quit,
        Ok(value) => match usize::try_from(value) {
            Ok(index) if index < len => Choice::Pick(index),
            _ => Choice::Invalid,
        },
        Err(_) => Choice::Invalid,
    }
}

/// Operator-driven loop that records which new postings were applied to.
pub struct InteractiveSelector<'a, R: ?Sized> {
    store: &'a R,
    detail_base_url: String,
}

impl<'a, R> InteractiveSelector<'a, R>
where
    R: JobRepository + ?Sized,
{
    pub fn new(store: &'a R, detail_base_url: impl Into<String>) -> Self {
        Self {
            store,
            detail_base_url: detail_base_url.into(),
        }
    }

    fn detail_url(&self, id: &JobId) -> String {
        format!("{}/{}", self.detail_base_url, id)
    }

    /// Lists the pending postings, reads one choice per line from `input`, and persists each
    /// valid pick. Indices shown to the operator are recomputed after every removal.
    pub fn run<I, O>(
        &self,
        pending: Vec<Posting>,
        mut input: I,
        mut output: O,
    ) -> Result<SelectionOutcome, SelectorError>
    where
        I: BufRead,
        O: Write,
    {
        let mut remaining = pending;
        let mut recorded = Vec::new();
        let mut line = String::new();

        let stop = loop {
            if remaining.is_empty() {
                writeln!(output, "You've applied to all of the available jobs!")?;
                break StopReason::Exhausted;
            }

            for (index, posting) in remaining.iter().enumerate() {
                writeln!(
                    output,
                    "{index:2}: {} {}",
                    posting.title,
                    self.detail_url(&posting.id)
                )?;
            }
            writeln!(output, "{PROMPT}")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break StopReason::InputClosed;
            }
            writeln!(output)?;

            let raw = line.trim_end_matches(['\r', '\n']);
            match parse_choice(raw, remaining.len()) {
                Choice::Quit => break StopReason::Declined,
                Choice::Invalid => writeln!(output, "Invalid input {raw}")?,
                Choice::Pick(index) => {
                    let posting = remaining.remove(index);
                    match self.store.insert(&posting.title, &posting.id) {
                        Ok(job) => {
                            writeln!(output, "Applied to {} {}", posting.title, posting.id)?;
                            info!(job_id = %posting.id, "application recorded");
                            recorded.push(job);
                        }
                        Err(RepositoryError::Conflict(id)) => {
                            warn!(job_id = %id, "posting was already recorded");
                            writeln!(output, "{id} is already recorded")?;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        };

        Ok(SelectionOutcome {
            recorded,
            remaining,
            stop,
        })
    }
}
