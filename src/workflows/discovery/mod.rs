//! Keyword filtering of scraped postings and the interactive "mark as applied" loop.

mod filter;
mod normalizer;
mod selector;

pub use filter::{Classification, FilterPipeline};
pub use selector::{InteractiveSelector, SelectionOutcome, SelectorError, StopReason};
