use std::collections::BTreeMap;

use tracing::{debug, info};

use super::normalizer::normalize;
use crate::config::FilterConfig;
use crate::workflows::listings::{Posting, MISSING_LOCATION};
use crate::workflows::tracking::{JobId, JobRepository, RepositoryError};

const TARGET_COUNTRY: &str = "unitedstates";

/// Result of sorting one fetch worth of postings.
///
/// Every posting that passes the location gate lands in exactly one of `new`, `rejected`, or
/// `already_applied`; the rest are only counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub new: Vec<Posting>,
    /// Exact title text to the ids of every rejected posting carrying it.
    pub rejected: BTreeMap<String, Vec<JobId>>,
    pub already_applied: Vec<Posting>,
    pub outside_location: usize,
}

impl Classification {
    pub fn rejected_count(&self) -> usize {
        self.rejected.values().map(Vec::len).sum()
    }
}

/// Keyword filter over scraped postings, deduplicated against the applied-jobs store.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    interest: Vec<String>,
    exclusion: Vec<String>,
}

impl FilterPipeline {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            interest: normalized_keywords(config.interest_keywords),
            exclusion: normalized_keywords(config.exclusion_keywords),
        }
    }

    pub fn classify<R>(
        &self,
        postings: &[Posting],
        store: &R,
    ) -> Result<Classification, RepositoryError>
    where
        R: JobRepository + ?Sized,
    {
        let mut outcome = Classification::default();

        for posting in postings {
            if !passes_location_gate(&posting.location) {
                debug!(job_id = %posting.id, location = %posting.location, "outside target location");
                outcome.outside_location += 1;
                continue;
            }

            if self.is_candidate(&posting.title) {
                if store.exists(&posting.id)? {
                    outcome.already_applied.push(posting.clone());
                } else {
                    outcome.new.push(posting.clone());
                }
            } else {
                outcome
                    .rejected
                    .entry(posting.title.clone())
                    .or_default()
                    .push(posting.id.clone());
            }
        }

        info!(
            new = outcome.new.len(),
            already_applied = outcome.already_applied.len(),
            rejected = outcome.rejected_count(),
            outside_location = outcome.outside_location,
            "classified postings"
        );
        Ok(outcome)
    }

    fn is_candidate(&self, title: &str) -> bool {
        let title = normalize(title);
        let interested = self
            .interest
            .iter()
            .any(|keyword| title.contains(keyword.as_str()));

        interested
            && !self
                .exclusion
                .iter()
                .any(|keyword| title.contains(keyword.as_str()))
    }
}

fn normalized_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|keyword| normalize(&keyword))
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

fn passes_location_gate(location: &str) -> bool {
    location == MISSING_LOCATION || normalize(location).contains(TARGET_COUNTRY)
}
