//! Lexicon-based review sentiment, summed per product.
//!
//! `map` classifies every tab-separated review line of its input as a
//! [`SentimentCode`] keyed by product id; `reduce` sums the codes of a
//! product. The sum is associative, so the same `reduce` also runs as the
//! map-side combiner.

use common::{declare_app, App, AppContext, Counters, KeyValue, Result};
use eyre::bail;
use log::{debug, info, warn};
use std::collections::BTreeMap;

pub mod aggregator;
pub mod classifier;
mod errors;
pub mod lexicon;
pub mod tokenizer;

pub use classifier::{classify, Record, SentimentCode, Tally};
pub use errors::SentimentError;
pub use lexicon::{Lexicon, Lexicons};

pub const RECORDS: &str = "records";
pub const SKIPPED_MALFORMED: &str = "skipped-malformed";

#[derive(Debug)]
pub struct SentimentApp {
    lexicons: Lexicons,
}

impl SentimentApp {
    pub fn new(lexicons: Lexicons) -> Self {
        Self { lexicons }
    }

    /// Loads the positive and negative lexicons, in that order, from the
    /// cache files.
    pub fn from_context(ctx: &AppContext) -> Result<Self> {
        let (positive, negative) = match ctx.cache_files.as_slice() {
            [positive, negative] => (positive, negative),
            files => bail!(
                "expected a positive and a negative lexicon file, got {} cache files",
                files.len()
            ),
        };

        let lexicons = Lexicons::load(positive, negative)?;
        info!(
            "loaded lexicons: {} positive words, {} negative words",
            lexicons.positive.len(),
            lexicons.negative.len()
        );
        Ok(Self::new(lexicons))
    }
}

impl App for SentimentApp {
    fn map(&self, source: String, contents: String, counters: &Counters) -> Vec<KeyValue> {
        let Lexicons { positive, negative } = &self.lexicons;
        let mut local: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut output = Vec::new();

        for line in contents.lines() {
            match Record::parse(line) {
                Ok(record) => {
                    let (product_id, code) = classify(&record, positive, negative);
                    *local.entry(RECORDS).or_insert(0) += 1;
                    *local.entry(code.counter()).or_insert(0) += 1;
                    output.push((product_id.to_owned(), code.to_string()));
                }
                Err(e) => {
                    debug!("skipping record from {}: {}", source, e);
                    *local.entry(SKIPPED_MALFORMED).or_insert(0) += 1;
                }
            }
        }

        if let Some(skipped) = local.get(SKIPPED_MALFORMED) {
            warn!("skipped {} malformed records from {}", skipped, source);
        }
        for (name, n) in local {
            counters.add(name, n);
        }
        output
    }

    fn reduce(&self, _product_id: String, values: Vec<String>) -> Result<String> {
        let total = aggregator::total_of(values.iter().map(String::as_str))?;
        Ok(total.to_string())
    }

    fn combines(&self) -> bool {
        true
    }
}

declare_app!(SentimentApp::from_context);
