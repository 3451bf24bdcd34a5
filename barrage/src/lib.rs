#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod aggregator;
mod config;
mod constants;
mod data;
mod dispatcher;
mod error;
mod metrics;
mod round;

pub use aggregator::{percentile, summarize};
pub use config::BenchConfig;
pub use constants::*;
pub use data::*;
pub use dispatcher::{run, Dispatcher};
pub use error::*;
pub use metrics::{OutcomeLabels, OUTCOME_LABELS};
pub use round::round_half_away;
