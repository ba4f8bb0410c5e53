//! The task intelligence engine.
//!
//! Pipeline for captured text: [`normalize`] -> [`extract`] -> [`assemble`].
//! Context entries go through [`interpret`]. Stored snapshots feed [`rank`],
//! [`bucket`], [`plan`] and [`aggregate`].
//!
//! Nothing in here touches the filesystem, the clock or shared state; the
//! reference time is always an argument.

pub mod analytics;
pub mod assemble;
pub mod context;
pub mod extract;
pub mod normalize;
pub mod rank;
pub mod vocab;

pub use analytics::{AggregateOptions, ProductivitySnapshot, aggregate};
pub use assemble::assemble;
pub use context::{
    ContextInterpreter, InterpreterConfig, SuggestedTask, derived_or_interpret, interpret,
    suggest_tasks,
};
pub use extract::{
    ExtractedAttributes, Extractor, ExtractorConfig, PreExtracted, RuleExtractor, extract,
    fallback_title, suggest_title,
};
pub use normalize::{NormalizedText, normalize};
pub use rank::{Bucket, Plan, bucket, plan, rank};
pub use vocab::CategoryTable;
