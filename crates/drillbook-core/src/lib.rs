//! drillbook-core: question model, classification, grading and practice state.
//!
//! This crate defines the data model, the answer normalizer, option parser,
//! type classifier and grader, and the session and notebook state that the
//! rest of drillbook builds on. It performs no I/O beyond reading TOML banks
//! and writing JSON reports.

pub mod builder;
pub mod classify;
pub mod error;
pub mod grade;
pub mod model;
pub mod normalize;
pub mod notebook;
pub mod options;
pub mod parser;
pub mod report;
pub mod selection;
pub mod session;
pub mod similarity;
pub mod statistics;

pub use classify::{classify, Classifier, Keywords};
pub use grade::{grade, Assessment, Grader};
pub use model::{ChoiceOption, Question, QuestionBank, QuestionType};
pub use normalize::normalize;
pub use options::parse_options;
