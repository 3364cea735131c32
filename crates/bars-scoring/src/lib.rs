//! Rule-based response scoring for biologic asthma therapy.
//!
//! Each clinical domain is graded by an ordered decision table
//! ([`rules::DecisionTable`]); the domain grades are averaged into an overall
//! response score. Scoring is pure and total: missing inputs produce an
//! undefined grade, never an error.
//!
//! The crate also builds the scored table for a whole dataset and the
//! per-treatment group summaries used by the slope charts.

pub mod domains;
pub mod engine;
pub mod groups;
pub mod rules;
pub mod table;

pub use domains::{score_act, score_domain, score_exacerbation, score_ocs};
pub use engine::{aggregate, score_record};
pub use groups::{group_summaries, group_summary};
pub use rules::{DecisionTable, Rule, Verdict};
pub use table::{ResponseDistribution, ScoredTable, ScoringOptions, score_table, score_table_with};
