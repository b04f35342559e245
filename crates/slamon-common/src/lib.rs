//! Shared domain model for the slamon SLA assessment engine.
//!
//! An [`types::Agreement`] is the persisted contract being assessed: a set of
//! named metric [`types::Variable`]s, a set of [`types::Guarantee`] terms
//! (boolean constraints over those variables), and the mutable
//! [`types::Assessment`] bookkeeping the engine maintains across evaluation
//! runs. Evaluation outputs are [`types::Violation`] records bundled into an
//! [`types::AssessmentResult`].

pub mod types;

#[cfg(test)]
mod tests;
