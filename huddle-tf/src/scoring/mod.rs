//! Compatibility scoring: capability coverage + personality vibe
//!
//! `engine` holds the pure scoring function; `personality` holds the
//! inference leaf it depends on.

pub mod engine;
pub mod personality;

pub use engine::{score_candidate, CandidateProfile, DeclaredCapability, ScoreBreakdown};
