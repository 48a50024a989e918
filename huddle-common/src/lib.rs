//! Shared library for the Huddle team-formation services
//!
//! Provides the error type, domain events, and database layer used by
//! the team-formation microservice.

pub mod db;
pub mod error;
pub mod events;

pub use error::{Error, Result};

/// Fixed duration of an Idea Jam session, in minutes
pub const JAM_DURATION_MINUTES: i64 = 10;

/// Maximum length of an idea entry after trimming, in characters
pub const MAX_IDEA_LEN: usize = 280;
