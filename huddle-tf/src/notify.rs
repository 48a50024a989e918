//! Notification seam for jam-start side effects
//!
//! Delivery (email, push) is an external concern; the lifecycle code only
//! depends on this trait. The default implementation records the event in
//! the service log.

use huddle_common::db::models::{IdeaJam, Team};
use tracing::info;

/// Sink for "a jam just started" notifications to the other team members
pub trait Notifier: Send + Sync {
    /// Notify every listed member that a jam has started for their team
    fn jam_started(&self, team: &Team, jam: &IdeaJam, member_ids: &[i64]);
}

/// Default notifier: logs instead of delivering
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn jam_started(&self, team: &Team, jam: &IdeaJam, member_ids: &[i64]) {
        info!(
            "Jam {} started for team '{}' ({}); notifying {} member(s)",
            jam.id,
            team.name,
            team.id,
            member_ids.len()
        );
    }
}
