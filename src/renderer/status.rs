//! Timer and kitten-count panel

use crate::consts::LOW_TIME_THRESHOLD;
use crate::sim::GameSnapshot;

/// What the status panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub time_text: String,
    /// Timer is in its warning style
    pub low_time: bool,
    pub kitten_label: String,
}

impl StatusView {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            time_text: snapshot.formatted_time.clone(),
            low_time: snapshot.time_remaining <= LOW_TIME_THRESHOLD,
            kitten_label: format!("{} kittens", snapshot.num_kittens),
        }
    }
}
