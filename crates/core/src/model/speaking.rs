use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

//
// ─── RECORDING ─────────────────────────────────────────────────────────────────
//

/// Client-side identifier for a captured recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingId(Uuid);

impl RecordingId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

/// Handle to a finished speech recording, produced by the platform's capture
/// capability. The audio itself stays wherever the producer put it; this type
/// only carries the retrievable location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,
    pub audio: Url,
    pub recorded_at: DateTime<Utc>,
}

impl Recording {
    #[must_use]
    pub fn new(audio: Url, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: RecordingId::generate(),
            audio,
            recorded_at,
        }
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Pronunciation evaluation for one recording against one listening material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingFeedback {
    pub score_percent: f64,
    pub pronunciation_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn recordings_get_distinct_ids() {
        let audio: Url = "https://uploads.example.com/rec.mp3".parse().unwrap();
        let a = Recording::new(audio.clone(), fixed_now());
        let b = Recording::new(audio, fixed_now());
        assert_ne!(a.id, b.id);
    }
}
