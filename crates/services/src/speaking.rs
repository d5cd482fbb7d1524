use std::sync::Arc;

use gateway::SpeakingGateway;
use sprach_core::Clock;
use sprach_core::model::{Item, ItemId, ItemPayload, Recording, SpeakingFeedback};

use crate::error::SpeakingError;

//
// ─── RECORDING CAPABILITY ──────────────────────────────────────────────────────
//

/// Platform capture capability: starts a take and hands back a retrievable
/// handle when it finishes. The audio itself never passes through this layer.
pub trait RecordingProducer: Send {
    /// Start capturing.
    ///
    /// # Errors
    ///
    /// Returns a message when the device cannot start (busy, denied, …).
    fn begin(&mut self) -> Result<(), String>;

    /// Stop capturing and hand over the finished recording.
    ///
    /// # Errors
    ///
    /// Returns a message when no capture was running or finalization failed.
    fn finish(&mut self) -> Result<Recording, String>;
}

/// Producer for tests and prototyping: every take yields a handle pointing at
/// a fixed location.
pub struct StubRecorder {
    location: url::Url,
    clock: Clock,
    capturing: bool,
}

impl StubRecorder {
    #[must_use]
    pub fn new(location: url::Url, clock: Clock) -> Self {
        Self {
            location,
            clock,
            capturing: false,
        }
    }
}

impl RecordingProducer for StubRecorder {
    fn begin(&mut self) -> Result<(), String> {
        if self.capturing {
            return Err("already capturing".to_string());
        }
        self.capturing = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<Recording, String> {
        if !self.capturing {
            return Err("no capture in progress".to_string());
        }
        self.capturing = false;
        Ok(Recording::new(self.location.clone(), self.clock.now()))
    }
}

//
// ─── SPEAKING PRACTICE ─────────────────────────────────────────────────────────
//

/// Listening-and-speaking drill: pick a material, record an imitation, have
/// the pronunciation evaluated.
///
/// Starting a new take voids the previous recording and feedback; switching
/// material voids both as well.
pub struct SpeakingPractice {
    gateway: Arc<dyn SpeakingGateway>,
    producer: Box<dyn RecordingProducer>,
    material: Option<ItemId>,
    recording: Option<Recording>,
    capturing: bool,
    feedback: Option<SpeakingFeedback>,
}

impl SpeakingPractice {
    #[must_use]
    pub fn new(gateway: Arc<dyn SpeakingGateway>, producer: Box<dyn RecordingProducer>) -> Self {
        Self {
            gateway,
            producer,
            material: None,
            recording: None,
            capturing: false,
            feedback: None,
        }
    }

    #[must_use]
    pub fn material(&self) -> Option<ItemId> {
        self.material
    }

    #[must_use]
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&SpeakingFeedback> {
        self.feedback.as_ref()
    }

    /// Choose the listening material to imitate. Accepts only listening
    /// items; voids any previous take and feedback.
    ///
    /// # Errors
    ///
    /// Returns `SpeakingError::NoMaterial` when the item is not a listening
    /// material, and `RecorderBusy` while a take is running.
    pub fn select_material(&mut self, item: &Item) -> Result<(), SpeakingError> {
        if self.capturing {
            return Err(SpeakingError::RecorderBusy);
        }
        if !matches!(item.payload(), ItemPayload::Listening { .. }) {
            return Err(SpeakingError::NoMaterial);
        }
        self.material = Some(item.id());
        self.recording = None;
        self.feedback = None;
        Ok(())
    }

    /// Start or stop a take. Returns true while capturing.
    ///
    /// Starting voids the previous recording and feedback; stopping stores
    /// the finished handle for evaluation.
    ///
    /// # Errors
    ///
    /// Returns `NoMaterial` before a material is chosen and `Recorder` when
    /// the capture capability fails.
    pub fn toggle_recording(&mut self) -> Result<bool, SpeakingError> {
        if self.material.is_none() {
            return Err(SpeakingError::NoMaterial);
        }
        if self.capturing {
            let recording = self.producer.finish().map_err(SpeakingError::Recorder)?;
            self.capturing = false;
            self.recording = Some(recording);
        } else {
            self.producer.begin().map_err(SpeakingError::Recorder)?;
            self.capturing = true;
            self.recording = None;
            self.feedback = None;
        }
        Ok(self.capturing)
    }

    /// Send the finished take for pronunciation evaluation.
    ///
    /// # Errors
    ///
    /// Returns `RecorderBusy` while capturing, `NoRecording` without a
    /// finished take, `NoMaterial` without a selected material (all local),
    /// or `Remote` when the gateway fails.
    pub async fn evaluate(&mut self) -> Result<&SpeakingFeedback, SpeakingError> {
        if self.capturing {
            return Err(SpeakingError::RecorderBusy);
        }
        let material = self.material.ok_or(SpeakingError::NoMaterial)?;
        let recording = self.recording.as_ref().ok_or(SpeakingError::NoRecording)?;

        let feedback = self.gateway.evaluate_recording(material, recording).await?;
        Ok(self.feedback.insert(feedback))
    }
}

impl std::fmt::Debug for SpeakingPractice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeakingPractice")
            .field("material", &self.material)
            .field("capturing", &self.capturing)
            .field("has_recording", &self.recording.is_some())
            .field("has_feedback", &self.feedback.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::InMemoryGateway;
    use sprach_core::time::fixed_clock;

    fn material() -> Item {
        Item::new(
            ItemId::new(1),
            ItemPayload::Listening {
                title: "校园日常对话".into(),
                level: "A1".into(),
                duration_secs: 150,
                audio: "https://cdn.example.com/a1-campus.mp3".parse().unwrap(),
            },
        )
    }

    fn practice() -> SpeakingPractice {
        let recorder = StubRecorder::new(
            "https://uploads.example.com/take.mp3".parse().unwrap(),
            fixed_clock(),
        );
        SpeakingPractice::new(Arc::new(InMemoryGateway::new()), Box::new(recorder))
    }

    #[test]
    fn non_listening_items_are_rejected_as_material() {
        let mut practice = practice();
        let exercise = Item::new(
            ItemId::new(2),
            ItemPayload::Grammar {
                question: "Frage".into(),
            },
        );
        assert_eq!(
            practice.select_material(&exercise).unwrap_err(),
            SpeakingError::NoMaterial
        );
    }

    #[test]
    fn toggle_produces_a_handle_after_stop() {
        let mut practice = practice();
        practice.select_material(&material()).unwrap();

        assert!(practice.toggle_recording().unwrap());
        assert!(practice.is_capturing());
        assert!(practice.recording().is_none());

        assert!(!practice.toggle_recording().unwrap());
        assert!(practice.recording().is_some());
    }

    #[tokio::test]
    async fn evaluate_without_a_take_is_a_local_error() {
        let mut practice = practice();
        practice.select_material(&material()).unwrap();
        assert_eq!(
            practice.evaluate().await.unwrap_err(),
            SpeakingError::NoRecording
        );
    }

    #[tokio::test]
    async fn evaluate_returns_feedback_for_the_take() {
        let mut practice = practice();
        practice.select_material(&material()).unwrap();
        practice.toggle_recording().unwrap();
        practice.toggle_recording().unwrap();

        let feedback = practice.evaluate().await.unwrap();
        assert!(feedback.score_percent > 0.0);
        assert!(practice.feedback().is_some());
    }

    #[tokio::test]
    async fn evaluating_mid_capture_is_rejected() {
        let mut practice = practice();
        practice.select_material(&material()).unwrap();
        practice.toggle_recording().unwrap();
        assert_eq!(
            practice.evaluate().await.unwrap_err(),
            SpeakingError::RecorderBusy
        );
    }

    #[test]
    fn a_new_take_voids_the_previous_one() {
        let mut practice = practice();
        practice.select_material(&material()).unwrap();
        practice.toggle_recording().unwrap();
        practice.toggle_recording().unwrap();
        let first = practice.recording().unwrap().id;

        practice.toggle_recording().unwrap();
        assert!(practice.recording().is_none());
        practice.toggle_recording().unwrap();
        assert_ne!(practice.recording().unwrap().id, first);
    }
}
