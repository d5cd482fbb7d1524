use std::sync::Arc;

use gateway::ChatGateway;
use sprach_core::Clock;
use sprach_core::model::{Author, ChatMessage, ChatScene, SceneId};

use crate::error::ChatError;

/// Scene-based conversation practice.
///
/// Selecting a scene starts a fresh transcript seeded with the assistant's
/// greeting; every student turn goes to the gateway and the reply (plus an
/// optional correction note) is appended. On a failed turn the student's
/// message stays in the transcript and the error is surfaced — retrying means
/// sending a new message, not replaying the old one.
pub struct SceneChatService {
    gateway: Arc<dyn ChatGateway>,
    clock: Clock,
    scenes: Vec<ChatScene>,
    active: Option<ChatScene>,
    transcript: Vec<ChatMessage>,
}

impl SceneChatService {
    #[must_use]
    pub fn new(gateway: Arc<dyn ChatGateway>, clock: Clock, scenes: Vec<ChatScene>) -> Self {
        Self {
            gateway,
            clock,
            scenes,
            active: None,
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub fn scenes(&self) -> &[ChatScene] {
        &self.scenes
    }

    #[must_use]
    pub fn active_scene(&self) -> Option<&ChatScene> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Enter a scene, restarting the transcript with a greeting. Re-entering
    /// the active scene also restarts it — that is how the original behaves.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownScene` for ids missing from the scene list.
    pub fn select_scene(&mut self, scene_id: SceneId) -> Result<&ChatScene, ChatError> {
        let scene = self
            .scenes
            .iter()
            .find(|s| s.id() == scene_id)
            .cloned()
            .ok_or(ChatError::UnknownScene(scene_id))?;

        self.transcript = vec![ChatMessage::new(
            Author::Assistant,
            format!(
                "Willkommen! Wir üben jetzt: {}. Antworte auf Deutsch, ich korrigiere dich.",
                scene.name()
            ),
            self.clock.now(),
        )];
        Ok(self.active.insert(scene))
    }

    /// Send one student turn and append the assistant's answer.
    ///
    /// # Errors
    ///
    /// Returns `NoScene` before a scene is selected, `EmptyMessage` for a
    /// blank text (neither reaches the gateway), or `Remote` when the
    /// gateway fails.
    pub async fn send(&mut self, text: &str) -> Result<&[ChatMessage], ChatError> {
        let scene = self.active.clone().ok_or(ChatError::NoScene)?;
        let body = text.trim();
        if body.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.transcript
            .push(ChatMessage::new(Author::Student, body, self.clock.now()));

        let reply = self
            .gateway
            .send_message(scene.id(), scene.name(), body)
            .await?;

        self.transcript
            .push(ChatMessage::new(Author::Assistant, reply.reply, self.clock.now()));
        if let Some(correction) = reply.correction {
            self.transcript.push(ChatMessage::new(
                Author::System,
                format!("Korrektur: {correction}"),
                self.clock.now(),
            ));
        }
        Ok(&self.transcript)
    }
}

impl std::fmt::Debug for SceneChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneChatService")
            .field("scenes_len", &self.scenes.len())
            .field("active", &self.active.as_ref().map(ChatScene::id))
            .field("transcript_len", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
