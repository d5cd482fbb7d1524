use std::sync::Arc;

use gateway::{
    GatewayConfig, HttpChatGateway, HttpSpeakingGateway, HttpStudyGateway, HttpWritingGateway,
    StudyRoutes,
};
use sprach_core::Clock;
use sprach_core::model::ChatScene;

use crate::chat::SceneChatService;
use crate::sessions::SessionWorkflow;
use crate::speaking::{RecordingProducer, SpeakingPractice};
use crate::writing::WritingService;

/// Assembles per-screen service instances over one backend configuration.
///
/// Every builder hands out a fresh instance: screens own their state for the
/// lifetime of a mount and tear it down with the instance. Nothing here is a
/// process-wide singleton.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: GatewayConfig,
}

impl AppServices {
    #[must_use]
    pub fn new(config: GatewayConfig, clock: Clock) -> Self {
        Self { clock, config }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    fn study_workflow(&self, routes: StudyRoutes) -> SessionWorkflow {
        let gateway = Arc::new(HttpStudyGateway::new(self.config.clone(), routes));
        SessionWorkflow::new(gateway, self.clock)
    }

    /// Session workflow for the error-book screen.
    #[must_use]
    pub fn error_book(&self) -> SessionWorkflow {
        self.study_workflow(StudyRoutes::error_book())
    }

    /// Session workflow for grammar practice, with shuffled exercise order.
    #[must_use]
    pub fn grammar_practice(&self) -> SessionWorkflow {
        self.study_workflow(StudyRoutes::grammar()).with_shuffle(true)
    }

    /// Session workflow for vocabulary learning.
    #[must_use]
    pub fn vocabulary(&self) -> SessionWorkflow {
        self.study_workflow(StudyRoutes::vocabulary())
    }

    /// Session workflow for the listening material browser.
    #[must_use]
    pub fn listening(&self) -> SessionWorkflow {
        self.study_workflow(StudyRoutes::listening())
    }

    /// Session workflow for the favorites screen.
    #[must_use]
    pub fn favorites(&self) -> SessionWorkflow {
        self.study_workflow(StudyRoutes::favorites())
    }

    /// Conversation practice over the given scene list.
    #[must_use]
    pub fn scene_chat(&self, scenes: Vec<ChatScene>) -> SceneChatService {
        let gateway = Arc::new(HttpChatGateway::new(self.config.clone()));
        SceneChatService::new(gateway, self.clock, scenes)
    }

    /// Writing assistant.
    #[must_use]
    pub fn writing(&self) -> WritingService {
        let gateway = Arc::new(HttpWritingGateway::new(self.config.clone()));
        WritingService::new(gateway)
    }

    /// Speaking practice over the platform's capture capability.
    #[must_use]
    pub fn speaking(&self, producer: Box<dyn RecordingProducer>) -> SpeakingPractice {
        let gateway = Arc::new(HttpSpeakingGateway::new(self.config.clone()));
        SpeakingPractice::new(gateway, producer)
    }
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::SessionPhase;

    #[test]
    fn builders_hand_out_independent_instances() {
        let services = AppServices::new(
            GatewayConfig::new("http://localhost:8000"),
            Clock::default_clock(),
        );
        let first = services.error_book();
        let second = services.error_book();
        assert_eq!(*first.phase(), SessionPhase::Idle);
        assert_eq!(*second.phase(), SessionPhase::Idle);
    }
}
