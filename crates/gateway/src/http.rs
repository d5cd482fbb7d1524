//! reqwest-backed implementations of the gateway contracts.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use sprach_core::model::{
    Category, CategoryId, Item, ItemId, Recording, RecordingId, SceneId, SpeakingFeedback,
    SubmissionResult, WritingReview,
};

use crate::api::{
    ChatGateway, ChatReply, MutationAction, MutationRequest, SpeakingGateway, StudyGateway,
    SubmissionRequest, WritingGateway,
};
use crate::envelope::Envelope;
use crate::error::RemoteError;
use crate::records::{CategoryRecord, ItemRecord, ReviewStartRecord, SampleEssayRecord,
    SubmissionResultRecord};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Where the backend lives and which session token to present.
///
/// The token comes from the authentication collaborator; this crate only
/// attaches it as a bearer credential when present.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read `SPRACH_API_BASE_URL` and optionally `SPRACH_API_TOKEN`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SPRACH_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let token = env::var("SPRACH_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Some(Self { base_url, token })
    }
}

//
// ─── ROUTES ────────────────────────────────────────────────────────────────────
//

/// Endpoint paths for one study feature. Exact strings are deployment
/// configuration; the constructors below mirror the backend's conventions.
#[derive(Clone, Debug)]
pub struct StudyRoutes {
    pub categories: String,
    pub items: String,
    pub submit: String,
    pub start_review: String,
    pub collect: String,
    pub mark_mastered: String,
    pub delete: String,
}

impl StudyRoutes {
    fn for_feature(base: &str) -> Self {
        Self {
            categories: format!("{base}/categories"),
            items: format!("{base}/list"),
            submit: format!("{base}/submit"),
            start_review: format!("{base}/start-review"),
            collect: format!("{base}/collect"),
            mark_mastered: format!("{base}/mark-mastered"),
            delete: format!("{base}/delete"),
        }
    }

    #[must_use]
    pub fn error_book() -> Self {
        Self::for_feature("/api/student/error-book")
    }

    #[must_use]
    pub fn grammar() -> Self {
        Self::for_feature("/api/student/grammar")
    }

    #[must_use]
    pub fn vocabulary() -> Self {
        Self::for_feature("/api/student/vocab")
    }

    #[must_use]
    pub fn listening() -> Self {
        Self::for_feature("/api/student/listening")
    }

    #[must_use]
    pub fn favorites() -> Self {
        Self::for_feature("/api/student/favorites")
    }
}

/// Default endpoint for scene chat.
pub const SCENE_CHAT_ROUTE: &str = "/api/student/scene-chat";

/// Default endpoints for the writing assistant.
pub const WRITING_REVIEW_ROUTE: &str = "/api/student/writing/review";
pub const WRITING_SAMPLE_ROUTE: &str = "/api/student/writing/sample";

/// Default endpoint for pronunciation evaluation.
pub const SPEAKING_EVAL_ROUTE: &str = "/api/student/speaking/evaluate";

//
// ─── SHARED CLIENT ─────────────────────────────────────────────────────────────
//

#[derive(Clone)]
struct ApiClient {
    client: Client,
    config: GatewayConfig,
}

impl ApiClient {
    fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Envelope<T>, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            warn!(code = status.as_u16(), "request rejected at transport level");
            return Err(RemoteError::server_rejected(
                status.as_u16(),
                format!("the server answered with HTTP {status}"),
            ));
        }
        response
            .json::<Envelope<T>>()
            .await
            .map_err(RemoteError::from)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let response = self
            .authed(self.client.get(self.url(path)).query(query))
            .send()
            .await
            .map_err(RemoteError::from)?;
        self.read::<T>(response).await?.into_result()
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .authed(self.client.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(RemoteError::from)?;
        self.read::<T>(response).await?.into_result()
    }

    async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), RemoteError> {
        let response = self
            .authed(self.client.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(RemoteError::from)?;
        self.read::<serde_json::Value>(response).await?.into_ack()
    }

    async fn delete_ack(&self, path: &str) -> Result<(), RemoteError> {
        let response = self
            .authed(self.client.delete(self.url(path)))
            .send()
            .await
            .map_err(RemoteError::from)?;
        self.read::<serde_json::Value>(response).await?.into_ack()
    }
}

//
// ─── STUDY ─────────────────────────────────────────────────────────────────────
//

/// HTTP implementation of `StudyGateway` for one feature's routes.
#[derive(Clone)]
pub struct HttpStudyGateway {
    api: ApiClient,
    routes: StudyRoutes,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStartBody<'a> {
    category_id: CategoryId,
    category_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectBody {
    item_id: ItemId,
    collected: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MasteredBody {
    item_id: ItemId,
    category_id: CategoryId,
}

impl HttpStudyGateway {
    #[must_use]
    pub fn new(config: GatewayConfig, routes: StudyRoutes) -> Self {
        Self {
            api: ApiClient::new(config),
            routes,
        }
    }
}

#[async_trait]
impl StudyGateway for HttpStudyGateway {
    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError> {
        let records: Vec<CategoryRecord> = self.api.get(&self.routes.categories, &[]).await?;
        records
            .into_iter()
            .map(|record| {
                record
                    .into_category()
                    .map_err(|err| RemoteError::malformed(err.to_string()))
            })
            .collect()
    }

    async fn list_items(&self, category_id: CategoryId) -> Result<Vec<Item>, RemoteError> {
        let records: Vec<ItemRecord> = self
            .api
            .get(
                &self.routes.items,
                &[("categoryId", category_id.to_string())],
            )
            .await?;
        Ok(records.into_iter().map(ItemRecord::into_item).collect())
    }

    async fn submit_answers(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, RemoteError> {
        let record: SubmissionResultRecord = self.api.post(&self.routes.submit, request).await?;
        record
            .into_result()
            .map_err(|err| RemoteError::malformed(err.to_string()))
    }

    async fn start_targeted_review(
        &self,
        category_id: CategoryId,
        category_name: &str,
    ) -> Result<String, RemoteError> {
        let record: ReviewStartRecord = self
            .api
            .post(
                &self.routes.start_review,
                &ReviewStartBody {
                    category_id,
                    category_name,
                },
            )
            .await?;
        Ok(record
            .review_tip
            .unwrap_or_else(|| format!("Review round for {category_name} is ready.")))
    }

    async fn mutate_item(&self, request: &MutationRequest) -> Result<(), RemoteError> {
        match request.action {
            MutationAction::Delete => {
                let path = format!("{}/{}", self.routes.delete, request.item_id);
                self.api.delete_ack(&path).await
            }
            MutationAction::MarkMastered => {
                self.api
                    .post_ack(
                        &self.routes.mark_mastered,
                        &MasteredBody {
                            item_id: request.item_id,
                            category_id: request.category_id,
                        },
                    )
                    .await
            }
            MutationAction::Collect | MutationAction::Uncollect => {
                self.api
                    .post_ack(
                        &self.routes.collect,
                        &CollectBody {
                            item_id: request.item_id,
                            collected: request.action == MutationAction::Collect,
                        },
                    )
                    .await
            }
        }
    }
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

/// HTTP implementation of `ChatGateway`.
#[derive(Clone)]
pub struct HttpChatGateway {
    api: ApiClient,
    route: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody<'a> {
    scene_id: SceneId,
    scene_name: &'a str,
    user_message: &'a str,
}

impl HttpChatGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            route: SCENE_CHAT_ROUTE.to_string(),
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn send_message(
        &self,
        scene_id: SceneId,
        scene_name: &str,
        text: &str,
    ) -> Result<ChatReply, RemoteError> {
        self.api
            .post(
                &self.route,
                &ChatBody {
                    scene_id,
                    scene_name,
                    user_message: text,
                },
            )
            .await
    }
}

//
// ─── WRITING ───────────────────────────────────────────────────────────────────
//

/// HTTP implementation of `WritingGateway`.
#[derive(Clone)]
pub struct HttpWritingGateway {
    api: ApiClient,
    review_route: String,
    sample_route: String,
}

#[derive(Serialize)]
struct WritingBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SampleBody<'a> {
    topic: &'a str,
}

impl HttpWritingGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            review_route: WRITING_REVIEW_ROUTE.to_string(),
            sample_route: WRITING_SAMPLE_ROUTE.to_string(),
        }
    }
}

#[async_trait]
impl WritingGateway for HttpWritingGateway {
    async fn review_text(&self, text: &str) -> Result<WritingReview, RemoteError> {
        self.api.post(&self.review_route, &WritingBody { text }).await
    }

    async fn sample_essay(&self, topic: &str) -> Result<String, RemoteError> {
        let record: SampleEssayRecord = self
            .api
            .post(&self.sample_route, &SampleBody { topic })
            .await?;
        Ok(record.essay)
    }
}

//
// ─── SPEAKING ──────────────────────────────────────────────────────────────────
//

/// HTTP implementation of `SpeakingGateway`.
#[derive(Clone)]
pub struct HttpSpeakingGateway {
    api: ApiClient,
    route: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvalBody<'a> {
    material_id: ItemId,
    recording_id: RecordingId,
    audio: &'a Url,
}

impl HttpSpeakingGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            route: SPEAKING_EVAL_ROUTE.to_string(),
        }
    }
}

#[async_trait]
impl SpeakingGateway for HttpSpeakingGateway {
    async fn evaluate_recording(
        &self,
        material_id: ItemId,
        recording: &Recording,
    ) -> Result<SpeakingFeedback, RemoteError> {
        self.api
            .post(
                &self.route,
                &EvalBody {
                    material_id,
                    recording_id: recording.id,
                    audio: &recording.audio,
                },
            )
            .await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
