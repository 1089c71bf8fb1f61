//! Typed request/response contract between the page, background and UI contexts.
//!
//! Each request kind has its own asynchronous handler, so callers that sit
//! behind a message channel can await the reply instead of holding the
//! channel open by convention.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::field::FieldClassifier;
use crate::fill::FillPlan;
use crate::mail::{MailMatch, MailMessage, first_code};
use crate::models::config::{CodefillConfig, MailConfig};
use crate::models::field::{CandidateField, Detection};
use crate::models::page::PageSnapshot;
use crate::text::TieredCodeExtractor;

/// A request from another context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    /// Find the code field on a captured page.
    ClassifyPage { snapshot: PageSnapshot },
    /// Find a code in recent messages, newest first.
    ExtractCode { messages: Vec<MailMessage> },
    /// Plan filling a code into a detected field.
    PlanFill { field: CandidateField, code: String },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::ClassifyPage { .. } => "classify_page",
            Request::ExtractCode { .. } => "extract_code",
            Request::PlanFill { .. } => "plan_fill",
        }
    }
}

/// The reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Field { detection: Option<Detection> },
    Code { found: Option<MailMatch> },
    Fill { plan: FillPlan },
    Error { message: String },
}

/// Classifier and extractor bundled for request handling.
pub struct Engine {
    classifier: FieldClassifier,
    extractor: TieredCodeExtractor,
    mail: MailConfig,
}

impl Engine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::from_config(&CodefillConfig::default())
    }

    /// Create an engine from configuration.
    pub fn from_config(config: &CodefillConfig) -> Self {
        Self {
            classifier: FieldClassifier::from_config(&config.classifier),
            extractor: TieredCodeExtractor::from_config(&config.extraction),
            mail: config.mail.clone(),
        }
    }

    pub fn classifier(&self) -> &FieldClassifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &TieredCodeExtractor {
        &self.extractor
    }

    /// Route a request to its handler.
    pub async fn dispatch(&self, request: Request) -> Response {
        debug!(kind = request.kind(), "Dispatching request");

        match request {
            Request::ClassifyPage { snapshot } => self.classify_page(snapshot).await,
            Request::ExtractCode { messages } => self.extract_code(messages).await,
            Request::PlanFill { field, code } => self.plan_fill(field, code).await,
        }
    }

    async fn classify_page(&self, snapshot: PageSnapshot) -> Response {
        match self.classifier.detect(&snapshot) {
            Ok(detection) => Response::Field { detection },
            Err(e) => {
                warn!("Rejected page snapshot: {}", e);
                Response::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn extract_code(&self, messages: Vec<MailMessage>) -> Response {
        Response::Code {
            found: first_code(&self.extractor, &messages, &self.mail),
        }
    }

    async fn plan_fill(&self, field: CandidateField, code: String) -> Response {
        Response::Fill {
            plan: FillPlan::new(&field, &code),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldTier;
    use crate::models::page::{ElementHandle, ElementSnapshot};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_classify_page_request() {
        let snapshot = PageSnapshot::new(vec![
            ElementSnapshot::new(3, "input").with_attr("autocomplete", "one-time-code"),
        ]);

        let response = Engine::new()
            .dispatch(Request::ClassifyPage { snapshot })
            .await;

        assert_eq!(
            response,
            Response::Field {
                detection: Some(Detection {
                    field: CandidateField::single(ElementHandle(3)),
                    tier: FieldTier::Marker,
                })
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_snapshot_is_an_error_response() {
        let snapshot = PageSnapshot::new(vec![
            ElementSnapshot::new(1, "input"),
            ElementSnapshot::new(1, "input"),
        ]);

        let response = Engine::new()
            .dispatch(Request::ClassifyPage { snapshot })
            .await;
        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn test_extract_code_request() {
        let request: Request = serde_json::from_value(serde_json::json!({
            "kind": "extract_code",
            "messages": [
                {"subject": "Weekly digest", "body": "Nothing new"},
                {"subject": "Your login code", "body": "Use code 771203 to sign in"}
            ]
        }))
        .unwrap();

        match Engine::new().dispatch(request).await {
            Response::Code { found: Some(found) } => {
                assert_eq!(found.index, 1);
                assert_eq!(found.code.code, "771203");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plan_fill_request() {
        let field = CandidateField::segmented((1..=4).map(ElementHandle).collect()).unwrap();
        let response = Engine::new()
            .dispatch(Request::PlanFill {
                field,
                code: "9021".to_string(),
            })
            .await;

        match response {
            Response::Fill { plan } => assert_eq!(plan.steps.len(), 4),
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
