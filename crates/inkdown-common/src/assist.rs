//! Client side of the remote text-transform service.
//!
//! The service takes the full document text plus an [`AssistAction`] and
//! answers with replacement or continuation text. Failures are never fatal:
//! the caller keeps the buffer as it was.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;

use crate::config::AssistConfig;
use crate::error::RemoteServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistAction {
    FixGrammar,
    Summarize,
    Expand,
    MakeProfessional,
}

/// What the caller does with the text that comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistDisposition {
    /// The answer replaces the whole document.
    Replace,
    /// The answer is appended after a blank line.
    Append,
}

impl AssistAction {
    pub const ALL: [AssistAction; 4] = [
        AssistAction::FixGrammar,
        AssistAction::Summarize,
        AssistAction::Expand,
        AssistAction::MakeProfessional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssistAction::FixGrammar => "fix-grammar",
            AssistAction::Summarize => "summarize",
            AssistAction::Expand => "expand",
            AssistAction::MakeProfessional => "make-professional",
        }
    }

    pub fn disposition(self) -> AssistDisposition {
        match self {
            AssistAction::FixGrammar | AssistAction::MakeProfessional => {
                AssistDisposition::Replace
            }
            AssistAction::Summarize | AssistAction::Expand => AssistDisposition::Append,
        }
    }

    /// Instruction sent ahead of the document text.
    pub fn instruction(self) -> &'static str {
        match self {
            AssistAction::FixGrammar => {
                "Fix the grammar and spelling of the following Markdown document. \
                 Keep the Markdown structure intact and answer with the corrected document only."
            }
            AssistAction::Summarize => {
                "Summarize the following Markdown document in a short paragraph. \
                 Answer with the summary only."
            }
            AssistAction::Expand => {
                "Continue the following Markdown document with one or two paragraphs \
                 in the same style. Answer with the new text only."
            }
            AssistAction::MakeProfessional => {
                "Rewrite the following Markdown document in a professional tone. \
                 Keep the Markdown structure intact and answer with the rewritten document only."
            }
        }
    }
}

impl std::fmt::Display for AssistAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssistAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssistAction::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = AssistAction::ALL.iter().map(|a| a.name()).collect();
                format!("unknown action `{s}`, expected one of: {}", names.join(", "))
            })
    }
}

/// Asynchronous text transform keyed by action.
pub trait TextAssistant {
    fn transform(
        &self,
        text: &str,
        action: AssistAction,
    ) -> impl Future<Output = Result<String, RemoteServiceError>> + Send;
}

/// [`TextAssistant`] backed by a generate-content HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl HttpAssistant {
    pub fn new(config: &AssistConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default http client");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl TextAssistant for HttpAssistant {
    async fn transform(
        &self,
        text: &str,
        action: AssistAction,
    ) -> Result<String, RemoteServiceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RemoteServiceError::MissingCredential);
        };

        let prompt = format!("{}\n\n{}", action.instruction(), text);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(%action, model = %self.model, "requesting text transform");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        first_text(parsed).ok_or(RemoteServiceError::EmptyResponse)
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
}
