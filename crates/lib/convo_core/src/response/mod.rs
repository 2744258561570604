//! Response builders and the webhook response wire format.
//!
//! Handlers assemble a [`Reply`]: a prompt (plain text, a simple response or
//! a rich response), an optional list/carousel select, and whether the
//! conversation continues. [`Reply::into_webhook_response`] turns it into the
//! Dialogflow webhook body carrying an Actions on Google payload.

pub mod rich;
pub mod select;

use serde::Serialize;
use thiserror::Error;

pub use rich::{
    BasicCard, BrowseCarousel, BrowseItem, Button, Image, LinkOutSuggestion, MediaImageKind,
    MediaObject, MediaResponse, MediaType, RichItem, RichResponse, SimpleResponse, Suggestion,
};
pub use select::{CarouselSelect, ListSelect, OptionInfo, OptionItem, OptionSelect};

/// Helper intent the platform runs to let the user pick a list/carousel item.
pub const OPTION_INTENT: &str = "actions.intent.OPTION";

/// `@type` of the option value spec attached to [`OPTION_INTENT`].
pub const OPTION_VALUE_SPEC_TYPE: &str = "type.googleapis.com/google.actions.v2.OptionValueSpec";

/// Errors raised while assembling a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("response already holds a {existing}, cannot add a {rejected}")]
    VisualBlockTaken {
        existing: &'static str,
        rejected: &'static str,
    },

    #[error("option key '{0}' is used more than once")]
    DuplicateOptionKey(String),
}

/// What the assistant says or shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Simple(SimpleResponse),
    Rich(RichResponse),
}

impl Prompt {
    pub fn rich_response(&self) -> Option<&RichResponse> {
        match self {
            Prompt::Rich(rich) => Some(rich),
            _ => None,
        }
    }

    fn first_simple(&self) -> Option<&SimpleResponse> {
        match self {
            Prompt::Text(_) => None,
            Prompt::Simple(simple) => Some(simple),
            Prompt::Rich(rich) => rich.simple_responses().next(),
        }
    }

    /// Spoken text of the prompt (first simple response for rich prompts).
    pub fn speech(&self) -> &str {
        match self {
            Prompt::Text(text) => text.as_str(),
            _ => self.first_simple().map_or("", |s| s.text_to_speech.as_str()),
        }
    }

    /// On-screen text of the prompt, falling back to the speech.
    pub fn display_text(&self) -> &str {
        match self {
            Prompt::Text(text) => text.as_str(),
            _ => self.first_simple().map_or("", SimpleResponse::shown_text),
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<SimpleResponse> for Prompt {
    fn from(simple: SimpleResponse) -> Self {
        Prompt::Simple(simple)
    }
}

impl From<RichResponse> for Prompt {
    fn from(rich: RichResponse) -> Self {
        Prompt::Rich(rich)
    }
}

/// Whether the conversation expects another user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    End,
}

/// A complete answer to one webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    outcome: Outcome,
    prompt: Prompt,
    select: Option<OptionSelect>,
}

impl Reply {
    /// Answer and keep the microphone open.
    pub fn ask(prompt: impl Into<Prompt>) -> Self {
        Self {
            outcome: Outcome::Continue,
            prompt: prompt.into(),
            select: None,
        }
    }

    /// Answer and end the conversation.
    pub fn tell(prompt: impl Into<Prompt>) -> Self {
        Self {
            outcome: Outcome::End,
            prompt: prompt.into(),
            select: None,
        }
    }

    pub fn ask_with_list(
        prompt: impl Into<Prompt>,
        list: ListSelect,
    ) -> Result<Self, ResponseError> {
        Self::ask_with_select(prompt.into(), OptionSelect::ListSelect(list))
    }

    pub fn ask_with_carousel(
        prompt: impl Into<Prompt>,
        carousel: CarouselSelect,
    ) -> Result<Self, ResponseError> {
        Self::ask_with_select(prompt.into(), OptionSelect::CarouselSelect(carousel))
    }

    // The select is the reply's visual block, so the prompt may not carry one.
    fn ask_with_select(prompt: Prompt, select: OptionSelect) -> Result<Self, ResponseError> {
        if let Some(existing) = prompt.rich_response().and_then(RichResponse::visual_block) {
            return Err(ResponseError::VisualBlockTaken {
                existing: existing.kind(),
                rejected: select.kind(),
            });
        }
        Ok(Self {
            outcome: Outcome::Continue,
            prompt,
            select: Some(select),
        })
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn ends_conversation(&self) -> bool {
        self.outcome == Outcome::End
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn rich_response(&self) -> Option<&RichResponse> {
        self.prompt.rich_response()
    }

    pub fn option_select(&self) -> Option<&OptionSelect> {
        self.select.as_ref()
    }

    /// Cards, browse carousels, media responses and selects in this reply.
    pub fn visual_block_count(&self) -> usize {
        let in_rich = self
            .rich_response()
            .map_or(0, |rich| rich.items().iter().filter(|i| i.is_visual()).count());
        in_rich + usize::from(self.select.is_some())
    }

    pub fn into_webhook_response(self) -> WebhookResponse {
        let speech = self.prompt.speech().to_string();
        let display_text = self.prompt.display_text().to_string();
        let is_ssml = speech.trim_start().starts_with("<speak>");

        let rich_response = match self.prompt {
            Prompt::Text(_) => None,
            Prompt::Simple(simple) => Some(RichResponse::new().with_simple_response(simple)),
            Prompt::Rich(rich) => Some(rich),
        };

        let system_intent = self.select.map(|select| SystemIntent {
            intent: OPTION_INTENT.to_string(),
            data: OptionValueSpec {
                type_url: OPTION_VALUE_SPEC_TYPE.to_string(),
                select,
            },
        });

        WebhookResponse {
            speech,
            display_text,
            context_out: Vec::new(),
            data: PlatformPayload {
                google: GooglePayload {
                    expect_user_response: self.outcome == Outcome::Continue,
                    is_ssml,
                    no_input_prompts: Vec::new(),
                    rich_response,
                    system_intent,
                },
            },
        }
    }
}

/// Dialogflow webhook response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub speech: String,
    pub display_text: String,
    pub context_out: Vec<serde_json::Value>,
    pub data: PlatformPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformPayload {
    pub google: GooglePayload,
}

/// The Actions on Google part of the webhook response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    pub expect_user_response: bool,
    pub is_ssml: bool,
    pub no_input_prompts: Vec<SimpleResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_response: Option<RichResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemIntent {
    pub intent: String,
    pub data: OptionValueSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionValueSpec {
    #[serde(rename = "@type")]
    pub type_url: String,
    #[serde(flatten)]
    pub select: OptionSelect,
}
