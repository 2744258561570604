//! Inbound Dialogflow webhook request and the per-call conversation view.
//!
//! Deserialization is lenient: unknown fields are ignored and missing or
//! `null` ones default, so any JSON object is a valid request. A missing
//! action surfaces as an empty one, which dispatch treats as an
//! unrecognized intent.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::response::{
    BasicCard, Button, Image, ResponseError, RichResponse, SimpleResponse, Suggestion,
};

/// Argument carrying the key of the list/carousel item the user picked.
pub const OPTION_ARGUMENT: &str = "OPTION";

/// Argument carrying the media playback status.
pub const MEDIA_STATUS_ARGUMENT: &str = "MEDIA_STATUS";

/// `@type` of the media status extension.
pub const MEDIA_STATUS_TYPE: &str = "type.googleapis.com/google.actions.v2.MediaStatus";

/// Dialogflow context that also carries the selected option.
const OPTION_CONTEXT: &str = "actions_intent_option";

/// Platform tag of console messages meant for the Google Assistant.
const GOOGLE_PLATFORM: &str = "google";

/// Reads `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub lang: Option<String>,
    pub session_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub result: QueryResult,
    pub original_request: Option<OriginalRequest>,
}

/// Dialogflow's view of the matched intent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResult {
    pub source: Option<String>,
    pub resolved_query: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parameters: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub contexts: Vec<AgentContext>,
    #[serde(deserialize_with = "null_as_default")]
    pub fulfillment: AgentFulfillment,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentContext {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parameters: Map<String, Value>,
    pub lifespan: Option<i64>,
}

/// Response authored in the Dialogflow console for the matched intent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentFulfillment {
    pub speech: Option<String>,
    /// Kept as raw JSON: the `type` field is a number for plain text
    /// messages and a string for platform-specific ones.
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<Value>,
}

/// The Actions on Google request Dialogflow forwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OriginalRequest {
    pub source: Option<String>,
    pub version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data: AssistantRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssistantRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub inputs: Vec<AssistantInput>,
    pub user: Option<Value>,
    pub conversation: Option<Value>,
    pub surface: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssistantInput {
    pub intent: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Argument {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub text_value: Option<String>,
    pub extension: Option<Value>,
}

impl WebhookRequest {
    /// Request whose matched action is `action`, with nothing else set.
    pub fn for_action(action: impl Into<String>) -> Self {
        Self {
            result: QueryResult {
                action: action.into(),
                ..QueryResult::default()
            },
            ..Self::default()
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        let data = &mut self
            .original_request
            .get_or_insert_with(|| OriginalRequest {
                source: Some(GOOGLE_PLATFORM.to_string()),
                ..OriginalRequest::default()
            })
            .data;
        if data.inputs.is_empty() {
            data.inputs.push(AssistantInput::default());
        }
        data.inputs[0].arguments.push(argument);
        self
    }

    pub fn with_selected_option(self, key: impl Into<String>) -> Self {
        self.with_argument(Argument {
            name: OPTION_ARGUMENT.to_string(),
            text_value: Some(key.into()),
            extension: None,
        })
    }

    /// Attaches a media status argument with the wire status, e.g. `FINISHED`.
    pub fn with_media_status(self, status: impl Into<String>) -> Self {
        self.with_argument(Argument {
            name: MEDIA_STATUS_ARGUMENT.to_string(),
            text_value: None,
            extension: Some(serde_json::json!({
                "@type": MEDIA_STATUS_TYPE,
                "status": status.into(),
            })),
        })
    }

    pub fn with_console_message(mut self, message: Value) -> Self {
        self.result.fulfillment.messages.push(message);
        self
    }

    pub fn action(&self) -> &str {
        &self.result.action
    }

    fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.original_request
            .iter()
            .flat_map(|original| original.data.inputs.iter())
            .flat_map(|input| input.arguments.iter())
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments().find(|argument| argument.name == name)
    }
}

/// Playback state reported after a media response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatus {
    Finished,
    Unspecified,
}

impl MediaStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "FINISHED" => MediaStatus::Finished,
            _ => MediaStatus::Unspecified,
        }
    }
}

/// Console messages the incoming rich response is rebuilt from.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
enum ConsoleMessage {
    SimpleResponse {
        #[serde(default)]
        text_to_speech: String,
        #[serde(default)]
        display_text: Option<String>,
    },
    BasicCard {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        subtitle: Option<String>,
        #[serde(default)]
        formatted_text: Option<String>,
        #[serde(default)]
        image: Option<Image>,
        #[serde(default)]
        buttons: Vec<Button>,
    },
    SuggestionChips {
        #[serde(default)]
        suggestions: Vec<Suggestion>,
    },
    LinkOutChip {
        destination_name: String,
        url: String,
    },
}

/// Read-only view over one webhook call, handed to every intent handler.
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a> {
    request: &'a WebhookRequest,
}

impl<'a> Conversation<'a> {
    pub fn new(request: &'a WebhookRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &'a WebhookRequest {
        self.request
    }

    pub fn intent_name(&self) -> &'a str {
        self.request.action()
    }

    /// Key of the picked list/carousel item. Empty values count as absent.
    pub fn selected_option(&self) -> Option<&'a str> {
        let from_argument = self
            .request
            .argument(OPTION_ARGUMENT)
            .and_then(|argument| argument.text_value.as_deref());

        let from_context = || {
            self.request
                .result
                .contexts
                .iter()
                .find(|context| context.name == OPTION_CONTEXT)
                .and_then(|context| context.parameters.get(OPTION_ARGUMENT))
                .and_then(Value::as_str)
        };

        from_argument
            .filter(|key| !key.is_empty())
            .or_else(|| from_context().filter(|key| !key.is_empty()))
    }

    pub fn media_status(&self) -> MediaStatus {
        self.request
            .argument(MEDIA_STATUS_ARGUMENT)
            .and_then(|argument| argument.extension.as_ref())
            .and_then(|extension| extension.get("status"))
            .and_then(Value::as_str)
            .map_or(MediaStatus::Unspecified, MediaStatus::from_wire)
    }

    /// Rebuilds the Google rich response authored in the Dialogflow console.
    ///
    /// Messages for other platforms and unsupported message types are skipped.
    pub fn incoming_rich_response(&self) -> Result<RichResponse, ResponseError> {
        let mut rich = RichResponse::new();

        for raw in &self.request.result.fulfillment.messages {
            if raw.get("platform").and_then(Value::as_str) != Some(GOOGLE_PLATFORM) {
                continue;
            }
            let message = match serde_json::from_value::<ConsoleMessage>(raw.clone()) {
                Ok(message) => message,
                Err(e) => {
                    debug!(error = %e, "skipping unsupported console message");
                    continue;
                }
            };

            rich = match message {
                ConsoleMessage::SimpleResponse {
                    text_to_speech,
                    display_text,
                } => rich.with_simple_response(SimpleResponse {
                    text_to_speech,
                    display_text,
                }),
                ConsoleMessage::BasicCard {
                    title,
                    subtitle,
                    formatted_text,
                    image,
                    buttons,
                } => rich.with_basic_card(BasicCard {
                    title,
                    subtitle,
                    formatted_text,
                    image,
                    buttons,
                })?,
                ConsoleMessage::SuggestionChips { suggestions } => {
                    rich.with_suggestions(suggestions.into_iter().map(|s| s.title))
                }
                ConsoleMessage::LinkOutChip {
                    destination_name,
                    url,
                } => rich.with_suggestion_link(destination_name, url),
            };
        }

        Ok(rich)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::response::RichItem;

    #[test]
    fn parses_recorded_option_request() {
        let body = json!({
            "id": "5d1c2f40",
            "lang": "en",
            "sessionId": "1514906380",
            "result": {
                "source": "agent",
                "resolvedQuery": "actions_intent_OPTION",
                "action": "item.selected",
                "parameters": {},
                "contexts": [],
                "fulfillment": { "speech": "", "messages": [{ "type": 0, "speech": "" }] },
                "metadata": { "intentName": "item.selected" }
            },
            "originalRequest": {
                "source": "google",
                "version": "2",
                "data": {
                    "inputs": [{
                        "intent": "actions.intent.OPTION",
                        "rawInputs": [{ "inputType": "TOUCH", "query": "Google Home" }],
                        "arguments": [{ "name": "OPTION", "textValue": "googleHome" }]
                    }],
                    "user": { "locale": "en-US" }
                }
            }
        });

        let request: WebhookRequest = serde_json::from_value(body).expect("parse");
        let conv = Conversation::new(&request);
        assert_eq!(conv.intent_name(), "item.selected");
        assert_eq!(conv.selected_option(), Some("googleHome"));
        assert_eq!(request.session_id.as_deref(), Some("1514906380"));
    }

    #[test]
    fn empty_object_is_a_request_without_action() {
        let request: WebhookRequest = serde_json::from_str("{}").expect("parse");
        assert_eq!(request.action(), "");
        assert_eq!(Conversation::new(&request).selected_option(), None);
    }

    #[test]
    fn null_fields_read_as_missing() {
        let null_result: WebhookRequest =
            serde_json::from_value(json!({ "result": null })).expect("null result");
        assert_eq!(null_result.action(), "");

        let null_action: WebhookRequest =
            serde_json::from_value(json!({ "result": { "action": null } })).expect("null action");
        assert_eq!(null_action.action(), "");

        let request: WebhookRequest = serde_json::from_value(json!({
            "result": {
                "action": "list",
                "parameters": null,
                "contexts": [{ "name": null, "parameters": null, "lifespan": -1 }],
                "fulfillment": { "speech": null, "messages": null }
            },
            "originalRequest": { "data": { "inputs": [{ "arguments": null }] } }
        }))
        .expect("nulls and negative lifespan");
        assert_eq!(request.action(), "list");
        assert!(request.result.parameters.is_empty());
        assert_eq!(request.result.contexts[0].lifespan, Some(-1));
        assert_eq!(Conversation::new(&request).selected_option(), None);
    }

    #[test]
    fn empty_option_counts_as_absent() {
        let request = WebhookRequest::for_action("item.selected").with_selected_option("");
        assert_eq!(Conversation::new(&request).selected_option(), None);
    }

    #[test]
    fn option_falls_back_to_context_parameter() {
        let request: WebhookRequest = serde_json::from_value(json!({
            "result": {
                "action": "item.selected",
                "contexts": [
                    { "name": "actions_capability_screen_output", "parameters": {} },
                    {
                        "name": "actions_intent_option",
                        "parameters": { "OPTION": "googlePixel" },
                        "lifespan": 0
                    }
                ]
            }
        }))
        .expect("parse");
        assert_eq!(Conversation::new(&request).selected_option(), Some("googlePixel"));
    }

    #[test]
    fn media_status_reads_extension() {
        let finished = WebhookRequest::for_action("media.status").with_media_status("FINISHED");
        assert_eq!(Conversation::new(&finished).media_status(), MediaStatus::Finished);

        let other =
            WebhookRequest::for_action("media.status").with_media_status("STATUS_UNSPECIFIED");
        assert_eq!(Conversation::new(&other).media_status(), MediaStatus::Unspecified);

        let missing = WebhookRequest::for_action("media.status");
        assert_eq!(Conversation::new(&missing).media_status(), MediaStatus::Unspecified);
    }

    #[test]
    fn incoming_rich_response_keeps_google_messages_in_order() {
        let request = WebhookRequest::for_action("card.builder")
            .with_console_message(json!({ "type": 0, "speech": "plain text" }))
            .with_console_message(json!({
                "type": "simple_response",
                "platform": "google",
                "textToSpeech": "Here is a card",
                "displayText": "Here's a card"
            }))
            .with_console_message(json!({
                "type": "simple_response",
                "platform": "facebook",
                "textToSpeech": "ignored"
            }))
            .with_console_message(json!({
                "type": "suggestion_chips",
                "platform": "google",
                "suggestions": [{ "title": "More" }, { "title": "Done" }]
            }))
            .with_console_message(json!({
                "type": "link_out_chip",
                "platform": "google",
                "destinationName": "Docs",
                "url": "https://developers.google.com/actions/"
            }))
            .with_console_message(json!({
                "type": "carousel_card",
                "platform": "google",
                "items": []
            }));

        let rich = Conversation::new(&request)
            .incoming_rich_response()
            .expect("rich response");

        assert_eq!(rich.items().len(), 1);
        let simple = rich.simple_responses().next().expect("simple response");
        assert_eq!(simple.text_to_speech, "Here is a card");
        assert_eq!(simple.shown_text(), "Here's a card");
        assert_eq!(rich.suggestions().collect::<Vec<_>>(), vec!["More", "Done"]);
        assert_eq!(
            rich.link_out_suggestion().map(|l| l.url.as_str()),
            Some("https://developers.google.com/actions/")
        );
    }

    #[test]
    fn incoming_basic_card_is_rebuilt() {
        let request = WebhookRequest::for_action("card.builder").with_console_message(json!({
            "type": "basic_card",
            "platform": "google",
            "title": "Console card",
            "formattedText": "Authored in the console",
            "image": { "url": "https://example.com/c.png", "accessibilityText": "card" },
            "buttons": [{ "title": "Open", "openUrlAction": { "url": "https://example.com/" } }]
        }));

        let rich = Conversation::new(&request)
            .incoming_rich_response()
            .expect("rich response");
        match rich.visual_block() {
            Some(RichItem::BasicCard(card)) => {
                assert_eq!(card.title.as_deref(), Some("Console card"));
                assert_eq!(card.buttons[0].open_url_action.url, "https://example.com/");
            }
            other => panic!("expected basic card, got {other:?}"),
        }
    }

    #[test]
    fn two_console_cards_are_rejected() {
        let card = json!({ "type": "basic_card", "platform": "google", "formattedText": "card" });
        let request = WebhookRequest::for_action("card.builder")
            .with_console_message(card.clone())
            .with_console_message(card);
        assert!(Conversation::new(&request).incoming_rich_response().is_err());
    }
}
