//! Rich response blocks: simple responses, basic cards, browse carousels,
//! media responses and suggestion chips.
//!
//! Every builder method consumes the value and returns the extended one, so a
//! response handed to a handler can be extended without touching the original.

use serde::{Deserialize, Serialize};

use super::ResponseError;

/// Spoken text plus optional on-screen text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub text_to_speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl SimpleResponse {
    pub fn new(speech: impl Into<String>) -> Self {
        Self {
            text_to_speech: speech.into(),
            display_text: None,
        }
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    /// Text shown on screen: the display text, or the speech when none is set.
    pub fn shown_text(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.text_to_speech)
    }
}

impl From<&str> for SimpleResponse {
    fn from(speech: &str) -> Self {
        Self::new(speech)
    }
}

impl From<String> for SimpleResponse {
    fn from(speech: String) -> Self {
        Self::new(speech)
    }
}

/// Image reference. Media icons carry no accessibility text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub accessibility_text: String,
}

impl Image {
    pub fn new(url: impl Into<String>, accessibility_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accessibility_text: accessibility_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenUrlAction {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub title: String,
    pub open_url_action: OpenUrlAction,
}

impl Button {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open_url_action: OpenUrlAction { url: url.into() },
        }
    }
}

/// Card with markdown body text, optional title, subtitle, image and buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

impl BasicCard {
    pub fn new(body_text: impl Into<String>) -> Self {
        Self {
            formatted_text: Some(body_text.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_image(
        mut self,
        url: impl Into<String>,
        accessibility_text: impl Into<String>,
    ) -> Self {
        self.image = Some(Image::new(url, accessibility_text));
        self
    }

    pub fn with_button(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(Button::new(title, url));
        self
    }
}

/// One tile of a browse carousel; selecting it opens `open_url_action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseItem {
    pub title: String,
    pub open_url_action: OpenUrlAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl BrowseItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open_url_action: OpenUrlAction { url: url.into() },
            description: None,
            image: None,
            footer: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(
        mut self,
        url: impl Into<String>,
        accessibility_text: impl Into<String>,
    ) -> Self {
        self.image = Some(Image::new(url, accessibility_text));
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseCarousel {
    pub items: Vec<BrowseItem>,
}

impl BrowseCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = BrowseItem>) -> Self {
        self.items.extend(items);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    #[default]
    Audio,
}

/// Which image slot of a media object an image fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaImageKind {
    Icon,
    LargeImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    pub name: String,
    pub content_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<Image>,
}

impl MediaObject {
    pub fn new(name: impl Into<String>, content_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_url: content_url.into(),
            description: None,
            icon: None,
            large_image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>, kind: MediaImageKind) -> Self {
        let image = Some(Image::new(url, ""));
        match kind {
            MediaImageKind::Icon => self.icon = image,
            MediaImageKind::LargeImage => self.large_image = image,
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub media_type: MediaType,
    pub media_objects: Vec<MediaObject>,
}

impl MediaResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media_object(mut self, object: MediaObject) -> Self {
        self.media_objects.push(object);
        self
    }
}

/// A single block of a rich response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RichItem {
    SimpleResponse(SimpleResponse),
    BasicCard(BasicCard),
    CarouselBrowse(BrowseCarousel),
    MediaResponse(MediaResponse),
}

impl RichItem {
    /// Everything other than a simple response is a visual block.
    pub fn is_visual(&self) -> bool {
        !matches!(self, RichItem::SimpleResponse(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RichItem::SimpleResponse(_) => "simple response",
            RichItem::BasicCard(_) => "basic card",
            RichItem::CarouselBrowse(_) => "browse carousel",
            RichItem::MediaResponse(_) => "media response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOutSuggestion {
    pub destination_name: String,
    pub url: String,
}

/// Ordered blocks plus suggestion chips and an optional link-out chip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResponse {
    #[serde(default)]
    items: Vec<RichItem>,
    #[serde(default)]
    suggestions: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link_out_suggestion: Option<LinkOutSuggestion>,
}

impl RichResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simple_response(mut self, response: impl Into<SimpleResponse>) -> Self {
        self.items.push(RichItem::SimpleResponse(response.into()));
        self
    }

    pub fn with_basic_card(self, card: BasicCard) -> Result<Self, ResponseError> {
        self.with_visual(RichItem::BasicCard(card))
    }

    pub fn with_browse_carousel(self, carousel: BrowseCarousel) -> Result<Self, ResponseError> {
        self.with_visual(RichItem::CarouselBrowse(carousel))
    }

    pub fn with_media_response(self, media: MediaResponse) -> Result<Self, ResponseError> {
        self.with_visual(RichItem::MediaResponse(media))
    }

    /// Appends suggestion chips in iteration order.
    pub fn with_suggestions<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions
            .extend(titles.into_iter().map(|t| Suggestion { title: t.into() }));
        self
    }

    /// Sets the link-out chip, replacing any previous one.
    pub fn with_suggestion_link(
        mut self,
        destination_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        self.link_out_suggestion = Some(LinkOutSuggestion {
            destination_name: destination_name.into(),
            url: url.into(),
        });
        self
    }

    fn with_visual(mut self, item: RichItem) -> Result<Self, ResponseError> {
        if let Some(existing) = self.visual_block() {
            return Err(ResponseError::VisualBlockTaken {
                existing: existing.kind(),
                rejected: item.kind(),
            });
        }
        self.items.push(item);
        Ok(self)
    }

    pub fn items(&self) -> &[RichItem] {
        &self.items
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &str> {
        self.suggestions.iter().map(|s| s.title.as_str())
    }

    pub fn link_out_suggestion(&self) -> Option<&LinkOutSuggestion> {
        self.link_out_suggestion.as_ref()
    }

    pub fn simple_responses(&self) -> impl Iterator<Item = &SimpleResponse> {
        self.items.iter().filter_map(|item| match item {
            RichItem::SimpleResponse(simple) => Some(simple),
            _ => None,
        })
    }

    pub fn visual_block(&self) -> Option<&RichItem> {
        self.items.iter().find(|item| item.is_visual())
    }
}
