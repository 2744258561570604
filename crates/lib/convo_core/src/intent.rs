//! Intent and selection-key catalogs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Name that is not part of a fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known name")]
pub struct UnknownName(pub String);

/// Every intent the webhook fulfills, keyed by its Dialogflow action name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Welcome,
    NormalAsk,
    BasicCard,
    List,
    ItemSelected,
    Carousel,
    BrowseCarousel,
    Suggestions,
    ByeCard,
    NormalBye,
    ByeResponse,
    CardBuilder,
    MediaResponse,
    MediaStatus,
}

impl Intent {
    pub const ALL: [Intent; 14] = [
        Intent::Welcome,
        Intent::NormalAsk,
        Intent::BasicCard,
        Intent::List,
        Intent::ItemSelected,
        Intent::Carousel,
        Intent::BrowseCarousel,
        Intent::Suggestions,
        Intent::ByeCard,
        Intent::NormalBye,
        Intent::ByeResponse,
        Intent::CardBuilder,
        Intent::MediaResponse,
        Intent::MediaStatus,
    ];

    /// Action name as configured in the Dialogflow agent.
    pub const fn as_str(self) -> &'static str {
        match self {
            Intent::Welcome => "input.welcome",
            Intent::NormalAsk => "normal.ask",
            Intent::BasicCard => "basic.card",
            Intent::List => "list",
            Intent::ItemSelected => "item.selected",
            Intent::Carousel => "carousel",
            Intent::BrowseCarousel => "browse.carousel",
            Intent::Suggestions => "suggestions",
            Intent::ByeCard => "bye.card",
            Intent::NormalBye => "normal.bye",
            Intent::ByeResponse => "bye.response",
            Intent::CardBuilder => "card.builder",
            Intent::MediaResponse => "media.response",
            Intent::MediaStatus => "media.status",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Keys of the items shown by the list and carousel intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    First,
    GoogleHome,
    GooglePixel,
    GoogleAllo,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 4] = [
        SelectionKey::First,
        SelectionKey::GoogleHome,
        SelectionKey::GooglePixel,
        SelectionKey::GoogleAllo,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SelectionKey::First => "title",
            SelectionKey::GoogleHome => "googleHome",
            SelectionKey::GooglePixel => "googlePixel",
            SelectionKey::GoogleAllo => "googleAllo",
        }
    }

    /// What the assistant says after the user picks this item.
    pub const fn acknowledgment(self) -> &'static str {
        match self {
            SelectionKey::First => "You selected the first item in the list or carousel",
            SelectionKey::GoogleHome => "You selected the Google Home!",
            SelectionKey::GooglePixel => "You selected the Google Pixel!",
            SelectionKey::GoogleAllo => "You selected Google Allo!",
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionKey {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}
