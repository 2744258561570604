//! Intent handlers.
//!
//! Each handler is a pure function of the conversation that returns the reply
//! for one intent. [`handler_for`] is the exhaustive intent → handler mapping
//! the dispatch table is built from.

use tracing::{debug, warn};

use crate::intent::{Intent, SelectionKey};
use crate::response::{
    BasicCard, BrowseCarousel, BrowseItem, CarouselSelect, ListSelect, MediaImageKind,
    MediaObject, MediaResponse, OptionItem, Reply, ResponseError, RichResponse, SimpleResponse,
};
use crate::webhook::{Conversation, MediaStatus};

/// Signature shared by every intent handler.
pub type Handler = fn(&Conversation<'_>) -> Result<Reply, ResponseError>;

/// Chips offered after most replies, in display order.
pub const INTENT_SUGGESTIONS: [&str; 6] = [
    "Basic Card",
    "Browse Carousel",
    "Carousel",
    "List",
    "Media",
    "Suggestions",
];

const ASSISTANT_URL: &str = "https://assistant.google.com/";
const GOOGLE_URL: &str = "https://google.com";
const AOG_DEVELOPER_URL: &str = "https://developers.google.com/actions/";

const IMG_URL_AOG: &str =
    "https://developers.google.com/actions/images/badges/XPM_BADGING_GoogleAssistant_VER.png";
const IMG_URL_GOOGLE_ALLO: &str = "https://allo.google.com/images/allo-logo.png";
const IMG_URL_GOOGLE_HOME: &str = "https://lh3.googleusercontent.com/Nu3a6F80WfixUqf_ec_vgXy_c0-0r4VLJRXjVFF_X_CIilEu8B9fT35qyTEj_PEsKw";
const IMG_URL_GOOGLE_PIXEL: &str = "https://storage.googleapis.com/madebygoog/v1/Pixel/Pixel_ColorPicker/Pixel_Device_Angled_Black-720w.png";
const IMG_URL_MEDIA: &str = "http://storage.googleapis.com/automotive-media/album_art.jpg";
const IMG_URL_AOG_BANNER: &str = "https://lh3.googleusercontent.com/Z7LtU6hhrhA-5iiO1foAfGB75OsO2O7phVesY81gH0rgQFI79sjx9aRmraUnyDUF_p5_bnBdWcXaRxVm2D1Rub92L6uxdLBl=s1376";

const MEDIA_SOURCE: &str = "http://storage.googleapis.com/automotive-media/Jazz_In_Paris.mp3";

// Two spaces before `\n` are required for the card to render a line break.
const BASIC_CARD_TEXT: &str = "This is a basic card.  Text in a basic card can include \"quotes\" \
    and most other unicode characters including emoji 📱.  Basic cards also support some markdown \
    formatting like *emphasis* or _italics_, **strong** or __bold__, and ***bold itallic*** or \
    ___strong emphasis___ as well as other things like line  \nbreaks";

const CARD_BUILDER_TEXT: &str = "Actions on Google let you build for the Google Assistant. \
    Reach users right when they need you. Users don’t need to pre-enable skills or install new \
    apps.  \n  \nThis was written in the fulfillment webhook!";

pub const NO_SELECTION_TEXT: &str = "You did not select any item from the list or carousel";
pub const UNKNOWN_SELECTION_TEXT: &str = "You selected an unknown item from the list or carousel";
pub const MEDIA_FINISHED_TEXT: &str = "Hope you enjoyed the tunes!";
pub const MEDIA_UNKNOWN_TEXT: &str = "Unknown media status received.";

/// Returns the handler registered for `intent`.
pub fn handler_for(intent: Intent) -> Handler {
    match intent {
        Intent::Welcome => welcome,
        Intent::NormalAsk => normal_ask,
        Intent::BasicCard => basic_card,
        Intent::List => list,
        Intent::ItemSelected => item_selected,
        Intent::Carousel => carousel,
        Intent::BrowseCarousel => browse_carousel,
        Intent::Suggestions => suggestions,
        Intent::ByeCard => bye_card,
        Intent::NormalBye => normal_bye,
        Intent::ByeResponse => bye_response,
        Intent::CardBuilder => card_builder,
        Intent::MediaResponse => media_response,
        Intent::MediaStatus => media_status,
    }
}

/// The four items shown by both the list and the carousel.
fn option_items(first_description: &str) -> [OptionItem; 4] {
    [
        OptionItem::new(
            SelectionKey::First.as_str(),
            ["synonym of title 1", "synonym of title 2", "synonym of title 3"],
        )
        .with_title("Title of First List Item")
        .with_description(first_description)
        .with_image(IMG_URL_AOG, "Image alternate text"),
        OptionItem::new(
            SelectionKey::GoogleHome.as_str(),
            ["Google Home Assistant", "Assistant on the Google Home"],
        )
        .with_title("Google Home")
        .with_description(
            "Google Home is a voice-activated speaker powered by the Google Assistant.",
        )
        .with_image(IMG_URL_GOOGLE_HOME, "Google Home"),
        OptionItem::new(
            SelectionKey::GooglePixel.as_str(),
            ["Google Pixel XL", "Pixel", "Pixel XL"],
        )
        .with_title("Google Pixel")
        .with_description("Pixel. Phone by Google.")
        .with_image(IMG_URL_GOOGLE_PIXEL, "Google Pixel"),
        OptionItem::new(SelectionKey::GoogleAllo.as_str(), Vec::<String>::new())
            .with_title("Google Allo")
            .with_description(
                "Introducing Google Allo, a smart messaging app that helps you say more and do more.",
            )
            .with_image(IMG_URL_GOOGLE_ALLO, "Google Allo Logo")
            .with_synonyms(["Allo"]),
    ]
}

fn welcome(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::ask(
        RichResponse::new()
            .with_simple_response(
                SimpleResponse::new("Hi there!").with_display_text("Hello there!"),
            )
            .with_simple_response(
                SimpleResponse::new(
                    "I can show you basic cards, lists and carousels as well as suggestions on your phone",
                )
                .with_display_text(
                    "I can show you basic cards, lists and carousels as well as suggestions",
                ),
            )
            .with_suggestions(INTENT_SUGGESTIONS),
    ))
}

fn normal_ask(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::ask("Ask me to show you a list, carousel, or basic card"))
}

fn suggestions(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::ask(
        RichResponse::new()
            .with_simple_response("This is a simple response for suggestions")
            .with_suggestions(["Suggestion Chips"])
            .with_suggestions(INTENT_SUGGESTIONS)
            .with_suggestion_link("Suggestion Link", ASSISTANT_URL),
    ))
}

fn basic_card(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let card = BasicCard::new(BASIC_CARD_TEXT)
        .with_subtitle("This is a subtitle")
        .with_title("Title: this is a title")
        .with_button("This is a button", ASSISTANT_URL)
        .with_image(IMG_URL_AOG, "Image alternate text");

    let rich = RichResponse::new()
        .with_simple_response("This is the first simple response for a basic card")
        .with_suggestions(INTENT_SUGGESTIONS)
        .with_basic_card(card)?
        .with_simple_response(
            SimpleResponse::new("This is the 2nd simple response ")
                .with_display_text("This is the 2nd simple response"),
        );
    Ok(Reply::ask(rich))
}

fn list(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let list = option_items("This is a description of a list item")
        .into_iter()
        .try_fold(ListSelect::new("List Title"), ListSelect::with_item)?;

    Reply::ask_with_list(
        RichResponse::new()
            .with_simple_response("This is a simple response for a list")
            .with_suggestions(INTENT_SUGGESTIONS),
        list,
    )
}

fn carousel(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let carousel = option_items("This is a description of a carousel item")
        .into_iter()
        .try_fold(CarouselSelect::new(), CarouselSelect::with_item)?;

    Reply::ask_with_carousel(
        RichResponse::new()
            .with_simple_response("This is a simple response for a carousel")
            .with_suggestions(INTENT_SUGGESTIONS),
        carousel,
    )
}

fn browse_carousel(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let a11y_text = "Google Assistant Bubbles";
    let carousel = BrowseCarousel::new().with_items([
        BrowseItem::new("Title of item 1", GOOGLE_URL)
            .with_description("Description of item 1")
            .with_image(IMG_URL_AOG, a11y_text)
            .with_footer("Item 1 footer"),
        BrowseItem::new("Title of item 2", GOOGLE_URL)
            .with_description("Description of item 2")
            .with_image(IMG_URL_AOG, a11y_text)
            .with_footer("Item 2 footer"),
    ]);

    Ok(Reply::ask(
        RichResponse::new()
            .with_simple_response("This is an example of a \"Browse Carousel\"")
            .with_browse_carousel(carousel)?,
    ))
}

fn item_selected(conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let selected = conv.selected_option();
    debug!(option = ?selected, "user selected");

    let text = match selected {
        None => NO_SELECTION_TEXT,
        Some(key) => key
            .parse::<SelectionKey>()
            .map_or(UNKNOWN_SELECTION_TEXT, SelectionKey::acknowledgment),
    };
    Ok(Reply::ask(text))
}

fn media_response(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let media = MediaResponse::new().with_media_object(
        MediaObject::new("Jazz in Paris", MEDIA_SOURCE)
            .with_description("A funky Jazz tune")
            .with_image(IMG_URL_MEDIA, MediaImageKind::Icon),
    );

    Ok(Reply::ask(
        RichResponse::new()
            .with_simple_response("This is the first simple response for a media response")
            .with_media_response(media)?
            .with_suggestions(INTENT_SUGGESTIONS),
    ))
}

fn media_status(conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let text = match conv.media_status() {
        MediaStatus::Finished => MEDIA_FINISHED_TEXT,
        MediaStatus::Unspecified => MEDIA_UNKNOWN_TEXT,
    };
    Ok(Reply::ask(
        RichResponse::new()
            .with_simple_response(text)
            .with_suggestions(INTENT_SUGGESTIONS),
    ))
}

fn card_builder(conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    let card = BasicCard::new(CARD_BUILDER_TEXT)
        .with_subtitle("Engage users through the Google Assistant")
        .with_title("Actions on Google")
        .with_button("Developer Site", AOG_DEVELOPER_URL)
        .with_image(IMG_URL_AOG_BANNER, "Actions on Google");

    let incoming = conv.incoming_rich_response()?;
    if let Some(existing) = incoming.visual_block() {
        warn!(
            existing = existing.kind(),
            "console response already holds a visual block, sending it unchanged"
        );
        return Ok(Reply::ask(incoming));
    }

    Ok(Reply::ask(incoming.with_basic_card(card)?))
}

fn bye_card(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::tell(
        RichResponse::new()
            .with_simple_response("Goodbye, World!")
            .with_basic_card(BasicCard::new("This is a goodbye card."))?,
    ))
}

fn bye_response(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::tell(
        SimpleResponse::new("Okay see you later").with_display_text("OK see you later!"),
    ))
}

fn normal_bye(_conv: &Conversation<'_>) -> Result<Reply, ResponseError> {
    Ok(Reply::tell("Okay see you later!"))
}
