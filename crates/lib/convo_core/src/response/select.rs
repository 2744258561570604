//! List and carousel option selects.
//!
//! Both are answered by the platform through the `actions.intent.OPTION`
//! helper; the chosen item's key comes back as the `OPTION` argument.

use serde::{Deserialize, Serialize};

use super::ResponseError;
use super::rich::Image;

/// Selection key plus the synonyms the NLU layer matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInfo {
    pub key: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A selectable item in a list or carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionItem {
    pub option_info: OptionInfo,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl OptionItem {
    pub fn new<I, S>(key: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            option_info: OptionInfo {
                key: key.into(),
                synonyms: synonyms.into_iter().map(Into::into).collect(),
            },
            title: String::new(),
            description: None,
            image: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
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

    /// Appends synonyms after the ones given at construction.
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option_info
            .synonyms
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    pub fn key(&self) -> &str {
        &self.option_info.key
    }
}

fn push_unique(items: &mut Vec<OptionItem>, item: OptionItem) -> Result<(), ResponseError> {
    if items.iter().any(|existing| existing.key() == item.key()) {
        return Err(ResponseError::DuplicateOptionKey(item.option_info.key));
    }
    items.push(item);
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSelect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<OptionItem>,
}

impl ListSelect {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            items: Vec::new(),
        }
    }

    /// Appends an item; keys must be unique within the list.
    pub fn with_item(mut self, item: OptionItem) -> Result<Self, ResponseError> {
        push_unique(&mut self.items, item)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSelect {
    pub items: Vec<OptionItem>,
}

impl CarouselSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item; keys must be unique within the carousel.
    pub fn with_item(mut self, item: OptionItem) -> Result<Self, ResponseError> {
        push_unique(&mut self.items, item)?;
        Ok(self)
    }
}

/// The select shown with a reply. Serializes as `listSelect` or
/// `carouselSelect` inside the option value spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionSelect {
    ListSelect(ListSelect),
    CarouselSelect(CarouselSelect),
}

impl OptionSelect {
    pub fn items(&self) -> &[OptionItem] {
        match self {
            OptionSelect::ListSelect(list) => &list.items,
            OptionSelect::CarouselSelect(carousel) => &carousel.items,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OptionSelect::ListSelect(_) => "list",
            OptionSelect::CarouselSelect(_) => "carousel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = ListSelect::new("Things")
            .with_item(OptionItem::new("a", ["alpha"]).with_title("A"))
            .and_then(|list| {
                list.with_item(OptionItem::new("a", Vec::<String>::new()).with_title("A again"))
            })
            .expect_err("duplicate key");
        assert_eq!(err, ResponseError::DuplicateOptionKey("a".into()));
    }

    #[test]
    fn added_synonyms_follow_initial_ones() {
        let item = OptionItem::new("allo", ["first"]).with_synonyms(["Allo"]);
        assert_eq!(item.option_info.synonyms, vec!["first", "Allo"]);
        assert_eq!(item.key(), "allo");
    }

    #[test]
    fn option_select_serializes_under_select_name() {
        let select = OptionSelect::CarouselSelect(
            CarouselSelect::new()
                .with_item(
                    OptionItem::new("k", ["s"])
                        .with_title("T")
                        .with_image("https://example.com/i.png", "alt"),
                )
                .expect("item"),
        );
        let json = serde_json::to_value(&select).expect("serialize");
        let item = &json["carouselSelect"]["items"][0];
        assert_eq!(item["optionInfo"]["key"], "k");
        assert_eq!(item["optionInfo"]["synonyms"][0], "s");
        assert_eq!(item["title"], "T");
        assert!(item.get("description").is_none());
        assert_eq!(select.kind(), "carousel");
    }
}
