//! Element construction shared by the DSL and JSON front ends.
//!
//! Both front ends collect the raw fields of a card or group and hand them
//! to an [`ElementBuilder`], which validates custom icons and fills the gaps
//! from the card catalog.

use log::trace;
use thiserror::Error;

use cloudsketch_core::{
    catalog::IconCatalog,
    color::Color,
    semantic::{Card, Element, Group},
};

use crate::{
    error::ErrorCode,
    icon_url::{IconUrlError, normalize_icon_url},
};

/// Why an element could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error(transparent)]
    IconUrl(#[from] IconUrlError),

    #[error("card id=\"{0}\" is not supported. For a custom icon, please specify \"icon_url\"")]
    UnsupportedCard(String),
}

impl ElementError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ElementError::IconUrl(IconUrlError::Invalid(_)) => ErrorCode::E301,
            ElementError::IconUrl(IconUrlError::NotDrive(_)) => ErrorCode::E302,
            ElementError::UnsupportedCard(_) => ErrorCode::E300,
        }
    }
}

/// Raw card fields as written by the user. Empty strings mean "not given".
#[derive(Debug, Clone, Default)]
pub struct CardFields {
    pub name: String,
    pub description: String,
    pub display_name: String,
    pub icon_url: String,
}

/// Builds cards and groups against a card catalog.
#[derive(Debug, Clone, Copy)]
pub struct ElementBuilder<'c> {
    catalog: &'c IconCatalog,
}

impl<'c> ElementBuilder<'c> {
    pub fn new(catalog: &'c IconCatalog) -> Self {
        Self { catalog }
    }

    /// Builds a card.
    ///
    /// A custom `icon_url` wins over the catalog icon. The catalog also
    /// supplies the display name when none was given. A card that ends up
    /// without any icon is rejected.
    pub fn card(
        &self,
        id: &str,
        card_type: &str,
        fields: CardFields,
        stacked: bool,
    ) -> Result<Card, ElementError> {
        let CardFields {
            name,
            description,
            mut display_name,
            icon_url,
        } = fields;

        let mut icon_url = if icon_url.is_empty() {
            icon_url
        } else {
            normalize_icon_url(&icon_url)?
        };

        if let Some(config) = self.catalog.lookup(card_type) {
            trace!(card_type, card_id = config.card_id(); "Resolved card type");
            if display_name.is_empty() {
                display_name = config.display_name().to_string();
            }
            if icon_url.is_empty() {
                icon_url = config.icon_url().to_string();
            }
        }

        if icon_url.is_empty() {
            return Err(ElementError::UnsupportedCard(card_type.to_string()));
        }

        Ok(Card::new(id, card_type, icon_url)
            .with_display_name(display_name)
            .with_name(name)
            .with_description(description)
            .with_stacked(stacked))
    }

    /// Builds a group. An empty `icon_url` means the group has no icon.
    pub fn group(
        &self,
        id: &str,
        name: &str,
        icon_url: &str,
        background_color: Color,
        children: Vec<Element>,
    ) -> Result<Group, ElementError> {
        let group = Group::new(id, name, background_color, children);
        if icon_url.is_empty() {
            Ok(group)
        } else {
            Ok(group.with_icon_url(normalize_icon_url(icon_url)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use cloudsketch_core::catalog::CardConfig;

    use super::*;

    fn catalog() -> IconCatalog {
        [
            CardConfig::new("compute_engine", "Compute Engine", "icons/gce.png").with_alias("gce"),
            CardConfig::new("user", "", "icons/user.png"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_card_from_catalog() {
        let catalog = catalog();
        let card = ElementBuilder::new(&catalog)
            .card("web", "gce", CardFields::default(), false)
            .unwrap();

        assert_eq!(card.id(), "web");
        assert_eq!(card.card_type(), "gce");
        assert_eq!(card.display_name(), "Compute Engine");
        assert_eq!(card.icon_url(), "icons/gce.png");
        assert!(!card.is_stacked());
    }

    #[test]
    fn test_explicit_display_name_wins() {
        let catalog = catalog();
        let fields = CardFields {
            display_name: "VM".to_string(),
            name: "web".to_string(),
            ..CardFields::default()
        };
        let card = ElementBuilder::new(&catalog)
            .card("web", "gce", fields, true)
            .unwrap();

        assert_eq!(card.display_name(), "VM");
        assert_eq!(card.name(), "web");
        assert!(card.is_stacked());
    }

    #[test]
    fn test_custom_icon_is_normalized_and_wins() {
        let catalog = catalog();
        let fields = CardFields {
            icon_url: "https://drive.google.com/file/d/abc/view".to_string(),
            ..CardFields::default()
        };
        let card = ElementBuilder::new(&catalog)
            .card("gce", "gce", fields, false)
            .unwrap();

        assert_eq!(card.icon_url(), "https://drive.google.com/a/google.com/uc?id=abc");
        assert_eq!(card.display_name(), "Compute Engine");
    }

    #[test]
    fn test_custom_icon_for_unknown_type() {
        let catalog = catalog();
        let fields = CardFields {
            icon_url: "https://drive.google.com/file/d/abc/view".to_string(),
            ..CardFields::default()
        };
        let card = ElementBuilder::new(&catalog)
            .card("thing", "thing", fields, false)
            .unwrap();

        assert_eq!(card.display_name(), "");
    }

    #[test]
    fn test_unknown_type_without_icon() {
        let catalog = catalog();
        let err = ElementBuilder::new(&catalog)
            .card("x", "no_such", CardFields::default(), false)
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::E300);
        assert_eq!(
            err.to_string(),
            "card id=\"no_such\" is not supported. For a custom icon, please specify \"icon_url\""
        );
    }

    #[test]
    fn test_bad_icon_url_errors() {
        let catalog = catalog();
        let fields = CardFields {
            icon_url: "https://example.com/x.png".to_string(),
            ..CardFields::default()
        };
        let err = ElementBuilder::new(&catalog)
            .card("gce", "gce", fields, false)
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::E302);
        assert_eq!(
            err.to_string(),
            "icon_url must be for Google Drive: https://example.com/x.png"
        );
    }

    #[test]
    fn test_group_icon() {
        let catalog = catalog();
        let builder = ElementBuilder::new(&catalog);

        let plain = builder
            .group("g", "G", "", Color::group_default(0), vec![])
            .unwrap();
        assert_eq!(plain.icon_url(), None);

        let with_icon = builder
            .group(
                "g",
                "G",
                "https://drive.google.com/file/d/abc/view",
                Color::group_default(0),
                vec![],
            )
            .unwrap();
        assert_eq!(
            with_icon.icon_url(),
            Some("https://drive.google.com/a/google.com/uc?id=abc")
        );

        let err = builder
            .group("g", "G", "https://drive.google.com/x", Color::group_default(0), vec![])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::E301);
    }
}
