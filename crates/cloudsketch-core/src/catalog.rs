//! Card type catalog.
//!
//! A card in a diagram names a card type such as `compute_engine`. The
//! [`IconCatalog`] maps card types (and their aliases) to a display name and
//! an icon URL. The catalog is an ordinary value: build it once, then lend
//! it to the parsers.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_CARDS: &str = include_str!("../data/cards.json");

/// Errors produced while loading a card list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read card list: {0}")]
    Json(#[from] serde_json::Error),
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    card_id: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    icon_url: String,
}

impl CardConfig {
    pub fn new(
        card_id: impl Into<String>,
        display_name: impl Into<String>,
        icon_url: impl Into<String>,
    ) -> Self {
        Self {
            card_id: card_id.into(),
            aliases: Vec::new(),
            display_name: display_name.into(),
            icon_url: icon_url.into(),
        }
    }

    /// Adds an alternative card type name that resolves to this entry.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Human readable product name, possibly empty.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn icon_url(&self) -> &str {
        &self.icon_url
    }
}

/// Lookup table from card type (or alias) to [`CardConfig`].
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    cards: HashMap<String, CardConfig>,
}

impl IconCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The card list bundled with the crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        // The bundled list is checked by the tests below.
        if let Err(err) = catalog.extend_from_json(BUILTIN_CARDS) {
            log::error!(err:err; "Bundled card list is malformed");
        }
        catalog
    }

    /// Builds a catalog from a JSON array of card entries.
    ///
    /// ```
    /// # use cloudsketch_core::catalog::IconCatalog;
    /// let catalog = IconCatalog::from_json(
    ///     r#"[{"cardId": "db", "aliases": ["database"], "displayName": "DB", "iconUrl": "db.png"}]"#,
    /// )
    /// .unwrap();
    /// assert_eq!(catalog.lookup("database").unwrap().icon_url(), "db.png");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.extend_from_json(json)?;
        Ok(catalog)
    }

    /// Adds every entry of a JSON card list, replacing entries with the same key.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), CatalogError> {
        let cards: Vec<CardConfig> = serde_json::from_str(json)?;
        debug!(count = cards.len(); "Loaded card list");
        self.extend(cards);
        Ok(())
    }

    /// Registers a single entry under its card id and each alias.
    pub fn insert(&mut self, card: CardConfig) {
        for alias in &card.aliases {
            self.cards.insert(alias.clone(), card.clone());
        }
        self.cards.insert(card.card_id.clone(), card);
    }

    /// Finds the entry for a card type or one of its aliases.
    pub fn lookup(&self, card_type: &str) -> Option<&CardConfig> {
        self.cards.get(card_type)
    }

    /// Number of lookup keys, aliases included.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Extend<CardConfig> for IconCatalog {
    fn extend<T: IntoIterator<Item = CardConfig>>(&mut self, iter: T) {
        for card in iter {
            self.insert(card);
        }
    }
}

impl FromIterator<CardConfig> for IconCatalog {
    fn from_iter<T: IntoIterator<Item = CardConfig>>(iter: T) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}
