//! Author profile.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;
use super::recipe::ImageRef;

/// The site author.
///
/// Only the first-created author record is read; bio and story are
/// Portable Text block arrays rendered by the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub name: String,

    #[serde(default)]
    pub image: Option<ImageRef>,

    #[serde(default)]
    pub bio: Option<Value>,

    #[serde(default)]
    pub quote: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub experience: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub recipes_count: Option<u32>,

    #[serde(default, deserialize_with = "de::null_as_default")]
    pub philosophy: Vec<PhilosophyItem>,

    #[serde(default)]
    pub story: Option<Value>,

    #[serde(default, deserialize_with = "de::null_as_default")]
    pub social: Vec<SocialLink>,
}

impl Author {
    /// Display name, falling back to the site owner.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "Cristian" } else { name }
    }
}

/// One principle on the about page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhilosophyItem {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Social profile link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}
