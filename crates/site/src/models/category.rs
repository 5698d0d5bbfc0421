//! Category facets.

use serde::{Deserialize, Serialize};

use super::de;
use crate::cms::fold_title;

/// Category title with the number of listed recipes that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacet {
    #[serde(deserialize_with = "non_blank")]
    pub title: String,

    #[serde(default, deserialize_with = "de::null_as_default")]
    pub count: u64,
}

impl CategoryFacet {
    /// Facet without a known count.
    pub fn uncounted(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            count: 0,
        }
    }

    /// Value used in the `categoria` query parameter.
    pub fn param_value(&self) -> String {
        fold_title(&self.title)
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let title = String::deserialize(deserializer)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(serde::de::Error::custom("blank category title"));
    }
    Ok(title.to_string())
}
