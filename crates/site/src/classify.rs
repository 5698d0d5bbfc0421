//! Section classifier for search results.
//!
//! Buckets a document into one of the site sections by its category titles.
//! Classification is best effort: anything unrecognized lands in the diary.

use serde::Serialize;

use crate::cms::{fold_title, titles_match};

/// Category titles that identify a recipe.
pub const RECIPE_CATEGORIES: &[&str] = &[
    "Signature Cristian",
    "Ricetta del mese",
    "Occasioni speciali",
    "Ricette veloci",
    "Ricette della tradizione",
    "Torte moderne",
    "Dolci freddi",
    "Cioccolato",
    "Lievitati dolci",
    "Pasticcini & Mignon",
    "Dolci al cucchiaio",
    "Crostate & Pie",
    "Biscotti",
    "Masse montate",
];

/// Top-level site section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Ricette,
    Tecniche,
    Diario,
}

impl Section {
    /// URL path of the section listing.
    pub fn path(self) -> &'static str {
        match self {
            Section::Ricette => "/ricette",
            Section::Tecniche => "/tecniche",
            Section::Diario => "/diario",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Section::Ricette => "Ricette",
            Section::Tecniche => "Tecniche",
            Section::Diario => "Diario",
        }
    }

    /// Category title that tags posts of this section.
    pub fn category_title(self) -> &'static str {
        self.label()
    }
}

/// Classify a document by its category titles.
pub fn classify<S: AsRef<str>>(category_titles: &[S]) -> Section {
    let is_recipe = category_titles.iter().any(|title| {
        let title = title.as_ref().trim();
        RECIPE_CATEGORIES
            .iter()
            .any(|known| titles_match(known, title))
    });
    if is_recipe {
        return Section::Ricette;
    }

    let is_technique = category_titles.iter().any(|title| {
        let title = fold_title(title.as_ref());
        title.contains("tecnica") || title.contains("tecniche")
    });
    if is_technique {
        return Section::Tecniche;
    }

    Section::Diario
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn known_recipe_category() {
        assert_eq!(classify(&["Biscotti"]), Section::Ricette);
        assert_eq!(classify(&["crostate & pie"]), Section::Ricette);
        assert_eq!(classify(&["Diario", "Cioccolato"]), Section::Ricette);
    }

    #[test]
    fn non_ascii_titles_fold_like_the_listing_filter() {
        assert_eq!(classify(&["PASTICCINI & MIGNON"]), Section::Ricette);
        assert_eq!(classify(&["TECNICHE DI BASE"]), Section::Tecniche);
        assert!(titles_match("Crème brûlée", "CRÈME BRÛLÉE"));
        assert!(!"Crème brûlée".eq_ignore_ascii_case("CRÈME BRÛLÉE"));
    }

    #[test]
    fn technique_titles() {
        assert_eq!(classify(&["Tecniche"]), Section::Tecniche);
        assert_eq!(classify(&["Tecnica di base"]), Section::Tecniche);
    }

    #[test]
    fn fallback_is_diary() {
        assert_eq!(classify::<&str>(&[]), Section::Diario);
        assert_eq!(classify(&["Viaggi"]), Section::Diario);
    }

    #[test]
    fn section_paths() {
        assert_eq!(Section::Tecniche.path(), "/tecniche");
        assert_eq!(Section::Diario.category_title(), "Diario");
    }
}
