//! Content models decoded from CMS documents.

pub mod author;
pub mod category;
pub mod de;
pub mod params;
pub mod recipe;

pub use author::{Author, PhilosophyItem, SocialLink};
pub use category::CategoryFacet;
pub use params::{ListingQuery, PageQuery, RevalidateQuery, SearchQuery};
pub use recipe::{
    AuthorRef, CategoryRef, Difficulty, ImageRef, Ingredient, Instruction, Recipe,
    RecipeSummary, SeoOverride, SitemapEntry, recipe_path,
};
