//! Data models for the build journal.
//!
//! Field names match the published `posts.json` document so the static pages
//! can read it unchanged.

mod collection;
mod github;
mod post;
mod views;

pub use collection::*;
pub use github::*;
pub use post::*;
pub use views::*;
