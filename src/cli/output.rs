use serde::Serialize;

use crate::model::item::FilterableItem;
use crate::model::page::Page;
use crate::model::target::{InteractionTarget, LikeState, Resource};
use crate::ops::token::TokenOrigin;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PostJson {
    pub index: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<LikeJson>,
}

#[derive(Serialize)]
pub struct PostsJson {
    pub address: String,
    pub query: String,
    pub matches: usize,
    pub total: usize,
    pub posts: Vec<PostJson>,
}

#[derive(Serialize)]
pub struct LikeJson {
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub liked: bool,
    pub like_count: u64,
}

#[derive(Serialize)]
pub struct LikeResultJson {
    #[serde(flatten)]
    pub like: LikeJson,
    /// Count displays on the page that now show the new count
    pub displays: usize,
}

/// Where the token came from. The value itself is never printed.
#[derive(Serialize)]
pub struct TokenJson {
    pub origin: TokenOrigin,
    pub length: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn like_to_json(resource: &Resource, state: LikeState) -> LikeJson {
    LikeJson {
        resource: resource.clone(),
        slug: resource.slug().map(str::to_owned),
        liked: state.engaged,
        like_count: state.count,
    }
}

pub fn post_to_json(page: &Page, index: usize, item: &FilterableItem) -> PostJson {
    PostJson {
        index,
        title: item.title.clone(),
        link: item.link.clone(),
        like: item
            .like
            .and_then(|id| page.targets.get(id))
            .map(|t| like_to_json(&t.resource, t.state)),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn heart(engaged: bool) -> char {
    if engaged { '♥' } else { '♡' }
}

/// `♥ 3   Title` for posts with a like control, the bare title indented otherwise.
pub fn format_post_line(page: &Page, item: &FilterableItem) -> String {
    match item.like.and_then(|id| page.targets.get(id)) {
        Some(target) => format!(
            "{} {:<3} {}",
            heart(target.state.engaged),
            target.state.count,
            item.title
        ),
        None => format!("      {}", item.title),
    }
}

pub fn format_like_line(target: &InteractionTarget) -> String {
    let name = target
        .resource
        .slug()
        .map(str::to_owned)
        .unwrap_or_else(|| target.resource.to_string());
    format!(
        "{} {}: {} ({})",
        heart(target.state.engaged),
        name,
        if target.state.engaged { "liked" } else { "not liked" },
        target.state.count
    )
}
