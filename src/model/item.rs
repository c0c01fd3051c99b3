use super::target::TargetId;

/// A post card that the incremental filter can show or hide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterableItem {
    /// Title as displayed
    pub title: String,
    /// Link to the post, if the card carries one
    pub link: Option<String>,
    /// Lowercase title used for matching
    pub title_key: String,
    /// Lowercase body excerpt used for matching
    pub body_key: String,
    pub visible: bool,
    /// Like control rendered inside this card
    pub like: Option<TargetId>,
}

impl FilterableItem {
    pub fn new(title: impl Into<String>, body: &str) -> Self {
        let title = title.into();
        let title_key = title.to_lowercase();
        FilterableItem {
            title,
            link: None,
            title_key,
            body_key: body.to_lowercase(),
            visible: true,
            like: None,
        }
    }

    /// Build from precomputed match keys (the `data-post-*` attributes).
    pub fn from_keys(title: impl Into<String>, title_key: &str, body_key: &str) -> Self {
        FilterableItem {
            title: title.into(),
            link: None,
            title_key: title_key.to_lowercase(),
            body_key: body_key.to_lowercase(),
            visible: true,
            like: None,
        }
    }
}
