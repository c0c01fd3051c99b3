use serde::Serialize;

/// Index of an interaction target within `Page::targets`.
pub type TargetId = usize;

/// Address of a like action as rendered in the control's href,
/// e.g. `/blog/post/hello-world/like/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Resource(String);

impl Resource {
    pub fn new(href: impl Into<String>) -> Self {
        Resource(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Post slug embedded in the like URL (`/blog/post/<slug>/like/` → `<slug>`).
    pub fn slug(&self) -> Option<&str> {
        let path = self.0.split(['?', '#']).next().unwrap_or("");
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix("/like")?;
        path.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settled like state of one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub engaged: bool,
    pub count: u64,
}

/// What the control currently shows. Captured before an attempt and
/// restored verbatim on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub label: String,
    /// Drawn with the "liked" styling
    pub engaged: bool,
    pub loading: bool,
}

impl Representation {
    pub fn settled(state: LikeState) -> Self {
        let label = if state.engaged {
            format!("\u{2665} Liked ({})", state.count)
        } else {
            format!("\u{2661} Like ({})", state.count)
        };
        Representation {
            label,
            engaged: state.engaged,
            loading: false,
        }
    }

    pub fn loading(engaged: bool) -> Self {
        Representation {
            label: "\u{2026} Loading...".to_string(),
            engaged,
            loading: true,
        }
    }
}

/// A rendered like control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionTarget {
    pub resource: Resource,
    pub state: LikeState,
    pub representation: Representation,
    pub disabled: bool,
    /// Set between `begin` and `settle` of a toggle attempt
    pub in_flight: bool,
}

impl InteractionTarget {
    pub fn new(resource: Resource, state: LikeState) -> Self {
        InteractionTarget {
            resource,
            state,
            representation: Representation::settled(state),
            disabled: false,
            in_flight: false,
        }
    }

    /// A target whose label came from the server-rendered markup.
    pub fn with_label(resource: Resource, state: LikeState, label: impl Into<String>) -> Self {
        let mut target = InteractionTarget::new(resource, state);
        target.representation.label = label.into();
        target
    }

    pub fn is_actionable(&self) -> bool {
        !self.disabled && !self.in_flight
    }
}
