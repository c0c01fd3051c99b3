use indexmap::IndexMap;

use super::target::{LikeState, Resource};

/// Handle to a bound count display.
pub type DisplayId = usize;

/// A secondary place on the page that shows a resource's like count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountDisplay {
    pub resource: Resource,
    pub text: String,
}

/// Single source of truth for like counts. Displays bind to a resource
/// and are rewritten whenever a new state is published for it.
#[derive(Debug, Clone, Default)]
pub struct CountBoard {
    states: IndexMap<Resource, LikeState>,
    displays: Vec<CountDisplay>,
}

/// Text of a secondary count display.
pub fn format_count(count: u64) -> String {
    format!("({})", count)
}

impl CountBoard {
    /// Register a display for `resource` with its currently rendered text.
    pub fn bind(&mut self, resource: Resource, text: impl Into<String>) -> DisplayId {
        self.displays.push(CountDisplay {
            resource,
            text: text.into(),
        });
        self.displays.len() - 1
    }

    /// Record the state rendered by the server without touching displays.
    pub fn seed(&mut self, resource: Resource, state: LikeState) {
        self.states.entry(resource).or_insert(state);
    }

    /// Store `state` as the truth for `resource` and rewrite every bound
    /// display. Returns the number of displays updated.
    pub fn publish(&mut self, resource: &Resource, state: LikeState) -> usize {
        self.states.insert(resource.clone(), state);
        let text = format_count(state.count);
        let mut updated = 0;
        for display in self.displays.iter_mut().filter(|d| &d.resource == resource) {
            display.text = text.clone();
            updated += 1;
        }
        updated
    }

    pub fn state(&self, resource: &Resource) -> Option<LikeState> {
        self.states.get(resource).copied()
    }

    pub fn display(&self, id: DisplayId) -> Option<&CountDisplay> {
        self.displays.get(id)
    }

    pub fn displays(&self) -> &[CountDisplay] {
        &self.displays
    }

    pub fn displays_for<'a>(
        &'a self,
        resource: &'a Resource,
    ) -> impl Iterator<Item = &'a CountDisplay> + 'a {
        self.displays.iter().filter(move |d| &d.resource == resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(s: &str) -> Resource {
        Resource::new(s)
    }

    #[test]
    fn publish_rewrites_only_matching_displays() {
        let mut board = CountBoard::default();
        let a = board.bind(res("/a/like/"), "(1)");
        let b = board.bind(res("/b/like/"), "(9)");
        let a2 = board.bind(res("/a/like/"), "(1)");

        let updated = board.publish(
            &res("/a/like/"),
            LikeState {
                engaged: true,
                count: 2,
            },
        );

        assert_eq!(updated, 2);
        assert_eq!(board.display(a).unwrap().text, "(2)");
        assert_eq!(board.display(a2).unwrap().text, "(2)");
        assert_eq!(board.display(b).unwrap().text, "(9)");
        assert_eq!(board.state(&res("/a/like/")).unwrap().count, 2);
    }

    #[test]
    fn seed_does_not_overwrite_published_truth() {
        let mut board = CountBoard::default();
        let state = LikeState {
            engaged: true,
            count: 4,
        };
        board.publish(&res("/a/like/"), state);
        board.seed(res("/a/like/"), LikeState::default());
        assert_eq!(board.state(&res("/a/like/")), Some(state));
    }

    #[test]
    fn publish_without_displays_still_records_state() {
        let mut board = CountBoard::default();
        let updated = board.publish(&res("/x/like/"), LikeState::default());
        assert_eq!(updated, 0);
        assert_eq!(board.state(&res("/x/like/")), Some(LikeState::default()));
        assert_eq!(board.displays_for(&res("/x/like/")).count(), 0);
    }
}
