use url::Url;

use super::address::Address;
use super::counts::CountBoard;
use super::item::FilterableItem;
use super::notice::{Notice, NoticeLevel};
use super::target::{InteractionTarget, TargetId};

/// `<meta name=… content=…>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

/// A named `<input type="hidden">` inside a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub hidden: Vec<HiddenField>,
}

/// Everything the controllers read from or write to on one loaded page.
#[derive(Debug, Clone)]
pub struct Page {
    pub address: Address,
    /// Same-origin cookies as a `name=value; name=value` string
    pub cookie: String,
    pub meta: Vec<MetaTag>,
    pub forms: Vec<Form>,
    pub items: Vec<FilterableItem>,
    pub targets: Vec<InteractionTarget>,
    pub counts: CountBoard,
    pub notices: Vec<Notice>,
}

impl Page {
    pub fn new(address: Url) -> Self {
        Page {
            address: Address::new(address),
            cookie: String::new(),
            meta: Vec::new(),
            forms: Vec::new(),
            items: Vec::new(),
            targets: Vec::new(),
            counts: CountBoard::default(),
            notices: Vec::new(),
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice::new(level, text));
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Add a like control, seeding the count board with its rendered state.
    pub fn add_target(&mut self, target: InteractionTarget) -> TargetId {
        self.counts.seed(target.resource.clone(), target.state);
        self.targets.push(target);
        self.targets.len() - 1
    }

    /// Find a like control by index, post slug, or resource href.
    pub fn find_target(&self, selector: &str) -> Option<TargetId> {
        if let Ok(idx) = selector.parse::<usize>() {
            return (idx < self.targets.len()).then_some(idx);
        }
        self.targets
            .iter()
            .position(|t| t.resource.slug() == Some(selector))
            .or_else(|| {
                self.targets
                    .iter()
                    .position(|t| t.resource.as_str() == selector)
            })
    }

    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &FilterableItem)> {
        self.items.iter().enumerate().filter(|(_, i)| i.visible)
    }
}
