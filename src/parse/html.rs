use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::model::item::FilterableItem;
use crate::model::page::{Form, HiddenField, MetaTag, Page};
use crate::model::target::{InteractionTarget, LikeState, Resource};

static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("valid noise pattern")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9-]*)\b([^>]*)>").expect("valid tag pattern")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid attribute pattern")
});
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h[1-6]\b[^>]*>(.*?)</h[1-6]\s*>").expect("valid heading pattern")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bhref\s*=\s*["']([^"']*)["']"#).expect("valid href pattern")
});
static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid strip pattern"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("valid entity pattern")
});
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("valid count pattern"));

/// Attributes of one start tag, names lowercased and values decoded.
struct Attrs(Vec<(String, String)>);

impl Attrs {
    fn parse(raw: &str) -> Self {
        Attrs(
            ATTR_RE
                .captures_iter(raw)
                .map(|c| {
                    let value = c
                        .get(2)
                        .or_else(|| c.get(3))
                        .or_else(|| c.get(4))
                        .map_or("", |m| m.as_str());
                    (c[1].to_ascii_lowercase(), decode_entities(value).into_owned())
                })
                .collect(),
        )
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class))
    }
}

/// A post card found while scanning; its byte range bounds what belongs to it.
struct CardSpan {
    item: usize,
    start: usize,
    end: usize,
}

/// Extract the interactive surface of a rendered blog page: post cards,
/// like controls, like-count displays, meta tags and hidden form fields.
///
/// Cookies are not part of the markup; the caller fills `Page::cookie`.
pub fn parse_page(html: &str, address: Url) -> Page {
    let doc = NOISE_RE.replace_all(html, "");
    let lower = doc.to_ascii_lowercase();
    let mut page = Page::new(address);

    let mut current_form: Option<usize> = None;
    let mut cards: Vec<CardSpan> = Vec::new();
    let mut displays: Vec<(Option<Resource>, String)> = Vec::new();

    for cap in TAG_RE.captures_iter(&doc) {
        let whole = cap.get(0).map_or(0..0, |m| m.range());
        let name = cap[2].to_ascii_lowercase();
        if !cap[1].is_empty() {
            if name == "form" {
                current_form = None;
            }
            continue;
        }
        let attrs = Attrs::parse(&cap[3]);

        match name.as_str() {
            "meta" => {
                if let (Some(n), Some(c)) = (attrs.get("name"), attrs.get("content")) {
                    page.meta.push(MetaTag {
                        name: n.to_string(),
                        content: c.to_string(),
                    });
                }
            }
            "form" => {
                page.forms.push(Form::default());
                current_form = Some(page.forms.len() - 1);
            }
            "input" => {
                let hidden = attrs
                    .get("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
                if let (true, Some(form), Some(field)) = (hidden, current_form, attrs.get("name")) {
                    page.forms[form].hidden.push(HiddenField {
                        name: field.to_string(),
                        value: attrs.get("value").unwrap_or("").to_string(),
                    });
                }
            }
            _ => {}
        }

        if attrs.has_class("post-card") {
            let title_key = attrs.get("data-post-title").unwrap_or("");
            let body_key = attrs.get("data-post-content").unwrap_or("");
            let end = closing_tag(&lower, whole.end, &name).unwrap_or(doc.len());
            let segment = &doc[whole.end..end];
            let (title, link) = card_heading(segment);
            let mut item = FilterableItem::from_keys(
                title.unwrap_or_else(|| title_key.to_string()),
                title_key,
                body_key,
            );
            item.link = link;
            page.items.push(item);
            cards.push(CardSpan {
                item: page.items.len() - 1,
                start: whole.start,
                end,
            });
        }

        if name == "a" && attrs.has_class("like-button") {
            let href = attrs.get("href").or_else(|| attrs.get("data-url"));
            if let Some(href) = href.filter(|h| h.contains("/like/")) {
                let label = inner_text(&doc, &lower, whole.end, &name);
                let count = COUNT_RE
                    .captures_iter(&label)
                    .last()
                    .and_then(|c| c[1].parse().ok())
                    .unwrap_or(0);
                let state = LikeState {
                    engaged: attrs.has_class("liked"),
                    count,
                };
                let id = page.add_target(InteractionTarget::with_label(
                    Resource::new(href),
                    state,
                    label,
                ));
                if let Some(card) = cards
                    .iter()
                    .rev()
                    .find(|c| c.start <= whole.start && whole.start < c.end)
                {
                    page.items[card.item].like.get_or_insert(id);
                }
            }
        }

        if attrs.has_class("like-count") {
            let resource = attrs
                .get("data-like-url")
                .map(Resource::new)
                .or_else(|| page.targets.last().map(|t| t.resource.clone()));
            displays.push((resource, inner_text(&doc, &lower, whole.end, &name)));
        }
    }

    // Displays rendered before any like control belong to the first one.
    let fallback = page.targets.first().map(|t| t.resource.clone());
    for (resource, text) in displays {
        if let Some(resource) = resource.or_else(|| fallback.clone()) {
            page.counts.bind(resource, text);
        }
    }

    page
}

/// Offset of the `</name` that closes an element whose start tag ends at
/// `from`, skipping same-named elements nested inside it. Searched in the
/// lowercased document.
fn closing_tag(lower: &str, from: usize, name: &str) -> Option<usize> {
    let open = format!("<{}", name);
    let close = format!("</{}", name);
    let mut depth = 0usize;
    let mut pos = from;
    while let Some(i) = lower[pos..].find('<') {
        let at = pos + i;
        let rest = &lower[at..];
        if rest.starts_with(&close) && is_name_end(rest, close.len()) {
            if depth == 0 {
                return Some(at);
            }
            depth -= 1;
        } else if rest.starts_with(&open) && is_name_end(rest, open.len()) {
            depth += 1;
        }
        pos = at + 1;
    }
    None
}

fn is_name_end(s: &str, at: usize) -> bool {
    s[at..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '-')
}

/// Text content between a start tag ending at `from` and its closing tag.
fn inner_text(doc: &str, lower: &str, from: usize, name: &str) -> String {
    let end = closing_tag(lower, from, name).unwrap_or(from);
    clean_text(&doc[from..end])
}

/// Strip tags, decode entities and collapse whitespace.
fn clean_text(fragment: &str) -> String {
    let stripped = ANY_TAG_RE.replace_all(fragment, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title and link from the first heading inside a card.
fn card_heading(segment: &str) -> (Option<String>, Option<String>) {
    let Some(heading) = HEADING_RE.captures(segment) else {
        return (None, None);
    };
    let inner = &heading[1];
    let title = Some(clean_text(inner)).filter(|t| !t.is_empty());
    let link = HREF_RE
        .captures(inner)
        .map(|c| decode_entities(&c[1]).into_owned());
    (title, link)
}

/// Decode the character references templates commonly emit.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, |c: &Captures| {
        let entity = &c[1];
        let decoded = if let Some(hex) = entity
            .strip_prefix("#x")
            .or_else(|| entity.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok().and_then(char::from_u32)
        } else {
            match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => None,
            }
        };
        match decoded {
            Some(ch) => ch.to_string(),
            None => c[0].to_string(),
        }
    })
}
