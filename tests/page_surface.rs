//! End-to-end checks over saved blog pages: extraction, filtering with
//! address sync, and a full like round trip against a scripted transport.

use std::sync::Mutex;

use pretty_assertions::assert_eq;
use url::Url;

use blogdeck::model::{LikeState, NoticeLevel, Page};
use blogdeck::ops::classify::Reply;
use blogdeck::ops::filter_controller::FilterController;
use blogdeck::ops::toggle::{LikeRequest, ToggleController, ToggleError, Transport, TransportError};
use blogdeck::ops::token::{TokenOrigin, TokenResolver};
use blogdeck::parse::parse_page;

const POST_LIST: &str = include_str!("fixtures/post_list.html");
const POST_DETAIL: &str = include_str!("fixtures/post_detail.html");

fn list_page(address: &str) -> Page {
    parse_page(POST_LIST, Url::parse(address).unwrap())
}

fn detail_page() -> Page {
    parse_page(
        POST_DETAIL,
        Url::parse("https://blog.example/blog/post/rust-ownership/").unwrap(),
    )
}

/// Answers every request with the next scripted reply.
struct Scripted {
    replies: Mutex<Vec<Result<Reply, TransportError>>>,
    seen: Mutex<Vec<LikeRequest>>,
}

impl Scripted {
    fn new(mut replies: Vec<Result<Reply, TransportError>>) -> Self {
        replies.reverse();
        Scripted {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Transport for Scripted {
    fn send(
        &self,
        request: LikeRequest,
    ) -> impl std::future::Future<Output = Result<Reply, TransportError>> + Send {
        self.seen.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".into())));
        async move { reply }
    }
}

#[test]
fn post_list_surface() {
    let page = list_page("https://blog.example/blog/");
    let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Rust ownership tips", "Async Python in practice", "CSS grid layouts"]
    );
    assert_eq!(page.items[1].body_key, "asyncio event loops & tasks");
    assert_eq!(page.items[2].link.as_deref(), Some("/blog/post/css-grid/"));

    // The like button inside the script block is not a control
    assert_eq!(page.targets.len(), 3);
    assert_eq!(
        page.targets[0].state,
        LikeState {
            engaged: true,
            count: 4
        }
    );
    assert_eq!(page.items[2].like, Some(2));
    assert_eq!(page.targets[2].resource.slug(), Some("css-grid"));

    let (token, origin) = TokenResolver::default().locate(&page).unwrap();
    assert_eq!(origin, TokenOrigin::MetaTag);
    assert_eq!(token.expose(), "meta-token-123");
}

#[test]
fn detail_page_surface() {
    let page = detail_page();
    assert!(page.items.is_empty());
    assert_eq!(page.targets.len(), 1);
    let resource = &page.targets[0].resource;
    assert_eq!(page.counts.displays_for(resource).count(), 2);

    let (token, origin) = TokenResolver::default().locate(&page).unwrap();
    assert_eq!(origin, TokenOrigin::FormField);
    assert_eq!(token.expose(), "form-token-456");
}

#[test]
fn cookie_token_wins_over_markup() {
    let mut page = detail_page();
    page.cookie = "sessionid=abc; csrftoken=cookie-token-789".into();
    let (token, origin) = TokenResolver::default().locate(&page).unwrap();
    assert_eq!(origin, TokenOrigin::Cookie);
    assert_eq!(token.expose(), "cookie-token-789");
}

#[test]
fn filter_from_address_then_clear() {
    let mut page = list_page("https://blog.example/blog/?q=Grid&page=2");
    let mut filter = FilterController::new(&mut page);
    assert_eq!(filter.input().text, "Grid");
    assert_eq!(filter.match_count(), 1);
    let visible: Vec<&str> = page.visible_items().map(|(_, i)| i.title.as_str()).collect();
    assert_eq!(visible, vec!["CSS grid layouts"]);
    // Reading the initial query does not touch history
    assert_eq!(page.address.history_len(), 1);

    filter.clear(&mut page);
    assert_eq!(page.visible_items().count(), 3);
    assert_eq!(
        page.address.current().as_str(),
        "https://blog.example/blog/?page=2"
    );
    assert!(filter.input().focused);
}

#[test]
fn filter_matches_body_text_and_reports_no_results() {
    let mut page = list_page("https://blog.example/blog/");
    let mut filter = FilterController::new(&mut page);

    filter.on_input("  EVENT loops ", std::time::Instant::now());
    assert_eq!(filter.submit(&mut page), 1);
    assert_eq!(
        page.address.current().as_str(),
        "https://blog.example/blog/?q=EVENT+loops"
    );

    filter.on_input("haskell", std::time::Instant::now());
    filter.submit(&mut page);
    assert!(filter.shows_no_results());
    assert_eq!(page.visible_items().count(), 0);
}

#[tokio::test]
async fn like_round_trip_updates_every_display() {
    let mut page = detail_page();
    let controller = ToggleController::new(Scripted::new(vec![Ok(Reply::json(
        200,
        r#"{"liked": false, "like_count": 3}"#,
    ))]));

    let state = controller.activate(&mut page, 0).await.unwrap();
    assert_eq!(
        state,
        LikeState {
            engaged: false,
            count: 3
        }
    );

    let seen = controller.transport().seen.lock().unwrap();
    assert_eq!(
        seen[0].url.as_str(),
        "https://blog.example/blog/post/rust-ownership/like/?ajax=1"
    );
    assert_eq!(seen[0].token.expose(), "form-token-456");

    let texts: Vec<&str> = page.counts.displays().iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["(3)", "(3)"]);
    assert_eq!(page.targets[0].representation.label, "\u{2661} Like (3)");
    assert!(!page.targets[0].disabled);
}

#[tokio::test]
async fn login_redirect_rolls_back() {
    let mut page = detail_page();
    let before = page.targets[0].representation.clone();
    let controller = ToggleController::new(Scripted::new(vec![Ok(Reply::html(
        403,
        "<html>login</html>",
    ))]));

    let err = controller.activate(&mut page, 0).await.unwrap_err();
    assert_eq!(err, ToggleError::AuthRequired);
    assert_eq!(page.targets[0].representation, before);
    assert!(!page.targets[0].disabled);
    assert_eq!(page.counts.displays()[0].text, "(4)");

    let notice = page.latest_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Failed to update like: Please log in to like posts.");
}
