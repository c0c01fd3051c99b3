mod like;
pub use like::cmd_like;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::logging::{self, LogSink, Verbosity};
use crate::io::session::{Session, SessionOptions};
use crate::model::page::Page;
use crate::ops::filter_controller::FilterController;
use crate::ops::toggle::ToggleError;
use crate::ops::token::TokenResolver;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let session = Session::open(SessionOptions {
        config: cli.config.clone(),
        url: cli.url.clone(),
        page_file: cli.page_file.clone(),
        cookie: cli.cookie.clone(),
    })?;

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let sink = match (&cli.command, &session.config.log.file) {
        (_, Some(path)) => LogSink::File(path.clone()),
        // The TUI owns the terminal
        (None, None) => LogSink::File(logging::default_log_file()),
        (Some(_), None) => LogSink::Stderr,
    };
    logging::init(verbosity, session.config.log.level.as_deref(), &sink)?;
    debug!(address = %session.address, offline = session.is_offline(), "session opened");

    let runtime = build_runtime()?;

    match cli.command {
        None => crate::tui::run(session, runtime),
        Some(cmd) => match cmd {
            Commands::Posts(args) => cmd_posts(&runtime, &session, args, json),
            Commands::Like(args) => cmd_like(&runtime, session, args, json),
            Commands::Token => cmd_token(&runtime, &session, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("deck-net")
        .enable_all()
        .build()
}

fn load_page(runtime: &Runtime, session: &Session) -> Result<Page, Box<dyn std::error::Error>> {
    Ok(runtime.block_on(session.load_page())?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_posts(
    runtime: &Runtime,
    session: &Session,
    args: PostsArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_page(runtime, session)?;
    let mut filter = FilterController::new(&mut page);
    if let Some(query) = args.query {
        filter.on_input(query, std::time::Instant::now());
        filter.submit(&mut page);
    }

    if json {
        let posts = page
            .visible_items()
            .map(|(i, item)| post_to_json(&page, i, item))
            .collect();
        return print_json(&PostsJson {
            address: page.address.current().to_string(),
            query: filter.query().as_str().to_string(),
            matches: filter.match_count(),
            total: page.items.len(),
            posts,
        });
    }

    if filter.shows_no_results() {
        println!("No posts match '{}'.", filter.input().text.trim());
    }
    for (_, item) in page.visible_items() {
        println!("{}", format_post_line(&page, item));
    }
    println!("address: {}", page.address.current());
    Ok(())
}

fn cmd_token(runtime: &Runtime, session: &Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(runtime, session)?;
    let Some((token, origin)) = TokenResolver::default().locate(&page) else {
        return Err(ToggleError::TokenNotFound.to_string().into());
    };

    if json {
        return print_json(&TokenJson {
            origin,
            length: token.expose().len(),
        });
    }
    println!("{} ({} chars)", origin.as_str(), token.expose().len());
    Ok(())
}
