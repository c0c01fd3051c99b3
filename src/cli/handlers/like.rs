use tokio::runtime::Runtime;

use crate::cli::commands::LikeArgs;
use crate::cli::output::*;
use crate::io::session::Session;
use crate::ops::toggle::ToggleController;

/// Toggle one like control and report the state the server settled on.
pub fn cmd_like(
    runtime: &Runtime,
    session: Session,
    args: LikeArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = runtime.block_on(session.load_page())?;
    let id = page
        .find_target(&args.post)
        .ok_or_else(|| format!("no like control matches '{}'", args.post))?;

    let controller = ToggleController::new(session.client);
    let state = runtime
        .block_on(controller.activate(&mut page, id))
        .map_err(|e| e.user_message())?;

    let target = &page.targets[id];
    if json {
        let displays = page.counts.displays_for(&target.resource).count();
        println!(
            "{}",
            serde_json::to_string_pretty(&LikeResultJson {
                like: like_to_json(&target.resource, state),
                displays,
            })?
        );
    } else {
        println!("{}", format_like_line(target));
    }
    Ok(())
}
