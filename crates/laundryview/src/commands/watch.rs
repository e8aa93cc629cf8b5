//! Watch command: keep the integration running and print sensor states
//! after every refresh until Ctrl-C.

use std::future::Future;

use laundryview_core::LaundryRoom;
use tracing::{info, warn};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{build_integration_config, status};

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (name, config) = build_integration_config(global, args.interval)?;
    let interval = config.scan_interval;

    let room = LaundryRoom::new(config)?;
    room.setup().await?;
    info!(room = %name, interval_secs = interval.as_secs(), "watching room");

    let color = output::should_color(global.color);
    let print = |room: &LaundryRoom| -> Result<(), CliError> {
        let out = status::render(&room.render_all(), global.output, color)?;
        output::print_output(&out, global.quiet);
        Ok(())
    };

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
        }
    };

    let result = run(&room, print, interrupted).await;
    room.shutdown().await;
    result
}

/// Print once, then again after every refresh or entity set change,
/// until `stop` completes.
async fn run<P, S>(room: &LaundryRoom, mut print: P, stop: S) -> Result<(), CliError>
where
    P: FnMut(&LaundryRoom) -> Result<(), CliError>,
    S: Future<Output = ()>,
{
    print(room)?;

    let mut updates = room.subscribe_state();
    let mut entities = room.subscribe_entities();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            biased;
            () = &mut stop => return Ok(()),
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = updates.borrow_and_update().clone();
                if let Some(ref error) = state.last_error {
                    warn!(error = %error, failures = state.consecutive_failures, "room unavailable");
                }
                print(room)?;
            }
            // Appliances added or removed after the state was already printed
            Some(set) = entities.changed() => {
                info!(appliances = set.len(), "appliance list changed");
                print(room)?;
            }
        }
    }
}
