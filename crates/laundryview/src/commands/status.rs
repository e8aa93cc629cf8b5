//! Status command: one refresh, every sensor printed.

use tabled::Tabled;

use laundryview_core::{LaundryRoom, SensorState};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::build_integration_config;

#[derive(Tabled)]
pub struct SensorRow {
    #[tabled(rename = "Appliance")]
    pub name: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Minutes")]
    pub minutes: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

pub fn to_row(sensor: &SensorState, color: bool) -> SensorRow {
    let state = sensor.state.as_deref().unwrap_or("unavailable");
    SensorRow {
        name: sensor.name.clone().unwrap_or_else(|| sensor.unique_id.clone()),
        state: output::paint_state(state, color),
        minutes: sensor
            .attributes
            .as_ref()
            .map_or_else(|| "-".into(), |a| a.time_remaining.to_string()),
        kind: sensor
            .attributes
            .as_ref()
            .map_or_else(|| "-".into(), |a| a.kind.to_string()),
        id: sensor.unique_id.clone(),
    }
}

/// `<entity_id or key>\t<state>\t<minutes>` for scripting.
pub fn to_line(sensor: &SensorState) -> String {
    let id = sensor.entity_id.as_deref().unwrap_or(&sensor.unique_id);
    let state = sensor.state.as_deref().unwrap_or("unavailable");
    let minutes = sensor
        .attributes
        .as_ref()
        .map_or(0, |a| a.time_remaining);
    format!("{id}\t{state}\t{minutes}")
}

pub fn render(
    sensors: &[SensorState],
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    output::render_list(format, sensors, |s| to_row(s, color), to_line)
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (name, config) = build_integration_config(global, None)?;
    tracing::debug!(room = %name, "fetching room status");

    let sensors = LaundryRoom::oneshot(config, |room| async move { Ok(room.render_all()) }).await?;

    let color = output::should_color(global.color);
    let out = render(&sensors, global.output, color)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
