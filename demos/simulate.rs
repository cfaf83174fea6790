use std::env;

use terncy::profile::{AC_UNIT, EXTENDED_COLOR_LIGHT, OCCUPANCY_SENSOR, SMART_DIAL};
use terncy::{ChannelTransport, DomainState, Event, HubAdapter, Intent, MessageLogMode, PressAction};

const SAMPLE_REPORT: &str = r#"{"entities": [
    {"id": "ac-1", "attributes": [
        {"attr": "tempUnit", "value": 1},
        {"attr": "acRunning", "value": 0},
        {"attr": "acMode", "value": 1},
        {"attr": "acFanSpeed", "value": 2},
        {"attr": "acCurrentTemperature", "value": 245},
        {"attr": "acTargetTemperature", "value": 230}
    ]},
    {"id": "occ-1", "attributes": [
        {"attr": "motion", "value": 1},
        {"attr": "motionR", "value": 1}
    ]},
    {"id": "light-1", "attributes": [
        {"attr": "on", "value": 1},
        {"attr": "brightness", "value": 200},
        {"attr": "colorTemperature", "value": 300}
    ]}
]}"#;

fn describe(state: &DomainState) -> String {
    match state {
        DomainState::Climate(c) => format!(
            "mode: {} | fan: {} | current: {:?} | target: {:?}",
            c.hvac_mode().map_or("unknown", |m| m.as_str()),
            c.fan_mode().map_or("unknown", |f| f.as_str()),
            c.current_temperature(),
            c.target_temperature(),
        ),
        other => format!("{other:?}"),
    }
}

#[tokio::main]
async fn main() -> terncy::Result<()> {
    tracing_subscriber::fmt::init();

    // usage: simulate [report.json] [--log <path>]
    let mut report_path = None;
    let mut log_path = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--log" => log_path = args.next(),
            _ if arg.starts_with("--") => eprintln!("Ignoring unknown flag {arg}"),
            _ => report_path = Some(arg),
        }
    }
    let report = match report_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_REPORT.to_string(),
    };

    let (transport, mut outbound) = ChannelTransport::new();
    let mut builder = HubAdapter::builder(transport)
        .climate_turn_on_off(true)
        .event_entities(true)
        .on_event(|event| match event {
            Event::StateChanged {
                device_id,
                entity_id,
                state,
            } => println!("[{device_id}/{entity_id}] {}", describe(state)),
            other => println!("{other:?}"),
        });
    if let Some(path) = log_path {
        builder = builder.message_log(MessageLogMode::Diffed, path);
    }
    let mut adapter = builder.build()?;

    adapter.register_device("ac-1", AC_UNIT, Some("TERNCY-AC"));
    adapter.register_device("occ-1", OCCUPANCY_SENSOR, None);
    adapter.register_device("light-1", EXTENDED_COLOR_LIGHT, None);
    adapter.register_device("dial-1", SMART_DIAL, None);

    let changed = adapter.on_report(&report)?;
    println!("Report applied, {changed} entities changed");

    adapter.on_key_event("dial-1", PressAction::Rotation);
    adapter.on_key_clicks("dial-1", 2);

    for (device_id, entity_id, intent) in [
        ("ac-1", "climate", Intent::SetHvacMode("heat".into())),
        ("ac-1", "climate", Intent::SetTargetTemperature(24.5)),
        ("ac-1", "climate", Intent::SetFanMode("turbo".into())),
        (
            "light-1",
            "light",
            Intent::TurnOnLight {
                brightness: Some(64),
                color_temp: None,
                hs_color: Some((120.0, 50.0)),
            },
        ),
    ] {
        if let Err(e) = adapter.command(device_id, entity_id, &intent) {
            eprintln!("Command {} for {device_id} rejected: {e}", intent.name());
        }
    }

    drop(adapter);
    while let Some(msg) = outbound.recv().await {
        println!(
            "-> {} (atomic: {}) {}",
            msg.device_id, msg.atomic, msg.payload
        );
    }
    Ok(())
}
