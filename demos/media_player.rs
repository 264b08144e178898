//! Media Player Statechart
//!
//! This example demonstrates composite states with orthogonal regions.
//!
//! Key concepts:
//! - Two concurrent regions inside one composite state
//! - Shallow history restoring playback after a power cycle
//! - Choice pseudostate picking a source at power-on
//! - Internal transitions that change data without leaving a state
//! - Diagnostics collected through an observer
//!
//! Run with: cargo run --example media_player

use serde_json::{json, Value};
use statechart::builder::{initial, simple_transition, state, TransitionBuilder};
use statechart::engine::{DiagnosticLog, Level, Machine};

fn main() {
    println!("=== Media Player Statechart ===\n");

    let diagnostics = DiagnosticLog::new();
    let mut machine = Machine::new("player").with_observer(diagnostics.clone());
    machine.set("volume", 5);
    machine.set("disc_inserted", false);

    let off = machine.create_state(state("Off"));
    let on = machine.create_state(state("On"));
    machine.add_state(off).unwrap();
    machine.add_state(on).unwrap();

    // Region 0: playback, remembered across power cycles.
    for name in ["Stopped", "Playing", "Paused", "Radio"] {
        let s = machine.create_state(state(name));
        machine.add_child_state(on, s).unwrap();
    }
    machine
        .add_choice_pseudostate(on, "Source", |ctx| {
            let disc = ctx.get("disc_inserted").and_then(Value::as_bool).unwrap_or(false);
            Some(if disc { "Stopped" } else { "Radio" }.to_owned())
        })
        .unwrap();
    machine.add_history_state(on, false).unwrap();
    let playback = machine.regions_of(on)[0];

    // Region 1: volume, always starts unmuted.
    let volume = machine.append_region(on).unwrap();
    for name in ["Audible", "Muted"] {
        let s = machine.create_state(state(name));
        machine.region_add_state(volume, s).unwrap();
    }

    for def in [
        initial("Source"),
        simple_transition("play", "Stopped", "Playing"),
        simple_transition("pause", "Playing", "Paused"),
        simple_transition("resume", "Paused", "Playing"),
        simple_transition("stop", "Paused", "Stopped"),
        simple_transition("eject", "Radio", "Stopped"),
    ] {
        let t = machine.create_transition(def);
        machine.region_add_transition(playback, t).unwrap();
    }

    let louder = TransitionBuilder::named("louder")
        .from("Audible")
        .internal()
        .effect(|ctx, step: &Value| {
            let level = ctx.get("volume").and_then(Value::as_i64).unwrap_or(0);
            ctx.set("volume", (level + step.as_i64().unwrap_or(1)).min(10));
            Ok(())
        })
        .build()
        .unwrap();
    for def in [
        initial("Audible"),
        simple_transition("mute", "Audible", "Muted"),
        simple_transition("unmute", "Muted", "Audible"),
        louder,
    ] {
        let t = machine.create_transition(def);
        machine.region_add_transition(volume, t).unwrap();
    }

    for def in [
        initial("Off"),
        simple_transition("power_on", "Off", "On"),
        simple_transition("power_off", "On", "Off"),
    ] {
        let t = machine.create_transition(def);
        machine.add_transition(t).unwrap();
    }

    machine.start().unwrap();
    println!("start            -> {:?}", machine.configuration());

    let script: [(&str, Value); 9] = [
        ("power_on", Value::Null),
        ("eject", Value::Null),
        ("play", Value::Null),
        ("louder", json!(3)),
        ("mute", Value::Null),
        ("pause", Value::Null),
        ("power_off", Value::Null),
        ("power_on", Value::Null),
        ("resume", Value::Null),
    ];
    for (event, memo) in script {
        let outcome = machine.trigger_named(event, &memo).unwrap();
        println!(
            "{event:<16} -> {:?} ({outcome:?})",
            machine.configuration()
        );
    }

    println!("\nvolume: {}", machine.get("volume").cloned().unwrap_or(Value::Null));
    println!(
        "diagnostics: {} info, {} warn, {} error",
        diagnostics.at(Level::Info).len(),
        diagnostics.at(Level::Warn).len(),
        diagnostics.at(Level::Error).len(),
    );

    machine.finish().unwrap();
    println!("\n=== Example Complete ===");
}
