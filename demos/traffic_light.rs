//! Traffic Light Statechart
//!
//! This example demonstrates timed states driven by a frame scheduler.
//!
//! Key concepts:
//! - Periodic do-activities with a fixed interval
//! - A do-activity that moves the light on by triggering a transition
//! - Deterministic time through `ManualScheduler`
//! - Reading timer counters while a state is active
//!
//! Run with: cargo run --example traffic_light

use serde_json::Value;
use statechart::builder::{initial, simple_transition, StateBuilder};
use statechart::engine::{Machine, ManualScheduler};
use std::time::Duration;

/// A timed phase that hands over to `next` after `ticks` intervals.
fn phase(name: &str, next: &'static str, interval_ms: u64, ticks: u64) -> StateBuilder {
    let counter = format!("{name}-ticks");
    StateBuilder::new(name)
        .timer(Duration::from_millis(interval_ms))
        .entry({
            let counter = counter.clone();
            move |ctx| {
                ctx.set(counter.clone(), 0);
                Ok(())
            }
        })
        .do_activity(move |ctx| {
            let seen = ctx.get(&counter).and_then(Value::as_u64).unwrap_or(0) + 1;
            ctx.set(counter.clone(), seen);
            if seen >= ticks {
                ctx.trigger_named(next, &Value::Null)?;
            }
            Ok(())
        })
}

fn main() {
    println!("=== Traffic Light Statechart ===\n");

    let scheduler = ManualScheduler::new();
    let mut machine = Machine::new("traffic-light").with_scheduler(scheduler.clone());

    let red = machine.create_state(phase("Red", "to_green", 1_000, 3).build().unwrap());
    let green = machine.create_state(phase("Green", "to_yellow", 1_000, 2).build().unwrap());
    let yellow = machine.create_state(phase("Yellow", "to_red", 500, 1).build().unwrap());
    for light in [red, green, yellow] {
        machine.add_state(light).unwrap();
    }

    for def in [
        initial("Red"),
        simple_transition("to_green", "Red", "Green"),
        simple_transition("to_yellow", "Green", "Yellow"),
        simple_transition("to_red", "Yellow", "Red"),
    ] {
        let transition = machine.create_transition(def);
        machine.add_transition(transition).unwrap();
    }

    machine.start().unwrap();
    println!("Started in: {:?}\n", machine.configuration());

    // Drive 100ms frames for eight simulated seconds.
    for frame in 0..=80u64 {
        let now = Duration::from_millis(frame * 100);
        scheduler.advance(&mut machine, now).unwrap();
        if frame % 10 == 0 {
            let light = machine.configuration().join("/");
            let active = machine.active_states();
            let current = active.last().copied().unwrap_or(machine.root());
            println!(
                "t={:>5}ms  light={:<7} frames={:?} runs={:?}",
                now.as_millis(),
                light,
                machine.activation_frame_count(current),
                machine.do_activity_invocation_count(current),
            );
        }
    }

    println!("\nVisited: {}", machine.transition_log().path().join(" -> "));

    machine.finish().unwrap();
    println!("\n=== Example Complete ===");
}
