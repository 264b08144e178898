//! End-to-end behavior of composite, orthogonal, history and choice charts.

use serde_json::{json, Value};
use statechart::builder::{initial, simple_transition, state, StateBuilder, TransitionBuilder};
use statechart::core::{RegionId, StateId, TransitionId};
use statechart::engine::{
    ConfigurationError, DiagnosticLog, Level, Machine, MachineError, TransitionDef, TriggerOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Trace = Arc<Mutex<Vec<String>>>;

fn traced(machine: &mut Machine, trace: &Trace, name: &str) -> StateId {
    let on_entry = trace.clone();
    let on_exit = trace.clone();
    let entry_name = name.to_owned();
    let exit_name = name.to_owned();
    machine.create_state(
        StateBuilder::new(name)
            .entry(move |_| {
                on_entry.lock().unwrap().push(format!("enter {entry_name}"));
                Ok(())
            })
            .exit(move |_| {
                on_exit.lock().unwrap().push(format!("exit {exit_name}"));
                Ok(())
            })
            .build()
            .unwrap(),
    )
}

fn connect(machine: &mut Machine, region: RegionId, def: TransitionDef) -> TransitionId {
    let transition = machine.create_transition(def);
    machine.region_add_transition(region, transition).unwrap();
    transition
}

fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

#[test]
fn guarded_transition_between_two_states() {
    let mut machine = Machine::new("scenario-1");
    let a = machine.create_state(state("A"));
    let b = machine.create_state(state("B"));
    machine.add_state(a).unwrap();
    machine.add_state(b).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("A"));
    let t2 = connect(
        &mut machine,
        root,
        TransitionBuilder::named("T2")
            .from("A")
            .to("B")
            .when(|ctx, _| ctx.get("g").and_then(Value::as_bool).unwrap_or(false))
            .build()
            .unwrap(),
    );

    machine.start().unwrap();
    assert!(machine.is_state_active(a));
    assert!(!machine.is_state_active(b));

    machine.set("g", true);
    assert_eq!(machine.trigger(t2, &Value::Null).unwrap(), TriggerOutcome::Fired);
    assert!(!machine.is_state_active(a));
    assert!(machine.is_state_active(b));
}

struct HistoryChart {
    machine: Machine,
    c: StateId,
    x: StateId,
    y: StateId,
    out: StateId,
}

fn history_chart() -> HistoryChart {
    let mut machine = Machine::new("scenario-2");
    let c = machine.create_state(state("C"));
    let x = machine.create_state(state("X"));
    let y = machine.create_state(state("Y"));
    let out = machine.create_state(state("Out"));
    machine.add_state(c).unwrap();
    machine.add_state(out).unwrap();
    machine.add_child_state(c, x).unwrap();
    machine.add_child_state(c, y).unwrap();
    machine.add_history_state(c, false).unwrap();

    let r = machine.regions_of(c)[0];
    connect(&mut machine, r, initial("X"));
    connect(&mut machine, r, simple_transition("next", "X", "Y"));

    let root = machine.default_region();
    connect(&mut machine, root, initial("C"));
    connect(&mut machine, root, simple_transition("leave", "C", "Out"));
    connect(
        &mut machine,
        root,
        simple_transition("back", "Out", "C-region-0-history-pseudo"),
    );
    connect(&mut machine, root, simple_transition("reenter", "Out", "C"));

    HistoryChart { machine, c, x, y, out }
}

#[test]
fn history_resumes_last_active_child_through_explicit_edge() {
    let HistoryChart { mut machine, c, x, y, out } = history_chart();

    machine.start().unwrap();
    assert!(machine.is_state_active(x));

    machine.trigger_named("next", &Value::Null).unwrap();
    machine.trigger_named("leave", &Value::Null).unwrap();
    assert!(machine.is_state_active(out));
    assert!(!machine.is_state_active(c));
    assert!(!machine.is_state_active(y));

    machine.trigger_named("back", &Value::Null).unwrap();
    assert!(machine.is_state_active(c));
    assert!(machine.is_state_active(y));
    assert!(!machine.is_state_active(x));
    assert!(!machine.is_state_active(out));
}

#[test]
fn history_also_drives_default_reentry() {
    let HistoryChart { mut machine, y, .. } = history_chart();

    machine.start().unwrap();
    machine.trigger_named("next", &Value::Null).unwrap();
    machine.trigger_named("leave", &Value::Null).unwrap();
    machine.trigger_named("reenter", &Value::Null).unwrap();

    assert!(machine.is_state_active(y));
    assert_eq!(machine.configuration(), vec!["C", "Y"]);
}

#[test]
fn history_pseudostate_never_stays_active() {
    let HistoryChart { mut machine, c, .. } = history_chart();
    let region = machine.regions_of(c)[0];
    let history = machine.history_of(region).unwrap();

    machine.start().unwrap();
    assert!(!machine.is_state_active(history));

    machine.trigger_named("leave", &Value::Null).unwrap();
    machine.trigger_named("back", &Value::Null).unwrap();
    assert!(!machine.is_state_active(history));
}

struct OrthogonalChart {
    machine: Machine,
    d: StateId,
    p: StateId,
    q: StateId,
    s: StateId,
    t: StateId,
    done: StateId,
}

fn orthogonal_chart(trace: &Trace) -> OrthogonalChart {
    let mut machine = Machine::new("scenario-3");
    let d = traced(&mut machine, trace, "D");
    let p = traced(&mut machine, trace, "P");
    let q = traced(&mut machine, trace, "Q");
    let s = traced(&mut machine, trace, "S");
    let t = traced(&mut machine, trace, "T");
    let done = traced(&mut machine, trace, "Done");
    let out = machine.create_state(state("Out"));

    machine.add_state(d).unwrap();
    machine.add_state(done).unwrap();
    machine.add_state(out).unwrap();
    machine.add_child_state(d, p).unwrap();
    machine.add_child_state(d, q).unwrap();
    let r2 = machine.append_region(d).unwrap();
    machine.region_add_state(r2, s).unwrap();
    machine.region_add_state(r2, t).unwrap();

    let r1 = machine.regions_of(d)[0];
    connect(&mut machine, r1, initial("P"));
    connect(&mut machine, r1, simple_transition("p2q", "P", "Q"));
    connect(&mut machine, r1, TransitionBuilder::named("q_done").from("Q").build().unwrap());
    connect(&mut machine, r2, initial("S"));
    connect(&mut machine, r2, simple_transition("s2t", "S", "T"));
    connect(&mut machine, r2, TransitionBuilder::named("t_done").from("T").build().unwrap());

    let root = machine.default_region();
    connect(&mut machine, root, initial("D"));
    connect(&mut machine, root, simple_transition("d_done", "D", "Done"));
    connect(&mut machine, root, simple_transition("leave", "D", "Out"));
    connect(&mut machine, root, simple_transition("into_q", "Out", "Q"));

    OrthogonalChart { machine, d, p, q, s, t, done }
}

#[test]
fn entering_orthogonal_state_activates_every_region() {
    let trace = Trace::default();
    let OrthogonalChart { mut machine, d, p, s, .. } = orthogonal_chart(&trace);

    machine.start().unwrap();

    assert!(machine.is_state_active(d));
    assert!(machine.is_state_active(p));
    assert!(machine.is_state_active(s));
    for region in machine.regions_of(d).to_vec() {
        assert!(machine.is_region_active(region));
    }
    assert_eq!(entries(&trace), vec!["enter D", "enter P", "enter S"]);
}

#[test]
fn orthogonal_completion_waits_for_every_region() {
    let trace = Trace::default();
    let OrthogonalChart { mut machine, d, q, t, done, .. } = orthogonal_chart(&trace);
    machine.start().unwrap();

    machine.trigger_named("p2q", &Value::Null).unwrap();
    machine.trigger_named("q_done", &Value::Null).unwrap();
    assert!(!machine.is_state_active(q));
    assert!(machine.is_state_active(d));
    assert!(!machine.is_state_active(done));

    machine.trigger_named("s2t", &Value::Null).unwrap();
    assert!(machine.is_state_active(t));
    machine.trigger_named("t_done", &Value::Null).unwrap();

    assert!(!machine.is_state_active(d));
    assert!(machine.is_state_active(done));
    assert_eq!(
        entries(&trace).iter().filter(|e| *e == "enter Done").count(),
        1
    );
}

#[test]
fn exit_runs_innermost_first_across_regions() {
    let trace = Trace::default();
    let OrthogonalChart { mut machine, .. } = orthogonal_chart(&trace);
    machine.start().unwrap();
    trace.lock().unwrap().clear();

    machine.trigger_named("leave", &Value::Null).unwrap();

    assert_eq!(entries(&trace), vec!["exit S", "exit P", "exit D"]);
}

#[test]
fn explicit_entry_into_one_region_starts_its_siblings() {
    let trace = Trace::default();
    let OrthogonalChart { mut machine, d, p, q, s, .. } = orthogonal_chart(&trace);
    machine.start().unwrap();
    machine.trigger_named("leave", &Value::Null).unwrap();
    trace.lock().unwrap().clear();

    machine.trigger_named("into_q", &Value::Null).unwrap();

    assert!(machine.is_state_active(d));
    assert!(machine.is_state_active(q));
    assert!(!machine.is_state_active(p));
    assert!(machine.is_state_active(s));
    assert_eq!(entries(&trace), vec!["enter D", "enter Q", "enter S"]);
}

#[test]
fn region_completing_on_entry_does_not_join_early() {
    let mut machine = Machine::new("join");
    let d = machine.create_state(state("D"));
    let busy = machine.create_state(state("Busy"));
    let after = machine.create_state(state("After"));
    machine.add_state(d).unwrap();
    machine.add_state(after).unwrap();
    let r1 = machine.append_region(d).unwrap();
    let r2 = machine.append_region(d).unwrap();
    machine.region_add_state(r2, busy).unwrap();

    connect(&mut machine, r1, TransitionBuilder::initial().build().unwrap());
    connect(&mut machine, r2, initial("Busy"));
    connect(&mut machine, r2, TransitionBuilder::named("finish").from("Busy").build().unwrap());
    let root = machine.default_region();
    connect(&mut machine, root, initial("D"));
    connect(&mut machine, root, simple_transition("joined", "D", "After"));

    machine.start().unwrap();
    assert!(!machine.is_region_active(r1));
    assert!(machine.is_state_active(d));
    assert!(machine.is_state_active(busy));

    machine.trigger_named("finish", &Value::Null).unwrap();
    assert!(machine.is_state_active(after));
}

struct ChoiceChart {
    machine: Machine,
    choice: StateId,
    y: StateId,
    z: StateId,
    calls: Arc<AtomicUsize>,
}

fn choice_chart() -> ChoiceChart {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut machine = Machine::new("scenario-4");
    let counter = calls.clone();
    let root_state = machine.root();
    let choice = machine
        .add_choice_pseudostate(root_state, "CH", move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            let flag = ctx.get("flag").and_then(Value::as_bool).unwrap_or(false);
            Some(if flag { "Y" } else { "Z" }.to_owned())
        })
        .unwrap();
    let y = machine.create_state(state("Y"));
    let z = machine.create_state(state("Z"));
    machine.add_state(y).unwrap();
    machine.add_state(z).unwrap();

    let root = machine.default_region();
    connect(&mut machine, root, initial("CH"));
    connect(&mut machine, root, simple_transition("from_y", "Y", "CH"));
    connect(&mut machine, root, simple_transition("from_z", "Z", "CH"));

    ChoiceChart { machine, choice, y, z, calls }
}

#[test]
fn choice_follows_decision() {
    let ChoiceChart { mut machine, choice, y, z, calls } = choice_chart();
    machine.set("flag", true);

    machine.start().unwrap();
    assert!(machine.is_state_active(y));
    assert!(!machine.is_state_active(choice));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    machine.set("flag", false);
    machine.trigger_named("from_y", &Value::Null).unwrap();
    assert!(machine.is_state_active(z));
    assert!(!machine.is_state_active(y));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn choice_reuses_cached_transition_per_target() {
    let ChoiceChart { mut machine, choice, y, calls, .. } = choice_chart();
    machine.set("flag", true);
    machine.start().unwrap();
    let first = machine.cached_choice_transition(choice, "Y").unwrap();

    machine.trigger_named("from_y", &Value::Null).unwrap();
    machine.trigger_named("from_y", &Value::Null).unwrap();

    assert!(machine.is_state_active(y));
    assert_eq!(machine.cached_choice_transition(choice, "Y"), Some(first));
    assert_eq!(machine.cached_choice_transition(choice, "Z"), None);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn choice_to_unknown_target_is_fatal() {
    let mut machine = Machine::new("bad-choice");
    let root_state = machine.root();
    machine
        .add_choice_pseudostate(root_state, "CH", |_| Some("Nowhere".to_owned()))
        .unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("CH"));

    assert!(matches!(
        machine.start(),
        Err(MachineError::Configuration(
            ConfigurationError::ChoiceTargetUnreachable { .. }
        ))
    ));
}

#[test]
fn choice_without_answer_is_fatal() {
    let mut machine = Machine::new("silent-choice");
    let root_state = machine.root();
    machine
        .add_choice_pseudostate(root_state, "CH", |_| None)
        .unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("CH"));

    assert!(matches!(
        machine.start(),
        Err(MachineError::Configuration(
            ConfigurationError::ChoiceUndecided { .. }
        ))
    ));
}

#[test]
fn unregistered_transition_fails_before_any_mutation() {
    let log = DiagnosticLog::new();
    let mut machine = Machine::new("scenario-5").with_observer(log.clone());
    let a = machine.create_state(state("A"));
    let b = machine.create_state(state("B"));
    machine.add_state(a).unwrap();
    machine.add_state(b).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("A"));
    let loose = machine.create_transition(simple_transition("loose", "A", "B"));

    machine.start().unwrap();
    let before = machine.active_states();
    let logged = machine.transition_log().len();

    let err = machine.trigger(loose, &Value::Null).unwrap_err();

    assert!(matches!(
        err,
        MachineError::Configuration(ConfigurationError::UnregisteredTransition { .. })
    ));
    assert_eq!(machine.active_states(), before);
    assert_eq!(machine.transition_log().len(), logged);
    assert!(log.contains(Level::Error, "loose"));
}

fn nested_history_chart(deep: bool) -> (Machine, StateId, StateId) {
    let mut machine = Machine::new("nested-history");
    let c = machine.create_state(state("C"));
    let inner = machine.create_state(state("Inner"));
    let other = machine.create_state(state("Other"));
    let l1 = machine.create_state(state("L1"));
    let l2 = machine.create_state(state("L2"));
    let out = machine.create_state(state("Out"));
    machine.add_state(c).unwrap();
    machine.add_state(out).unwrap();
    machine.add_child_state(c, inner).unwrap();
    machine.add_child_state(c, other).unwrap();
    machine.add_child_state(inner, l1).unwrap();
    machine.add_child_state(inner, l2).unwrap();
    machine.add_history_state(c, deep).unwrap();

    let rc = machine.regions_of(c)[0];
    let ri = machine.regions_of(inner)[0];
    connect(&mut machine, rc, initial("Inner"));
    connect(&mut machine, ri, initial("L1"));
    connect(&mut machine, ri, simple_transition("deeper", "L1", "L2"));
    let root = machine.default_region();
    connect(&mut machine, root, initial("C"));
    connect(&mut machine, root, simple_transition("leave", "C", "Out"));
    connect(&mut machine, root, simple_transition("back", "Out", "C"));

    (machine, l1, l2)
}

#[test]
fn deep_history_restores_nested_leaf() {
    let (mut machine, l1, l2) = nested_history_chart(true);

    machine.start().unwrap();
    machine.trigger_named("deeper", &Value::Null).unwrap();
    machine.trigger_named("leave", &Value::Null).unwrap();
    machine.trigger_named("back", &Value::Null).unwrap();

    assert!(machine.is_state_active(l2));
    assert!(!machine.is_state_active(l1));
    assert_eq!(machine.configuration(), vec!["C", "Inner", "L2"]);
}

#[test]
fn shallow_history_restores_one_level_only() {
    let (mut machine, l1, l2) = nested_history_chart(false);

    machine.start().unwrap();
    machine.trigger_named("deeper", &Value::Null).unwrap();
    machine.trigger_named("leave", &Value::Null).unwrap();
    machine.trigger_named("back", &Value::Null).unwrap();

    assert!(machine.is_state_active(l1));
    assert!(!machine.is_state_active(l2));
    assert_eq!(machine.configuration(), vec!["C", "Inner", "L1"]);
}

#[test]
fn entry_action_can_trigger_follow_up_transition() {
    let trace = Trace::default();
    let mut machine = Machine::new("reentrant");
    let a = traced(&mut machine, &trace, "A");
    let c = traced(&mut machine, &trace, "C");
    let log = trace.clone();
    let b = machine.create_state(
        StateBuilder::new("B")
            .entry(move |ctx| {
                log.lock().unwrap().push("enter B".into());
                ctx.trigger_named("b2c", &Value::Null)?;
                Ok(())
            })
            .build()
            .unwrap(),
    );
    for s in [a, b, c] {
        machine.add_state(s).unwrap();
    }
    let root = machine.default_region();
    connect(&mut machine, root, initial("A"));
    connect(&mut machine, root, simple_transition("a2b", "A", "B"));
    connect(&mut machine, root, simple_transition("b2c", "B", "C"));

    machine.start().unwrap();
    machine.trigger_named("a2b", &Value::Null).unwrap();

    assert!(machine.is_state_active(c));
    assert!(!machine.is_state_active(b));
    assert_eq!(
        entries(&trace),
        vec!["enter A", "exit A", "enter B", "enter C"]
    );
    assert_eq!(
        machine.transition_log().path(),
        vec!["reentrant-region-0-initial-pseudo", "A", "B", "C"]
    );
}

#[test]
fn effect_sees_the_configuration_between_exit_and_entry() {
    let mut machine = Machine::new("between");
    let a = machine.create_state(state("A"));
    let b = machine.create_state(state("B"));
    let c = machine.create_state(state("C"));
    for s in [a, b, c] {
        machine.add_state(s).unwrap();
    }
    let root = machine.default_region();
    connect(&mut machine, root, initial("A"));
    connect(
        &mut machine,
        root,
        TransitionBuilder::named("a2b")
            .from("A")
            .to("B")
            .effect(|ctx, _| {
                let a_active = ctx.is_active("A");
                ctx.set("a_active", a_active);
                let outcome = ctx.trigger_named("b2c", &Value::Null)?;
                ctx.set("nested", format!("{outcome:?}"));
                Ok(())
            })
            .build()
            .unwrap(),
    );
    connect(&mut machine, root, simple_transition("b2c", "B", "C"));

    machine.start().unwrap();
    let outcome = machine.trigger_named("a2b", &Value::Null).unwrap();

    assert_eq!(outcome, TriggerOutcome::Fired);
    assert_eq!(machine.get("a_active"), Some(&json!(false)));
    assert_eq!(machine.get("nested"), Some(&json!("SourceInactive")));
    assert!(machine.is_state_active(b));
    assert!(!machine.is_state_active(c));
}

#[test]
fn effect_can_drive_an_orthogonal_region() {
    let mut machine = Machine::new("sibling");
    let d = machine.create_state(state("D"));
    let p = machine.create_state(state("P"));
    let q = machine.create_state(state("Q"));
    let s = machine.create_state(state("S"));
    let t = machine.create_state(state("T"));
    machine.add_state(d).unwrap();
    machine.add_child_state(d, p).unwrap();
    machine.add_child_state(d, q).unwrap();
    let r2 = machine.append_region(d).unwrap();
    machine.region_add_state(r2, s).unwrap();
    machine.region_add_state(r2, t).unwrap();

    let r1 = machine.regions_of(d)[0];
    connect(&mut machine, r1, initial("P"));
    connect(
        &mut machine,
        r1,
        TransitionBuilder::named("p2q")
            .from("P")
            .to("Q")
            .effect(|ctx, memo| {
                ctx.trigger_named("s2t", memo)?;
                Ok(())
            })
            .build()
            .unwrap(),
    );
    connect(&mut machine, r2, initial("S"));
    connect(&mut machine, r2, simple_transition("s2t", "S", "T"));
    let root = machine.default_region();
    connect(&mut machine, root, initial("D"));

    machine.start().unwrap();
    machine.trigger_named("p2q", &Value::Null).unwrap();

    assert!(machine.is_state_active(q));
    assert!(machine.is_state_active(t));
    assert!(!machine.is_state_active(p));
    assert!(!machine.is_state_active(s));
    let path = machine.transition_log().path();
    assert_eq!(&path[path.len() - 2..], &["T", "Q"]);
}

#[test]
fn auto_transition_completes_after_do_activity() {
    let mut machine = Machine::new("auto");
    let work = machine.create_state(
        StateBuilder::new("Work")
            .do_activity(|ctx| {
                ctx.set("worked", true);
                Ok(())
            })
            .auto_transition()
            .build()
            .unwrap(),
    );
    let done = machine.create_state(state("Done"));
    machine.add_state(work).unwrap();
    machine.add_state(done).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("Work"));
    connect(&mut machine, root, simple_transition("finished", "Work", "Done"));

    machine.start().unwrap();

    assert_eq!(machine.get("worked"), Some(&json!(true)));
    assert!(machine.is_state_active(done));
    assert!(!machine.is_state_active(work));
}

#[test]
fn completion_with_rejecting_guard_stalls() {
    let mut machine = Machine::new("stall");
    let work = machine.create_state(StateBuilder::new("Work").auto_transition().build().unwrap());
    let done = machine.create_state(state("Done"));
    machine.add_state(work).unwrap();
    machine.add_state(done).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("Work"));
    connect(
        &mut machine,
        root,
        TransitionBuilder::named("finished")
            .from("Work")
            .to("Done")
            .when(|_, _| false)
            .build()
            .unwrap(),
    );

    machine.start().unwrap();

    assert!(machine.is_state_active(work));
    assert!(!machine.is_state_active(done));
}

#[test]
fn auto_transition_without_outgoing_edge_finishes_machine() {
    let mut machine = Machine::new("auto-final");
    let work = machine.create_state(StateBuilder::new("Work").auto_transition().build().unwrap());
    machine.add_state(work).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("Work"));

    machine.start().unwrap();

    assert!(!machine.is_active());
    assert!(machine.active_states().is_empty());
}

#[test]
fn rejected_guard_has_no_observable_effect() {
    let trace = Trace::default();
    let mut machine = Machine::new("guarded");
    let a = traced(&mut machine, &trace, "A");
    let b = traced(&mut machine, &trace, "B");
    machine.add_state(a).unwrap();
    machine.add_state(b).unwrap();
    let root = machine.default_region();
    connect(&mut machine, root, initial("A"));
    let go = connect(
        &mut machine,
        root,
        TransitionBuilder::named("go")
            .from("A")
            .to("B")
            .when(|_, _| false)
            .effect(|ctx, _| {
                ctx.set("effect", true);
                Ok(())
            })
            .build()
            .unwrap(),
    );
    machine.start().unwrap();
    trace.lock().unwrap().clear();
    let before = machine.active_states();

    assert_eq!(machine.trigger(go, &json!({})).unwrap(), TriggerOutcome::GuardRejected);

    assert!(entries(&trace).is_empty());
    assert_eq!(machine.active_states(), before);
    assert_eq!(machine.get("effect"), None);
}

#[test]
fn initial_transition_rejected_by_guard_is_fatal() {
    let mut machine = Machine::new("rejecting-initial");
    let a = machine.create_state(state("A"));
    machine.add_state(a).unwrap();
    let root = machine.default_region();
    connect(
        &mut machine,
        root,
        TransitionBuilder::initial().to("A").when(|_, _| false).build().unwrap(),
    );

    assert!(matches!(
        machine.start(),
        Err(MachineError::Configuration(
            ConfigurationError::InitialTransitionRejected { .. }
        ))
    ));
}

#[test]
fn restart_after_finish_reenters_the_chart() {
    let HistoryChart { mut machine, x, .. } = history_chart();

    machine.start().unwrap();
    machine.finish().unwrap();
    assert!(!machine.is_active());

    machine.start().unwrap();
    assert!(machine.is_active());
    assert!(machine.is_state_active(x));
}
