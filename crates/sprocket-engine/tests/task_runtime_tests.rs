//! Task Runtime Tests
//!
//! End-to-end tests of the task blocks running under the scheduler:
//! - Spawning async branches and awaiting their result
//! - Explicit resolution, idempotent settlement, and status
//! - Several threads parked on the same task
//! - Stopping threads settles the tasks of their branches
//!
//! Every project runs in both execution modes and the observable results
//! (say log, variables) must match.

use serde_json::{json, Value as Json};
use sprocket_engine::vm::SayEntry;
use sprocket_engine::{
    CompileError, EngineOptions, ExecutionMode, Project, RunSummary, Runtime, RuntimeError, Task,
    Value, VmError,
};

// ===== Helpers =====

fn project(blocks: Json, variables: Json) -> Project {
    let source = json!({
        "targets": [{ "name": "Stage", "variables": variables, "blocks": blocks }]
    });
    Project::from_json(&source.to_string()).unwrap()
}

fn runtime(project: Project, mode: ExecutionMode) -> Runtime {
    let options = EngineOptions {
        mode,
        ..Default::default()
    };
    Runtime::new(project, options)
}

fn run(project: Project, mode: ExecutionMode) -> (Runtime, RunSummary) {
    let mut rt = runtime(project, mode);
    rt.green_flag().unwrap();
    let summary = rt.run_until_idle().unwrap();
    (rt, summary)
}

fn said(rt: &Runtime) -> Vec<(u64, String)> {
    rt.say_log()
        .iter()
        .map(|SayEntry { tick, text, .. }| (*tick, text.clone()))
        .collect()
}

/// Run in both modes, check they agree, return the interpreted runtime
fn run_both(blocks: Json, variables: Json) -> Runtime {
    let (interpreted, interpreted_summary) =
        run(project(blocks.clone(), variables.clone()), ExecutionMode::Interpreted);
    let (compiled, compiled_summary) = run(project(blocks, variables), ExecutionMode::Compiled);
    assert_eq!(said(&interpreted), said(&compiled), "say logs differ between modes");
    assert_eq!(interpreted_summary.ticks, compiled_summary.ticks);
    assert_eq!(interpreted.monitors(), compiled.monitors());
    interpreted
}

fn entries(items: &[(u64, &str)]) -> Vec<(u64, String)> {
    items.iter().map(|(tick, text)| (*tick, text.to_string())).collect()
}

fn var(id: &str, name: &str) -> Json {
    json!({ "id": id, "opcode": "data_variable", "fields": { "VARIABLE": name } })
}

// ===== Async and await =====

#[test]
fn test_await_async_branch_result() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "r" },
          "inputs": { "VALUE": { "block": "await" } }, "next": "say" },
        { "id": "await", "opcode": "task_await", "inputs": { "TASK": { "block": "async" } } },
        { "id": "async", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "resolve" } } },
        { "id": "resolve", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "current" }, "VALUE": "hello" } },
        { "id": "current", "opcode": "task_current" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "join" } } },
        { "id": "join", "opcode": "operator_join",
          "inputs": { "STRING1": "got:", "STRING2": { "block": "r" } } },
        var("r", "r"),
    ]);
    let rt = run_both(blocks, json!([{ "name": "r" }]));

    // The branch resolves during tick 1; the awaiting thread resumes on tick 2
    assert_eq!(said(&rt), entries(&[(2, "got:hello")]));
    assert_eq!(rt.variable("Stage", "r"), Some(Value::from("hello")));
}

#[test]
fn test_reporters_before_an_await_run_once() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "join" } } },
        { "id": "join", "opcode": "operator_join",
          "inputs": { "STRING1": { "block": "first" }, "STRING2": { "block": "await" } } },
        { "id": "first", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "spawned" } } },
        { "id": "spawned", "opcode": "looks_say", "inputs": { "MESSAGE": "spawned" } },
        { "id": "await", "opcode": "task_await", "inputs": { "TASK": { "block": "second" } } },
        { "id": "second", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "pause" } } },
        { "id": "pause", "opcode": "control_yield" },
    ]);
    let rt = run_both(blocks, json!([]));

    // Resuming after the await must not spawn the first branch again
    assert_eq!(said(&rt), entries(&[(1, "spawned"), (3, "")]));
    let spawned = rt.say_log().iter().filter(|entry| entry.text == "spawned").count();
    assert_eq!(spawned, 1);
}

#[test]
fn test_branch_settles_empty_when_it_finishes() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "wait" },
        { "id": "wait", "opcode": "task_awaitNoReturn",
          "inputs": { "TASK": { "block": "async" } }, "next": "after" },
        { "id": "async", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "inner" } } },
        { "id": "inner", "opcode": "looks_say", "inputs": { "MESSAGE": "inner" } },
        { "id": "after", "opcode": "looks_say", "inputs": { "MESSAGE": "after" } },
    ]);
    let rt = run_both(blocks, json!([]));

    assert_eq!(said(&rt), entries(&[(1, "inner"), (2, "after")]));
}

#[test]
fn test_outer_branch_settles_without_waiting_for_nested_branch() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "outer" } }, "next": "wait" },
        { "id": "outer", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "spawn" } } },
        { "id": "spawn", "opcode": "data_setvariableto", "fields": { "VARIABLE": "inner" },
          "inputs": { "VALUE": { "block": "inner" } }, "next": "outer_say" },
        { "id": "inner", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "inner_yield" } } },
        { "id": "inner_yield", "opcode": "control_yield", "next": "inner_say" },
        { "id": "inner_say", "opcode": "looks_say", "inputs": { "MESSAGE": "inner done" } },
        { "id": "outer_say", "opcode": "looks_say", "inputs": { "MESSAGE": "outer done" } },
        { "id": "wait", "opcode": "task_awaitNoReturn",
          "inputs": { "TASK": { "block": "t" } }, "next": "resumed" },
        var("t", "t"),
        { "id": "resumed", "opcode": "looks_say", "inputs": { "MESSAGE": "main resumed" } },
    ]);
    let rt = run_both(blocks, json!([{ "name": "t" }, { "name": "inner" }]));

    assert_eq!(
        said(&rt),
        entries(&[(1, "outer done"), (2, "main resumed"), (2, "inner done")])
    );
}

#[test]
fn test_async_without_branch_is_already_resolved() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "async" } }, "next": "say" },
        { "id": "async", "opcode": "task_async" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "status" } } },
        { "id": "status", "opcode": "task_status", "inputs": { "TASK": { "block": "t" } } },
        var("t", "t"),
    ]);
    let rt = run_both(blocks, json!([{ "name": "t" }]));

    assert_eq!(said(&rt), entries(&[(1, "true")]));
    // No thread was spawned for the missing branch
    assert_eq!(rt.threads().len(), 0);
    let monitors = rt.monitors();
    assert_eq!(monitors[0].text, "<fulfilled task with >");
}

#[test]
fn test_current_is_empty_outside_a_branch() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "join" } } },
        { "id": "join", "opcode": "operator_join",
          "inputs": { "STRING1": "current=", "STRING2": { "block": "current" } } },
        { "id": "current", "opcode": "task_current" },
    ]);
    let rt = run_both(blocks, json!([]));

    assert_eq!(said(&rt), entries(&[(1, "current=")]));
}

// ===== Create, resolve, status =====

#[test]
fn test_create_resolve_and_status() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "create" } }, "next": "say1" },
        { "id": "create", "opcode": "task_create" },
        { "id": "say1", "opcode": "looks_say",
          "inputs": { "MESSAGE": { "block": "status1" } }, "next": "say2" },
        { "id": "status1", "opcode": "task_status", "inputs": { "TASK": { "block": "t1" } } },
        var("t1", "t"),
        { "id": "say2", "opcode": "looks_say",
          "inputs": { "MESSAGE": { "block": "t2" } }, "next": "resolve1" },
        var("t2", "t"),
        { "id": "resolve1", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "t3" }, "VALUE": 5 }, "next": "resolve2" },
        var("t3", "t"),
        { "id": "resolve2", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "t4" }, "VALUE": "ignored" }, "next": "say3" },
        var("t4", "t"),
        { "id": "say3", "opcode": "looks_say",
          "inputs": { "MESSAGE": { "block": "status2" } }, "next": "say4" },
        { "id": "status2", "opcode": "task_status", "inputs": { "TASK": { "block": "t5" } } },
        var("t5", "t"),
        { "id": "say4", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "t6" } } },
        var("t6", "t"),
    ]);
    let rt = run_both(blocks, json!([{ "name": "t" }]));

    // A pending task casts to ""; the second resolve is a no-op
    assert_eq!(
        said(&rt),
        entries(&[(1, "false"), (1, ""), (1, "true"), (1, "5")])
    );
    assert_eq!(rt.monitors()[0].text, "<fulfilled task with 5>");
}

#[test]
fn test_non_task_values_count_as_settled() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "resolve" },
        { "id": "resolve", "opcode": "task_resolve",
          "inputs": { "TASK": "not a task", "VALUE": 1 }, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "status" } } },
        { "id": "status", "opcode": "task_status", "inputs": { "TASK": 42 } },
    ]);
    let rt = run_both(blocks, json!([]));

    assert_eq!(said(&rt), entries(&[(1, "true")]));
}

#[test]
fn test_await_non_task_passes_value_through() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "await" } } },
        { "id": "await", "opcode": "task_await", "inputs": { "TASK": "plain" } },
    ]);
    let rt = run_both(blocks, json!([]));

    // No suspension: the value is reported in the same tick
    assert_eq!(said(&rt), entries(&[(1, "plain")]));
}

// ===== Several awaiters =====

#[test]
fn test_two_threads_await_the_same_task() {
    let blocks = json!([
        // A: create the task and wait for it
        { "id": "a", "opcode": "event_whenflagclicked", "topLevel": true, "next": "a_set" },
        { "id": "a_set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "a_create" } }, "next": "a_start" },
        { "id": "a_create", "opcode": "task_create" },
        { "id": "a_start", "opcode": "looks_say", "inputs": { "MESSAGE": "A start" }, "next": "a_wait" },
        { "id": "a_wait", "opcode": "task_awaitNoReturn",
          "inputs": { "TASK": { "block": "a_t" } }, "next": "a_done" },
        var("a_t", "t"),
        { "id": "a_done", "opcode": "looks_say", "inputs": { "MESSAGE": "A done" } },

        // B: wait for the task's value one tick later
        { "id": "b", "opcode": "event_whenflagclicked", "topLevel": true, "next": "b_yield" },
        { "id": "b_yield", "opcode": "control_yield", "next": "b_say" },
        { "id": "b_say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "b_join" } } },
        { "id": "b_join", "opcode": "operator_join",
          "inputs": { "STRING1": "B:", "STRING2": { "block": "b_await" } } },
        { "id": "b_await", "opcode": "task_await", "inputs": { "TASK": { "block": "b_t" } } },
        var("b_t", "t"),

        // C: resolve the task on the third tick
        { "id": "c", "opcode": "event_whenflagclicked", "topLevel": true, "next": "c_yield1" },
        { "id": "c_yield1", "opcode": "control_yield", "next": "c_yield2" },
        { "id": "c_yield2", "opcode": "control_yield", "next": "c_resolve" },
        { "id": "c_resolve", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "c_t" }, "VALUE": "v" } },
        var("c_t", "t"),
    ]);
    let rt = run_both(blocks, json!([{ "name": "t" }]));

    assert_eq!(
        said(&rt),
        entries(&[(1, "A start"), (4, "A done"), (4, "B:v")])
    );
}

#[test]
fn test_unresolved_task_parks_forever() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "wait" },
        { "id": "wait", "opcode": "task_awaitNoReturn",
          "inputs": { "TASK": { "block": "create" } }, "next": "never" },
        { "id": "create", "opcode": "task_create" },
        { "id": "never", "opcode": "looks_say", "inputs": { "MESSAGE": "never" } },
    ]);

    for mode in [ExecutionMode::Interpreted, ExecutionMode::Compiled] {
        let (rt, summary) = run(project(blocks.clone(), json!([])), mode);
        assert_eq!(
            summary,
            RunSummary {
                ticks: 1,
                finished: 0,
                parked: 1,
                hit_tick_limit: false,
            }
        );
        assert!(rt.say_log().is_empty());
    }
}

// ===== Stopping =====

#[test]
fn test_stop_all_settles_branch_tasks() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "async" } }, "next": "wait" },
        { "id": "async", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "spin" } } },
        { "id": "spin", "opcode": "control_yield", "next": "never" },
        { "id": "never", "opcode": "looks_say", "inputs": { "MESSAGE": "never" } },
        { "id": "wait", "opcode": "task_awaitNoReturn", "inputs": { "TASK": { "block": "t" } } },
        var("t", "t"),
    ]);

    for mode in [ExecutionMode::Interpreted, ExecutionMode::Compiled] {
        let mut rt = runtime(project(blocks.clone(), json!([{ "name": "t" }])), mode);
        rt.green_flag().unwrap();
        assert_eq!(rt.step().unwrap(), 2);
        assert_eq!(rt.monitors()[0].text, "<pending task>");
        let pending = rt.variable("Stage", "t").unwrap();
        assert_eq!(rt.render(&pending), "<pending task>");
        assert_eq!(pending.to_string(), "");

        rt.stop_all().unwrap();
        assert!(rt.threads().is_empty());
        let Some(Value::Task(task)) = rt.variable("Stage", "t") else {
            panic!("expected a task in t");
        };
        assert!(task.is_done());
        assert_eq!(rt.monitors()[0].text, "<fulfilled task with >");
        assert_eq!(rt.render(&pending), "<fulfilled task with >");
        assert!(rt.say_log().is_empty());
    }
}

// ===== Control flow around tasks =====

#[test]
fn test_repeat_yields_once_per_iteration() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "repeat" },
        { "id": "repeat", "opcode": "control_repeat",
          "inputs": { "TIMES": 3, "SUBSTACK": { "block": "inc" } }, "next": "say" },
        { "id": "inc", "opcode": "data_changevariableby",
          "fields": { "VARIABLE": "n" }, "inputs": { "VALUE": 1 } },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "n" } } },
        var("n", "n"),
    ]);
    let rt = run_both(blocks, json!([{ "name": "n", "value": 0 }]));

    assert_eq!(said(&rt), entries(&[(4, "3")]));
}

#[test]
fn test_await_inside_procedure() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "call" },
        { "id": "call", "opcode": "procedures_call", "fields": { "NAME": "fetch" }, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": { "block": "r" } } },
        var("r", "r"),

        { "id": "def", "opcode": "procedures_definition", "topLevel": true,
          "fields": { "NAME": "fetch" }, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "r" },
          "inputs": { "VALUE": { "block": "await" } } },
        { "id": "await", "opcode": "task_await", "inputs": { "TASK": { "block": "async" } } },
        { "id": "async", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "resolve" } } },
        { "id": "resolve", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "current" }, "VALUE": "fetched" } },
        { "id": "current", "opcode": "task_current" },
    ]);
    let rt = run_both(blocks, json!([{ "name": "r" }]));

    assert_eq!(said(&rt), entries(&[(2, "fetched")]));
}

#[test]
fn test_conditional_on_status() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "set" },
        { "id": "set", "opcode": "data_setvariableto", "fields": { "VARIABLE": "t" },
          "inputs": { "VALUE": { "block": "create" } }, "next": "if1" },
        { "id": "create", "opcode": "task_create" },
        { "id": "if1", "opcode": "control_if",
          "inputs": { "CONDITION": { "block": "status1" }, "SUBSTACK": { "block": "say1" } },
          "next": "resolve" },
        { "id": "status1", "opcode": "task_status", "inputs": { "TASK": { "block": "t1" } } },
        var("t1", "t"),
        { "id": "say1", "opcode": "looks_say", "inputs": { "MESSAGE": "early" } },
        { "id": "resolve", "opcode": "task_resolve",
          "inputs": { "TASK": { "block": "t2" }, "VALUE": "x" }, "next": "if2" },
        var("t2", "t"),
        { "id": "if2", "opcode": "control_if",
          "inputs": { "CONDITION": { "block": "status2" }, "SUBSTACK": { "block": "say2" } } },
        { "id": "status2", "opcode": "task_status", "inputs": { "TASK": { "block": "t3" } } },
        var("t3", "t"),
        { "id": "say2", "opcode": "looks_say", "inputs": { "MESSAGE": "settled" } },
    ]);
    let rt = run_both(blocks, json!([{ "name": "t" }]));

    assert_eq!(said(&rt), entries(&[(1, "settled")]));
}

// ===== Errors =====

#[test]
fn test_call_depth_limit() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "call" },
        { "id": "call", "opcode": "procedures_call", "fields": { "NAME": "loop" } },
        { "id": "def", "opcode": "procedures_definition", "topLevel": true,
          "fields": { "NAME": "loop" }, "next": "recurse" },
        { "id": "recurse", "opcode": "procedures_call", "fields": { "NAME": "loop" } },
    ]);

    for mode in [ExecutionMode::Interpreted, ExecutionMode::Compiled] {
        let options = EngineOptions {
            mode,
            max_call_depth: 8,
            ..Default::default()
        };
        let mut rt = Runtime::new(project(blocks.clone(), json!([])), options);
        rt.green_flag().unwrap();
        let err = rt.run_until_idle().unwrap_err();
        assert!(
            matches!(err, RuntimeError::Vm(VmError::CallStackOverflow(8))),
            "{mode}: unexpected error {err}"
        );
    }
}

#[test]
fn test_missing_procedure_is_skipped() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "call" },
        { "id": "call", "opcode": "procedures_call", "fields": { "NAME": "nowhere" }, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": "still here" } },
    ]);
    let rt = run_both(blocks, json!([]));

    assert_eq!(said(&rt), entries(&[(1, "still here")]));
}

#[test]
fn test_unknown_opcode() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "bad" },
        { "id": "bad", "opcode": "motion_movesteps" },
    ]);

    let mut rt = runtime(project(blocks.clone(), json!([])), ExecutionMode::Interpreted);
    rt.green_flag().unwrap();
    let err = rt.run_until_idle().unwrap_err();
    assert!(matches!(err, RuntimeError::Vm(VmError::UnknownOpcode { .. })));

    let mut rt = runtime(project(blocks, json!([])), ExecutionMode::Compiled);
    rt.green_flag().unwrap();
    let err = rt.run_until_idle().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Vm(VmError::Compile(CompileError::UnknownOpcode { .. }))
    ));
}

#[test]
fn test_tick_limit() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "repeat" },
        { "id": "repeat", "opcode": "control_repeat", "inputs": { "TIMES": 100 } },
    ]);

    for mode in [ExecutionMode::Interpreted, ExecutionMode::Compiled] {
        let options = EngineOptions {
            mode,
            max_ticks: 10,
            ..Default::default()
        };
        let mut rt = Runtime::new(project(blocks.clone(), json!([])), options);
        rt.green_flag().unwrap();
        let summary = rt.run_until_idle().unwrap();
        assert!(summary.hit_tick_limit);
        assert_eq!(summary.ticks, 10);
        assert_eq!(rt.threads().len(), 1);
    }
}

#[test]
fn test_failed_thread_is_not_restarted() {
    let blocks = json!([
        { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "say" },
        { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": "side effect" }, "next": "bad" },
        { "id": "bad", "opcode": "motion_movesteps" },
    ]);

    let mut rt = runtime(project(blocks.clone(), json!([])), ExecutionMode::Interpreted);
    rt.green_flag().unwrap();
    assert!(rt.step().is_err());
    assert!(rt.threads().is_empty());
    assert_eq!(rt.step().unwrap(), 0);
    assert_eq!(said(&rt), entries(&[(1, "side effect")]));

    // Compilation fails before the script runs at all
    let mut rt = runtime(project(blocks, json!([])), ExecutionMode::Compiled);
    rt.green_flag().unwrap();
    assert!(rt.step().is_err());
    assert!(rt.threads().is_empty());
    assert_eq!(rt.step().unwrap(), 0);
    assert!(rt.say_log().is_empty());
}

#[test]
fn test_render_shows_task_state() {
    let rt = runtime(project(json!([]), json!([])), ExecutionMode::Interpreted);
    let task = Task::new();
    let value = Value::Task(task.clone());
    assert_eq!(rt.render(&value), "<pending task>");

    task.settle(Value::from("ready")).unwrap();
    assert_eq!(rt.render(&value), "<fulfilled task with ready>");
    assert_eq!(value.to_string(), "ready");
    assert_eq!(rt.render(&Value::Num(3.0)), "3");
}
