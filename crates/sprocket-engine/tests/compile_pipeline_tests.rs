//! Compile Pipeline Tests
//!
//! Lowering and code generation through the public `compile` entry point.

use sprocket_engine::ir::PrettyPrint;
use sprocket_engine::project::GREEN_FLAG_HAT;
use sprocket_engine::{compile, lower, BlockId, Op, Project, ThreadStatus};

fn stage_blocks(blocks: &str) -> Project {
    let source = format!(r#"{{ "targets": [{{ "name": "Stage", "blocks": {} }}] }}"#, blocks);
    Project::from_json(&source).unwrap()
}

const ASYNC_PROJECT: &str = r#"[
    { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "call" },
    { "id": "call", "opcode": "procedures_call", "fields": { "NAME": "work" }, "next": "say" },
    { "id": "say", "opcode": "looks_say", "inputs": { "MESSAGE": "done" } },

    { "id": "def", "opcode": "procedures_definition", "topLevel": true,
      "fields": { "NAME": "work" }, "next": "wait" },
    { "id": "wait", "opcode": "task_awaitNoReturn", "inputs": { "TASK": { "block": "async" } } },
    { "id": "async", "opcode": "task_async", "inputs": { "SUBSTACK": { "block": "inner" } } },
    { "id": "inner", "opcode": "looks_say", "inputs": { "MESSAGE": "inner" } }
]"#;

fn entry_of(project: &Project) -> BlockId {
    project.targets[0]
        .blocks
        .hats(GREEN_FLAG_HAT)
        .next()
        .map(|hat| hat.id.clone())
        .unwrap()
}

#[test]
fn test_yield_flag_reaches_the_caller() {
    let project = stage_blocks(ASYNC_PROJECT);
    let top = entry_of(&project);
    let program = lower(&project.targets[0].blocks, &top).unwrap();

    let work = program.procedure("work").unwrap();
    assert!(work.yields);
    // The entry script only calls `work`, but inherits its suspension
    assert!(program.entry.yields);
}

#[test]
fn test_generated_ops() {
    let project = stage_blocks(ASYNC_PROJECT);
    let top = entry_of(&project);
    let generated = compile(&project.targets[0].blocks, &top, ThreadStatus::Done).unwrap();

    assert!(generated.entry.ops.contains(&Op::Call("work".to_string())));
    let work = generated.procedure("work").unwrap();
    assert_eq!(
        work.ops,
        vec![
            Op::SpawnAsync {
                body: BlockId::new("inner"),
                terminal: ThreadStatus::Done,
            },
            Op::AwaitTask,
            Op::Pop,
        ]
    );

    let listing = generated.disassemble();
    assert!(listing.contains("CALL work"));
    assert!(listing.contains("AWAIT_TASK"));
    assert!(listing.contains("SPAWN_ASYNC @inner"));
}

#[test]
fn test_branch_compiles_on_its_own() {
    let project = stage_blocks(ASYNC_PROJECT);
    let generated = compile(
        &project.targets[0].blocks,
        &BlockId::new("inner"),
        ThreadStatus::Done,
    )
    .unwrap();

    assert!(!generated.entry.yields);
    assert_eq!(generated.entry.ops.last(), Some(&Op::Say));
}

#[test]
fn test_pretty_print_names_task_nodes() {
    let project = stage_blocks(ASYNC_PROJECT);
    let top = entry_of(&project);
    let program = lower(&project.targets[0].blocks, &top).unwrap();

    let text = program.pretty_print();
    assert!(text.contains("work"));
    assert!(text.contains("task.async(@inner)"));
}
