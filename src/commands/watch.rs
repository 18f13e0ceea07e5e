use crate::core::{
    command_init::{rebuild_failure_text, TreeCommandInit},
    error::Result,
    print_warning,
    render::render_tree,
    tree::{spawn_rebuild_on_change, DiffTreeProvider, TreeEvent},
};
use colored::*;
use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

/// Re-render the tree whenever changed paths, one per line on stdin, settle down.
///
/// Meant to be fed by a file watcher, e.g. `inotifywait -m -r --format '%w%f' .`.
pub fn execute_watch(base: Option<String>) -> Result<()> {
    let context = TreeCommandInit::initialize(base.as_deref(), None)?;
    let provider = &context.provider;
    let window = Duration::from_millis(context.config.debounce_ms);

    print_tree(provider);
    context.report_rebuild_failures();

    let debouncer = spawn_rebuild_on_change(provider, window);
    let workspace_root = context.workspace_root.clone();
    let reader = std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(|line| line.ok()) {
            let line = line.trim();
            if !line.is_empty() {
                debouncer.notify(workspace_root.join(Path::new(line)));
            }
        }
        // flushes a pending rebuild
        drop(debouncer);
    });

    loop {
        match context.events.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => handle_event(provider, event),
            Err(RecvTimeoutError::Timeout) if reader.is_finished() => {
                for event in context.events.try_iter() {
                    handle_event(provider, event);
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let _ = reader.join();
    Ok(())
}

fn handle_event(provider: &DiffTreeProvider, event: TreeEvent) {
    match event {
        TreeEvent::Changed => print_tree(provider),
        TreeEvent::RebuildFailed {
            message,
            recoverable,
        } => print_warning(&format!(
            "Keeping previous tree. {}",
            rebuild_failure_text(&message, recoverable)
        )),
    }
}

fn print_tree(provider: &DiffTreeProvider) {
    provider.root_node();
    let snapshot = provider.snapshot();
    println!(
        "\n{}",
        format!("── {} ──", snapshot.built_at.format("%H:%M:%S")).bright_black()
    );
    for line in render_tree(provider, provider.base_commit().as_deref()) {
        println!("{line}");
    }
}
