use crate::core::{command_init::TreeCommandInit, error::Result, render::render_tree};

pub fn execute_tree(base: Option<String>, refresh_index: Option<bool>) -> Result<()> {
    let context = TreeCommandInit::initialize(base.as_deref(), refresh_index)?;

    // Builds the first snapshot
    let root = context.provider.root_node();
    log::debug!("Tree root node: {}", root.label());

    let base_commit = context.provider.base_commit();
    let lines = render_tree(&context.provider, base_commit.as_deref());
    context.report_rebuild_failures();

    println!();
    for line in lines {
        println!("{line}");
    }
    println!();

    Ok(())
}
