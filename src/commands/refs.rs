use crate::core::{
    command_init::TreeCommandInit, error::Result, git::RefKind, print_info,
    print_section_header,
};
use colored::*;

pub fn execute_refs() -> Result<()> {
    let context = TreeCommandInit::initialize(None, Some(false))?;
    let current_base = context.provider.root_node().label();
    context.report_rebuild_failures();

    let refs = context.provider.refs()?;
    if refs.is_empty() {
        print_info("No refs found. Make your first commit to create one.");
        return Ok(());
    }

    print_section_header("Select a ref to use as comparison base");

    for r in &refs {
        let marker = if r.name == current_base {
            format!("{}{}{}", "[".bright_black(), "*".white(), "]".bright_black())
        } else {
            "   ".to_string()
        };
        let name = match r.kind {
            RefKind::Head => r.name.blue(),
            RefKind::RemoteHead => r.name.red(),
            RefKind::Tag => r.name.yellow(),
        };
        println!("{marker} {name} {}", r.short_commit().bright_black());
    }
    println!();

    Ok(())
}
