use crate::core::{
    command_init::TreeCommandInit,
    error::{Result, TreeCompareError},
    git::normalize_path,
    print_info,
    tree::{DiffTarget, DiffTreeProvider, Node},
};
use colored::*;
use std::path::{Path, PathBuf};

pub fn execute_diff(path: PathBuf, base: Option<String>) -> Result<()> {
    let context = TreeCommandInit::initialize(base.as_deref(), None)?;
    let provider = &context.provider;

    let base_ref = provider.root_node().label();
    context.report_rebuild_failures();

    let abs_path = normalize_path(&context.workspace_root.join(&path));
    let Some(node) = provider.file_node(&abs_path) else {
        print_info(&format!(
            "No changes for {} against {}",
            path.display(),
            base_ref
        ));
        return Ok(());
    };

    if let Node::File { status, .. } = &node {
        println!(
            "{} {}",
            path.display().to_string().white().bold(),
            format!("({})", status.description()).bright_black()
        );
    }

    match provider.open_diff(&node)? {
        DiffTarget::Working(working) => {
            println!("{} {}", "Working tree only:".green(), path.display());
            let content = std::fs::read_to_string(&working)?;
            print_prefixed(&content, "+", |line| line.green());
        }
        DiffTarget::Base(base) => {
            println!("{} {}", "Base version only:".red(), base.spec);
            let content = provider.read_base_version(&base)?;
            print_prefixed(&content, "-", |line| line.red());
        }
        DiffTarget::SideBySide { working, .. } => {
            show_side_by_side(provider, &base_ref, &working)?;
        }
    }

    Ok(())
}

fn show_side_by_side(provider: &DiffTreeProvider, base_ref: &str, working: &Path) -> Result<()> {
    let rel_path = working
        .strip_prefix(provider.repo_root())
        .map_err(|_| TreeCompareError::unknown_element(working.display().to_string()))?;
    let rel_path = rel_path.to_string_lossy();

    let output = provider.run_git(&["diff", "--color", base_ref, "--", &rel_path])?;
    if output.stdout.trim().is_empty() {
        println!("No content changes for {rel_path}");
    } else {
        println!("{}", output.stdout);
    }
    Ok(())
}

fn print_prefixed(content: &str, prefix: &str, style: impl Fn(&str) -> ColoredString) {
    for line in content.lines() {
        println!("{}", style(&format!("{prefix}{line}")));
    }
}
