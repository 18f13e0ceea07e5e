//! Text rendering of the diff tree.
//!
//! The tree is expanded lazily through [`DiffTreeProvider::children`], one folder at a
//! time, the same way an interactive view would expand it.

use crate::core::{
    colors::{get_colored_name, get_folder_label, get_status_tag},
    tree::{DiffTreeProvider, Node},
};
use colored::*;

/// Render the whole tree below the reference node into lines
pub fn render_tree(provider: &DiffTreeProvider, base_commit: Option<&str>) -> Vec<String> {
    let root = provider.root_node();
    let mut lines = vec![format_ref_line(&root, base_commit)];
    let children = provider.children(&root);

    if children.is_empty() {
        lines.push(format!("  {}", "No changes".bright_black()));
        return lines;
    }

    render_children(provider, &children, "", &mut lines);
    lines
}

fn format_ref_line(node: &Node, base_commit: Option<&str>) -> String {
    match base_commit {
        Some(commit) => format!(
            "{} {} {}",
            "⇄".blue(),
            node.label().white().bold(),
            commit.bright_black()
        ),
        None => format!("{} {}", "⇄".blue(), node.label().white().bold()),
    }
}

fn render_children(provider: &DiffTreeProvider, nodes: &[Node], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{branch}{}", format_node(node)));

        if let Node::Folder { .. } = node {
            let nested = provider.children(node);
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(provider, &nested, &child_prefix, lines);
        }
    }
}

/// One node as shown in the tree, without the connector prefix
pub fn format_node(node: &Node) -> String {
    match node {
        Node::File { status, .. } => format!(
            "{} {}",
            get_status_tag(*status),
            get_colored_name(*status, &node.label())
        ),
        Node::Folder { .. } => get_folder_label(&node.label()).to_string(),
        Node::Ref { .. } => node.label().white().bold().to_string(),
    }
}
