//! Unified color system for diff status visualization.
//!
//! # Color Scheme
//! - **Modified**: Yellow
//! - **Added**: Green
//! - **Deleted**: Red
//! - **Untracked**: Cyan
//! - **Type changed**: Magenta
//! - **Conflict**: Red bold

use crate::core::diff_status::DiffStatus;
use colored::*;

/// Single function to apply color styling based on diff status
pub fn get_status_color_style(status: DiffStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        DiffStatus::Modified => Box::new(|text: &str| text.yellow()),
        DiffStatus::Untracked => Box::new(|text: &str| text.cyan()),
        DiffStatus::Deleted => Box::new(|text: &str| text.red()),
        DiffStatus::Added => Box::new(|text: &str| text.green()),
        DiffStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        DiffStatus::Conflict => Box::new(|text: &str| text.red().bold()),
    }
}

/// Colored single-letter status tag, e.g. `[M]`
pub fn get_status_tag(status: DiffStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(&format!("[{}]", status.as_str()))
}

/// File name in its status color; deleted files are struck through
pub fn get_colored_name(status: DiffStatus, name: &str) -> ColoredString {
    let color_fn = get_status_color_style(status);
    match status {
        DiffStatus::Deleted => color_fn(name).strikethrough(),
        _ => color_fn(name),
    }
}

/// Folder label, dimmed with a trailing separator
pub fn get_folder_label(name: &str) -> ColoredString {
    format!("{name}/").blue().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tag_contains_code() {
        assert!(get_status_tag(DiffStatus::Modified).to_string().contains("[M]"));
        assert!(get_status_tag(DiffStatus::Untracked).to_string().contains("[U]"));
        assert!(get_status_tag(DiffStatus::Conflict).to_string().contains("[C]"));
    }

    #[test]
    fn test_colored_name_keeps_text() {
        for status in [
            DiffStatus::Added,
            DiffStatus::Deleted,
            DiffStatus::Modified,
            DiffStatus::Conflict,
            DiffStatus::Untracked,
            DiffStatus::TypeChanged,
        ] {
            assert!(get_colored_name(status, "file.rs").to_string().contains("file.rs"));
        }
    }

    #[test]
    fn test_status_color_style_consistency() {
        let color_fn = get_status_color_style(DiffStatus::Added);
        assert_eq!(color_fn("x").to_string(), color_fn("x").to_string());
    }

    #[test]
    fn test_folder_label() {
        assert!(get_folder_label("src").to_string().contains("src/"));
    }
}
