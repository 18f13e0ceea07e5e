//! Predicates for validating command output

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// The reference line at the top of a rendered tree
pub fn has_base(base: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("⇄ {base}"))
}

pub fn has_status_tag(code: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[{code}]"))
}

pub fn has_no_changes() -> impl Predicate<str> {
    predicates::str::contains("No changes")
}
