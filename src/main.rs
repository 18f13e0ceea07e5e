use clap::{Parser, Subcommand};
use git_tree_compare::commands::*;
use git_tree_compare::core::{
    config::TreeRootSetting,
    error::{Result, TreeCompareError},
    print_error,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-tree-compare")]
#[command(about = "Show working tree changes against a branch, tag or commit as a folder tree")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show changed and untracked files as a folder tree
    Tree {
        /// Ref to compare against (default: the upstream remote's default branch)
        #[arg(short, long)]
        base: Option<String>,
        /// Do not refresh the index before diffing
        #[arg(long)]
        no_refresh: bool,
    },
    /// List refs that can be used as comparison base
    Refs,
    /// Show the diff of one file against the comparison base
    Diff {
        /// File path, relative to the current directory
        path: PathBuf,
        /// Ref to compare against
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Re-render the tree after changes; reads changed paths from stdin
    Watch {
        /// Ref to compare against
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Show or update the configuration
    Config {
        /// Folder the tree starts at
        #[arg(long, value_enum)]
        root: Option<TreeRootSetting>,
        /// Refresh the index before diffing
        #[arg(long)]
        refresh_index: Option<bool>,
        /// Quiet window in milliseconds before a watch rebuild
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .init();

    let result: Result<()> = match cli.command {
        Commands::Tree { base, no_refresh } => execute_tree(base, no_refresh.then_some(false)),
        Commands::Refs => execute_refs(),
        Commands::Diff { path, base } => execute_diff(path, base),
        Commands::Watch { base } => execute_watch(base),
        Commands::Config {
            root,
            refresh_index,
            debounce_ms,
        } => execute_config(root, refresh_index, debounce_ms),
    };

    if let Err(e) = result {
        if let TreeCompareError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}
