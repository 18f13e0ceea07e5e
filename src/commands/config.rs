use crate::core::{
    config::{TreeCompareConfig, TreeRootSetting},
    error::Result,
    print_section_header, print_success,
};
use colored::*;

pub fn execute_config(
    root: Option<TreeRootSetting>,
    refresh_index: Option<bool>,
    debounce_ms: Option<u64>,
) -> Result<()> {
    let mut config = TreeCompareConfig::load_or_default()?;
    let changed = root.is_some() || refresh_index.is_some() || debounce_ms.is_some();

    if let Some(root) = root {
        config.root = root;
    }
    if let Some(refresh_index) = refresh_index {
        config.refresh_index = refresh_index;
    }
    if let Some(debounce_ms) = debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    if changed {
        let path = config.save()?;
        print_success(&format!("Config saved to {}", path.display()));
    }

    print_section_header("Configuration");
    println!("  {}  {}", "root".bright_black(), config.root.to_string().white());
    println!(
        "  {}  {}",
        "refresh-index".bright_black(),
        config.refresh_index.to_string().white()
    );
    println!(
        "  {}  {}",
        "debounce-ms".bright_black(),
        config.debounce_ms.to_string().white()
    );
    println!();

    Ok(())
}
