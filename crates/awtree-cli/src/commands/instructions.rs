//! Manual field instructions command

use anyhow::{Context, Result};
use awtree_export::{check_marker, AwtreeConfig, MarkerStatus};
use std::path::PathBuf;

pub struct InstructionsArgs {
    pub input: Option<String>,
    pub collection: Option<String>,
    pub marker: Option<String>,
}

pub fn run(args: InstructionsArgs) -> Result<()> {
    let config = AwtreeConfig::load().context("Failed to load configuration")?;
    let mut set = config.instructions;
    if let Some(collection) = args.collection {
        set.collection = collection;
    }
    if let Some(marker) = args.marker {
        set.marker = Some(marker);
    }
    let input = args
        .input
        .map(PathBuf::from)
        .unwrap_or(config.export.input);

    println!("{}", set.render(&input));

    let Some(marker) = set.marker() else {
        println!("No marker configured; skipping the {} check.", input.display());
        return Ok(());
    };

    let status = check_marker(&input, marker)
        .with_context(|| format!("Failed to check {} for '{}'", input.display(), marker))?;
    match status {
        MarkerStatus::Present => {
            println!("✅ {} has been updated successfully!", input.display())
        }
        MarkerStatus::Missing => println!(
            "❌ {} has NOT been updated. Please update it manually.",
            input.display()
        ),
    }

    Ok(())
}
