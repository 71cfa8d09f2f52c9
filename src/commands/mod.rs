//! Subcommand implementations

pub mod catalog;
pub mod diff;
pub mod order;
pub mod render;
pub mod resolve;

use anyhow::{Context as AnyhowContext, Result};
use nfs::EffectiveConfig;

use crate::cli::NodeArgs;
use crate::config;

/// Load a node and build its effective configuration
pub fn effective(args: &NodeArgs) -> Result<EffectiveConfig> {
    let node = config::load(args.config.as_deref())?;
    let facts = node.facts(args)?;
    EffectiveConfig::build(&facts, &node.params())
        .with_context(|| format!("Could not evaluate node for {facts}"))
}
