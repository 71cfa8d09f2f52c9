//! `nfsdecl diff` - compare the catalogs of two node files

use anyhow::Result;
use colored::Colorize;
use declarative::{
    AttrValue, AttributeChange, Change, DiffSummary, ResourceDiff, compute_diffs, group_by_type,
};
use nfs::EffectiveConfig;

use crate::Context;
use crate::cli::{DiffArgs, NodeArgs};
use crate::ui;

pub fn run(ctx: &Context, args: &DiffArgs) -> Result<()> {
    let from = load(&args.from)?;
    let to = load(&args.to)?;

    let target = args.target.as_deref();
    let old = from.catalog()?.filter_by_target(target);
    let new = to.catalog()?.filter_by_target(target);

    if !ctx.quiet {
        ui::header(&format!("Catalog diff: {} -> {}", from.facts, to.facts));
    }

    let diffs = compute_diffs(&old, &new);
    let summary = DiffSummary::from_diffs(&diffs);
    if !summary.has_changes() {
        println!();
        ui::success("No changes - both nodes declare the same state");
        return Ok(());
    }

    let groups = group_by_type(&diffs);
    let mut kinds: Vec<&String> = groups.keys().collect();
    kinds.sort();
    for kind in kinds {
        ui::section(kind);
        for diff in &groups[kind] {
            show_diff(ctx, diff);
        }
    }

    println!();
    ui::kv(
        "summary",
        &format!(
            "{} added, {} removed, {} modified",
            summary.additions, summary.removals, summary.modifications
        ),
    );
    Ok(())
}

fn load(path: &str) -> Result<EffectiveConfig> {
    super::effective(&NodeArgs {
        config: Some(path.to_string()),
        ..NodeArgs::default()
    })
}

fn show_diff(ctx: &Context, diff: &ResourceDiff) {
    match &diff.change {
        Change::Added => println!("  {} {}", "+".green(), diff.resource),
        Change::Removed => println!("  {} {}", "-".red(), diff.resource),
        Change::Modified { attributes } => {
            println!("  {} {}", "~".yellow(), diff.resource);
            for change in attributes {
                show_attribute(ctx, change);
            }
        }
    }
}

fn show_attribute(ctx: &Context, change: &AttributeChange) {
    if let (Some(AttrValue::Str(old)), Some(AttrValue::Str(new))) = (&change.from, &change.to)
        && change.name == "content"
    {
        println!("    {}:", change.name.dimmed());
        if ctx.quiet {
            ui::dim("    (content changed)");
        } else {
            ui::text_diff(old, new);
        }
        return;
    }

    let shown = |value: &Option<AttrValue>| {
        value
            .as_ref()
            .map_or_else(|| ui::or_undefined(None), ToString::to_string)
    };
    println!(
        "    {}: {} -> {}",
        change.name.dimmed(),
        shown(&change.from),
        shown(&change.to)
    );
}
