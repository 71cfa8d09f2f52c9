//! `nfsdecl order` - print the apply order

use anyhow::Result;
use colored::Colorize;
use declarative::ApplyPlan;

use crate::Context;
use crate::cli::NodeArgs;
use crate::ui;

pub fn run(ctx: &Context, args: &NodeArgs) -> Result<()> {
    let effective = super::effective(args)?;
    let catalog = effective.catalog()?;
    let plan = ApplyPlan::for_catalog(&catalog)?;

    if !ctx.quiet {
        ui::header(&format!("Apply order for {}", effective.facts));
        println!();
    }

    let total = plan.steps.len();
    for (i, step) in plan.steps.iter().enumerate() {
        ui::step(i + 1, total, &step.resource.to_string());
        if ctx.verbose > 0 {
            println!("      {}", step.description.dimmed());
        }
        if !step.refreshed_by.is_empty() {
            let triggers: Vec<String> = step.refreshed_by.iter().map(ToString::to_string).collect();
            println!("      {} {}", "refreshed by".dimmed(), triggers.join(", "));
        }
    }
    Ok(())
}
