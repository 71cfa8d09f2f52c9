//! `nfsdecl catalog` - print the node's declarations

use anyhow::Result;

use crate::Context;
use crate::cli::{CatalogArgs, OutputFormat};
use crate::ui;

pub fn run(ctx: &Context, args: &CatalogArgs) -> Result<()> {
    let effective = super::effective(&args.node)?;
    let catalog = effective
        .catalog()?
        .filter_by_target(args.target.as_deref());

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog.document())?);
        }
        OutputFormat::Text => {
            if !ctx.quiet {
                ui::header(&format!("Catalog for {}", effective.facts));
                println!();
            }
            print!("{}", catalog.to_manifest());

            if catalog.is_empty() {
                ui::warn("No declarations match");
            } else if !ctx.quiet {
                println!();
                ui::dim(&format!(
                    "{} declarations, {} relationships",
                    catalog.len(),
                    catalog.edges().len()
                ));
            }
        }
    }
    Ok(())
}
