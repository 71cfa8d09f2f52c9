//! `nfsdecl render` - print the rendered idmapd.conf

use anyhow::Result;

use crate::Context;
use crate::cli::NodeArgs;
use crate::ui;

pub fn run(ctx: &Context, args: &NodeArgs) -> Result<()> {
    let effective = super::effective(args)?;
    let file = effective.idmap.render();

    if ctx.verbose > 0 {
        ui::header(&file.path);
        ui::kv("owner", &file.owner);
        ui::kv("group", &file.group);
        ui::kv("mode", &file.mode);
        println!();
    }

    print!("{}", file.content);

    if !effective.nfs.include_idmap && !ctx.quiet {
        ui::warn(&format!(
            "ID mapping is not included for {}; this file would not be declared",
            effective.facts
        ));
    }
    Ok(())
}
