//! `nfsdecl resolve` - show platform defaults

use anyhow::Result;
use nfs::{Resolution, resolve};

use crate::Context;
use crate::cli::NodeArgs;
use crate::config;
use crate::ui;

pub fn run(ctx: &Context, args: &NodeArgs) -> Result<()> {
    let node = config::load(args.config.as_deref())?;
    let facts = node.facts(args)?;
    let defaults = resolve(&facts);

    if !ctx.quiet {
        ui::header(&format!("Platform defaults for {facts}"));
    }

    ui::section("NFS");
    ui::kv("nfs_package", &defaults.nfs_package.join(", "));
    ui::kv("nfs_service_name", &shown(&defaults.nfs_service_name));
    ui::kv("nfs_service_ensure", defaults.nfs_service_ensure.as_str());
    ui::kv("nfs_service_enable", &defaults.nfs_service_enable.to_string());
    ui::kv("include_rpcbind", &defaults.include_rpcbind.to_string());
    ui::kv("include_idmap", &defaults.include_idmap.to_string());

    ui::section("ID mapping");
    ui::kv("idmap_package", &shown(&defaults.idmap_package));
    ui::kv("idmapd_service_name", &shown(&defaults.idmapd_service_name));
    let ensure = defaults
        .idmapd_service_ensure
        .into_option()
        .map(|e| e.as_str());
    ui::kv("idmapd_service_ensure", &ui::or_undefined(ensure));
    ui::kv("pipefs_directory", &shown(&defaults.pipefs_directory));

    if ctx.verbose > 0 && !defaults.include_idmap {
        println!();
        ui::dim(&format!("ID mapping is not managed on {}", facts.family));
    }
    Ok(())
}

fn shown(value: &Resolution<String>) -> String {
    ui::or_undefined(value.clone().into_option().as_deref())
}
