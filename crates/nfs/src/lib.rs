//! # NFS
//!
//! Declares the desired state of an NFS client or server and its ID-mapping
//! daemon from platform facts and optional parameters.
//!
//! Evaluation is a single pure pass:
//!
//! 1. [`platform::resolve`] maps facts to per-platform defaults
//! 2. explicit parameters are merged over the defaults and validated
//! 3. `idmapd.conf` is rendered and every declaration is added to a
//!    [`declarative::Catalog`]
//!
//! Any failure aborts the pass; a catalog is only returned when complete.
//!
//! ## Example
//!
//! ```
//! use declarative::ResourceRef;
//! use nfs::{NodeParams, OsFamily, PlatformFacts};
//!
//! let facts = PlatformFacts::new(OsFamily::RedHat, 8);
//! let catalog = nfs::evaluate(&facts, &NodeParams::default())?;
//!
//! assert!(catalog.contains(&ResourceRef::package("libnfsidmap")));
//! assert!(catalog.contains(&ResourceRef::service("idmapd_service")));
//! # Ok::<(), nfs::Error>(())
//! ```

pub mod error;
pub mod facts;
pub mod idmap;
pub mod idmapd_conf;
pub mod params;
pub mod platform;
pub mod subsystem;
pub mod validate;

pub use error::{Error, Result};
pub use facts::{FactsRecord, OsFamily, PlatformFacts, ReleaseValue};
pub use idmap::{IdmapConfig, IdmapSettings};
pub use idmapd_conf::RenderedFile;
pub use params::{IdmapParams, NfsParams, NodeParams, OneOrMany};
pub use platform::{Resolution, ResolvedDefaults, resolve};
pub use subsystem::{ExportsFile, NfsConfig};
pub use validate::{TranslationMethod, ValidationErrors, Violation};

use declarative::Catalog;
use serde::Serialize;
use validate::Validator;

/// Everything one evaluation works from, computed once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub facts: PlatformFacts,
    pub defaults: ResolvedDefaults,
    pub nfs: NfsConfig,
    pub idmap: IdmapConfig,
}

impl EffectiveConfig {
    /// Resolve defaults, merge parameters and validate all of them
    pub fn build(facts: &PlatformFacts, params: &NodeParams) -> Result<Self> {
        let defaults = resolve(facts);
        let mut validator = Validator::new();
        let nfs = NfsConfig::build(facts, &defaults, &params.nfs, &mut validator);
        let idmap = IdmapConfig::build(facts, &defaults, &params.idmap, &mut validator);
        validator.finish()?;

        nfs.check_platform()?;
        if !nfs.include_idmap && params.idmap != IdmapParams::default() {
            log::warn!("ID mapping is not included for {facts}; idmap parameters are unused");
        }

        Ok(Self {
            facts: facts.clone(),
            defaults,
            nfs,
            idmap,
        })
    }

    /// Assemble the catalog of declarations
    pub fn catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        self.nfs.declare(&mut catalog)?;
        if self.nfs.include_idmap {
            self.idmap.declare(&mut catalog)?;
        }
        catalog.validate()?;
        log::debug!(
            "Declared {} resources for {}",
            catalog.len(),
            self.facts
        );
        Ok(catalog)
    }
}

/// Evaluate facts and parameters into a catalog
pub fn evaluate(facts: &PlatformFacts, params: &NodeParams) -> Result<Catalog> {
    EffectiveConfig::build(facts, params)?.catalog()
}

/// Evaluate only the ID-mapping submodule
pub fn evaluate_idmap(facts: &PlatformFacts, params: &IdmapParams) -> Result<Catalog> {
    let defaults = resolve(facts);
    let mut validator = Validator::new();
    let idmap = IdmapConfig::build(facts, &defaults, params, &mut validator);
    validator.finish()?;

    let mut catalog = Catalog::new();
    idmap.declare(&mut catalog)?;
    catalog.validate()?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{
        ApplyPlan, ResourceExt, ResourceKind, ResourceRef, compute_diffs, refresh_targets,
    };

    fn facts(family: OsFamily, major: u32) -> PlatformFacts {
        PlatformFacts::new(family, major)
    }

    fn node(toml: &str) -> NodeParams {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_redhat_8_full_catalog() {
        let catalog = evaluate(&facts(OsFamily::RedHat, 8), &NodeParams::default()).unwrap();
        assert_eq!(
            catalog.references(),
            vec![
                ResourceRef::class("nfs"),
                ResourceRef::package("nfs-utils"),
                ResourceRef::class("rpcbind"),
                ResourceRef::class("nfs::idmap"),
                ResourceRef::package("libnfsidmap"),
                ResourceRef::file("idmapd_conf"),
                ResourceRef::service("idmapd_service"),
            ]
        );
        let service = catalog.get(&ResourceRef::service("idmapd_service")).unwrap();
        assert_eq!(service.attribute("name").unwrap().as_str(), Some("nfs-idmapd"));
        assert_eq!(service.attribute("ensure").unwrap().as_str(), Some("stopped"));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let params = node(
            r#"
[idmap]
idmap_domain = "example.com"
translation_method = ["umich_ldap", "nsswitch"]
ldap_server = "ldap.example.com"
ldap_base = ["dc=example", "dc=com"]
"#,
        );
        let facts = facts(OsFamily::RedHat, 7);
        let first = evaluate(&facts, &params).unwrap();
        let second = evaluate(&facts, &params).unwrap();
        assert_eq!(first.document(), second.document());
        assert!(compute_diffs(&first, &second).is_empty());
    }

    #[test]
    fn test_idmap_package_override_on_every_platform() {
        let params = IdmapParams {
            idmap_package: Some("string".to_string()),
            ..IdmapParams::default()
        };
        for (family, major) in [
            (OsFamily::RedHat, 6),
            (OsFamily::RedHat, 7),
            (OsFamily::RedHat, 8),
            (OsFamily::RedHat, 9),
            (OsFamily::Suse, 12),
            (OsFamily::Suse, 15),
        ] {
            let catalog = evaluate_idmap(&facts(family, major), &params).unwrap();
            let packages: Vec<_> = catalog
                .of_kind(ResourceKind::Package)
                .iter()
                .map(|r| r.title())
                .collect();
            assert_eq!(packages, vec!["string".to_string()]);
        }
    }

    #[test]
    fn test_apply_order_and_refresh() {
        let catalog = evaluate(&facts(OsFamily::RedHat, 7), &NodeParams::default()).unwrap();
        let plan = ApplyPlan::for_catalog(&catalog).unwrap();

        let package = plan.position(&ResourceRef::package("libnfsidmap")).unwrap();
        let file = plan.position(&ResourceRef::file("idmapd_conf")).unwrap();
        let service = plan.position(&ResourceRef::service("idmapd_service")).unwrap();
        assert!(package < file && file < service);

        assert_eq!(
            refresh_targets(&catalog, &ResourceRef::file("idmapd_conf")),
            vec![ResourceRef::service("idmapd_service")]
        );
    }

    #[test]
    fn test_server_exports_refresh_reexport() {
        let params = node("[nfs]\nserver = true\n");
        let catalog = evaluate(&facts(OsFamily::RedHat, 7), &params).unwrap();
        let plan = ApplyPlan::for_catalog(&catalog).unwrap();

        let exports = plan.position(&ResourceRef::file("nfs_exports")).unwrap();
        let exec = plan.position(&ResourceRef::exec("update_nfs_exports")).unwrap();
        assert!(exports < exec);
        assert_eq!(
            refresh_targets(&catalog, &ResourceRef::file("nfs_exports")),
            vec![ResourceRef::exec("update_nfs_exports")]
        );
    }

    #[test]
    fn test_server_mode_on_suse_yields_no_catalog() {
        let params = node("[nfs]\nserver = true\n");
        let err = evaluate(&facts(OsFamily::Suse, 12), &params).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { ref family } if family == "Suse"));
        assert!(
            err.to_string()
                .contains("This platform is not configured to be an NFS server")
        );
    }

    #[test]
    fn test_suse_ignores_idmapd_service_parameters() {
        let params = node(
            r#"
[idmap]
idmapd_service_name = "nfs-idmapd"
idmapd_service_ensure = "running"
idmapd_service_enable = true
"#,
        );
        let catalog = evaluate(&facts(OsFamily::Suse, 15), &params).unwrap();
        assert!(!catalog.contains(&ResourceRef::service("idmapd_service")));
        assert!(catalog.contains(&ResourceRef::service("nfs_service")));
    }

    #[test]
    fn test_validation_precedes_platform_check() {
        let params = node(
            r#"
[nfs]
server = true
exports_mode = "777"

[idmap]
idmap_domain = "bad domain"
"#,
        );
        let err = evaluate(&facts(OsFamily::Suse, 12), &params).unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation errors, got {err}");
        };
        assert!(errors.mentions("exports_mode"));
        assert!(errors.mentions("idmap_domain"));
    }

    #[test]
    fn test_duplicate_package_is_rejected() {
        let params = node(r#"nfs = { nfs_package = ["nfs-utils", "libnfsidmap"] }"#);
        let err = evaluate(&facts(OsFamily::RedHat, 7), &params).unwrap_err();
        assert!(matches!(
            err,
            Error::Catalog(declarative::Error::DuplicateResource(ref r))
                if *r == ResourceRef::package("libnfsidmap")
        ));
    }

    #[test]
    fn test_idmap_excluded_on_other_families() {
        let catalog = evaluate(
            &facts(OsFamily::Other("Debian".to_string()), 12),
            &NodeParams::default(),
        )
        .unwrap();
        assert_eq!(
            catalog.references(),
            vec![ResourceRef::class("nfs"), ResourceRef::package("nfs-client")]
        );
    }

    #[test]
    fn test_unlisted_redhat_release_needs_explicit_ensure() {
        let params = node("[idmap]\nidmapd_service_name = \"rpcidmapd\"\n");
        let err = evaluate(&facts(OsFamily::RedHat, 5), &params).unwrap_err();
        assert!(matches!(err, Error::MissingResolution { .. }));

        let params = node(
            "[idmap]\nidmapd_service_name = \"rpcidmapd\"\nidmapd_service_ensure = \"running\"\n",
        );
        let catalog = evaluate(&facts(OsFamily::RedHat, 5), &params).unwrap();
        assert!(catalog.contains(&ResourceRef::service("idmapd_service")));
    }

    #[test]
    fn test_el7_to_el8_diff_reports_service_name() {
        let params = NodeParams::default();
        let el7 = evaluate(&facts(OsFamily::RedHat, 7), &params).unwrap();
        let el8 = evaluate(&facts(OsFamily::RedHat, 8), &params).unwrap();

        let diffs = compute_diffs(&el7, &el8);
        assert_eq!(diffs.len(), 1);
        let change = &diffs[0].attribute_changes()[0];
        assert_eq!(diffs[0].resource, ResourceRef::service("idmapd_service"));
        assert_eq!(change.name, "name");
        assert_eq!(change.to.as_ref().and_then(|v| v.as_str()), Some("nfs-idmapd"));
    }

    #[test]
    fn test_empty_lists_are_validation_errors() {
        let params = node("[idmap]\nldap_base = []\nlocal_realms = []\n");
        let err = EffectiveConfig::build(&facts(OsFamily::RedHat, 7), &params).unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation errors, got {err}");
        };
        assert!(errors.mentions("ldap_base"));
        assert!(errors.mentions("local_realms"));

        let params = node("[nfs]\nnfs_package = []\n");
        let err = evaluate(&facts(OsFamily::Suse, 12), &params).unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e.mentions("nfs_package")));
    }

    #[test]
    fn test_include_idmap_on_family_without_defaults() {
        let params = node("[nfs]\ninclude_idmap = true\n");
        let catalog = evaluate(&facts(OsFamily::Other("Debian".to_string()), 12), &params).unwrap();
        assert_eq!(
            catalog.references(),
            vec![
                ResourceRef::class("nfs"),
                ResourceRef::package("nfs-client"),
                ResourceRef::class("nfs::idmap"),
                ResourceRef::file("idmapd_conf"),
            ]
        );

        let plan = ApplyPlan::for_catalog(&catalog).unwrap();
        assert_eq!(plan.steps[2].description, "Include class nfs::idmap");
    }

    #[test]
    fn test_effective_config_exposes_rendered_file() {
        let config =
            EffectiveConfig::build(&facts(OsFamily::Suse, 12), &NodeParams::default()).unwrap();
        let file = config.idmap.render();
        assert!(file.content.contains("\nPipefs-Directory = /var/lib/nfs/rpc_pipefs\n"));
        assert_eq!(config.defaults.idmapd_service_name, Resolution::Undefined);
    }
}
