//! The top-level NFS module: client packages, the nfs service and server exports.

use crate::error::{Error, Result};
use crate::facts::PlatformFacts;
use crate::params::NfsParams;
use crate::platform::ResolvedDefaults;
use crate::validate::Validator;
use declarative::{Catalog, Class, Exec, File, Package, ResourceRef, Service, ServiceEnsure};
use serde::Serialize;

pub const NFS_SERVICE: &str = "nfs_service";
pub const NFS_EXPORTS: &str = "nfs_exports";
pub const UPDATE_NFS_EXPORTS: &str = "update_nfs_exports";
pub const CLASS: &str = "nfs";
pub const RPCBIND_CLASS: &str = "rpcbind";

const EXPORTFS_COMMAND: &str = "exportfs -ra";
const EXPORTFS_PATH: &str = "/bin:/usr/bin:/sbin:/usr/sbin";

/// The exports file declared in server mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportsFile {
    pub path: String,
    pub owner: String,
    pub group: String,
    pub mode: String,
}

/// Effective NFS configuration after defaults and overrides are merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NfsConfig {
    pub facts: PlatformFacts,
    pub packages: Vec<String>,
    pub service_name: Option<String>,
    pub service_ensure: ServiceEnsure,
    pub service_enable: bool,
    pub server: bool,
    pub exports: ExportsFile,
    pub include_rpcbind: bool,
    pub include_idmap: bool,
}

impl NfsConfig {
    /// Merge platform defaults with explicit parameters
    ///
    /// Violations are recorded in `validator`; the returned config must not
    /// be used unless the validator finishes cleanly.
    pub fn build(
        facts: &PlatformFacts,
        defaults: &ResolvedDefaults,
        params: &NfsParams,
        validator: &mut Validator,
    ) -> Self {
        let packages = match &params.nfs_package {
            Some(explicit) => {
                let values = explicit.values();
                validator.non_empty_list("nfs_package", &values);
                values
            }
            None => defaults.nfs_package.clone(),
        };
        for package in &packages {
            validator.non_empty("nfs_package", package);
        }
        if let Some(name) = &params.nfs_service {
            validator.non_empty("nfs_service", name);
        }
        let explicit_ensure = params
            .nfs_service_ensure
            .as_deref()
            .and_then(|ensure| validator.service_ensure("nfs_service_ensure", ensure));

        if let Some(path) = &params.exports_path {
            validator.absolute_path("exports_path", path);
        }
        if let Some(owner) = &params.exports_owner {
            validator.non_empty("exports_owner", owner);
        }
        if let Some(group) = &params.exports_group {
            validator.non_empty("exports_group", group);
        }
        if let Some(mode) = &params.exports_mode {
            validator.filemode("exports_mode", mode);
        }

        Self {
            facts: facts.clone(),
            packages,
            service_name: defaults
                .nfs_service_name
                .clone()
                .or_override(params.nfs_service.clone()),
            service_ensure: explicit_ensure.unwrap_or(defaults.nfs_service_ensure),
            service_enable: params.nfs_service_enable.unwrap_or(defaults.nfs_service_enable),
            server: params.server.unwrap_or(false),
            exports: ExportsFile {
                path: params
                    .exports_path
                    .clone()
                    .unwrap_or_else(|| "/etc/exports".to_string()),
                owner: params
                    .exports_owner
                    .clone()
                    .unwrap_or_else(|| "root".to_string()),
                group: params
                    .exports_group
                    .clone()
                    .unwrap_or_else(|| "root".to_string()),
                mode: params
                    .exports_mode
                    .clone()
                    .unwrap_or_else(|| "0644".to_string()),
            },
            include_rpcbind: params.include_rpcbind.unwrap_or(defaults.include_rpcbind),
            include_idmap: params.include_idmap.unwrap_or(defaults.include_idmap),
        }
    }

    /// Server mode is only available where exports can be managed
    pub fn check_platform(&self) -> Result<()> {
        if self.server && !self.facts.is_redhat() {
            return Err(Error::UnsupportedPlatform {
                family: self.facts.family.to_string(),
            });
        }
        Ok(())
    }

    /// Add the module's declarations to `catalog`
    pub fn declare(&self, catalog: &mut Catalog) -> Result<()> {
        self.check_platform()?;
        catalog.add(Class::new(CLASS))?;

        for package in &self.packages {
            catalog.add(Package::new(package))?;
        }

        if let Some(name) = &self.service_name {
            let service = self.packages.iter().fold(
                Service::new(NFS_SERVICE, name, self.service_ensure)
                    .enable(self.service_enable)
                    .status_and_restart(true, true),
                |service, package| service.subscribe(ResourceRef::package(package.as_str())),
            );
            catalog.add(service)?;
        } else {
            log::debug!("No nfs service is known for {}", self.facts);
        }

        if self.server {
            log::debug!("Declaring exports at {}", self.exports.path);
            catalog.add(
                File::new(NFS_EXPORTS, &self.exports.path)
                    .ownership(&self.exports.owner, &self.exports.group, &self.exports.mode)
                    .notify(ResourceRef::exec(UPDATE_NFS_EXPORTS)),
            )?;
            catalog.add(
                Exec::new(UPDATE_NFS_EXPORTS, EXPORTFS_COMMAND, EXPORTFS_PATH).refreshonly(true),
            )?;
        }

        if self.include_rpcbind {
            catalog.add(Class::new(RPCBIND_CLASS))?;
        }
        Ok(())
    }
}
