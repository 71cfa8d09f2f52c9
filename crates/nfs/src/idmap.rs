//! The ID-mapping submodule: idmap package, `idmapd.conf` and the idmapd service.

use crate::error::{Error, Result};
use crate::facts::PlatformFacts;
use crate::idmapd_conf::{self, RenderedFile};
use crate::params::IdmapParams;
use crate::platform::ResolvedDefaults;
use crate::validate::{TranslationMethod, Validator};
use declarative::{Catalog, Class, File, Package, ResourceRef, Service, ServiceEnsure};
use serde::Serialize;

/// Title of the idmapd configuration file declaration
pub const IDMAPD_CONF: &str = "idmapd_conf";
/// Title of the idmapd service declaration
pub const IDMAPD_SERVICE: &str = "idmapd_service";
/// Class declared for the submodule
pub const CLASS: &str = "nfs::idmap";

pub const DEFAULT_CONF_PATH: &str = "/etc/idmapd.conf";

/// Settings written into `idmapd.conf`, all optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdmapSettings {
    pub verbosity: Option<i64>,
    pub pipefs_directory: Option<String>,
    pub domain: Option<String>,
    pub local_realms: Option<Vec<String>>,
    pub nobody_user: Option<String>,
    pub nobody_group: Option<String>,
    pub translation_method: Option<Vec<TranslationMethod>>,
    pub ldap_server: Option<String>,
    pub ldap_base: Option<Vec<String>>,
}

/// Effective ID-mapping configuration after defaults and overrides are merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdmapConfig {
    pub facts: PlatformFacts,
    pub package: Option<String>,
    pub conf_path: String,
    pub conf_owner: String,
    pub conf_group: String,
    pub conf_mode: String,
    pub service_name: Option<String>,
    pub service_ensure: Option<ServiceEnsure>,
    pub service_enable: bool,
    pub service_hasstatus: bool,
    pub service_hasrestart: bool,
    /// Service parameters were supplied explicitly
    pub service_requested: bool,
    pub settings: IdmapSettings,
}

impl IdmapConfig {
    /// Merge platform defaults with explicit parameters
    ///
    /// Violations are recorded in `validator`; the returned config must not
    /// be used unless the validator finishes cleanly.
    pub fn build(
        facts: &PlatformFacts,
        defaults: &ResolvedDefaults,
        params: &IdmapParams,
        validator: &mut Validator,
    ) -> Self {
        if let Some(package) = &params.idmap_package {
            validator.non_empty("idmap_package", package);
        }
        if let Some(path) = &params.idmapd_conf_path {
            validator.absolute_path("idmapd_conf_path", path);
        }
        if let Some(owner) = &params.idmapd_conf_owner {
            validator.non_empty("idmapd_conf_owner", owner);
        }
        if let Some(group) = &params.idmapd_conf_group {
            validator.non_empty("idmapd_conf_group", group);
        }
        if let Some(mode) = &params.idmapd_conf_mode {
            validator.filemode("idmapd_conf_mode", mode);
        }
        if let Some(name) = &params.idmapd_service_name {
            validator.non_empty("idmapd_service_name", name);
        }
        let explicit_ensure = params
            .idmapd_service_ensure
            .as_deref()
            .and_then(|ensure| validator.service_ensure("idmapd_service_ensure", ensure));

        Self {
            facts: facts.clone(),
            package: defaults
                .idmap_package
                .clone()
                .or_override(params.idmap_package.clone()),
            conf_path: params
                .idmapd_conf_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CONF_PATH.to_string()),
            conf_owner: params
                .idmapd_conf_owner
                .clone()
                .unwrap_or_else(|| "root".to_string()),
            conf_group: params
                .idmapd_conf_group
                .clone()
                .unwrap_or_else(|| "root".to_string()),
            conf_mode: params
                .idmapd_conf_mode
                .clone()
                .unwrap_or_else(|| "0644".to_string()),
            service_name: defaults
                .idmapd_service_name
                .clone()
                .or_override(params.idmapd_service_name.clone()),
            service_ensure: defaults.idmapd_service_ensure.or_override(explicit_ensure),
            service_enable: params.idmapd_service_enable.unwrap_or(true),
            service_hasstatus: params.idmapd_service_hasstatus.unwrap_or(true),
            service_hasrestart: params.idmapd_service_hasrestart.unwrap_or(true),
            service_requested: params.configures_service(),
            settings: settings(defaults, params, validator),
        }
    }

    /// Render `idmapd.conf` for this configuration
    pub fn render(&self) -> RenderedFile {
        idmapd_conf::render(self)
    }

    /// Add the submodule's declarations to `catalog`
    pub fn declare(&self, catalog: &mut Catalog) -> Result<()> {
        catalog.add(Class::new(CLASS))?;

        let package = self.package.as_deref().map(ResourceRef::package);
        match &self.package {
            Some(name) => catalog.add(Package::new(name))?,
            None => log::warn!(
                "No idmap package is known for {}; Package declaration omitted",
                self.facts
            ),
        }

        let rendered = self.render();
        let mut file = File::new(IDMAPD_CONF, &rendered.path)
            .content(rendered.content)
            .ownership(&rendered.owner, &rendered.group, &rendered.mode);
        if let Some(package) = package {
            file = file.require(package);
        }
        catalog.add(file)?;

        self.declare_service(catalog)
    }

    fn declare_service(&self, catalog: &mut Catalog) -> Result<()> {
        if self.facts.is_suse() {
            if self.service_requested {
                log::warn!("idmapd service parameters are ignored on Suse; no service is declared");
            }
            return Ok(());
        }

        let Some(name) = &self.service_name else {
            log::debug!("No idmapd service is known for {}", self.facts);
            return Ok(());
        };

        let ensure = self.service_ensure.ok_or_else(|| Error::MissingResolution {
            field: "idmapd_service_ensure",
            platform: self.facts.to_string(),
        })?;

        catalog.add(
            Service::new(IDMAPD_SERVICE, name, ensure)
                .enable(self.service_enable)
                .status_and_restart(self.service_hasstatus, self.service_hasrestart)
                .subscribe(ResourceRef::file(IDMAPD_CONF)),
        )?;
        Ok(())
    }
}

fn settings(
    defaults: &ResolvedDefaults,
    params: &IdmapParams,
    validator: &mut Validator,
) -> IdmapSettings {
    if let Some(path) = &params.pipefs_directory {
        validator.absolute_path("pipefs_directory", path);
    }
    if let Some(domain) = &params.idmap_domain {
        validator.fqdn("idmap_domain", domain);
    }
    if let Some(server) = &params.ldap_server {
        validator.fqdn("ldap_server", server);
    }
    if let Some(user) = &params.nobody_user {
        validator.non_empty("nobody_user", user);
    }
    if let Some(group) = &params.nobody_group {
        validator.non_empty("nobody_group", group);
    }

    let local_realms = params.local_realms.as_ref().map(|realms| realms.values());
    if let Some(realms) = &local_realms {
        validator.non_empty_list("local_realms", realms);
        for realm in realms {
            validator.fqdn("local_realms", realm);
        }
    }

    let ldap_base = params.ldap_base.as_ref().map(|base| base.values());
    if let Some(bases) = &ldap_base {
        validator.non_empty_list("ldap_base", bases);
        for base in bases {
            validator.non_empty("ldap_base", base);
        }
    }

    let translation_method = params
        .translation_method
        .as_ref()
        .map(|methods| validator.translation_methods("translation_method", &methods.values()));

    IdmapSettings {
        verbosity: params.verbosity,
        pipefs_directory: defaults
            .pipefs_directory
            .clone()
            .or_override(params.pipefs_directory.clone()),
        domain: params.idmap_domain.clone(),
        local_realms,
        nobody_user: params.nobody_user.clone(),
        nobody_group: params.nobody_group.clone(),
        translation_method,
        ldap_server: params.ldap_server.clone(),
        ldap_base,
    }
}
