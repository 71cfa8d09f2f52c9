//! Rendering of `/etc/idmapd.conf`.
//!
//! The output is a fixed skeleton. Settings that are supplied are written as
//! `Key = Value` lines; settings that are not are left as commented defaults,
//! so an unconfigured node gets the stock file.

use crate::idmap::IdmapConfig;
use serde::Serialize;

const HEADER: &str = "\
# This file is being maintained by nfsdecl.
# DO NOT EDIT
";

const DOMAIN_COMMENT: &str = "\
# The following should be set to the local NFSv4 domain name
# The default is the host's DNS domain name.
";

const LOCAL_REALMS_COMMENT: &str = "\
# The following is a comma-separated list of Kerberos realm
# names that should be considered to be equivalent to the
# local realm, such as <REALM1>,<REALM2>
";

const METHOD_COMMENT: &str = "\
# Translation Method is a comma-separated, ordered list of
# translation methods that can be used. Distributed methods
# include \"nsswitch\", \"umich_ldap\", and \"static\".
";

const LDAP_COMMENT: &str = "\
# The server and search base used by the umich_ldap method
";

/// File content plus the metadata it is declared with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
    pub path: String,
    pub owner: String,
    pub group: String,
    pub mode: String,
    pub content: String,
}

/// Render the configuration file for `config`
pub fn render(config: &IdmapConfig) -> RenderedFile {
    let settings = &config.settings;
    let mut out = String::from(HEADER);

    out.push_str("\n[General]\n\n");
    setting(
        &mut out,
        "Verbosity",
        settings.verbosity.map(|v| v.to_string()),
        "0",
    );
    setting(
        &mut out,
        "Pipefs-Directory",
        settings.pipefs_directory.clone(),
        "/var/lib/nfs/rpc_pipefs",
    );
    out.push('\n');
    out.push_str(DOMAIN_COMMENT);
    setting(&mut out, "Domain", settings.domain.clone(), "local.domain.edu");
    out.push('\n');
    out.push_str(LOCAL_REALMS_COMMENT);
    // Written commented out even when set; idmapd only honours it once uncommented.
    if let Some(realms) = &settings.local_realms {
        let realms: Vec<String> = realms.iter().map(|r| r.to_uppercase()).collect();
        out.push_str(&format!("#Local-Realms = {}\n", realms.join(",")));
    }

    out.push_str("\n[Mapping]\n\n");
    setting(&mut out, "Nobody-User", settings.nobody_user.clone(), "nobody");
    setting(&mut out, "Nobody-Group", settings.nobody_group.clone(), "nobody");

    out.push_str("\n[Translation]\n\n");
    out.push_str(METHOD_COMMENT);
    let methods = settings.translation_method.as_ref().map(|methods| {
        methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",")
    });
    setting(&mut out, "Method", methods, "nsswitch");

    out.push_str("\n[UMICH_SCHEMA]\n\n");
    out.push_str(LDAP_COMMENT);
    setting(
        &mut out,
        "LDAP_server",
        settings.ldap_server.clone(),
        "ldap.domain.edu",
    );
    setting(
        &mut out,
        "LDAP_base",
        settings.ldap_base.as_ref().map(|base| base.join(",")),
        "dc=local,dc=domain,dc=edu",
    );

    RenderedFile {
        path: config.conf_path.clone(),
        owner: config.conf_owner.clone(),
        group: config.conf_group.clone(),
        mode: config.conf_mode.clone(),
        content: out,
    }
}

fn setting(out: &mut String, key: &str, value: Option<String>, placeholder: &str) {
    match value {
        Some(value) => out.push_str(&format!("{key} = {value}\n")),
        None => out.push_str(&format!("#{key} = {placeholder}\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{OsFamily, PlatformFacts};
    use crate::params::{IdmapParams, OneOrMany};
    use crate::platform::resolve;
    use crate::validate::Validator;

    const REDHAT_BASELINE: &str = include_str!("../fixtures/idmapd_conf.RedHat");
    const SUSE_BASELINE: &str = include_str!("../fixtures/idmapd_conf.Suse");

    fn config(family: OsFamily, major: u32, params: &IdmapParams) -> IdmapConfig {
        let facts = PlatformFacts::new(family, major);
        let mut validator = Validator::new();
        let config = IdmapConfig::build(&facts, &resolve(&facts), params, &mut validator);
        validator.finish().unwrap();
        config
    }

    fn rendered(params: &IdmapParams) -> String {
        render(&config(OsFamily::RedHat, 7, params)).content
    }

    #[test]
    fn test_redhat_baseline() {
        for major in [6, 7, 8, 9] {
            let file = render(&config(OsFamily::RedHat, major, &IdmapParams::default()));
            assert_eq!(file.content, REDHAT_BASELINE, "RedHat {major}");
        }
    }

    #[test]
    fn test_suse_baseline() {
        let file = render(&config(OsFamily::Suse, 12, &IdmapParams::default()));
        assert_eq!(file.content, SUSE_BASELINE);
    }

    #[test]
    fn test_default_metadata() {
        let file = render(&config(OsFamily::RedHat, 8, &IdmapParams::default()));
        assert_eq!(file.path, "/etc/idmapd.conf");
        assert_eq!(file.owner, "root");
        assert_eq!(file.group, "root");
        assert_eq!(file.mode, "0644");
    }

    #[test]
    fn test_render_is_deterministic() {
        let params = IdmapParams {
            idmap_domain: Some("example.com".to_string()),
            local_realms: Some(OneOrMany::from(vec!["a.example.com", "b.example.com"])),
            ..IdmapParams::default()
        };
        let config = config(OsFamily::RedHat, 7, &params);
        assert_eq!(render(&config), render(&config));
    }

    #[test]
    fn test_general_settings() {
        let content = rendered(&IdmapParams {
            verbosity: Some(5),
            pipefs_directory: Some("/run/rpc_pipefs".to_string()),
            idmap_domain: Some("example.com".to_string()),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nVerbosity = 5\n"));
        assert!(content.contains("\nPipefs-Directory = /run/rpc_pipefs\n"));
        assert!(content.contains("\nDomain = example.com\n"));
        assert!(!content.contains("#Domain"));
    }

    #[test]
    fn test_local_realms_stay_commented_and_uppercased() {
        let content = rendered(&IdmapParams {
            local_realms: Some(OneOrMany::from(vec!["realm1.test.local", "realm2.test.local"])),
            ..IdmapParams::default()
        });
        assert!(content.contains("\n#Local-Realms = REALM1.TEST.LOCAL,REALM2.TEST.LOCAL\n"));
        assert!(!content.contains("\nLocal-Realms"));

        let content = rendered(&IdmapParams {
            local_realms: Some(OneOrMany::from("realm.test.local")),
            ..IdmapParams::default()
        });
        assert!(content.contains("\n#Local-Realms = REALM.TEST.LOCAL\n"));
    }

    #[test]
    fn test_mapping_settings() {
        let content = rendered(&IdmapParams {
            nobody_user: Some("nfsnobody".to_string()),
            nobody_group: Some("nfsnobody".to_string()),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nNobody-User = nfsnobody\nNobody-Group = nfsnobody\n"));
    }

    #[test]
    fn test_translation_methods_join_in_order() {
        let content = rendered(&IdmapParams {
            translation_method: Some(OneOrMany::from(vec!["umich_ldap", "nsswitch", "static"])),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nMethod = umich_ldap,nsswitch,static\n"));

        let content = rendered(&IdmapParams {
            translation_method: Some(OneOrMany::from("static")),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nMethod = static\n"));
    }

    #[test]
    fn test_ldap_settings() {
        let content = rendered(&IdmapParams {
            ldap_server: Some("ldap.test.local".to_string()),
            ldap_base: Some(OneOrMany::from(vec!["dc=local,dc=test1", "dc=local,dc=test2"])),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nLDAP_server = ldap.test.local\n"));
        assert!(content.contains("\nLDAP_base = dc=local,dc=test1,dc=local,dc=test2\n"));

        let content = rendered(&IdmapParams {
            ldap_base: Some(OneOrMany::from("dc=Local,dc=Test")),
            ..IdmapParams::default()
        });
        assert!(content.contains("\nLDAP_base = dc=Local,dc=Test\n"));
    }

    #[test]
    fn test_metadata_overrides() {
        let file = render(&config(
            OsFamily::Suse,
            15,
            &IdmapParams {
                idmapd_conf_path: Some("/etc/idmapd-custom.conf".to_string()),
                idmapd_conf_owner: Some("nfs".to_string()),
                idmapd_conf_group: Some("wheel".to_string()),
                idmapd_conf_mode: Some("0600".to_string()),
                ..IdmapParams::default()
            },
        ));
        assert_eq!(file.path, "/etc/idmapd-custom.conf");
        assert_eq!(file.owner, "nfs");
        assert_eq!(file.group, "wheel");
        assert_eq!(file.mode, "0600");
        assert_eq!(file.content, SUSE_BASELINE);
    }
}
