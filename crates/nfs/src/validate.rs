//! Parameter validation.
//!
//! Constraints are checked while the effective configuration is built. A
//! [`Validator`] records every violation instead of stopping at the first one,
//! so a single run reports everything the caller has to fix.

use declarative::ServiceEnsure;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static FQDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)*([A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9\-]*[A-Za-z0-9])$",
    )
    .expect("FQDN pattern compiles")
});

static FILEMODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0124][0-7]{3}$").expect("filemode pattern compiles"));

static ABSOLUTE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([^/\x00]+/*)*$").expect("path pattern compiles"));

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Parameter name
    pub field: String,
    /// What is wrong with the supplied value
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// ID-mapping translation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    Nsswitch,
    UmichLdap,
    Static,
}

impl TranslationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nsswitch => "nsswitch",
            Self::UmichLdap => "umich_ldap",
            Self::Static => "static",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "nsswitch" => Some(Self::Nsswitch),
            "umich_ldap" => Some(Self::UmichLdap),
            "static" => Some(Self::Static),
            _ => None,
        }
    }
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects violations while parameters are checked
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn absolute_path(&mut self, field: &str, value: &str) {
        if !ABSOLUTE_PATH.is_match(value) {
            self.push(field, format!("'{value}' is not an absolute path"));
        }
    }

    pub fn fqdn(&mut self, field: &str, value: &str) {
        if !FQDN.is_match(value) {
            self.push(field, format!("'{value}' is not a fully qualified domain name"));
        }
    }

    pub fn filemode(&mut self, field: &str, value: &str) {
        if !FILEMODE.is_match(value) {
            self.push(
                field,
                format!("'{value}' is not a four digit octal file mode, e.g. 0644"),
            );
        }
    }

    pub fn non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    /// A list parameter, when given, must carry at least one entry
    pub fn non_empty_list(&mut self, field: &str, values: &[String]) {
        if values.is_empty() {
            self.push(field, "must not be an empty list");
        }
    }

    pub fn service_ensure(&mut self, field: &str, value: &str) -> Option<ServiceEnsure> {
        match value.parse::<ServiceEnsure>() {
            Ok(ensure) => Some(ensure),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    /// Check every entry against the known methods, keeping input order
    pub fn translation_methods(
        &mut self,
        field: &str,
        values: &[String],
    ) -> Vec<TranslationMethod> {
        if values.is_empty() {
            self.push(field, "must name at least one method");
        }
        values
            .iter()
            .filter_map(|value| {
                let method = TranslationMethod::parse(value);
                if method.is_none() {
                    self.push(
                        field,
                        format!(
                            "expects one of 'nsswitch', 'umich_ldap', 'static', got '{value}'"
                        ),
                    );
                }
                method
            })
            .collect()
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn() {
        let mut v = Validator::new();
        for ok in ["example.com", "realm1.test.local", "localhost", "a-b.c0"] {
            v.fqdn("idmap_domain", ok);
        }
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        for bad in ["-bad.com", "trailing.", "under_score.com", "has space", ""] {
            v.fqdn("idmap_domain", bad);
        }
        assert_eq!(v.finish().unwrap_err().len(), 5);
    }

    #[test]
    fn test_filemode() {
        let mut v = Validator::new();
        for ok in ["0644", "0755", "1777", "4755", "2750"] {
            v.filemode("idmapd_conf_mode", ok);
        }
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        for bad in ["644", "0844", "3755", "06440", "rw-r--r--"] {
            v.filemode("idmapd_conf_mode", bad);
        }
        assert_eq!(v.finish().unwrap_err().len(), 5);
    }

    #[test]
    fn test_absolute_path() {
        let mut v = Validator::new();
        v.absolute_path("idmapd_conf_path", "/etc/idmapd.conf");
        v.absolute_path("pipefs_directory", "/var/lib/nfs/rpc_pipefs/");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.absolute_path("idmapd_conf_path", "etc/idmapd.conf");
        v.absolute_path("idmapd_conf_path", "");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.to_string().contains("is not an absolute path"));
    }

    #[test]
    fn test_translation_methods_keep_order() {
        let mut v = Validator::new();
        let methods = v.translation_methods(
            "translation_method",
            &["static".to_string(), "nsswitch".to_string()],
        );
        assert_eq!(methods, vec![TranslationMethod::Static, TranslationMethod::Nsswitch]);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_translation_methods_reject_unknown() {
        let mut v = Validator::new();
        v.translation_methods(
            "translation_method",
            &["nsswitch".to_string(), "ldap".to_string()],
        );
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.to_string().contains("got 'ldap'"));
    }

    #[test]
    fn test_non_empty_list() {
        let mut v = Validator::new();
        v.non_empty_list("ldap_base", &["dc=local".to_string()]);
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.non_empty_list("ldap_base", &[]);
        let errors = v.finish().unwrap_err();
        assert!(errors.mentions("ldap_base"));
        assert_eq!(errors.to_string(), "ldap_base: must not be an empty list");
    }

    #[test]
    fn test_service_ensure() {
        let mut v = Validator::new();
        assert_eq!(
            v.service_ensure("idmapd_service_ensure", "running"),
            Some(ServiceEnsure::Running)
        );
        assert_eq!(v.service_ensure("idmapd_service_ensure", "started"), None);
        let errors = v.finish().unwrap_err();
        assert!(errors.mentions("idmapd_service_ensure"));
    }

    #[test]
    fn test_errors_are_collected_together() {
        let mut v = Validator::new();
        v.non_empty("nobody_user", "");
        v.fqdn("ldap_server", "not a host");
        v.filemode("idmapd_conf_mode", "999");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.to_string().matches("; ").count(),
            2,
            "violations are joined with '; '"
        );
        assert!(errors.to_string().starts_with("nobody_user: must not be empty"));
    }
}
