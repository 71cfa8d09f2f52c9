use anyhow::{Context, Result, bail};
use nfs::{FactsRecord, IdmapParams, NfsParams, NodeParams, PlatformFacts};
use serde::{Deserialize, Serialize};

use crate::cli::NodeArgs;

// ============================================================================
// Node File Schema
// ============================================================================

/// A node file: the host's facts plus the parameters set for it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Facts of the managed host, may be supplied on the command line instead
    #[serde(default)]
    pub facts: Option<FactsRecord>,

    /// Top-level NFS parameters
    #[serde(default)]
    pub nfs: NfsParams,

    /// ID-mapping parameters
    #[serde(default)]
    pub idmap: IdmapParams,
}

impl NodeConfig {
    pub fn params(&self) -> NodeParams {
        NodeParams {
            nfs: self.nfs.clone(),
            idmap: self.idmap.clone(),
        }
    }

    /// Facts from the node file, with command-line values taking precedence
    pub fn facts(&self, args: &NodeArgs) -> Result<PlatformFacts> {
        let facts = match (&args.family, &args.release, &self.facts) {
            (Some(family), Some(release), _) => PlatformFacts::parse(family, release)?,
            (family, release, Some(record)) => {
                let mut facts = PlatformFacts::try_from(record.clone())
                    .context("Invalid [facts] in node file")?;
                if let Some(family) = family {
                    facts.family = nfs::OsFamily::from(family.clone());
                }
                if let Some(release) = release {
                    facts.major_release = PlatformFacts::parse(facts.family.as_str(), release)?
                        .major_release;
                }
                facts
            }
            _ => bail!(
                "No facts given: add a [facts] table to the node file or pass --family and --release"
            ),
        };
        log::debug!("Evaluating for {facts}");
        Ok(facts)
    }
}

// ============================================================================
// Tests
// ============================================================================
