use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "nfsdecl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declare NFS and idmapd state from platform facts", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show platform defaults for the node's facts
    Resolve(NodeArgs),

    /// Print the rendered idmapd.conf
    Render(NodeArgs),

    /// Print every declaration of the node
    Catalog(CatalogArgs),

    /// Print declarations in the order they must be applied
    Order(NodeArgs),

    /// Compare the catalogs of two node files
    Diff(DiffArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared arguments
// ============================================================================

/// Where a node's facts and parameters come from
#[derive(Args, Clone, Default)]
pub struct NodeArgs {
    /// Node file (TOML or JSON), defaults to ~/.config/nfsdecl/node.toml
    #[arg(short, long, env = "NFSDECL_CONFIG")]
    pub config: Option<String>,

    /// Operating-system family, overrides the node file (RedHat, Suse, ...)
    #[arg(long)]
    pub family: Option<String>,

    /// Major release, overrides the node file (e.g. 7 or 8.6)
    #[arg(long)]
    pub release: Option<String>,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Only show matching declarations (e.g. package, service.idmapd_service)
    #[arg(short, long)]
    pub target: Option<String>,
}

// ============================================================================
// Diff
// ============================================================================

#[derive(Args)]
pub struct DiffArgs {
    /// Node file describing the current state
    #[arg(long)]
    pub from: String,

    /// Node file describing the desired state
    #[arg(long)]
    pub to: String,

    /// Only compare matching declarations (e.g. file, service.idmapd_service)
    #[arg(short, long)]
    pub target: Option<String>,
}
