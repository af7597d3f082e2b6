use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "slurmgcp",
    about = "slurmgcp: inspect node names, hostlists, job records, and cluster config",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress or expand scheduler hostlists
    Hostlist {
        #[command(subcommand)]
        action: HostlistAction,
    },
    /// Decompose node names
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Parse scheduler job records
    Job {
        #[command(subcommand)]
        action: JobAction,
    },
    /// Parse a raw Compute Engine record from a JSON file and print it
    Describe {
        /// Record kind
        kind: RecordKind,
        /// Path to the JSON record
        file: String,
    },
    /// Inspect nodesets of a cluster config
    Nodeset {
        #[command(subcommand)]
        action: NodesetAction,
    },
}

#[derive(Subcommand)]
enum HostlistAction {
    /// Fold node names into a hostlist
    Compress {
        /// Node names, individually or comma-separated
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Expand a hostlist into one node name per line
    Expand { hostlist: String },
}

#[derive(Subcommand)]
enum NodeAction {
    /// Print the cluster, nodeset, and node parts of a name as JSON
    Desc { name: String },
    /// Print the numeric index of a node
    Index { name: String },
}

#[derive(Subcommand)]
enum JobAction {
    /// Read one job record from stdin and print it as JSON
    Parse,
}

#[derive(Subcommand)]
enum NodesetAction {
    /// List nodesets with their kind and node hostlist
    List {
        /// Path to the cluster config
        #[arg(short, long)]
        config: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    MachineType,
    InstanceStatus,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("slurmgcp=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hostlist { action } => match action {
            HostlistAction::Compress { names } => commands::hostlist::compress(&names),
            HostlistAction::Expand { hostlist } => commands::hostlist::expand(&hostlist),
        },
        Commands::Node { action } => match action {
            NodeAction::Desc { name } => commands::node::desc(&name),
            NodeAction::Index { name } => commands::node::index(&name),
        },
        Commands::Job { action } => match action {
            JobAction::Parse => commands::job::parse_stdin(),
        },
        Commands::Describe { kind, file } => match kind {
            RecordKind::MachineType => commands::describe::machine_type(&file),
            RecordKind::InstanceStatus => commands::describe::instance_status(&file),
        },
        Commands::Nodeset { action } => match action {
            NodesetAction::List { config, format } => commands::nodeset::list(&config, &format),
        },
    }
}
