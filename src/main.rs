/// Version injected at compile time via KUBEGATE_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("KUBEGATE_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use kubegate::cache::{CacheCoordinator, CacheSyncer};
use kubegate::cluster::auth::ClusterCredentials;
use kubegate::cluster::client::ClusterClient;
use kubegate::config::Config;
use kubegate::resource::all_kinds;
use kubegate::{DeleteOptions, ObjectEnvelope, PropagationPolicy, ResourceHandler, TypedObject};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

/// Command line client for a cluster control plane
#[derive(Parser, Debug)]
#[command(name = "kubegate", version = VERSION, about, long_about = None)]
struct Args {
    /// API server base URL
    #[arg(short, long)]
    server: Option<String>,

    /// Bearer token for the API server
    #[arg(long)]
    token: Option<String>,

    /// Namespace for namespaced kinds
    #[arg(short, long)]
    namespace: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the kinds the registry supports
    Kinds,
    /// Get one cached object by name
    Get { kind: String, name: String },
    /// List cached objects, optionally filtered by a label selector
    List {
        kind: String,
        /// Label selector, e.g. 'app=web,env in (prod, staging)'
        #[arg(short = 'l', long, default_value = "")]
        selector: String,
    },
    /// Create an object from a JSON file ('-' for stdin)
    Create {
        kind: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a named object from a JSON file ('-' for stdin)
    Update {
        kind: String,
        name: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a named object
    Delete {
        kind: String,
        name: String,
        /// Seconds the store should wait before forcing termination
        #[arg(long)]
        grace_period: Option<i64>,
        /// How dependents are collected
        #[arg(long, value_enum)]
        propagation: Option<PropagationArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PropagationArg {
    Orphan,
    Background,
    Foreground,
}

impl From<PropagationArg> for PropagationPolicy {
    fn from(arg: PropagationArg) -> Self {
        match arg {
            PropagationArg::Orphan => PropagationPolicy::Orphan,
            PropagationArg::Background => PropagationPolicy::Background,
            PropagationArg::Foreground => PropagationPolicy::Foreground,
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    // Diagnostics go to stderr so stdout stays clean JSON
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("kubegate {} started with log level: {:?}", VERSION, level);

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = setup_logging(args.log_level);

    if let Command::Kinds = args.command {
        for kind in all_kinds() {
            println!("{kind}");
        }
        return Ok(());
    }

    let config = Config::load();
    let server = args.server.unwrap_or_else(|| config.effective_server());
    let namespace = args
        .namespace
        .unwrap_or_else(|| config.effective_namespace());
    let credentials = match args.token {
        Some(token) => ClusterCredentials::with_token(token),
        None => config.credentials(),
    };

    let client = Arc::new(
        ClusterClient::new(&server, credentials)
            .with_context(|| format!("Failed to create client for {server}"))?,
    );
    let coordinator = Arc::new(CacheCoordinator::new());
    let handler = ResourceHandler::new(client.clone(), coordinator.clone());

    match args.command {
        Command::Kinds => unreachable!("handled above"),
        Command::Get { kind, name } => {
            warm_cache(&handler, &client, &coordinator, &kind).await?;
            let object = handler.get(&kind, &namespace, &name)?;
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        Command::List { kind, selector } => {
            warm_cache(&handler, &client, &coordinator, &kind).await?;
            let objects = handler.list(&kind, &namespace, &selector)?;
            print_table(&objects);
        }
        Command::Create { kind, file } => {
            let envelope = ObjectEnvelope::new(read_payload(&file)?);
            let response = handler.create(&kind, &namespace, &envelope).await?;
            print_envelope(&response);
        }
        Command::Update { kind, name, file } => {
            let envelope = ObjectEnvelope::new(read_payload(&file)?);
            let response = handler.update(&kind, &namespace, &name, &envelope).await?;
            print_envelope(&response);
        }
        Command::Delete {
            kind,
            name,
            grace_period,
            propagation,
        } => {
            let options = DeleteOptions {
                grace_period_seconds: grace_period,
                propagation_policy: propagation.map(Into::into),
                ..Default::default()
            };
            handler.delete(&kind, &namespace, &name, &options).await?;
            println!("{kind} {name:?} deleted");
        }
    }

    Ok(())
}

/// Register the kind's resource and run one relist so reads have data
async fn warm_cache(
    handler: &ResourceHandler,
    client: &Arc<ClusterClient>,
    coordinator: &Arc<CacheCoordinator>,
    kind: &str,
) -> Result<()> {
    let descriptor = handler.resolve(kind)?;
    coordinator.register(descriptor.gvr.clone());

    let syncer = CacheSyncer::new(client.clone(), coordinator.clone());
    if syncer.sync_once().await == 0 {
        anyhow::bail!("Failed to sync cache for kind {kind}");
    }
    Ok(())
}

/// Read a mutation payload from a file, or stdin for '-'
fn read_payload(file: &PathBuf) -> Result<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut payload = Vec::new();
        std::io::stdin()
            .read_to_end(&mut payload)
            .context("Failed to read object from stdin")?;
        Ok(payload)
    } else {
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))
    }
}

fn print_envelope(envelope: &ObjectEnvelope) {
    match envelope.to_value() {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", String::from_utf8_lossy(envelope.as_bytes())),
        },
        Err(_) => println!("{}", String::from_utf8_lossy(envelope.as_bytes())),
    }
}

fn print_table(objects: &[TypedObject]) {
    println!("{:<20} {:<40} {:<8}", "NAMESPACE", "NAME", "AGE");
    for object in objects {
        println!(
            "{:<20} {:<40} {:<8}",
            object.namespace().unwrap_or("-"),
            object.name(),
            format_age(object.metadata.creation_timestamp),
        );
    }
}

/// Compact age like "4d", "7h", "25m", "30s"
fn format_age(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return "-".to_string();
    };
    let elapsed = Utc::now().signed_duration_since(timestamp);
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds().max(0))
    }
}
