use anyhow::{bail, Result};
use arp_config::ConfigMode;
use arp_store::Role;
use clap::{Parser, Subcommand};

mod commands;

use commands::balance::{self, ValidateQtyArgs};
use commands::import::{self, ImportArgs};

#[derive(Parser)]
#[command(name = "arp")]
#[command(about = "Price-registration (ARP) balance ledger and catalog import", long_about = None)]
struct Cli {
    /// Snapshot JSON file. Falls back to /store/path in config, then ./arp.json.
    #[arg(long, global = true, env = "ARP_SNAPSHOT")]
    snapshot: Option<String>,

    /// Layered config paths in merge order (repeatable).
    #[arg(long = "config", global = true, env = "ARP_CONFIG", value_delimiter = ',')]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the per-item balance of one lot for an allocation class
    Balance {
        #[arg(long)]
        contract: String,
        #[arg(long)]
        lot: String,
        /// PARTICIPANT | PIGGYBACK
        #[arg(long)]
        class: Option<String>,
        /// Resolve the class from this client's participation instead
        #[arg(long)]
        client: Option<String>,
    },

    /// Check a proposed quantity against the remaining balance and caps
    ValidateQty {
        #[arg(long)]
        contract: String,
        #[arg(long)]
        item: String,
        #[arg(long)]
        qty: f64,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        client: Option<String>,
        /// Opportunity under edit; its own lines are not counted as consumed
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Run the commit gate over every line of an opportunity
    CheckOpportunity {
        #[arg(long)]
        opportunity: String,
    },

    /// Change an opportunity's status (WON is refused while any line is in violation)
    SetStatus {
        #[arg(long)]
        opportunity: String,
        /// OPEN | WON | LOST
        #[arg(long)]
        status: String,
    },

    /// Decode a delimited file and merge it into a lot's catalog
    Import {
        #[arg(long)]
        contract: String,
        #[arg(long)]
        lot: String,
        #[arg(long)]
        file: String,
        /// ADMIN | OPERATOR. Applying requires ADMIN.
        #[arg(long, default_value = "OPERATOR")]
        role: String,
        /// UPSERT | INSERT_ONLY | REPLACE_ALL (overrides /import/policy)
        #[arg(long)]
        policy: Option<String>,
        /// Block the batch on any row error
        #[arg(long, default_value_t = false)]
        strict: bool,
        /// Decode and report counters without persisting
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Write row errors as Linha;Campo;Motivo CSV to this path
        #[arg(long)]
        error_report: Option<String>,
    },

    /// Write the import template CSV
    Template {
        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    // Dev-time convenience; absent file is fine.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let snapshot = cli.snapshot.as_deref();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = arp_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Balance {
            contract,
            lot,
            class,
            client,
        } => {
            let config = commands::load_config(&cli.config_paths, ConfigMode::Balance)?;
            let store = commands::open_store(snapshot, &config)?;
            balance::run_balance(&store, &contract, &lot, class.as_deref(), client.as_deref())?;
        }

        Commands::ValidateQty {
            contract,
            item,
            qty,
            class,
            client,
            exclude,
        } => {
            let config = commands::load_config(&cli.config_paths, ConfigMode::Balance)?;
            let store = commands::open_store(snapshot, &config)?;
            balance::run_validate_qty(
                &store,
                ValidateQtyArgs {
                    contract: &contract,
                    item: &item,
                    qty,
                    class: class.as_deref(),
                    client: client.as_deref(),
                    exclude: exclude.as_deref(),
                },
            )?;
        }

        Commands::CheckOpportunity { opportunity } => {
            let config = commands::load_config(&cli.config_paths, ConfigMode::Balance)?;
            let store = commands::open_store(snapshot, &config)?;
            balance::run_check_opportunity(&store, &opportunity)?;
        }

        Commands::SetStatus {
            opportunity,
            status,
        } => {
            let config = commands::load_config(&cli.config_paths, ConfigMode::Balance)?;
            let mut store = commands::open_store(snapshot, &config)?;
            balance::run_set_status(&mut store, &opportunity, &status)?;
        }

        Commands::Import {
            contract,
            lot,
            file,
            role,
            policy,
            strict,
            dry_run,
            error_report,
        } => {
            let Some(role) = Role::parse(&role) else {
                bail!("invalid --role '{role}'. expected one of: ADMIN | OPERATOR");
            };
            let config = commands::load_config(&cli.config_paths, ConfigMode::Import)?;
            let mut store = commands::open_store(snapshot, &config)?;
            import::run_import(
                &mut store,
                &config,
                ImportArgs {
                    contract: &contract,
                    lot: &lot,
                    file: &file,
                    role,
                    policy: policy.as_deref(),
                    strict,
                    dry_run,
                    error_report: error_report.as_deref(),
                },
            )?;
        }

        Commands::Template { out } => import::run_template(out.as_deref())?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays `key=value` lines.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
