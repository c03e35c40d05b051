use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use checkwriter::cli::{
    handle_batch_command, handle_ledger_command, handle_print_check, handle_transaction_command,
    BatchArgs, LedgerCommands, PrintCheckArgs, TransactionCommands,
};
use checkwriter::config::{CheckwriterPaths, Settings};
use checkwriter::storage::Storage;

#[derive(Parser)]
#[command(
    name = "checkwriter",
    version,
    about = "Check printing with reconciled, derived ledger balances",
    long_about = "checkwriter prints checks and records them against named ledgers. \
                  Balances are never stored; they are derived from each ledger's \
                  starting balance plus its committed transactions, and a check is \
                  only recorded after its print is confirmed."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ledger management commands
    #[command(subcommand)]
    Ledger(LedgerCommands),

    /// Transaction register commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Print and record a single check
    Print(PrintCheckArgs),

    /// Run a queue file through print-and-record
    Batch(BatchArgs),

    /// Initialize the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config {
        /// Also show recent audit log entries
        #[arg(long)]
        audit: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = CheckwriterPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    let storage = Arc::new(storage);

    match cli.command {
        Some(Commands::Ledger(cmd)) => {
            handle_ledger_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Print(args)) => {
            handle_print_check(storage.clone(), &paths, &mut settings, args).await?;
        }
        Some(Commands::Batch(args)) => {
            handle_batch_command(storage.clone(), &paths, &mut settings, args).await?;
        }
        Some(Commands::Init) => {
            println!("Initializing checkwriter at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete.");
            println!();
            println!("Create a ledger with 'checkwriter ledger create <name> --balance <amount>'.");
            println!("Print a check with 'checkwriter print <ledger> <payee> <amount>'.");
        }
        Some(Commands::Config { audit }) => {
            println!("checkwriter configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Print mode:        {:?}", settings.print_mode);
            println!("  Commit mode:       {:?}", settings.commit_mode);
            println!("  Auto numbering:    {}", settings.auto_number);
            println!("  Next check number: {}", settings.next_check_number);
            println!("  Profile:           {}", settings.profile);

            if audit {
                let entries = storage.audit().read_all()?;
                println!();
                println!("Recent audit entries:");
                for entry in entries.iter().rev().take(10) {
                    println!(
                        "  {} {} {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.operation,
                        entry.summary
                    );
                }
            }
        }
        None => {
            println!("checkwriter - check printing with derived ledger balances");
            println!();
            println!("Run 'checkwriter --help' for usage information.");
            println!("Run 'checkwriter init' to set up the data directory.");
        }
    }

    Ok(())
}
