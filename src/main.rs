use anyhow::Result;
use clap::{Parser, Subcommand};

use spendwise::cli::{
    handle_add_command, handle_backup_command, handle_config_command, handle_list_command,
    handle_report_command, AddArgs, BackupCommands, ConfigArgs, ListArgs, ReportCommands,
};
use spendwise::config::paths::LedgerPaths;
use spendwise::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendwise",
    version,
    about = "Personal expense ledger with budgets, forecasts and anomaly detection",
    long_about = "Spendwise keeps a CSV ledger of expenses and incomes, compares each \
                  month against category budgets, forecasts next month's spend and \
                  flags unusual transactions."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger and the default budget configuration
    Init,

    /// Show or edit the budget configuration
    Config(ConfigArgs),

    /// Record an expense (or an income with --income)
    Add(AddArgs),

    /// List recorded transactions
    #[command(alias = "ls")]
    List(ListArgs),

    /// Analytical reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Backup management
    #[command(subcommand)]
    Backup(BackupCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    spendwise::log::init_logging(cli.verbose);

    let paths = LedgerPaths::new()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Spendwise at: {}", paths.base_dir().display());
            spendwise::storage::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Ledger: {}", paths.ledger_file().display());
            println!("Config: {}", paths.config_file().display());
            println!();
            println!("Run 'spendwise config' to review the monthly budgets.");
        }
        Some(Commands::Config(args)) => {
            let storage = Storage::open(paths)?;
            handle_config_command(&storage, args)?;
        }
        Some(Commands::Add(args)) => {
            let storage = Storage::open(paths)?;
            handle_add_command(&storage, args)?;
        }
        Some(Commands::List(args)) => {
            let storage = Storage::open(paths)?;
            handle_list_command(&storage, args)?;
        }
        Some(Commands::Report(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_report_command(&storage, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, cmd)?;
        }
        None => {
            println!("Spendwise - personal expense ledger");
            println!();
            println!("Run 'spendwise --help' for usage information.");
        }
    }

    Ok(())
}
