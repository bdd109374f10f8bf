//! Configuration CLI command
//!
//! Shows the paths and the budget configuration, and applies edits to it.

use clap::Args;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{find_category, Money, TransactionKind};
use crate::storage::Storage;

/// Arguments for `config`
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Set a monthly budget, e.g. `--set-budget Casa=800` (repeatable)
    #[arg(long, value_name = "CATEGORY=AMOUNT")]
    pub set_budget: Vec<String>,

    /// Remove the monthly budget of a category (repeatable)
    #[arg(long, value_name = "CATEGORY")]
    pub remove_budget: Vec<String>,

    /// Percentage of a budget at which an alert is raised
    #[arg(long)]
    pub alert_threshold: Option<f64>,

    /// Monthly savings target
    #[arg(long)]
    pub savings_target: Option<String>,

    /// Expected monthly income
    #[arg(long)]
    pub income: Option<String>,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        !self.set_budget.is_empty()
            || !self.remove_budget.is_empty()
            || self.alert_threshold.is_some()
            || self.savings_target.is_some()
            || self.income.is_some()
    }
}

/// Handle `config`
pub fn handle_config_command(storage: &Storage, args: ConfigArgs) -> LedgerResult<()> {
    if args.has_changes() {
        let mut config = storage.budget_config()?;

        for entry in &args.set_budget {
            let (category, amount) = parse_budget_entry(entry)?;
            config.set_limit(category, amount);
        }
        for name in &args.remove_budget {
            let category = expense_category(name)?;
            config.monthly_budgets.remove(category);
        }
        if let Some(threshold) = args.alert_threshold {
            config.goals.alert_threshold_pct = threshold;
        }
        if let Some(target) = &args.savings_target {
            config.goals.savings_target = parse_amount(target)?;
        }
        if let Some(income) = &args.income {
            config.monthly_income = parse_amount(income)?;
        }

        storage.update_budget_config(config)?;
        println!("Configuration updated.");
        println!();
    }

    let paths = storage.paths();
    let config = storage.budget_config()?;

    println!("Spendwise Configuration");
    println!("=======================");
    println!("Data directory:   {}", paths.base_dir().display());
    println!("Ledger file:      {}", paths.ledger_file().display());
    println!("Config file:      {}", paths.config_file().display());
    println!("Backup directory: {}", paths.backup_dir().display());
    println!();
    println!("Monthly budgets:");
    for (category, limit) in &config.monthly_budgets {
        println!("  {:<14} {:>10}", category, limit);
    }
    println!("  {:<14} {:>10}", "Total", config.total_budget());
    println!();
    println!("Monthly income:   {}", config.monthly_income);
    println!("Savings target:   {}", config.savings_target());
    println!("Alert threshold:  {}%", config.alert_threshold());

    Ok(())
}

fn parse_budget_entry(entry: &str) -> LedgerResult<(&'static str, Money)> {
    let (name, amount) = entry.split_once('=').ok_or_else(|| {
        LedgerError::Config(format!(
            "Invalid budget entry: '{}'. Use CATEGORY=AMOUNT",
            entry
        ))
    })?;

    Ok((expense_category(name)?, parse_amount(amount)?))
}

fn expense_category(name: &str) -> LedgerResult<&'static str> {
    find_category(TransactionKind::Expense, name)
        .ok_or_else(|| LedgerError::Config(format!("'{}' is not an expense category", name.trim())))
}

fn parse_amount(amount: &str) -> LedgerResult<Money> {
    Money::parse(amount)
        .map_err(|e| LedgerError::Config(format!("Invalid amount '{}': {}", amount, e)))
}
