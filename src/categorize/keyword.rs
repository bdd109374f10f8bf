//! Keyword-based categorization
//!
//! Deterministic rules: the first category whose keyword list has a match
//! anywhere in the lowercased description wins.

use crate::error::LedgerResult;
use crate::models::{default_category, TransactionKind};

use super::Categorizer;

const EXPENSE_RULES: &[(&str, &[&str])] = &[
    ("Trasporti", &["benzina", "treno", "bus", "taxi", "parcheggio", "auto"]),
    ("Alimentari", &["supermercato", "spesa", "pane", "latte", "coop", "lidl"]),
    ("Ristorazione", &["ristorante", "bar", "caffè", "pizza", "pranzo", "cena"]),
    ("Casa", &["bolletta", "affitto", "luce", "gas", "internet", "casa"]),
    ("Salute", &["farmacia", "dottore", "medico", "medicina"]),
    ("Svago", &["cinema", "libro", "palestra", "sport", "gioco"]),
    ("Abbigliamento", &["vestiti", "scarpe", "maglietta", "pantaloni"]),
];

const INCOME_RULES: &[(&str, &[&str])] = &[
    ("Stipendio", &["stipendio", "salario", "busta", "paga", "lavoro"]),
    ("Freelance", &["consulenza", "freelance", "progetto", "cliente"]),
    ("Famiglia", &["paghetta", "nonna", "nonno", "mamma", "papà", "famiglia"]),
    ("Investimenti", &["dividendo", "interesse", "investimento", "borsa"]),
    ("Vendite", &["vendita", "vendo", "usato", "marketplace"]),
];

/// Substring keyword matcher with a catch-all default
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCategorizer;

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self
    }

    /// Category for a description; never fails
    pub fn category_for(&self, description: &str, kind: TransactionKind) -> &'static str {
        let rules = match kind {
            TransactionKind::Expense => EXPENSE_RULES,
            TransactionKind::Income => INCOME_RULES,
        };

        let lowered = description.to_lowercase();
        rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or_else(|| default_category(kind))
    }
}

impl Categorizer for KeywordCategorizer {
    fn categorize(&self, description: &str, kind: TransactionKind) -> LedgerResult<String> {
        Ok(self.category_for(description, kind).to_string())
    }
}
