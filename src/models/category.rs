//! Category vocabularies
//!
//! Expense and income categories form two closed, non-overlapping sets.
//! The labels are the ones used by the ledger file, so they stay in the
//! language the ledger was first written in.

use super::transaction::TransactionKind;

/// Allowed categories for expense transactions
pub const EXPENSE_CATEGORIES: [&str; 8] = [
    "Trasporti",
    "Alimentari",
    "Ristorazione",
    "Casa",
    "Salute",
    "Svago",
    "Abbigliamento",
    "Varie",
];

/// Allowed categories for income transactions
pub const INCOME_CATEGORIES: [&str; 6] = [
    "Stipendio",
    "Freelance",
    "Famiglia",
    "Investimenti",
    "Vendite",
    "Altri",
];

/// Catch-all expense category
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Varie";

/// Catch-all income category
pub const DEFAULT_INCOME_CATEGORY: &str = "Altri";

/// The vocabulary for a transaction kind
pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Expense => &EXPENSE_CATEGORIES,
        TransactionKind::Income => &INCOME_CATEGORIES,
    }
}

/// The catch-all category for a transaction kind
pub fn default_category(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => DEFAULT_EXPENSE_CATEGORY,
        TransactionKind::Income => DEFAULT_INCOME_CATEGORY,
    }
}

/// Check whether `category` belongs to the vocabulary of `kind`
pub fn is_valid_category(kind: TransactionKind, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

/// Find a category of `kind` ignoring ASCII case, returning its canonical label
pub fn find_category(kind: TransactionKind, name: &str) -> Option<&'static str> {
    let name = name.trim();
    categories_for(kind)
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_do_not_overlap() {
        for cat in EXPENSE_CATEGORIES {
            assert!(!INCOME_CATEGORIES.contains(&cat));
        }
    }

    #[test]
    fn test_is_valid_category() {
        assert!(is_valid_category(TransactionKind::Expense, "Varie"));
        assert!(!is_valid_category(TransactionKind::Income, "Varie"));
        assert!(is_valid_category(TransactionKind::Income, "Stipendio"));
        assert!(!is_valid_category(TransactionKind::Expense, "varie"));
    }

    #[test]
    fn test_find_category_is_case_insensitive() {
        assert_eq!(find_category(TransactionKind::Expense, " casa "), Some("Casa"));
        assert_eq!(find_category(TransactionKind::Income, "casa"), None);
    }

    #[test]
    fn test_defaults_are_in_vocabulary() {
        assert!(is_valid_category(
            TransactionKind::Expense,
            default_category(TransactionKind::Expense)
        ));
        assert!(is_valid_category(
            TransactionKind::Income,
            default_category(TransactionKind::Income)
        ));
    }
}
