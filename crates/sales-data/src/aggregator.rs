//! Monthly consolidation of validated rows and the product ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

use sales_core::models::{MonthlyDataset, RankingEntry, ValidatedRow};

// ── ProductTotals ─────────────────────────────────────────────────────────────

/// Running totals for one product.
#[derive(Debug, Clone, Default)]
struct ProductTotals {
    quantity: f64,
    amount: f64,
}

impl ProductTotals {
    fn add_row(&mut self, row: &ValidatedRow) {
        self.quantity += row.quantity;
        self.amount += row.total;
    }
}

// ── MonthlyAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that merges the files of one month into a dataset.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Concatenate the rows of every file in the group, sort them by date
    /// and build the product ranking.
    ///
    /// Returns `None` when the group has no rows at all; no report should be
    /// written in that case.
    pub fn aggregate(
        rows_per_file: Vec<Vec<ValidatedRow>>,
    ) -> Option<(MonthlyDataset, Vec<RankingEntry>)> {
        let mut rows: Vec<ValidatedRow> = rows_per_file.into_iter().flatten().collect();
        if rows.is_empty() {
            return None;
        }

        // Stable: rows on the same day keep their file order.
        rows.sort_by_key(|r| r.date);

        let extra_columns = Self::extra_columns(&rows);
        let ranking = Self::rank_products(&rows);
        Some((
            MonthlyDataset {
                rows,
                extra_columns,
            },
            ranking,
        ))
    }

    /// Sum quantity and total per product, ordered by quantity desc, then
    /// total desc, then product name.
    pub fn rank_products(rows: &[ValidatedRow]) -> Vec<RankingEntry> {
        let mut totals: HashMap<&str, ProductTotals> = HashMap::new();
        for row in rows {
            totals.entry(row.product.as_str()).or_default().add_row(row);
        }

        let mut ranking: Vec<RankingEntry> = totals
            .into_iter()
            .map(|(product, t)| RankingEntry {
                product: product.to_string(),
                total_quantity: t.quantity,
                total_amount: t.amount,
            })
            .collect();

        ranking.sort_by(ranking_order);
        ranking
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Union of extra column names in first-seen order.
    fn extra_columns(rows: &[ValidatedRow]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in rows {
            for (name, _) in &row.extra {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

/// Ranking sheet order: quantity desc, total desc, product asc.
pub fn ranking_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.total_quantity
        .total_cmp(&a.total_quantity)
        .then_with(|| b.total_amount.total_cmp(&a.total_amount))
        .then_with(|| a.product.cmp(&b.product))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
