use crate::ledger::{DerivedCell, PricingParameters, Row, TallyRules, Table, MIN_ROWS};
use serde::Serialize;
use tracing::debug;

/// Totals of one calculation, replaced wholesale by the next one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ResultsSummary {
    /// Usage tokens counted over all active rows
    pub total_tokens: u64,
    /// `(total_tokens / 4) * actual_unit_shuttle_cost + court_fee`
    pub legacy_total: f64,
    /// Sum of the Price column over active rows
    pub net_price_total: f64,
    /// `net_price_total - legacy_total`
    pub delta: f64,
    /// Sum of the TotalCount column over active rows
    pub sum_total_count_column: f64,
    /// Shuttles used in the session, fractional when tokens do not split evenly
    pub shuttle_units: f64,
}

/// Derives TotalCount and Price for rows `[0, last_active_row_index)` and sums the session.
///
/// Blank-name rows inside the range get both derived cells cleared. Rows at or beyond
/// `last_active_row_index` are left untouched. The returned table holds at least
/// [`MIN_ROWS`] rows. The input table is never modified.
pub fn compute_table(
    table: &Table,
    params: &PricingParameters,
    rules: &TallyRules,
    last_active_row_index: usize,
) -> (Table, ResultsSummary) {
    let mut computed = table.clone();
    let last = last_active_row_index.min(computed.rows.len());

    let mut grand_tokens = 0u64;
    for row in &mut computed.rows[..last] {
        if !row.is_active() {
            row.clear_derived();
            continue;
        }
        let row_tokens = row.count_tokens(rules.token);
        grand_tokens += row_tokens;
        row.total_count = DerivedCell::Number(row_tokens as f64);
        row.price = DerivedCell::Number(params.row_price(row_tokens));
    }

    while computed.rows.len() < MIN_ROWS {
        computed.rows.push(Row::default());
    }

    let mut sum_total_count = 0f64;
    let mut sum_price = 0f64;
    for row in computed.rows[..last].iter().filter(|row| row.is_active()) {
        sum_total_count += row.total_count.as_number().unwrap_or(0.0);
        sum_price += row.price.as_number().unwrap_or(0.0);
    }

    let shuttle_units = rules.units(grand_tokens);
    let legacy_total = shuttle_units * params.actual_unit_shuttle_cost + params.court_fee;
    debug!(
        rows = last,
        tokens = grand_tokens,
        net = sum_price,
        legacy = legacy_total,
        "ledger computed"
    );

    let summary = ResultsSummary {
        total_tokens: grand_tokens,
        legacy_total,
        net_price_total: sum_price,
        delta: sum_price - legacy_total,
        sum_total_count_column: sum_total_count,
        shuttle_units,
    };
    (computed, summary)
}
