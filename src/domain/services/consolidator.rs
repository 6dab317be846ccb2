use crate::domain::columns::ColumnMap;
use crate::domain::model::{RecordSet, FLAG_YES, SKIP};
use crate::domain::services::amount::MonetaryAmount;
use crate::utils::error::Result;

pub const PRODUCT_SEPARATOR: &str = "+";
pub const ORDER_ID_SEPARATOR: &str = "/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsolidationSummary {
    /// Rows that absorbed at least one other row.
    pub groups_merged: usize,
    /// Rows flagged `Skip` because they were folded into another row.
    pub rows_absorbed: usize,
}

/// Folds every row sharing a (customer id, invoice no) pair into the first
/// such row in table order.
///
/// The survivor gets the `+`-joined products, `/`-joined order ids and the
/// summed order value; absorbed rows are flagged `Skip = YES`. Rows already
/// skipped or without a customer id never become survivors. A second run
/// over the same set changes nothing.
pub fn consolidate(records: &mut RecordSet, columns: &ColumnMap) -> Result<ConsolidationSummary> {
    let mut summary = ConsolidationSummary::default();
    let key_captions = [
        columns.customer_id.as_str(),
        columns.order_id.as_str(),
        columns.invoice_no.as_str(),
        columns.products.as_str(),
    ];

    for row in 0..records.len() {
        let values = records.get_many(row, &key_captions);
        let field = |caption: &str| values.get(caption).cloned().unwrap_or_default();

        let customer_id = field(&columns.customer_id);
        if records.is_skipped(row) || customer_id.is_empty() {
            continue;
        }
        let invoice_no = field(&columns.invoice_no);

        let mut products = field(&columns.products);
        let mut order_ids = field(&columns.order_id);
        let mut total = MonetaryAmount::parse(
            &records.get(row, &columns.order_value),
            records.sheet_row(row),
            &columns.order_value,
        )?;
        let mut absorbed = 0;

        for other in 0..records.len() {
            if other == row || records.is_skipped(other) {
                continue;
            }
            if records.get(other, &columns.customer_id) != customer_id
                || records.get(other, &columns.invoice_no) != invoice_no
            {
                continue;
            }

            let value = MonetaryAmount::parse(
                &records.get(other, &columns.order_value),
                records.sheet_row(other),
                &columns.order_value,
            )?;
            products = join(&products, &records.get(other, &columns.products), PRODUCT_SEPARATOR);
            order_ids = join(&order_ids, &records.get(other, &columns.order_id), ORDER_ID_SEPARATOR);
            total = total + value;
            records.set(other, SKIP, FLAG_YES);
            absorbed += 1;
        }

        records.set(row, &columns.products, products);
        records.set(row, &columns.order_value, total.plain());
        records.set(row, &columns.order_id, order_ids);

        if absorbed > 0 {
            tracing::debug!(
                "Merged {} line item(s) into customer {} / invoice {}",
                absorbed,
                customer_id,
                invoice_no
            );
            summary.groups_merged += 1;
            summary.rows_absorbed += absorbed;
        }
    }

    tracing::info!(
        "🔗 Consolidated {} group(s), {} line item(s) absorbed",
        summary.groups_merged,
        summary.rows_absorbed
    );
    Ok(summary)
}

fn join(acc: &str, next: &str, separator: &str) -> String {
    format!("{}{}{}", acc, separator, next)
}
