use super::matcher::{classify, PartyMatcher};
use shared_types::{
    CalculationResult, CalculationTarget, ExpenseRecord, SettlementDirection, Settings,
};
use tracing::{debug, info, trace};

const PERIOD_SEPARATOR: &str = " 〜 ";

/// Classifies `records` and computes the settlement between the two
/// parties.
///
/// Only expenditures (negative amounts) take part. Income and zero rows are
/// copied to the result untouched and do not affect totals, counts or the
/// period. The input is not modified; the returned result carries a
/// classified copy of every record.
pub fn calculate(records: &[ExpenseRecord], settings: &Settings) -> CalculationResult {
    debug!(
        records = records.len(),
        column = settings.identification_column.label(),
        owner_pattern = %settings.owner_pattern,
        spouse_pattern = %settings.spouse_pattern,
        owner_ratio = settings.owner_ratio,
        "Starting settlement calculation"
    );

    let owner = PartyMatcher::compile(&settings.owner_pattern);
    let spouse = PartyMatcher::compile(&settings.spouse_pattern);
    debug!(
        owner = owner.pattern(),
        owner_literal = owner.is_literal_fallback(),
        spouse = spouse.pattern(),
        spouse_literal = spouse.is_literal_fallback(),
        "Compiled party matchers"
    );

    let mut tally = Tally::default();
    let mut classified = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let mut record = record.clone();

        if record.is_expenditure() {
            let value = settings.identification_column.select(&record);
            let target = classify(value, &owner, &spouse);
            trace!(index, value, amount = record.amount, party = target.as_str(), "Classified record");

            tally.add(&record, target);
            record.set_classification(target);
        } else {
            trace!(index, amount = record.amount, "Skipping non-expenditure record");
        }

        classified.push(record);
    }

    // Sums wrap on overflow rather than aborting the calculation.
    let total_expense = tally.owner_total.wrapping_add(tally.spouse_total);
    let owner_share = owner_share(total_expense, settings.owner_ratio);
    let spouse_share = total_expense.wrapping_sub(owner_share);
    let (settlement_direction, settlement_amount) = settle(tally.owner_total, owner_share);

    let result = CalculationResult {
        period: tally.period(),
        owner_total: tally.owner_total,
        spouse_total: tally.spouse_total,
        total_expense,
        owner_share,
        spouse_share,
        settlement_amount,
        settlement_direction,
        owner_count: tally.owner_count,
        spouse_count: tally.spouse_count,
        shared_count: tally.shared_count,
        records: classified,
    };

    info!(
        period = %result.period,
        owner_total = result.owner_total,
        owner_count = result.owner_count,
        spouse_total = result.spouse_total,
        spouse_count = result.spouse_count,
        shared_count = result.shared_count,
        owner_share = result.owner_share,
        spouse_share = result.spouse_share,
        settlement_amount = result.settlement_amount,
        direction = result.settlement_direction.label(),
        "Settlement calculated"
    );

    result
}

/// The owner's share of `total_expense` at `owner_ratio` percent,
/// truncated toward zero.
pub fn owner_share(total_expense: i64, owner_ratio: f64) -> i64 {
    (total_expense as f64 * (owner_ratio / 100.0)) as i64
}

/// Direction and amount that brings the owner's spend in line with their
/// share. The amount is non-negative unless the difference wraps to
/// `i64::MIN`.
pub fn settle(owner_total: i64, owner_share: i64) -> (SettlementDirection, i64) {
    let raw = owner_total.wrapping_sub(owner_share);

    if raw > 0 {
        (SettlementDirection::SpouseToOwner, raw)
    } else if raw < 0 {
        (SettlementDirection::OwnerToSpouse, raw.wrapping_neg())
    } else {
        (SettlementDirection::None, 0)
    }
}

#[derive(Default)]
struct Tally {
    owner_total: i64,
    spouse_total: i64,
    owner_count: usize,
    spouse_count: usize,
    shared_count: usize,
    min_date: String,
    max_date: String,
}

impl Tally {
    fn add(&mut self, record: &ExpenseRecord, target: CalculationTarget) {
        let amount = record.amount.wrapping_neg();

        match target {
            CalculationTarget::Owner => {
                self.owner_total = self.owner_total.wrapping_add(amount);
                self.owner_count += 1;
            }
            CalculationTarget::Spouse => {
                self.spouse_total = self.spouse_total.wrapping_add(amount);
                self.spouse_count += 1;
            }
            CalculationTarget::Shared => self.shared_count += 1,
        }

        if self.min_date.is_empty() || record.date < self.min_date {
            self.min_date = record.date.clone();
        }
        if self.max_date.is_empty() || record.date > self.max_date {
            self.max_date = record.date.clone();
        }
    }

    fn period(&self) -> String {
        format!("{}{}{}", self.min_date, PERIOD_SEPARATOR, self.max_date)
    }
}
