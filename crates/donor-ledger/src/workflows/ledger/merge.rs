use super::domain::DonationEvent;
use std::cmp::Ordering;

/// Concatenates adapter outputs into a newest-first ledger.
///
/// Events at the same instant keep recorded timestamps ahead of inferred ones,
/// then order by source (hospital, registration, payment), then by input order.
pub fn merge<I>(event_lists: I) -> Vec<DonationEvent>
where
    I: IntoIterator<Item = Vec<DonationEvent>>,
{
    let mut ledger: Vec<DonationEvent> = event_lists.into_iter().flatten().collect();
    ledger.sort_by(ledger_order);
    ledger
}

pub(crate) fn ledger_order(left: &DonationEvent, right: &DonationEvent) -> Ordering {
    right
        .occurred_at()
        .cmp(&left.occurred_at())
        .then_with(|| left.timestamp_inferred().cmp(&right.timestamp_inferred()))
        .then_with(|| {
            left.source()
                .merge_rank()
                .cmp(&right.source().merge_rank())
        })
}
