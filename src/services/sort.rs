use crate::types::models::{RuneRecord, SortKey, SortOrder};

/// Returns a freshly ordered copy; the source list keeps its fetch order.
pub fn sort_records(records: &[RuneRecord], key: SortKey, order: SortOrder) -> Vec<RuneRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = key.value(a).total_cmp(&key.value(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}
