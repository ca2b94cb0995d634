use crate::models::CodepointCount;
use crate::processor::FrequencyTable;

/// Materializes every counter, highest count first.
///
/// The sort is stable, so equal counts keep the order in which their code
/// points were first seen.
pub fn rank(table: &FrequencyTable) -> Vec<CodepointCount> {
    let mut entries: Vec<CodepointCount> = table.iter().collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
