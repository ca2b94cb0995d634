use super::Processor;
use crate::counter::SaturatingCount;
use crate::models::{CodepointCount, Page};
use crate::scan::qualifying;
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

/// Global code point counters, kept in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    slots: FxHashMap<char, usize>,
    entries: Vec<(char, SaturatingCount)>,
    dropped: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `c`, leaving it untouched once it has saturated.
    pub fn bump(&mut self, c: char) {
        let entries = &mut self.entries;
        let slot = *self.slots.entry(c).or_insert_with(|| {
            entries.push((c, SaturatingCount::default()));
            entries.len() - 1
        });
        if !entries[slot].1.incr() {
            if self.dropped == 0 {
                warn!(codepoint = %c, "Counter saturated, further hits are dropped");
            }
            self.dropped += 1;
        }
    }

    pub fn get(&self, c: char) -> u32 {
        self.slots
            .get(&c)
            .map(|&slot| self.entries[slot].1.get())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Increments skipped because a counter was already at its maximum
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Sum of all counters
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| u64::from(n.get())).sum()
    }

    /// Entries in the order their code point was first seen
    pub fn iter(&self) -> impl Iterator<Item = CodepointCount> + '_ {
        self.entries.iter().map(|&(codepoint, count)| CodepointCount {
            codepoint,
            count: count.get(),
        })
    }
}

impl FromIterator<(char, u32)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (char, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (c, n) in iter {
            match table.slots.get(&c) {
                Some(&slot) => table.entries[slot].1 = SaturatingCount::new(n),
                None => {
                    table.slots.insert(c, table.entries.len());
                    table.entries.push((c, SaturatingCount::new(n)));
                }
            }
        }
        table
    }
}

/// Counts every occurrence of every qualifying code point.
#[derive(Debug, Default)]
pub struct RawFrequency {
    table: FrequencyTable,
}

impl RawFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn into_table(self) -> FrequencyTable {
        self.table
    }
}

impl Processor for RawFrequency {
    fn name(&self) -> &'static str {
        "raw frequency"
    }

    fn process(&mut self, page: &Page) -> Result<()> {
        for c in qualifying(page.text()) {
            self.table.bump(c);
        }
        Ok(())
    }
}

/// Counts the number of pages each qualifying code point appears on.
#[derive(Debug, Default)]
pub struct PresenceFrequency {
    table: FrequencyTable,
}

impl PresenceFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn into_table(self) -> FrequencyTable {
        self.table
    }
}

impl Processor for PresenceFrequency {
    fn name(&self) -> &'static str {
        "page presence"
    }

    fn process(&mut self, page: &Page) -> Result<()> {
        let mut seen = FxHashSet::default();
        for c in qualifying(page.text()) {
            if seen.insert(c) {
                self.table.bump(c);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Revision;

    fn page(text: &str) -> Page {
        Page {
            title: "T".to_string(),
            id: 1,
            namespace: 0,
            redirect_target: None,
            revisions: vec![Revision {
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn raw_counts_every_occurrence() {
        let mut raw = RawFrequency::new();
        raw.process(&page("中国中国")).unwrap();
        raw.process(&page("中文 text")).unwrap();

        assert_eq!(raw.table().get('中'), 3);
        assert_eq!(raw.table().get('国'), 2);
        assert_eq!(raw.table().get('文'), 1);
        assert_eq!(raw.table().get('x'), 0);
        assert_eq!(raw.table().total(), 6);
    }

    #[test]
    fn presence_counts_once_per_page() {
        let mut presence = PresenceFrequency::new();
        presence.process(&page("中中中中国")).unwrap();
        presence.process(&page("中")).unwrap();

        assert_eq!(presence.table().get('中'), 2);
        assert_eq!(presence.table().get('国'), 1);
    }

    #[test]
    fn pages_without_han_leave_counters_alone() {
        let mut raw = RawFrequency::new();
        let mut presence = PresenceFrequency::new();
        raw.process(&page("中")).unwrap();
        presence.process(&page("中")).unwrap();

        for text in ["", "only ascii", "ひらがな カタカナ 한국어"] {
            raw.process(&page(text)).unwrap();
            presence.process(&page(text)).unwrap();
        }

        assert_eq!(raw.table().len(), 1);
        assert_eq!(raw.table().get('中'), 1);
        assert_eq!(presence.table().len(), 1);
        assert_eq!(presence.table().get('中'), 1);
    }

    #[test]
    fn raw_result_is_independent_of_page_order() {
        let texts = ["中国人", "人人", "国"];
        let mut forward = RawFrequency::new();
        let mut backward = RawFrequency::new();
        for t in texts {
            forward.process(&page(t)).unwrap();
        }
        for t in texts.iter().rev() {
            backward.process(&page(t)).unwrap();
        }
        for c in ['中', '国', '人'] {
            assert_eq!(forward.table().get(c), backward.table().get(c));
        }
    }

    #[test]
    fn saturated_counter_does_not_wrap() {
        let mut table: FrequencyTable = [('中', u32::MAX)].into_iter().collect();
        table.bump('中');
        table.bump('中');
        assert_eq!(table.get('中'), u32::MAX);
        assert_eq!(table.dropped(), 2);
    }

    #[test]
    fn iter_follows_first_seen_order() {
        let mut table = FrequencyTable::new();
        for c in "国中国人".chars() {
            table.bump(c);
        }
        let order: Vec<char> = table.iter().map(|e| e.codepoint).collect();
        assert_eq!(order, vec!['国', '中', '人']);
    }
}
