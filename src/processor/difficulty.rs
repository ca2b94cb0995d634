use super::Processor;
use crate::models::Page;
use crate::scan::qualifying;
use anyhow::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Known,
    Learning,
    Unknown,
}

/// How many reference characters the reader knows, is learning, and how many
/// unknown ones a page may contain before it is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyConfig {
    pub known: usize,
    pub learning: usize,
    pub max_unknown: usize,
}

/// Tier lookup built from a frequency-ranked reference list
#[derive(Debug, Default, Clone)]
pub struct Tiers {
    map: FxHashMap<char, Tier>,
    known: usize,
    learning: usize,
}

impl Tiers {
    /// The first `known` distinct entries are known, the next `learning` are learning.
    pub fn from_ranked(ranked: &[char], known: usize, learning: usize) -> Self {
        let mut tiers = Self::default();
        for &c in ranked {
            if tiers.map.contains_key(&c) {
                continue;
            }
            let tier = if tiers.known < known {
                tiers.known += 1;
                Tier::Known
            } else if tiers.learning < learning {
                tiers.learning += 1;
                Tier::Learning
            } else {
                break;
            };
            tiers.map.insert(c, tier);
        }
        tiers
    }

    pub fn classify(&self, c: char) -> Tier {
        self.map.get(&c).copied().unwrap_or(Tier::Unknown)
    }

    pub fn known_len(&self) -> usize {
        self.known
    }

    pub fn learning_len(&self) -> usize {
        self.learning
    }
}

/// Tier counts over the distinct qualifying code points of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageScore {
    pub title: String,
    pub id: u64,
    pub known: usize,
    pub learning: usize,
    pub unknown: usize,
}

impl PageScore {
    pub fn distinct(&self) -> usize {
        self.known + self.learning + self.unknown
    }
}

/// Selects pages a learner can read: at most `max_unknown` characters outside
/// the known and learning tiers.
#[derive(Debug)]
pub struct DifficultyScorer {
    tiers: Tiers,
    max_unknown: usize,
    accepted: Vec<PageScore>,
    rejected: u64,
}

impl DifficultyScorer {
    pub fn new(tiers: Tiers, max_unknown: usize) -> Self {
        Self {
            tiers,
            max_unknown,
            accepted: Vec::new(),
            rejected: 0,
        }
    }

    pub fn from_reference(ranked: &[char], config: DifficultyConfig) -> Self {
        let tiers = Tiers::from_ranked(ranked, config.known, config.learning);
        info!(
            known = tiers.known_len(),
            learning = tiers.learning_len(),
            max_unknown = config.max_unknown,
            "Difficulty tiers ready"
        );
        Self::new(tiers, config.max_unknown)
    }

    pub fn tiers(&self) -> &Tiers {
        &self.tiers
    }

    /// Classifies a page without recording it.
    pub fn score(&self, page: &Page) -> PageScore {
        let mut score = PageScore {
            title: page.title.clone(),
            id: page.id,
            known: 0,
            learning: 0,
            unknown: 0,
        };
        let mut seen = FxHashSet::default();
        for c in qualifying(page.text()) {
            if !seen.insert(c) {
                continue;
            }
            match self.tiers.classify(c) {
                Tier::Known => score.known += 1,
                Tier::Learning => score.learning += 1,
                Tier::Unknown => score.unknown += 1,
            }
        }
        score
    }

    /// Accepted pages in the order they were read
    pub fn accepted(&self) -> &[PageScore] {
        &self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Accepted pages, easiest first: fewest unknown, then fewest learning characters.
    pub fn ranked(&self) -> Vec<PageScore> {
        let mut pages = self.accepted.clone();
        pages.sort_by_key(|p| (p.unknown, p.learning));
        pages
    }
}

impl Processor for DifficultyScorer {
    fn name(&self) -> &'static str {
        "difficulty scorer"
    }

    fn process(&mut self, page: &Page) -> Result<()> {
        let score = self.score(page);
        if score.unknown > self.max_unknown {
            debug!(
                title = %page.title,
                unknown = score.unknown,
                max_unknown = self.max_unknown,
                "Skipping page: too many unknown characters"
            );
            self.rejected += 1;
            return Ok(());
        }
        debug!(
            title = %page.title,
            known = score.known,
            learning = score.learning,
            unknown = score.unknown,
            "Page accepted"
        );
        self.accepted.push(score);
        Ok(())
    }
}
