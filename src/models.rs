use crate::counter::saturate_u16;
use serde::{Deserialize, Serialize};

/// Name and base URL from the dump's `<siteinfo>` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    pub text: String,
}

/// One `<page>` element as yielded by the dump parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub id: u64,
    pub namespace: i32,
    pub redirect_target: Option<String>,
    pub revisions: Vec<Revision>,
}

impl Page {
    pub fn is_redirect(&self) -> bool {
        self.redirect_target.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Body of the first revision; eligible pages have exactly one.
    pub fn text(&self) -> &str {
        self.revisions.first().map(|r| r.text.as_str()).unwrap_or("")
    }
}

/// Wide form used while accumulating and for ranked reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodepointCount {
    pub codepoint: char,
    pub count: u32,
}

/// Narrow form kept per page: both halves clamp at `u16::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompactEntry {
    pub codepoint: u16,
    pub count: u16,
}

impl CompactEntry {
    pub fn saturating(codepoint: char, count: u32) -> Self {
        Self {
            codepoint: saturate_u16(codepoint as u32),
            count: saturate_u16(count),
        }
    }
}
