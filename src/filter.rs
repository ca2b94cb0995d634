use crate::config::MAIN_NAMESPACE;
use crate::models::Page;
use std::fmt;

/// Why a page was left out of the analysis. Skips never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    Redirect,
    Namespace,
    RevisionCount,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Redirect => "redirect",
            SkipReason::Namespace => "non-article namespace",
            SkipReason::RevisionCount => "irregular number of revisions",
        };
        f.write_str(s)
    }
}

/// Returns the first rule the page fails, checked as redirect, namespace, revision count.
pub fn check(page: &Page) -> Option<SkipReason> {
    if page.is_redirect() {
        return Some(SkipReason::Redirect);
    }
    if page.namespace != MAIN_NAMESPACE {
        return Some(SkipReason::Namespace);
    }
    if page.revisions.len() != 1 {
        return Some(SkipReason::RevisionCount);
    }
    None
}

pub fn is_eligible(page: &Page) -> bool {
    check(page).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Revision;

    fn article(text: &str) -> Page {
        Page {
            title: "中国".to_string(),
            id: 1,
            namespace: 0,
            redirect_target: None,
            revisions: vec![Revision {
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn plain_article_is_eligible() {
        assert_eq!(check(&article("中国")), None);
        assert!(is_eligible(&article("")));
    }

    #[test]
    fn redirect_is_skipped() {
        let mut page = article("#REDIRECT");
        page.redirect_target = Some("中华".to_string());
        assert_eq!(check(&page), Some(SkipReason::Redirect));
    }

    #[test]
    fn empty_redirect_target_does_not_skip() {
        let mut page = article("中国");
        page.redirect_target = Some(String::new());
        assert_eq!(check(&page), None);
    }

    #[test]
    fn other_namespace_is_skipped() {
        let mut page = article("中国");
        page.namespace = 4;
        assert_eq!(check(&page), Some(SkipReason::Namespace));
        page.namespace = -1;
        assert_eq!(check(&page), Some(SkipReason::Namespace));
    }

    #[test]
    fn revision_count_must_be_one() {
        let mut page = article("中国");
        page.revisions.clear();
        assert_eq!(check(&page), Some(SkipReason::RevisionCount));

        page.revisions = vec![Revision::default(), Revision::default()];
        assert_eq!(check(&page), Some(SkipReason::RevisionCount));
    }

    #[test]
    fn redirect_in_other_namespace_is_excluded_either_way() {
        let mut page = article("中国");
        page.redirect_target = Some("中华".to_string());
        page.namespace = 1;
        page.revisions.clear();

        // First matching rule wins, but the outcome is exclusion regardless of order.
        assert_eq!(check(&page), Some(SkipReason::Redirect));
        assert!(!is_eligible(&page));

        page.redirect_target = None;
        assert_eq!(check(&page), Some(SkipReason::Namespace));
    }
}
