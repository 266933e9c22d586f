//! Visible page range for pagination footers

/// One slot in a pagination footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Ellipsis,
}

impl std::fmt::Display for PageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Compute the page labels shown around `current` out of `total` pages.
///
/// Page 1 and the last page are always shown, plus `surrounding` pages on each
/// side of `current`. Gaps collapse into a single [`PageLabel::Ellipsis`].
/// When the whole range fits the display budget every page is listed.
pub fn visible_pages(current: u32, total: u32, surrounding: u32) -> Vec<PageLabel> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let budget = surrounding.saturating_mul(2).saturating_add(3);
    if total <= budget {
        return (1..=total).map(PageLabel::Page).collect();
    }

    let lo = current.saturating_sub(surrounding).max(2);
    let hi = current.saturating_add(surrounding).min(total - 1);

    let mut labels = Vec::with_capacity(budget as usize + 2);
    labels.push(PageLabel::Page(1));
    if lo > 2 {
        labels.push(PageLabel::Ellipsis);
    }
    labels.extend((lo..=hi).map(PageLabel::Page));
    if hi < total - 1 {
        labels.push(PageLabel::Ellipsis);
    }
    labels.push(PageLabel::Page(total));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLabel::{Ellipsis, Page};

    #[test]
    fn small_range_lists_every_page() {
        assert_eq!(
            visible_pages(1, 5, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn exactly_at_budget_has_no_ellipsis() {
        let labels = visible_pages(4, 7, 2);
        assert_eq!(labels.len(), 7);
        assert!(!labels.contains(&Ellipsis));
    }

    #[test]
    fn middle_page_gets_both_ellipses() {
        assert_eq!(
            visible_pages(10, 50, 2),
            vec![
                Page(1),
                Ellipsis,
                Page(8),
                Page(9),
                Page(10),
                Page(11),
                Page(12),
                Ellipsis,
                Page(50)
            ]
        );
    }

    #[test]
    fn first_page_has_no_leading_ellipsis() {
        assert_eq!(
            visible_pages(1, 50, 2),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(50)]
        );
    }

    #[test]
    fn last_page_has_no_trailing_ellipsis() {
        assert_eq!(
            visible_pages(50, 50, 2),
            vec![Page(1), Ellipsis, Page(48), Page(49), Page(50)]
        );
    }

    #[test]
    fn single_page() {
        assert_eq!(visible_pages(1, 1, 2), vec![Page(1)]);
    }

    #[test]
    fn length_is_bounded() {
        for total in 1..200 {
            for current in 1..=total {
                let labels = visible_pages(current, total, 2);
                assert!(labels.len() <= 9, "{current}/{total}: {labels:?}");
                assert_eq!(labels.first(), Some(&Page(1)));
                assert_eq!(labels.last(), Some(&Page(total)));
            }
        }
    }

    #[test]
    fn display_labels() {
        let rendered: Vec<String> = visible_pages(1, 50, 1)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["1", "2", "…", "50"]);
    }
}
