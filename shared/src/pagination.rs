/// Window of a filtered list shown on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// 1-based; always within `[1, total_pages.max(1)]`.
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Prev,
    Next,
    Number(usize),
}

pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 { 0 } else { len.div_ceil(per_page) }
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

pub fn page_view(len: usize, page: usize, per_page: usize) -> PageView {
    let total_pages = total_pages(len, per_page);
    let page = clamp_page(page, total_pages);
    let start = ((page - 1) * per_page).min(len);
    let end = (start + per_page).min(len);
    PageView { page, total_pages, start, end }
}

impl PageView {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.start..self.end).unwrap_or(&[])
    }

    /// Controls to draw: none for a single page, else prev, numbers, next.
    pub fn controls(&self) -> Vec<PageControl> {
        if self.total_pages <= 1 {
            return Vec::new();
        }
        std::iter::once(PageControl::Prev)
            .chain((1..=self.total_pages).map(PageControl::Number))
            .chain(std::iter::once(PageControl::Next))
            .collect()
    }

    pub fn is_enabled(&self, control: PageControl) -> bool {
        match control {
            PageControl::Prev => self.page > 1,
            PageControl::Next => self.page < self.total_pages,
            PageControl::Number(_) => true,
        }
    }

    /// Page requested by a control, before clamping against the next render.
    pub fn target(&self, control: PageControl) -> usize {
        match control {
            PageControl::Prev => self.page.saturating_sub(1),
            PageControl::Next => self.page + 1,
            PageControl::Number(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_ceiling() {
        for (len, per, pages) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (45, 20, 3)] {
            assert_eq!(total_pages(len, per), pages, "len={len} per={per}");
        }
    }

    #[test]
    fn page_is_clamped_after_shrink() {
        let view = page_view(25, 3, 10);
        assert_eq!((view.page, view.start, view.end), (3, 20, 25));

        let view = page_view(5, 3, 10);
        assert_eq!((view.page, view.start, view.end), (1, 0, 5));

        let view = page_view(0, 0, 10);
        assert_eq!((view.page, view.total_pages, view.start, view.end), (1, 0, 0, 0));
    }

    #[test]
    fn controls_only_for_multiple_pages() {
        assert!(page_view(10, 1, 10).controls().is_empty());

        let view = page_view(21, 1, 10);
        assert_eq!(view.controls(), vec![
            PageControl::Prev,
            PageControl::Number(1),
            PageControl::Number(2),
            PageControl::Number(3),
            PageControl::Next,
        ]);
        assert!(!view.is_enabled(PageControl::Prev));
        assert!(view.is_enabled(PageControl::Next));
        assert_eq!(view.target(PageControl::Next), 2);
    }

    #[test]
    fn slice_matches_view() {
        let items: Vec<usize> = (0..23).collect();
        let view = page_view(items.len(), 3, 10);
        assert_eq!(view.slice(&items), &[20, 21, 22]);
    }
}
