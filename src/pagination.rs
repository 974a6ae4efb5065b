//! Choosing which lines of the corpus end up in the document.
//!
//! Registration rules fix the page at 50 lines and cap the document at 60
//! pages: a corpus that fits is printed whole, a longer one is represented by
//! its first 30 and last 30 pages. The two windows are taken from the flat line
//! sequence, not from files, so a page can start mid-file.

use crate::source::LineSequence;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PagePolicy {
    pub lines_per_page: usize,
    pub pages_from_start: usize,
    pub pages_from_end: usize,
}

/// The fixed registration policy: 50 lines per page, first 30 and last 30 pages
pub const REGISTRATION: PagePolicy = PagePolicy {
    lines_per_page: 50,
    pages_from_start: 30,
    pages_from_end: 30,
};

impl Default for PagePolicy {
    fn default() -> Self {
        REGISTRATION
    }
}

impl PagePolicy {
    /// Number of pages `line_count` lines fill, rounding up
    pub fn page_count(&self, line_count: usize) -> usize {
        line_count.div_ceil(self.lines_per_page)
    }

    pub fn max_pages(&self) -> usize {
        self.pages_from_start + self.pages_from_end
    }

    /// Pick the lines that go into the document.
    ///
    /// Because truncation only happens when the page count exceeds
    /// `pages_from_start + pages_from_end`, the corpus is then strictly longer
    /// than both windows together and they never overlap.
    pub fn select<'a>(&self, sequence: &'a LineSequence) -> PageSelection<'a> {
        let lines = sequence.lines();
        let total_pages = self.page_count(lines.len());

        if total_pages <= self.max_pages() {
            return PageSelection {
                head: lines,
                tail: &[],
                total_lines: lines.len(),
                total_pages,
                lines_per_page: self.lines_per_page,
            };
        }

        let head_len = self.pages_from_start * self.lines_per_page;
        let tail_len = self.pages_from_end * self.lines_per_page;
        PageSelection {
            head: &lines[..head_len],
            tail: &lines[lines.len() - tail_len..],
            total_lines: lines.len(),
            total_pages,
            lines_per_page: self.lines_per_page,
        }
    }
}

/// The selected lines, borrowed from the line sequence.
#[derive(Debug, Clone, Copy)]
pub struct PageSelection<'a> {
    head: &'a [String],
    tail: &'a [String],
    total_lines: usize,
    /// Page count of the whole corpus, before selection
    total_pages: usize,
    lines_per_page: usize,
}

impl<'a> PageSelection<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let (head, tail) = (self.head, self.tail);
        head.iter().chain(tail.iter()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Whether the middle of the corpus was dropped
    pub fn is_truncated(&self) -> bool {
        !self.tail.is_empty()
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn selected_pages(&self) -> usize {
        self.len().div_ceil(self.lines_per_page)
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// The 1-based, inclusive line ranges of the corpus that were kept.
    ///
    /// Lines rather than pages: the tail window is counted back from the last
    /// line, so it rarely starts on a page boundary of the corpus.
    pub fn kept_line_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges = Vec::default();
        if !self.head.is_empty() {
            ranges.push((1, self.head.len()));
        }
        if self.is_truncated() {
            ranges.push((self.total_lines - self.tail.len() + 1, self.total_lines));
        }
        ranges
    }

    #[cfg(test)]
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}
