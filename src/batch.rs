//! Fixed-size pagination of extracted records.
//!
//! Pages are consecutive, non-overlapping and 1-based; the last page holds the
//! remainder. An empty record list still has one (empty) page, so "page 1" is
//! always a valid request once records are loaded.

use serde::Serialize;
use tracing::debug;

use crate::{Error, QuestionRecord, Result};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// One page of records plus the counters a caller needs to keep paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub total_records: usize,
    pub total_pages: usize,
    pub page: usize,
    pub records: Vec<QuestionRecord>,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct Batcher {
    page_size: usize,
    records: Option<Vec<QuestionRecord>>,
}

impl Batcher {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        Ok(Self { page_size, records: None })
    }

    /// Convenience for `Batcher::new` followed by [`Batcher::load`].
    pub fn with_records(page_size: usize, records: Vec<QuestionRecord>) -> Result<Self> {
        let mut batcher = Self::new(page_size)?;
        batcher.load(records);
        Ok(batcher)
    }

    /// Replace the loaded records with a fresh scan result.
    pub fn load(&mut self, records: Vec<QuestionRecord>) {
        debug!(records = records.len(), page_size = self.page_size, "batcher loaded");
        self.records = Some(records);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn loaded(&self) -> Result<&[QuestionRecord]> {
        self.records.as_deref().ok_or(Error::NotScanned)
    }

    pub fn total_records(&self) -> Result<usize> {
        Ok(self.loaded()?.len())
    }

    pub fn total_pages(&self) -> Result<usize> {
        let total = self.total_records()?;
        Ok(total.div_ceil(self.page_size).max(1))
    }

    /// The records of 1-based page `page`.
    pub fn page(&self, page: usize) -> Result<Page> {
        let records = self.loaded()?;
        let total_pages = self.total_pages()?;
        if page == 0 || page > total_pages {
            return Err(Error::InvalidPageRequest { page, total_pages });
        }

        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(records.len());

        Ok(Page {
            total_records: records.len(),
            total_pages,
            page,
            records: records[start..end].to_vec(),
            has_more: page < total_pages,
        })
    }

    /// Every page in order.
    pub fn pages(&self) -> Result<Vec<Page>> {
        (1..=self.total_pages()?).map(|p| self.page(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: u32) -> Vec<QuestionRecord> {
        (1..=n)
            .map(|i| {
                let mut r = QuestionRecord::new(i, n);
                r.question_text = format!("q{i}");
                r
            })
            .collect()
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(matches!(Batcher::new(0), Err(Error::InvalidPageSize)));
    }

    #[test]
    fn requires_loaded_records() {
        let batcher = Batcher::new(4).unwrap();
        assert!(matches!(batcher.page(1), Err(Error::NotScanned)));
        assert!(matches!(batcher.total_pages(), Err(Error::NotScanned)));
    }

    #[test]
    fn last_page_holds_remainder() {
        let batcher = Batcher::with_records(4, records(10)).unwrap();
        assert_eq!(batcher.total_pages().unwrap(), 3);

        let first = batcher.page(1).unwrap();
        assert_eq!(first.records.len(), 4);
        assert!(first.has_more);

        let last = batcher.page(3).unwrap();
        assert_eq!(last.records.iter().map(|r| r.number).collect::<Vec<_>>(), vec![9, 10]);
        assert!(!last.has_more);
        assert_eq!(last.total_records, 10);
    }

    #[test]
    fn pages_cover_every_record_once_in_order() {
        for k in [1, 4, 5, 8, 10, 12] {
            let batcher = Batcher::with_records(k, records(23)).unwrap();
            let pages = batcher.pages().unwrap();
            assert!(pages.iter().all(|p| p.records.len() <= k));
            let numbers: Vec<u32> = pages.iter().flat_map(|p| p.records.iter().map(|r| r.number)).collect();
            assert_eq!(numbers, (1..=23).collect::<Vec<_>>());
        }
    }

    #[test]
    fn out_of_range_page_is_reported() {
        let batcher = Batcher::with_records(5, records(10)).unwrap();
        assert!(matches!(batcher.page(3), Err(Error::InvalidPageRequest { page: 3, total_pages: 2 })));
        assert!(matches!(batcher.page(0), Err(Error::InvalidPageRequest { page: 0, .. })));
    }

    #[test]
    fn empty_result_has_one_empty_page() {
        let batcher = Batcher::with_records(5, Vec::new()).unwrap();
        let page = batcher.page(1).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(page.records.is_empty());
        assert!(!page.has_more);
    }
}
