//! Page-based byte arenas.
//!
//! A [`Pool`] hands out pages of at most `page_capacity` bytes, chaining a
//! new page on when one fills up. Bytes are only ever appended, so a [`Span`]
//! obtained from an append stays valid until its page chain is freed. Header objects store spans and resolve them through the pool that
//! owns their page.

mod accumulator;

pub use accumulator::ExtensionAccumulator;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Identifies a page inside a [`Pool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(u32);

impl PageId {
    /// Index of the page inside its pool
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A byte range stored on an arena page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    page: PageId,
    offset: u32,
    len: u32,
}

impl Span {
    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Size limits of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLimits {
    /// Maximum number of bytes one page can hold
    pub page_capacity: usize,
    /// Maximum number of pages allocated at the same time
    pub max_pages: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            page_capacity: 4096,
            max_pages: 16,
        }
    }
}

impl ArenaLimits {
    pub fn new(page_capacity: usize, max_pages: usize) -> Self {
        Self {
            page_capacity,
            max_pages,
        }
    }
}

/// One page of a pool. `next` links the page a full page grew into
#[derive(Debug, Clone, Default)]
struct Page {
    data: Vec<u8>,
    next: Option<u32>,
}

/// A pool of append-only pages.
///
/// A page that runs out of room grows by chaining a fresh page from the
/// same pool, so the [`PageId`] a caller holds keeps accepting appends until
/// the pool's page budget is spent.
#[derive(Debug, Clone)]
pub struct Pool {
    name: &'static str,
    limits: ArenaLimits,
    pages: Vec<Option<Page>>,
    free: Vec<u32>,
}

impl Pool {
    /// Creates an empty pool. No page is allocated until [`Pool::get_page`]
    pub fn new(name: &'static str, limits: ArenaLimits) -> Self {
        Self {
            name,
            limits,
            pages: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limits(&self) -> ArenaLimits {
        self.limits
    }

    /// Allocates an empty page
    pub fn get_page(&mut self) -> Result<PageId> {
        if let Some(index) = self.free.pop() {
            self.pages[index as usize] = Some(Page::default());
            trace!(pool = self.name, page = index, "reused page");
            return Ok(PageId(index));
        }

        if self.pages.len() >= self.limits.max_pages {
            return Err(Error::out_of_resources(format!(
                "pool '{}' has no free page ({} in use)",
                self.name,
                self.pages_in_use()
            )));
        }

        let index = u32::try_from(self.pages.len())
            .map_err(|_| Error::out_of_resources("page index overflow"))?;
        self.pages.push(Some(Page::default()));
        trace!(pool = self.name, page = index, "allocated page");
        Ok(PageId(index))
    }

    /// Returns a page, and every page it grew into, to the pool. Freeing a
    /// page that is not in use is a no-op
    pub fn free_page(&mut self, page: PageId) {
        let mut next = Some(page.0);
        while let Some(index) = next {
            next = match self.pages.get_mut(index as usize).and_then(Option::take) {
                Some(freed) => {
                    self.free.push(index);
                    trace!(pool = self.name, page = index, "freed page");
                    freed.next
                }
                None => None,
            };
        }
    }

    /// Appends bytes to a page and returns where they landed.
    ///
    /// A zero-length append succeeds without touching the page.
    pub fn append(&mut self, page: PageId, bytes: &[u8]) -> Result<Span> {
        self.append_parts(page, &[bytes])
    }

    /// Appends several slices as one contiguous span.
    ///
    /// When the last page of the chain cannot hold them, a fresh page is
    /// chained on and the span lands there. A span longer than
    /// `page_capacity` never fits.
    pub fn append_parts(&mut self, page: PageId, parts: &[&[u8]]) -> Result<Span> {
        let total: usize = parts.iter().map(|p| p.len()).sum();
        let mut tail = self.tail(page)?;
        let mut offset = self.page_len(tail);

        if total > 0 && offset + total > self.limits.page_capacity {
            if total > self.limits.page_capacity {
                return Err(Error::out_of_resources(format!(
                    "{} bytes exceed the page capacity of pool '{}'",
                    total, self.name
                )));
            }
            let grown = self.get_page()?;
            if let Some(last) = self.page_mut(tail) {
                last.next = Some(grown.0);
            }
            trace!(pool = self.name, page = page.0, grown = grown.0, "page grew");
            tail = grown;
            offset = 0;
        }

        let span = Span {
            page: tail,
            offset: to_u32(offset)?,
            len: to_u32(total)?,
        };
        if total == 0 {
            return Ok(span);
        }

        let name = self.name;
        let data = &mut self
            .page_mut(tail)
            .ok_or_else(|| Error::unknown(format!("page {} is not allocated in pool '{}'", tail.0, name)))?
            .data;
        data.try_reserve(total)
            .map_err(|e| Error::out_of_resources(e.to_string()))?;
        for part in parts {
            data.extend_from_slice(part);
        }
        Ok(span)
    }

    /// Copies the bytes of `span` from `src` onto `dst_page` of `dst`
    pub fn copy_between(src: &Pool, span: Span, dst: &mut Pool, dst_page: PageId) -> Result<Span> {
        let bytes = src
            .bytes(span)
            .ok_or_else(|| Error::unknown(format!("span is not readable from pool '{}'", src.name)))?;
        dst.append(dst_page, bytes)
    }

    /// Resolves a span to its bytes
    pub fn bytes(&self, span: Span) -> Option<&[u8]> {
        let data = &self.pages.get(span.page.index())?.as_ref()?.data;
        data.get(span.offset()..span.offset() + span.len())
    }

    /// Resolves a span to a string, if it is valid UTF-8
    pub fn str(&self, span: Span) -> Option<&str> {
        self.bytes(span).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of bytes stored on one page, not counting pages it grew into
    pub fn page_len(&self, page: PageId) -> usize {
        self.pages
            .get(page.index())
            .and_then(Option::as_ref)
            .map_or(0, |p| p.data.len())
    }

    /// Number of pages currently allocated
    pub fn pages_in_use(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    fn page_mut(&mut self, page: PageId) -> Option<&mut Page> {
        self.pages.get_mut(page.index()).and_then(Option::as_mut)
    }

    /// Last page of the chain starting at `page`
    fn tail(&self, page: PageId) -> Result<PageId> {
        let mut current = page;
        loop {
            let entry = self
                .pages
                .get(current.index())
                .and_then(Option::as_ref)
                .ok_or_else(|| Error::unknown(format!("page {} is not allocated in pool '{}'", current.0, self.name)))?;
            match entry.next {
                Some(next) => current = PageId(next),
                None => return Ok(current),
            }
        }
    }
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::out_of_resources(format!("{} does not fit a span", n)))
}
