use crate::arena::{ArenaLimits, PageId, Pool};
use crate::error::{Error, Result};
use crate::types::HeaderType;

use super::header::{Header, HeaderMut, HeaderView};

/// An ordered list of headers of any type, outside a message
#[derive(Debug, Clone)]
pub struct HeaderList {
    arena: Pool,
    page: PageId,
    headers: Vec<Header>,
    capacity: usize,
}

impl HeaderList {
    /// Creates a list that accepts at most `capacity` headers
    pub fn new(limits: ArenaLimits, capacity: usize) -> Result<Self> {
        let mut arena = Pool::new("header-list", limits);
        let page = arena.get_page()?;
        Ok(Self {
            arena,
            page,
            headers: Vec::new(),
            capacity,
        })
    }

    pub fn arena(&self) -> &Pool {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<HeaderView<'_>> {
        self.headers
            .get(index)
            .map(|h| HeaderView::new(h, &self.arena))
    }

    pub fn iter(&self) -> impl Iterator<Item = HeaderView<'_>> {
        self.headers.iter().map(move |h| HeaderView::new(h, &self.arena))
    }

    /// Creates a detached header whose text will live on this list's arena
    pub fn construct(&self, header_type: HeaderType) -> Header {
        Header::new(header_type, self.page)
    }

    /// Appends a header, handing it back if the list is full
    pub fn push(&mut self, header: Header) -> std::result::Result<usize, Header> {
        if self.headers.len() >= self.capacity || header.page() != self.page {
            return Err(header);
        }
        self.headers.push(header);
        Ok(self.headers.len() - 1)
    }

    /// Constructs a header and pushes it; a rejected push is an internal error
    pub(crate) fn construct_and_push(&mut self, header_type: HeaderType) -> Result<HeaderMut<'_>> {
        let header = self.construct(header_type);
        let index = self.push(header).map_err(|h| {
            Error::unknown(format!(
                "header list rejected {} header ({} of {} used)",
                h.header_type(),
                self.headers.len(),
                self.capacity
            ))
        })?;
        Ok(HeaderMut::new(&mut self.headers[index], &mut self.arena))
    }
}
