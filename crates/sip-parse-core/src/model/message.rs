use crate::arena::{ArenaLimits, PageId, Pool, Span};
use crate::error::{Error, Result};
use crate::types::{FieldValue, HeaderType, UriValue};

use super::header::{Header, HeaderMut, HeaderView};

/// First line of a SIP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request {
        method: FieldValue,
        uri: UriValue,
        version: Span,
    },
    Status {
        version: Span,
        code: u16,
        reason: Span,
    },
}

/// A SIP message: start line plus headers, all text on the message arena
#[derive(Debug, Clone)]
pub struct Message {
    arena: Pool,
    page: PageId,
    start_line: Option<StartLine>,
    headers: Vec<Header>,
    max_headers: usize,
}

impl Message {
    pub fn new(limits: ArenaLimits) -> Result<Self> {
        let mut arena = Pool::new("message", limits);
        let page = arena.get_page()?;
        Ok(Self {
            arena,
            page,
            start_line: None,
            headers: Vec::new(),
            max_headers: usize::MAX,
        })
    }

    /// Caps the number of headers the message accepts
    pub fn with_max_headers(mut self, max: usize) -> Self {
        self.max_headers = max;
        self
    }

    pub fn start_line(&self) -> Option<&StartLine> {
        self.start_line.as_ref()
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

    pub fn header(&self, index: usize) -> Option<HeaderView<'_>> {
        self.headers
            .get(index)
            .map(|h| HeaderView::new(h, &self.arena))
    }

    pub fn headers(&self) -> impl Iterator<Item = HeaderView<'_>> {
        self.headers.iter().map(move |h| HeaderView::new(h, &self.arena))
    }

    /// Headers of one type, in message order
    pub fn headers_of(&self, header_type: HeaderType) -> impl Iterator<Item = HeaderView<'_>> {
        self.headers().filter(move |h| h.header_type() == header_type)
    }

    pub fn first(&self, header_type: HeaderType) -> Option<HeaderView<'_>> {
        self.headers_of(header_type).next()
    }

    /// Resolves a span stored on this message
    pub fn resolve(&self, span: Span) -> Option<&str> {
        self.arena.str(span)
    }

    /// Creates a header and attaches it at the end of the message
    pub(crate) fn construct_header(&mut self, header_type: HeaderType) -> Result<HeaderMut<'_>> {
        if self.headers.len() >= self.max_headers {
            return Err(Error::out_of_resources(format!(
                "message already holds {} headers",
                self.headers.len()
            )));
        }
        self.headers.push(Header::new(header_type, self.page));
        let index = self.headers.len() - 1;
        Ok(HeaderMut::new(&mut self.headers[index], &mut self.arena))
    }

    pub(crate) fn start_line_slot(&mut self) -> (&mut Pool, PageId, &mut Option<StartLine>) {
        (&mut self.arena, self.page, &mut self.start_line)
    }
}
