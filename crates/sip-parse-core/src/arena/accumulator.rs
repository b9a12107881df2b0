use super::{PageId, Pool, Span};
use crate::error::{Error, Result};

/// Collects unrecognised `;name=value` parameters on a scratch page.
///
/// Elements are joined with `;` when copied out. The page is taken from the
/// pool on the first append and handed back by
/// [`ExtensionAccumulator::release`].
#[derive(Debug, Default)]
pub struct ExtensionAccumulator {
    page: Option<PageId>,
    parts: Vec<Span>,
}

impl ExtensionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one parameter. On failure the page is released and the
    /// accumulator is empty again.
    pub fn append(&mut self, pool: &mut Pool, bytes: &[u8]) -> Result<()> {
        let page = match self.page {
            Some(page) => page,
            None => {
                let page = pool.get_page()?;
                self.page = Some(page);
                page
            }
        };

        match pool.append(page, bytes) {
            Ok(span) => {
                self.parts.push(span);
                Ok(())
            }
            Err(e) => {
                self.release(pool);
                Err(e)
            }
        }
    }

    /// Number of parameters collected
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The collected parameters, in order
    pub fn parts(&self) -> &[Span] {
        &self.parts
    }

    /// Copies the collected parameters, joined with `;`, onto a destination
    /// page as one span
    pub fn copy_to(&self, scratch: &Pool, dst: &mut Pool, dst_page: PageId) -> Result<Option<Span>> {
        if self.parts.is_empty() {
            return Ok(None);
        }
        let mut slices: Vec<&[u8]> = Vec::with_capacity(self.parts.len() * 2);
        for (i, span) in self.parts.iter().enumerate() {
            if i > 0 {
                slices.push(b";");
            }
            let bytes = scratch
                .bytes(*span)
                .ok_or_else(|| Error::unknown(format!("extension text is not readable from pool '{}'", scratch.name())))?;
            slices.push(bytes);
        }
        dst.append_parts(dst_page, &slices).map(Some)
    }

    /// Frees the scratch page. Safe to call any number of times
    pub fn release(&mut self, pool: &mut Pool) {
        if let Some(page) = self.page.take() {
            pool.free_page(page);
        }
        self.parts.clear();
    }

    /// True while a scratch page is held
    pub fn holds_page(&self) -> bool {
        self.page.is_some()
    }
}
