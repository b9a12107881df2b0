use crate::arena::{ArenaLimits, PageId, Pool};
use crate::error::Result;
use crate::types::{Address, HeaderType, UriKind};

use super::encode;
use super::header::{Header, HeaderMut, HeaderView};

/// A single pre-allocated header with its own arena
#[derive(Debug, Clone)]
pub struct StandaloneHeader {
    arena: Pool,
    header: Header,
}

impl StandaloneHeader {
    pub fn new(header_type: HeaderType, limits: ArenaLimits) -> Result<Self> {
        let mut arena = Pool::new("header", limits);
        let page = arena.get_page()?;
        Ok(Self {
            arena,
            header: Header::new(header_type, page),
        })
    }

    pub fn header_type(&self) -> HeaderType {
        self.header.header_type()
    }

    pub fn view(&self) -> HeaderView<'_> {
        HeaderView::new(&self.header, &self.arena)
    }

    /// Write access for a fresh parse. Previous field values are dropped and
    /// their text is handed back to the arena
    pub(crate) fn reuse(&mut self) -> Result<HeaderMut<'_>> {
        self.arena.free_page(self.header.page());
        let page = self.arena.get_page()?;
        self.header.reset(page);
        Ok(HeaderMut::new(&mut self.header, &mut self.arena))
    }
}

/// A single pre-allocated address with its own arena
#[derive(Debug, Clone)]
pub struct StandaloneAddress {
    arena: Pool,
    page: PageId,
    address: Option<Address>,
}

impl StandaloneAddress {
    pub fn new(limits: ArenaLimits) -> Result<Self> {
        let mut arena = Pool::new("address", limits);
        let page = arena.get_page()?;
        Ok(Self {
            arena,
            page,
            address: None,
        })
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn arena(&self) -> &Pool {
        &self.arena
    }

    pub fn uri_kind(&self) -> Option<UriKind> {
        self.address.as_ref().map(|a| a.uri.kind())
    }

    /// Text form of the built address
    pub fn encode(&self) -> Option<String> {
        self.address
            .as_ref()
            .map(|a| encode::address(a, &self.arena))
    }

    /// Write access for a fresh parse. A previous address and its text are
    /// dropped
    pub(crate) fn reuse(&mut self) -> Result<(&mut Pool, PageId, &mut Option<Address>)> {
        self.address = None;
        self.arena.free_page(self.page);
        self.page = self.arena.get_page()?;
        Ok((&mut self.arena, self.page, &mut self.address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse_recycles_the_page() {
        let mut header = StandaloneHeader::new(HeaderType::Subject, ArenaLimits::new(32, 2)).unwrap();
        for _ in 0..100 {
            let mut slot = header.reuse().unwrap();
            let (arena, page) = slot.arena();
            arena.append(page, b"twenty four bytes of txt").unwrap();
        }
        assert_eq!(header.arena.pages_in_use(), 1);

        let mut address = StandaloneAddress::new(ArenaLimits::new(32, 2)).unwrap();
        for _ in 0..100 {
            let (arena, page, _) = address.reuse().unwrap();
            arena.append(page, b"sip:someone@example.com").unwrap();
        }
        assert_eq!(address.arena().pages_in_use(), 1);
    }
}
