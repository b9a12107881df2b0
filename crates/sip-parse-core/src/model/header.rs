use serde::Serialize;

use super::encode;
use crate::arena::{PageId, Pool, Span};
use crate::error::{Error, Result};
use crate::types::{Address, Discriminant, FieldKey, FieldValue, HeaderType, StoredValue};

/// A header object. Its text lives on a page chain of the arena owned by
/// the container that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    header_type: HeaderType,
    page: PageId,
    compact: bool,
    star: bool,
    name: Option<Span>,
    address: Option<Address>,
    fields: Vec<(FieldKey, StoredValue)>,
}

impl Header {
    pub(crate) fn new(header_type: HeaderType, page: PageId) -> Self {
        Self {
            header_type,
            page,
            compact: false,
            star: false,
            name: None,
            address: None,
            fields: Vec::new(),
        }
    }

    pub fn header_type(&self) -> HeaderType {
        self.header_type
    }

    /// The arena page this header stores its text on
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Drops all field values and moves the header onto `page`
    pub(crate) fn reset(&mut self, page: PageId) {
        self.page = page;
        self.compact = false;
        self.star = false;
        self.name = None;
        self.address = None;
        self.fields.clear();
    }
}

/// Write access to a header together with its arena
#[derive(Debug)]
pub struct HeaderMut<'a> {
    header: &'a mut Header,
    arena: &'a mut Pool,
}

impl<'a> HeaderMut<'a> {
    pub(crate) fn new(header: &'a mut Header, arena: &'a mut Pool) -> Self {
        Self { header, arena }
    }

    pub fn header_type(&self) -> HeaderType {
        self.header.header_type
    }

    /// The arena and page new field text must be appended to
    pub fn arena(&mut self) -> (&mut Pool, PageId) {
        (&mut *self.arena, self.header.page)
    }

    pub fn set_compact(&mut self, compact: bool) {
        self.header.compact = compact;
    }

    pub fn set_star(&mut self) {
        self.header.star = true;
    }

    /// Wire name, kept for headers of type [`HeaderType::Other`]
    pub fn set_name(&mut self, name: Span) {
        self.header.name = Some(name);
    }

    pub fn set_address(&mut self, address: Address) {
        self.header.address = Some(address);
    }

    /// Stores a value. Non-repeatable fields are overwritten
    pub fn set_field(&mut self, key: FieldKey, value: StoredValue, repeatable: bool) {
        if !repeatable {
            if let Some(slot) = self.header.fields.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
                return;
            }
        }
        self.header.fields.push((key, value));
    }

    /// Token setter: a known token carries no span, an "other" token must
    /// point at its copied text
    pub fn set_token(
        &mut self,
        key: FieldKey,
        discriminant: Discriminant,
        other: Option<Span>,
        repeatable: bool,
    ) -> Result<()> {
        let value = match (discriminant, other) {
            (Discriminant::Known(token), None) => FieldValue::Enumerated(token),
            (Discriminant::Other, Some(span)) => FieldValue::Other(span),
            (discriminant, other) => {
                return Err(Error::unknown(format!(
                    "inconsistent token setter for {:?}: {:?} with span {:?}",
                    key, discriminant, other
                )))
            }
        };
        self.set_field(key, StoredValue::Token(value), repeatable);
        Ok(())
    }

    pub fn view(&self) -> HeaderView<'_> {
        HeaderView::new(&*self.header, &*self.arena)
    }
}

/// Read access to a header, resolving its spans through the owning arena
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    header: &'a Header,
    arena: &'a Pool,
}

impl<'a> HeaderView<'a> {
    pub fn new(header: &'a Header, arena: &'a Pool) -> Self {
        Self { header, arena }
    }

    pub fn header(&self) -> &'a Header {
        self.header
    }

    pub fn arena(&self) -> &'a Pool {
        self.arena
    }

    pub fn header_type(&self) -> HeaderType {
        self.header.header_type
    }

    pub fn is_compact(&self) -> bool {
        self.header.compact
    }

    /// `Contact: *`
    pub fn is_star(&self) -> bool {
        self.header.star
    }

    /// Header name: the wire name for unknown headers, otherwise the canonical one
    pub fn name(&self) -> &'a str {
        match self.header.name.and_then(|span| self.arena.str(span)) {
            Some(name) => name,
            None => self.header.header_type.name(),
        }
    }

    /// Name as it would be written back: the compact letter when the header
    /// was read in compact form
    pub fn wire_name(&self) -> String {
        match (self.header.compact, self.header.header_type.compact()) {
            (true, Some(letter)) => letter.to_string(),
            _ => self.name().to_string(),
        }
    }

    pub fn field(&self, key: FieldKey) -> Option<StoredValue> {
        self.fields(key).next()
    }

    /// All values of a field, in parse order
    pub fn fields(&self, key: FieldKey) -> impl Iterator<Item = StoredValue> + 'a {
        self.header
            .fields
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn has(&self, key: FieldKey) -> bool {
        self.field(key).is_some()
    }

    /// Number of stored field values
    pub fn field_count(&self) -> usize {
        self.header.fields.len()
    }

    /// Text of a text or token field
    pub fn text(&self, key: FieldKey) -> Option<&'a str> {
        self.field(key).and_then(|v| self.value_text(v))
    }

    /// Texts of a repeatable field
    pub fn texts(&self, key: FieldKey) -> Vec<&'a str> {
        self.fields(key).filter_map(|v| self.value_text(v)).collect()
    }

    pub fn token(&self, key: FieldKey) -> Option<FieldValue> {
        match self.field(key)? {
            StoredValue::Token(value) => Some(value),
            _ => None,
        }
    }

    pub fn number(&self, key: FieldKey) -> Option<u32> {
        match self.field(key)? {
            StoredValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// True when a flag parameter, or any value, is present for `key`
    pub fn flag(&self, key: FieldKey) -> bool {
        self.has(key)
    }

    pub fn address(&self) -> Option<&'a Address> {
        self.header.address.as_ref()
    }

    pub fn resolve(&self, span: Span) -> Option<&'a str> {
        self.arena.str(span)
    }

    /// Copies everything the header holds into owned strings, so headers
    /// living in different arenas can be compared
    pub fn snapshot(&self) -> HeaderSnapshot {
        HeaderSnapshot {
            header_type: self.header_type(),
            name: self.name().to_string(),
            compact: self.is_compact(),
            star: self.is_star(),
            address: self.address().map(|a| encode::address(a, self.arena)),
            fields: self
                .header
                .fields
                .iter()
                .map(|(k, v)| (*k, encode::stored_value(v, self.arena)))
                .collect(),
        }
    }

    fn value_text(&self, value: StoredValue) -> Option<&'a str> {
        match value {
            StoredValue::Text(span) => self.arena.str(span),
            StoredValue::Token(FieldValue::Enumerated(token)) => Some(token.as_str()),
            StoredValue::Token(FieldValue::Other(span)) => self.arena.str(span),
            StoredValue::Number(_) | StoredValue::Flag => None,
        }
    }
}

/// Arena-independent copy of a header's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSnapshot {
    pub header_type: HeaderType,
    pub name: String,
    pub compact: bool,
    pub star: bool,
    pub address: Option<String>,
    pub fields: Vec<(FieldKey, String)>,
}
