//! What the grammar hands to the semantic actions: positions in the input,
//! not copies of it.

use crate::types::{FieldKey, HeaderType, UriKind};

/// A byte range of the parse input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSpan {
    pub offset: usize,
    pub len: usize,
}

impl InputSpan {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Position of `sub` inside `base`. `sub` must be a subslice of `base`
    pub fn of(base: &[u8], sub: &[u8]) -> Self {
        let offset = (sub.as_ptr() as usize).saturating_sub(base.as_ptr() as usize);
        Self {
            offset,
            len: sub.len(),
        }
    }

    pub fn slice<'a>(&self, base: &'a [u8]) -> &'a [u8] {
        base.get(self.offset..self.offset + self.len).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Raw value of one recognised field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    Span(InputSpan),
    /// A parameter written without `=value`
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedField {
    pub key: FieldKey,
    pub value: RawValue,
}

impl ParsedField {
    pub fn span(key: FieldKey, span: InputSpan) -> Self {
        Self {
            key,
            value: RawValue::Span(span),
        }
    }

    pub fn flag(key: FieldKey) -> Self {
        Self {
            key,
            value: RawValue::Flag,
        }
    }
}

/// A URI parameter the URI builders know by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriParam {
    pub name: InputSpan,
    pub value: Option<InputSpan>,
}

/// Recognised parts of a URI, per variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriPayload {
    Sip {
        secure: bool,
        user: Option<InputSpan>,
        password: Option<InputSpan>,
        host: InputSpan,
        port: Option<InputSpan>,
        params: Vec<UriParam>,
        headers: Option<InputSpan>,
    },
    Absolute {
        scheme: InputSpan,
        identifier: InputSpan,
    },
    Tel {
        number: InputSpan,
        params: Vec<UriParam>,
    },
    Diameter {
        secure: bool,
        host: InputSpan,
        port: Option<InputSpan>,
        params: Vec<UriParam>,
    },
}

impl UriPayload {
    /// The variant tag matching this payload
    pub fn kind(&self) -> UriKind {
        match self {
            UriPayload::Sip { .. } => UriKind::SipUrl,
            UriPayload::Absolute { .. } => UriKind::AbsoluteUri,
            UriPayload::Tel { .. } => UriKind::TelUri,
            UriPayload::Diameter { .. } => UriKind::DiameterUri,
        }
    }
}

/// A recognised name-addr or addr-spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub display_name: Option<InputSpan>,
    pub uri: UriPayload,
    pub angle_brackets: bool,
    /// Unrecognised URI parameters, in order
    pub uri_extensions: Vec<InputSpan>,
}

/// One recognised header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub header_type: HeaderType,
    /// Wire name; absent when the value came without a name
    pub name: Option<InputSpan>,
    pub compact: bool,
    pub star: bool,
    pub address: Option<ParsedAddress>,
    pub fields: Vec<ParsedField>,
    /// Unrecognised header parameters, in order
    pub extensions: Vec<InputSpan>,
    /// Input offset right after the value and any trailing whitespace
    pub end: usize,
}

impl ParsedHeader {
    pub fn new(header_type: HeaderType) -> Self {
        Self {
            header_type,
            name: None,
            compact: false,
            star: false,
            address: None,
            fields: Vec::new(),
            extensions: Vec::new(),
            end: 0,
        }
    }
}

/// A recognised start line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStartLine {
    Request {
        method: InputSpan,
        uri: ParsedAddress,
        version: InputSpan,
    },
    Status {
        version: InputSpan,
        code: InputSpan,
        reason: InputSpan,
    },
}
