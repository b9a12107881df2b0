use serde::{Deserialize, Serialize};

use super::tokens::{KnownToken, TokenTable};
use crate::arena::Span;

/// Names every settable field of a header object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    /// Single value of a simple header (Call-ID, Content-Length, Subject...)
    Value,
    /// The name-addr or addr-spec of an address header
    Address,
    /// Unrecognised parameters, joined with `;`
    OtherParams,

    // Via
    ProtocolName,
    ProtocolVersion,
    Transport,
    Host,
    Port,
    Branch,
    Received,
    Maddr,
    Ttl,
    Rport,
    Alias,
    Comp,
    SigcompId,

    // Address family
    Tag,
    Expires,
    Q,
    Action,
    Cid,
    DiversionReason,
    Counter,
    Limit,
    Privacy,
    Screen,

    // CSeq / RAck
    Sequence,
    ResponseNum,
    Method,

    // Authentication
    AuthScheme,
    Realm,
    Domain,
    Nonce,
    Opaque,
    Stale,
    Algorithm,
    AkaVersion,
    Qop,
    Username,
    Uri,
    Response,
    Cnonce,
    NonceCount,
    Auts,
    IntegrityProtected,
    NextNonce,
    ResponseAuth,

    // Media types
    MediaType,
    MediaSubType,
    Boundary,
    Version,
    Base,
    Charset,

    // Leading-token headers
    DispositionType,
    Handling,
    SubsState,
    SubsReason,
    RetryAfter,
    EventPackage,
    EventId,
    OptionTag,
    Coding,
    LanguageTag,
    DeltaSeconds,
    Refresher,
    Comment,
    Duration,
    Protocol,
    Cause,
    Text,
    CallId,
    ToTag,
    FromTag,
    EarlyOnly,
    AnswerType,
    Require,
    OspsTag,
    Token,

    // Security agreement
    Mechanism,
    DigestAlgorithm,
    DigestQop,
    DigestVerify,
    SecAlgorithm,
    SecProtocol,
    SecMode,
    EncryptAlgorithm,
    SpiC,
    SpiS,
    PortC,
    PortS,

    // P-Access-Network-Info
    AccessType,
    CgiThreeGpp,
    UtranCellId,
    IwlanNodeId,
    DslLocation,
    CiThreeGpp2,
    NetworkProvided,

    // Charging
    IcidValue,
    IcidGeneratedAt,
    OrigIoi,
    TermIoi,
    Ccf,
    Ecf,
}

/// How a field's raw bytes are turned into a stored value
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Copied verbatim into the arena
    Text,
    /// Classified against a vocabulary, copied only when not recognised
    Token(&'static TokenTable),
    /// Decimal number not greater than `max`
    Number { max: u32 },
    /// Presence-only parameter
    Flag,
    /// Valueless or valued parameter (`;rport` or `;rport=5060`)
    FlagOrText,
    /// A name-addr / addr-spec, built through the URI dispatcher
    Address,
}

/// Describes one field of a header type
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    /// Parameter name as it appears on the wire, for `;name=value` fields
    pub param: Option<&'static str>,
    pub kind: FieldKind,
    /// Whether the field may occur more than once
    pub repeatable: bool,
}

impl FieldDescriptor {
    /// A field that is not written as a named parameter
    pub const fn positional(key: FieldKey, kind: FieldKind) -> Self {
        Self {
            key,
            param: None,
            kind,
            repeatable: false,
        }
    }

    /// A `;name=value` parameter
    pub const fn param(key: FieldKey, name: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            param: Some(name),
            kind,
            repeatable: false,
        }
    }

    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Whether `name` selects this parameter
    pub fn matches_param(&self, name: &[u8]) -> bool {
        self.param
            .map_or(false, |p| p.as_bytes().eq_ignore_ascii_case(name))
    }
}

/// Discriminant handed to a token setter alongside an optional arena span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discriminant {
    Known(KnownToken),
    Other,
}

/// A materialized token field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    /// Recognised token; nothing was copied
    Enumerated(KnownToken),
    /// Unrecognised token; its text lives in the arena
    Other(Span),
}

impl FieldValue {
    pub fn token(&self) -> Option<KnownToken> {
        match self {
            FieldValue::Enumerated(t) => Some(*t),
            FieldValue::Other(_) => None,
        }
    }

    pub fn other(&self) -> Option<Span> {
        match self {
            FieldValue::Enumerated(_) => None,
            FieldValue::Other(span) => Some(*span),
        }
    }

    pub fn discriminant(&self) -> Discriminant {
        match self {
            FieldValue::Enumerated(t) => Discriminant::Known(*t),
            FieldValue::Other(_) => Discriminant::Other,
        }
    }
}

/// A field value as stored on a header object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    Text(Span),
    Token(FieldValue),
    Number(u32),
    Flag,
}
