use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldValue;
use crate::arena::Span;

/// The four URI variants an address can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UriKind {
    /// `sip:` and `sips:`
    SipUrl,
    /// Any other `scheme:rest`, including `im:` and `pres:`
    AbsoluteUri,
    /// `tel:`
    TelUri,
    /// `aaa:` and `aaas:`
    DiameterUri,
}

impl UriKind {
    /// Parameter names the URI builder stores in dedicated fields. Any other
    /// parameter is kept as extension text
    pub fn known_params(self) -> &'static [&'static str] {
        match self {
            UriKind::SipUrl => &[
                "transport", "user", "method", "maddr", "ttl", "lr", "comp", "sigcomp-id", "cpc", "gr",
            ],
            UriKind::TelUri => &["ext", "isub", "postd", "phone-context", "enumdi"],
            UriKind::DiameterUri => &["transport", "protocol"],
            UriKind::AbsoluteUri => &[],
        }
    }

    pub fn is_known_param(self, name: &[u8]) -> bool {
        self.known_params()
            .iter()
            .any(|p| p.as_bytes().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for UriKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UriKind::SipUrl => "sip-url",
            UriKind::AbsoluteUri => "abs-uri",
            UriKind::TelUri => "tel-uri",
            UriKind::DiameterUri => "diameter-uri",
        };
        f.write_str(s)
    }
}

/// Loose-routing marker forms of a SIP URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LrParam {
    /// `;lr`
    Empty,
    /// `;lr=on`
    On,
    /// `;lr=true`
    True,
    /// `;lr=1`
    One,
}

impl LrParam {
    pub fn from_value(value: Option<&[u8]>) -> Option<LrParam> {
        match value {
            None => Some(LrParam::Empty),
            Some(v) if v.eq_ignore_ascii_case(b"on") => Some(LrParam::On),
            Some(v) if v.eq_ignore_ascii_case(b"true") => Some(LrParam::True),
            Some(b"1") => Some(LrParam::One),
            Some(_) => None,
        }
    }
}

/// A `sip:` or `sips:` URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipUrl {
    pub secure: bool,
    pub user: Option<Span>,
    pub password: Option<Span>,
    pub host: Option<Span>,
    pub port: Option<u16>,
    pub transport: Option<FieldValue>,
    pub user_param: Option<FieldValue>,
    pub maddr: Option<Span>,
    pub ttl: Option<u8>,
    pub method: Option<FieldValue>,
    pub comp: Option<FieldValue>,
    pub sigcomp_id: Option<Span>,
    pub lr: Option<LrParam>,
    pub cpc: Option<FieldValue>,
    pub gr: Option<Option<Span>>,
    /// Raw `?name=value&...` part
    pub headers: Option<Span>,
    /// Unrecognised URL parameters, joined with `;`
    pub other_params: Option<Span>,
}

/// A URI with an unrecognised scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteUri {
    pub scheme: Span,
    pub identifier: Span,
}

/// A `tel:` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelUri {
    /// Global numbers start with `+`
    pub global: bool,
    pub number: Span,
    pub extension: Option<Span>,
    pub isdn_subaddress: Option<Span>,
    pub post_dial: Option<Span>,
    pub context: Option<Span>,
    pub enumdi: bool,
    pub other_params: Option<Span>,
}

/// An `aaa:` or `aaas:` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiameterUri {
    pub secure: bool,
    pub host: Span,
    pub port: Option<u16>,
    pub transport: Option<FieldValue>,
    pub protocol: Option<FieldValue>,
    pub other_params: Option<Span>,
}

/// A built URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UriValue {
    Sip(SipUrl),
    Absolute(AbsoluteUri),
    Tel(TelUri),
    Diameter(DiameterUri),
}

impl UriValue {
    pub fn kind(&self) -> UriKind {
        match self {
            UriValue::Sip(_) => UriKind::SipUrl,
            UriValue::Absolute(_) => UriKind::AbsoluteUri,
            UriValue::Tel(_) => UriKind::TelUri,
            UriValue::Diameter(_) => UriKind::DiameterUri,
        }
    }

    pub fn as_sip(&self) -> Option<&SipUrl> {
        match self {
            UriValue::Sip(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_tel(&self) -> Option<&TelUri> {
        match self {
            UriValue::Tel(tel) => Some(tel),
            _ => None,
        }
    }

    pub fn as_absolute(&self) -> Option<&AbsoluteUri> {
        match self {
            UriValue::Absolute(abs) => Some(abs),
            _ => None,
        }
    }

    pub fn as_diameter(&self) -> Option<&DiameterUri> {
        match self {
            UriValue::Diameter(aaa) => Some(aaa),
            _ => None,
        }
    }
}

/// A name-addr or addr-spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: Option<Span>,
    pub uri: UriValue,
    /// Whether the URI was enclosed in `<>`
    pub angle_brackets: bool,
}
