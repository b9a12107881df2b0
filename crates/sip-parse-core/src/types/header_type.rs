use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldKey;

/// The syntactic family a header value belongs to.
///
/// The grammar picks its value rule from the shape and the field materializer
/// picks its descriptors from the header type, so adding a header in an
/// existing family is one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `SIP/2.0/UDP host:port;params`
    Via,
    /// `["display"] <uri>;params` or `uri;params`
    Address { list: bool, star: bool },
    /// Whitespace-separated leading values followed by `;params`
    Leads {
        keys: &'static [FieldKey],
        list: bool,
        allow_empty: bool,
    },
    /// `scheme name=value, name=value`, or just the parameter list
    Auth { scheme: bool },
    /// `type/subtype;params`
    MediaType { list: bool, allow_empty: bool },
    /// `name=value;name=value`
    Params,
    /// Raw text up to the end of the line
    Text,
}

impl Shape {
    /// Whether one header line may carry several comma-separated values
    pub fn is_list(&self) -> bool {
        match self {
            Shape::Via => true,
            Shape::Address { list, .. } => *list,
            Shape::Leads { list, .. } => *list,
            Shape::MediaType { list, .. } => *list,
            Shape::Auth { .. } | Shape::Params | Shape::Text => false,
        }
    }

    /// Whether an empty value is valid
    pub fn allows_empty(&self) -> bool {
        match self {
            Shape::Leads { allow_empty, .. } => *allow_empty,
            Shape::MediaType { allow_empty, .. } => *allow_empty,
            Shape::Text => true,
            Shape::Via | Shape::Address { .. } | Shape::Auth { .. } | Shape::Params => false,
        }
    }
}

const fn leads(keys: &'static [FieldKey]) -> Shape {
    Shape::Leads {
        keys,
        list: false,
        allow_empty: false,
    }
}

const fn lead_list(keys: &'static [FieldKey], allow_empty: bool) -> Shape {
    Shape::Leads {
        keys,
        list: true,
        allow_empty,
    }
}

const fn address(list: bool) -> Shape {
    Shape::Address { list, star: false }
}

macro_rules! header_types {
    ($($variant:ident => $name:literal, $compact:expr, $code:literal, $shape:expr;)+) => {
        /// Every header the parser builds objects for
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum HeaderType {
            $($variant),+
        }

        impl HeaderType {
            pub const ALL: &'static [HeaderType] = &[$(HeaderType::$variant),+];

            /// Canonical header name
            pub fn name(self) -> &'static str {
                match self {
                    $(HeaderType::$variant => $name),+
                }
            }

            /// Compact-form letter, if the header has one
            pub fn compact(self) -> Option<char> {
                match self {
                    $(HeaderType::$variant => $compact),+
                }
            }

            /// Internal prefix placed in front of a bare header value so the
            /// grammar knows which header rule to apply
            pub fn prefix(self) -> &'static [u8] {
                match self {
                    $(HeaderType::$variant => $code),+
                }
            }

            /// Syntactic family of the header value
            pub fn shape(self) -> Shape {
                match self {
                    $(HeaderType::$variant => $shape),+
                }
            }
        }
    };
}

header_types! {
    Via => "Via", Some('v'), b"VI:", Shape::Via;
    Contact => "Contact", Some('m'), b"CO:", Shape::Address { list: true, star: true };
    From => "From", Some('f'), b"FR:", address(false);
    To => "To", Some('t'), b"TO:", address(false);
    Route => "Route", None, b"RO:", address(true);
    RecordRoute => "Record-Route", None, b"RR:", address(true);
    Path => "Path", None, b"PA:", address(true);
    ServiceRoute => "Service-Route", None, b"SR:", address(true);
    ReplyTo => "Reply-To", None, b"RT:", address(false);
    ReferTo => "Refer-To", Some('r'), b"RF:", address(false);
    ReferredBy => "Referred-By", Some('b'), b"RB:", address(false);
    PAssertedIdentity => "P-Asserted-Identity", None, b"AI:", address(true);
    PPreferredIdentity => "P-Preferred-Identity", None, b"PI:", address(true);
    PCalledPartyId => "P-Called-Party-ID", None, b"CP:", address(false);
    PAssociatedUri => "P-Associated-URI", None, b"AU:", address(true);
    PProfileKey => "P-Profile-Key", None, b"PK:", address(false);
    PUserDatabase => "P-User-Database", None, b"UD:", address(false);
    PDcsTracePartyId => "P-DCS-Trace-Party-ID", None, b"TP:", address(false);
    Diversion => "Diversion", None, b"DV:", address(true);
    CSeq => "CSeq", None, b"CS:", leads(&[FieldKey::Sequence, FieldKey::Method]);
    RAck => "RAck", None, b"RA:", leads(&[FieldKey::ResponseNum, FieldKey::Sequence, FieldKey::Method]);
    Authorization => "Authorization", None, b"AZ:", Shape::Auth { scheme: true };
    ProxyAuthorization => "Proxy-Authorization", None, b"PZ:", Shape::Auth { scheme: true };
    WwwAuthenticate => "WWW-Authenticate", None, b"WA:", Shape::Auth { scheme: true };
    ProxyAuthenticate => "Proxy-Authenticate", None, b"PT:", Shape::Auth { scheme: true };
    AuthenticationInfo => "Authentication-Info", None, b"AF:", Shape::Auth { scheme: false };
    ContentType => "Content-Type", Some('c'), b"CT:", Shape::MediaType { list: false, allow_empty: false };
    Accept => "Accept", None, b"AC:", Shape::MediaType { list: true, allow_empty: true };
    ContentDisposition => "Content-Disposition", None, b"CD:", leads(&[FieldKey::DispositionType]);
    SubscriptionState => "Subscription-State", None, b"SS:", leads(&[FieldKey::SubsState]);
    Event => "Event", Some('o'), b"EV:", leads(&[FieldKey::EventPackage]);
    AllowEvents => "Allow-Events", Some('u'), b"AE:", lead_list(&[FieldKey::EventPackage], false);
    SecurityClient => "Security-Client", None, b"SC:", lead_list(&[FieldKey::Mechanism], false);
    SecurityServer => "Security-Server", None, b"SV:", lead_list(&[FieldKey::Mechanism], false);
    SecurityVerify => "Security-Verify", None, b"SY:", lead_list(&[FieldKey::Mechanism], false);
    Supported => "Supported", Some('k'), b"SU:", lead_list(&[FieldKey::OptionTag], true);
    Require => "Require", None, b"RQ:", lead_list(&[FieldKey::OptionTag], false);
    ProxyRequire => "Proxy-Require", None, b"PQ:", lead_list(&[FieldKey::OptionTag], false);
    Unsupported => "Unsupported", None, b"US:", lead_list(&[FieldKey::OptionTag], false);
    Allow => "Allow", None, b"AL:", lead_list(&[FieldKey::Method], true);
    AcceptEncoding => "Accept-Encoding", None, b"AN:", lead_list(&[FieldKey::Coding], true);
    AcceptLanguage => "Accept-Language", None, b"AG:", lead_list(&[FieldKey::LanguageTag], true);
    ContentEncoding => "Content-Encoding", Some('e'), b"CE:", lead_list(&[FieldKey::Coding], false);
    ContentLanguage => "Content-Language", None, b"CL:", lead_list(&[FieldKey::LanguageTag], false);
    ContentLength => "Content-Length", Some('l'), b"CN:", leads(&[FieldKey::Value]);
    MaxForwards => "Max-Forwards", None, b"MF:", leads(&[FieldKey::Value]);
    Expires => "Expires", None, b"EX:", leads(&[FieldKey::Value]);
    MinExpires => "Min-Expires", None, b"ME:", leads(&[FieldKey::Value]);
    RSeq => "RSeq", None, b"RS:", leads(&[FieldKey::Value]);
    MinSe => "Min-SE", None, b"MS:", leads(&[FieldKey::DeltaSeconds]);
    SessionExpires => "Session-Expires", Some('x'), b"SE:", leads(&[FieldKey::DeltaSeconds]);
    RetryAfter => "Retry-After", None, b"RY:", leads(&[FieldKey::DeltaSeconds]);
    Reason => "Reason", None, b"RE:", lead_list(&[FieldKey::Protocol], false);
    Replaces => "Replaces", None, b"RP:", leads(&[FieldKey::CallId]);
    AnswerMode => "Answer-Mode", None, b"AM:", leads(&[FieldKey::AnswerType]);
    PrivAnswerMode => "Priv-Answer-Mode", None, b"PM:", leads(&[FieldKey::AnswerType]);
    PAccessNetworkInfo => "P-Access-Network-Info", None, b"NI:", leads(&[FieldKey::AccessType]);
    PDcsOsps => "P-DCS-OSPS", None, b"OS:", leads(&[FieldKey::OspsTag]);
    PMediaAuthorization => "P-Media-Authorization", None, b"MA:", lead_list(&[FieldKey::Token], false);
    PChargingVector => "P-Charging-Vector", None, b"CV:", Shape::Params;
    PChargingFunctionAddresses => "P-Charging-Function-Addresses", None, b"CF:", Shape::Params;
    CallId => "Call-ID", Some('i'), b"CI:", Shape::Text;
    Subject => "Subject", Some('s'), b"SJ:", Shape::Text;
    Organization => "Organization", None, b"OR:", Shape::Text;
    UserAgent => "User-Agent", None, b"UA:", Shape::Text;
    Server => "Server", None, b"SO:", Shape::Text;
    Date => "Date", None, b"DT:", Shape::Text;
    Timestamp => "Timestamp", None, b"TS:", Shape::Text;
    PVisitedNetworkId => "P-Visited-Network-ID", None, b"VN:", Shape::Text;
    Other => "Other", None, b"XX:", Shape::Text;
}

impl HeaderType {
    /// Looks a header up by its full or compact name. Unknown names map to
    /// [`HeaderType::Other`]
    pub fn from_name(name: &[u8]) -> HeaderType {
        Self::lookup(name).unwrap_or(HeaderType::Other)
    }

    /// Looks a header up by its full or compact name
    pub fn lookup(name: &[u8]) -> Option<HeaderType> {
        Self::ALL
            .iter()
            .copied()
            .filter(|t| *t != HeaderType::Other)
            .find(|t| t.name().as_bytes().eq_ignore_ascii_case(name) || t.matches_compact(name))
    }

    /// Whether `name` is this header's compact letter
    pub fn matches_compact(self, name: &[u8]) -> bool {
        match (self.compact(), name) {
            (Some(c), [b]) => b.eq_ignore_ascii_case(&(c as u8)),
            _ => false,
        }
    }

    /// Finds the header whose internal prefix is `prefix`
    pub fn from_prefix(prefix: &[u8]) -> Option<HeaderType> {
        Self::ALL.iter().copied().find(|t| t.prefix() == prefix)
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the caller asked the parser to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseType {
    /// A start line followed by header lines, attached to a message
    Message,
    /// Header lines appended to a generic header list
    HeaderList,
    /// One header filled into a pre-allocated standalone object
    Header(HeaderType),
    /// One name-addr or addr-spec
    Address,
    /// Only report which URI variant the input is
    UriProbe,
}
