//! Field-descriptor tables, one per header family.
//!
//! These tables are the whole per-header knowledge of the builders: the
//! grammar uses them to tell known parameters from extension parameters and
//! the materializer uses them to decide how each field is stored.

use super::field::{FieldDescriptor as D, FieldKey as K, FieldKind};
use super::header_type::HeaderType;
use super::tokens::{
    AccessType, AnswerType, AuthAlgorithm, AuthScheme, Compression, DispositionHandling, DispositionType,
    EncryptionAlgorithm, MediaSubType, MediaType, Method, OspsTag, Qop, ReasonProtocol, Refresher,
    SecurityAlgorithm, SecurityMechanism, SecurityMode, SecurityProtocol, SubsState, SubsStateReason,
    TokenTable, Transport,
};

const TEXT: FieldKind = FieldKind::Text;
const FLAG: FieldKind = FieldKind::Flag;
const NUMBER: FieldKind = FieldKind::Number { max: u32::MAX };
const PORT: FieldKind = FieldKind::Number { max: 65535 };
const TTL: FieldKind = FieldKind::Number { max: 255 };
const CSEQ: FieldKind = FieldKind::Number { max: i32::MAX as u32 };

const fn token(table: &'static TokenTable) -> FieldKind {
    FieldKind::Token(table)
}

static VIA: &[D] = &[
    D::positional(K::ProtocolName, TEXT),
    D::positional(K::ProtocolVersion, TEXT),
    D::positional(K::Transport, token(&Transport::TABLE)),
    D::positional(K::Host, TEXT),
    D::positional(K::Port, PORT),
    D::param(K::Branch, "branch", TEXT),
    D::param(K::Received, "received", TEXT),
    D::param(K::Maddr, "maddr", TEXT),
    D::param(K::Ttl, "ttl", TTL),
    D::param(K::Rport, "rport", FieldKind::FlagOrText),
    D::param(K::Alias, "alias", FLAG),
    D::param(K::Comp, "comp", token(&Compression::TABLE)),
    D::param(K::SigcompId, "sigcomp-id", TEXT),
];

static CONTACT: &[D] = &[
    D::positional(K::Address, FieldKind::Address),
    D::param(K::Q, "q", TEXT),
    D::param(K::Expires, "expires", NUMBER),
    D::param(K::Action, "action", TEXT),
];

static PARTY: &[D] = &[
    D::positional(K::Address, FieldKind::Address),
    D::param(K::Tag, "tag", TEXT),
];

static REFERRED_BY: &[D] = &[
    D::positional(K::Address, FieldKind::Address),
    D::param(K::Cid, "cid", TEXT),
];

static DIVERSION: &[D] = &[
    D::positional(K::Address, FieldKind::Address),
    D::param(K::DiversionReason, "reason", TEXT),
    D::param(K::Counter, "counter", NUMBER),
    D::param(K::Limit, "limit", NUMBER),
    D::param(K::Privacy, "privacy", TEXT),
    D::param(K::Screen, "screen", TEXT),
];

static ADDRESS_ONLY: &[D] = &[D::positional(K::Address, FieldKind::Address)];

static CSEQ_FIELDS: &[D] = &[
    D::positional(K::Sequence, CSEQ),
    D::positional(K::Method, token(&Method::TABLE)),
];

static RACK: &[D] = &[
    D::positional(K::ResponseNum, NUMBER),
    D::positional(K::Sequence, CSEQ),
    D::positional(K::Method, token(&Method::TABLE)),
];

static CHALLENGE: &[D] = &[
    D::positional(K::AuthScheme, token(&AuthScheme::TABLE)),
    D::positional(K::AkaVersion, NUMBER),
    D::param(K::Realm, "realm", TEXT),
    D::param(K::Domain, "domain", TEXT),
    D::param(K::Nonce, "nonce", TEXT),
    D::param(K::Opaque, "opaque", TEXT),
    D::param(K::Stale, "stale", TEXT),
    D::param(K::Algorithm, "algorithm", token(&AuthAlgorithm::TABLE)),
    D::param(K::Qop, "qop", TEXT),
];

static CREDENTIALS: &[D] = &[
    D::positional(K::AuthScheme, token(&AuthScheme::TABLE)),
    D::positional(K::AkaVersion, NUMBER),
    D::param(K::Username, "username", TEXT),
    D::param(K::Realm, "realm", TEXT),
    D::param(K::Nonce, "nonce", TEXT),
    D::param(K::Uri, "uri", TEXT),
    D::param(K::Response, "response", TEXT),
    D::param(K::Algorithm, "algorithm", token(&AuthAlgorithm::TABLE)),
    D::param(K::Cnonce, "cnonce", TEXT),
    D::param(K::Opaque, "opaque", TEXT),
    D::param(K::Qop, "qop", token(&Qop::TABLE)),
    D::param(K::NonceCount, "nc", TEXT),
    D::param(K::Auts, "auts", TEXT),
    D::param(K::IntegrityProtected, "integrity-protected", TEXT),
];

static AUTH_INFO: &[D] = &[
    D::param(K::NextNonce, "nextnonce", TEXT),
    D::param(K::Qop, "qop", token(&Qop::TABLE)),
    D::param(K::ResponseAuth, "rspauth", TEXT),
    D::param(K::Cnonce, "cnonce", TEXT),
    D::param(K::NonceCount, "nc", TEXT),
];

static CONTENT_TYPE: &[D] = &[
    D::positional(K::MediaType, token(&MediaType::TABLE)),
    D::positional(K::MediaSubType, token(&MediaSubType::TABLE)),
    D::param(K::Boundary, "boundary", TEXT),
    D::param(K::Version, "version", TEXT),
    D::param(K::Base, "base", TEXT),
    D::param(K::Charset, "charset", TEXT),
];

static ACCEPT: &[D] = &[
    D::positional(K::MediaType, token(&MediaType::TABLE)),
    D::positional(K::MediaSubType, token(&MediaSubType::TABLE)),
    D::param(K::Q, "q", TEXT),
];

static CONTENT_DISPOSITION: &[D] = &[
    D::positional(K::DispositionType, token(&DispositionType::TABLE)),
    D::param(K::Handling, "handling", token(&DispositionHandling::TABLE)),
];

static SUBSCRIPTION_STATE: &[D] = &[
    D::positional(K::SubsState, token(&SubsState::TABLE)),
    D::param(K::SubsReason, "reason", token(&SubsStateReason::TABLE)),
    D::param(K::Expires, "expires", NUMBER),
    D::param(K::RetryAfter, "retry-after", NUMBER),
];

static EVENT: &[D] = &[
    D::positional(K::EventPackage, TEXT),
    D::param(K::EventId, "id", TEXT),
];

static ALLOW_EVENTS: &[D] = &[D::positional(K::EventPackage, TEXT)];

static SECURITY: &[D] = &[
    D::positional(K::Mechanism, token(&SecurityMechanism::TABLE)),
    D::param(K::Q, "q", TEXT),
    D::param(K::DigestAlgorithm, "d-alg", TEXT),
    D::param(K::DigestQop, "d-qop", TEXT),
    D::param(K::DigestVerify, "d-ver", TEXT),
    D::param(K::SecAlgorithm, "alg", token(&SecurityAlgorithm::TABLE)),
    D::param(K::SecProtocol, "prot", token(&SecurityProtocol::TABLE)),
    D::param(K::SecMode, "mod", token(&SecurityMode::TABLE)),
    D::param(K::EncryptAlgorithm, "ealg", token(&EncryptionAlgorithm::TABLE)),
    D::param(K::SpiC, "spi-c", NUMBER),
    D::param(K::SpiS, "spi-s", NUMBER),
    D::param(K::PortC, "port-c", PORT),
    D::param(K::PortS, "port-s", PORT),
];

static OPTION_TAG: &[D] = &[D::positional(K::OptionTag, TEXT)];

static ALLOW: &[D] = &[D::positional(K::Method, token(&Method::TABLE))];

static ACCEPT_ENCODING: &[D] = &[D::positional(K::Coding, TEXT), D::param(K::Q, "q", TEXT)];

static ACCEPT_LANGUAGE: &[D] = &[D::positional(K::LanguageTag, TEXT), D::param(K::Q, "q", TEXT)];

static CONTENT_ENCODING: &[D] = &[D::positional(K::Coding, TEXT)];

static CONTENT_LANGUAGE: &[D] = &[D::positional(K::LanguageTag, TEXT)];

static NUMBER_VALUE: &[D] = &[D::positional(K::Value, NUMBER)];

static MIN_SE: &[D] = &[D::positional(K::DeltaSeconds, NUMBER)];

static SESSION_EXPIRES: &[D] = &[
    D::positional(K::DeltaSeconds, NUMBER),
    D::param(K::Refresher, "refresher", token(&Refresher::TABLE)),
];

static RETRY_AFTER: &[D] = &[
    D::positional(K::DeltaSeconds, NUMBER),
    D::positional(K::Comment, TEXT),
    D::param(K::Duration, "duration", NUMBER),
];

static REASON: &[D] = &[
    D::positional(K::Protocol, token(&ReasonProtocol::TABLE)),
    D::param(K::Cause, "cause", NUMBER),
    D::param(K::Text, "text", TEXT),
];

static REPLACES: &[D] = &[
    D::positional(K::CallId, TEXT),
    D::param(K::ToTag, "to-tag", TEXT),
    D::param(K::FromTag, "from-tag", TEXT),
    D::param(K::EarlyOnly, "early-only", FLAG),
];

static ANSWER_MODE: &[D] = &[
    D::positional(K::AnswerType, token(&AnswerType::TABLE)),
    D::param(K::Require, "require", FLAG),
];

static ACCESS_NETWORK_INFO: &[D] = &[
    D::positional(K::AccessType, token(&AccessType::TABLE)),
    D::param(K::CgiThreeGpp, "cgi-3gpp", TEXT),
    D::param(K::UtranCellId, "utran-cell-id-3gpp", TEXT),
    D::param(K::IwlanNodeId, "i-wlan-node-id", TEXT),
    D::param(K::DslLocation, "dsl-location", TEXT),
    D::param(K::CiThreeGpp2, "ci-3gpp2", TEXT),
    D::param(K::NetworkProvided, "network-provided", FLAG),
];

static OSPS: &[D] = &[D::positional(K::OspsTag, token(&OspsTag::TABLE))];

static MEDIA_AUTHORIZATION: &[D] = &[D::positional(K::Token, TEXT)];

static CHARGING_VECTOR: &[D] = &[
    D::param(K::IcidValue, "icid-value", TEXT),
    D::param(K::IcidGeneratedAt, "icid-generated-at", TEXT),
    D::param(K::OrigIoi, "orig-ioi", TEXT),
    D::param(K::TermIoi, "term-ioi", TEXT),
];

static CHARGING_ADDRESSES: &[D] = &[
    D::param(K::Ccf, "ccf", TEXT).repeatable(),
    D::param(K::Ecf, "ecf", TEXT).repeatable(),
];

static TEXT_VALUE: &[D] = &[D::positional(K::Value, TEXT)];

impl HeaderType {
    /// The fields this header type can carry
    pub fn fields(self) -> &'static [D] {
        match self {
            HeaderType::Via => VIA,
            HeaderType::Contact => CONTACT,
            HeaderType::From | HeaderType::To => PARTY,
            HeaderType::ReferredBy => REFERRED_BY,
            HeaderType::Diversion => DIVERSION,
            HeaderType::Route
            | HeaderType::RecordRoute
            | HeaderType::Path
            | HeaderType::ServiceRoute
            | HeaderType::ReplyTo
            | HeaderType::ReferTo
            | HeaderType::PAssertedIdentity
            | HeaderType::PPreferredIdentity
            | HeaderType::PCalledPartyId
            | HeaderType::PAssociatedUri
            | HeaderType::PProfileKey
            | HeaderType::PUserDatabase
            | HeaderType::PDcsTracePartyId => ADDRESS_ONLY,
            HeaderType::CSeq => CSEQ_FIELDS,
            HeaderType::RAck => RACK,
            HeaderType::WwwAuthenticate | HeaderType::ProxyAuthenticate => CHALLENGE,
            HeaderType::Authorization | HeaderType::ProxyAuthorization => CREDENTIALS,
            HeaderType::AuthenticationInfo => AUTH_INFO,
            HeaderType::ContentType => CONTENT_TYPE,
            HeaderType::Accept => ACCEPT,
            HeaderType::ContentDisposition => CONTENT_DISPOSITION,
            HeaderType::SubscriptionState => SUBSCRIPTION_STATE,
            HeaderType::Event => EVENT,
            HeaderType::AllowEvents => ALLOW_EVENTS,
            HeaderType::SecurityClient | HeaderType::SecurityServer | HeaderType::SecurityVerify => SECURITY,
            HeaderType::Supported | HeaderType::Require | HeaderType::ProxyRequire | HeaderType::Unsupported => {
                OPTION_TAG
            }
            HeaderType::Allow => ALLOW,
            HeaderType::AcceptEncoding => ACCEPT_ENCODING,
            HeaderType::AcceptLanguage => ACCEPT_LANGUAGE,
            HeaderType::ContentEncoding => CONTENT_ENCODING,
            HeaderType::ContentLanguage => CONTENT_LANGUAGE,
            HeaderType::ContentLength
            | HeaderType::MaxForwards
            | HeaderType::Expires
            | HeaderType::MinExpires
            | HeaderType::RSeq => NUMBER_VALUE,
            HeaderType::MinSe => MIN_SE,
            HeaderType::SessionExpires => SESSION_EXPIRES,
            HeaderType::RetryAfter => RETRY_AFTER,
            HeaderType::Reason => REASON,
            HeaderType::Replaces => REPLACES,
            HeaderType::AnswerMode | HeaderType::PrivAnswerMode => ANSWER_MODE,
            HeaderType::PAccessNetworkInfo => ACCESS_NETWORK_INFO,
            HeaderType::PDcsOsps => OSPS,
            HeaderType::PMediaAuthorization => MEDIA_AUTHORIZATION,
            HeaderType::PChargingVector => CHARGING_VECTOR,
            HeaderType::PChargingFunctionAddresses => CHARGING_ADDRESSES,
            HeaderType::CallId
            | HeaderType::Subject
            | HeaderType::Organization
            | HeaderType::UserAgent
            | HeaderType::Server
            | HeaderType::Date
            | HeaderType::Timestamp
            | HeaderType::PVisitedNetworkId
            | HeaderType::Other => TEXT_VALUE,
        }
    }

    /// Descriptor of `key` for this header type
    pub fn descriptor(self, key: K) -> Option<&'static D> {
        self.fields().iter().find(|d| d.key == key)
    }

    /// Descriptor of the `;name=value` parameter called `name`
    pub fn param_descriptor(self, name: &[u8]) -> Option<&'static D> {
        self.fields().iter().find(|d| d.matches_param(name))
    }
}
