//! Closed vocabularies of well-known SIP tokens.
//!
//! Every vocabulary is an enum with a [`TokenTable`] used by the field
//! materializer to classify raw bytes. Anything not in a table is carried as
//! an "other" value whose text is copied into the destination arena.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lookup table from wire text to a known token
#[derive(Debug)]
pub struct TokenTable {
    /// Vocabulary name, for diagnostics
    pub name: &'static str,
    /// Whether wire text must match exactly
    pub case_sensitive: bool,
    pub entries: &'static [(&'static str, KnownToken)],
}

impl TokenTable {
    /// Classifies raw bytes against the table
    pub fn lookup(&self, text: &[u8]) -> Option<KnownToken> {
        self.entries.iter().find_map(|(name, token)| {
            let hit = if self.case_sensitive {
                name.as_bytes() == text
            } else {
                name.as_bytes().eq_ignore_ascii_case(text)
            };
            hit.then_some(*token)
        })
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident as $variant:ident, case_sensitive = $cs:literal {
            $($tok:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($tok),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$tok),+];

            pub const TABLE: TokenTable = TokenTable {
                name: stringify!($name),
                case_sensitive: $cs,
                entries: &[$(($text, KnownToken::$variant($name::$tok))),+],
            };

            /// Canonical wire text
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$tok => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for KnownToken {
            fn from(value: $name) -> Self {
                KnownToken::$variant(value)
            }
        }
    };
}

vocabulary! {
    /// Transport protocols
    Transport as Transport, case_sensitive = false {
        Udp => "UDP",
        Tcp => "TCP",
        Sctp => "SCTP",
        Tls => "TLS",
        TlsSctp => "TLS-SCTP",
        Ws => "WS",
        Wss => "WSS",
    }
}

vocabulary! {
    /// Request methods. Method names are case-sensitive
    Method as Method, case_sensitive = true {
        Invite => "INVITE",
        Ack => "ACK",
        Bye => "BYE",
        Cancel => "CANCEL",
        Register => "REGISTER",
        Options => "OPTIONS",
        Prack => "PRACK",
        Subscribe => "SUBSCRIBE",
        Notify => "NOTIFY",
        Refer => "REFER",
        Info => "INFO",
        Update => "UPDATE",
        Message => "MESSAGE",
        Publish => "PUBLISH",
    }
}

vocabulary! {
    MediaType as MediaType, case_sensitive = false {
        Text => "text",
        Image => "image",
        Audio => "audio",
        Video => "video",
        Application => "application",
        Multipart => "multipart",
        Message => "message",
    }
}

vocabulary! {
    MediaSubType as MediaSubType, case_sensitive = false {
        Plain => "plain",
        Sdp => "sdp",
        Isup => "isup",
        Qsig => "qsig",
        Mixed => "mixed",
        Alternative => "alternative",
        Related => "related",
        SipFrag => "sipfrag",
        Http => "http",
        Html => "html",
        Cpim => "cpim",
        PidfXml => "pidf+xml",
        XpidfXml => "xpidf+xml",
        PartialPidfXml => "partial-pidf+xml",
        DialogInfoXml => "dialog-info+xml",
        RegInfoXml => "reginfo+xml",
        WatcherInfoXml => "watcherinfo+xml",
        ResourceListsXml => "resource-lists+xml",
        RlmiXml => "rlmi+xml",
        SimpleMessageSummary => "simple-message-summary",
    }
}

vocabulary! {
    AuthScheme as AuthScheme, case_sensitive = false {
        Digest => "Digest",
        Basic => "Basic",
    }
}

vocabulary! {
    /// Digest algorithms, without any AKA version prefix
    AuthAlgorithm as AuthAlgorithm, case_sensitive = false {
        Md5 => "MD5",
        Md5Sess => "MD5-sess",
        Sha256 => "SHA-256",
        Sha256Sess => "SHA-256-sess",
    }
}

vocabulary! {
    Qop as Qop, case_sensitive = false {
        Auth => "auth",
        AuthInt => "auth-int",
    }
}

vocabulary! {
    DispositionType as Disposition, case_sensitive = false {
        Render => "render",
        Session => "session",
        Icon => "icon",
        Alert => "alert",
        Signal => "signal",
        EarlySession => "early-session",
    }
}

vocabulary! {
    DispositionHandling as Handling, case_sensitive = false {
        Optional => "optional",
        Required => "required",
    }
}

vocabulary! {
    SubsState as SubsState, case_sensitive = false {
        Active => "active",
        Pending => "pending",
        Terminated => "terminated",
    }
}

vocabulary! {
    SubsStateReason as SubsReason, case_sensitive = false {
        Deactivated => "deactivated",
        Probation => "probation",
        Rejected => "rejected",
        Timeout => "timeout",
        Giveup => "giveup",
        NoResource => "noresource",
    }
}

vocabulary! {
    /// Access network types carried by P-Access-Network-Info
    AccessType as AccessType, case_sensitive = false {
        Ieee80211 => "IEEE-802.11",
        Ieee80211a => "IEEE-802.11a",
        Ieee80211b => "IEEE-802.11b",
        Ieee80211g => "IEEE-802.11g",
        Geran => "3GPP-GERAN",
        UtranFdd => "3GPP-UTRAN-FDD",
        UtranTdd => "3GPP-UTRAN-TDD",
        EutranFdd => "3GPP-E-UTRAN-FDD",
        EutranTdd => "3GPP-E-UTRAN-TDD",
        Cdma2000 => "3GPP-CDMA2000",
        Adsl => "ADSL",
        Adsl2 => "ADSL2",
        Adsl2Plus => "ADSL2+",
        Radsl => "RADSL",
        Sdsl => "SDSL",
        Hdsl => "HDSL",
        Hdsl2 => "HDSL2",
        GShdsl => "G.SHDSL",
        Vdsl => "VDSL",
        Idsl => "IDSL",
        Docsis => "DOCSIS",
    }
}

vocabulary! {
    SecurityMechanism as Mechanism, case_sensitive = false {
        Digest => "digest",
        Tls => "tls",
        IpsecIke => "ipsec-ike",
        IpsecMan => "ipsec-man",
        Ipsec3gpp => "ipsec-3gpp",
    }
}

vocabulary! {
    SecurityAlgorithm as SecAlgorithm, case_sensitive = false {
        HmacMd596 => "hmac-md5-96",
        HmacSha196 => "hmac-sha-1-96",
    }
}

vocabulary! {
    SecurityProtocol as SecProtocol, case_sensitive = false {
        Ah => "ah",
        Esp => "esp",
    }
}

vocabulary! {
    SecurityMode as SecMode, case_sensitive = false {
        Trans => "trans",
        Tun => "tun",
        UdpEncTun => "UDP-enc-tun",
    }
}

vocabulary! {
    EncryptionAlgorithm as Encryption, case_sensitive = false {
        DesEde3Cbc => "des-ede3-cbc",
        AesCbc => "aes-cbc",
        Null => "null",
    }
}

vocabulary! {
    AnswerType as Answer, case_sensitive = false {
        Manual => "Manual",
        Auto => "Auto",
    }
}

vocabulary! {
    OspsTag as Osps, case_sensitive = false {
        Blv => "BLV",
        Ei => "EI",
        Rwt => "RWT",
    }
}

vocabulary! {
    /// Values of the SIP URL `user` parameter
    UserParam as User, case_sensitive = false {
        Phone => "phone",
        Ip => "ip",
        Dialstring => "dialstring",
    }
}

vocabulary! {
    Compression as Compression, case_sensitive = false {
        Sigcomp => "sigcomp",
    }
}

vocabulary! {
    Refresher as Refresher, case_sensitive = false {
        Uac => "uac",
        Uas => "uas",
    }
}

vocabulary! {
    /// Calling party category
    Cpc as Cpc, case_sensitive = false {
        Ordinary => "ordinary",
        Operator => "operator",
        Payphone => "payphone",
        Test => "test",
        Cellular => "cellular",
        CellularRoaming => "cellular-roaming",
        Emergency => "emergency",
        Prison => "prison",
    }
}

vocabulary! {
    /// Protocols of a Diameter URI
    DiameterProtocol as Diameter, case_sensitive = false {
        Diameter => "diameter",
        Radius => "radius",
        TacacsPlus => "tacacs+",
    }
}

vocabulary! {
    ReasonProtocol as Reason, case_sensitive = false {
        Sip => "SIP",
        Q850 => "Q.850",
    }
}

/// Any token from a known vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownToken {
    Transport(Transport),
    Method(Method),
    MediaType(MediaType),
    MediaSubType(MediaSubType),
    AuthScheme(AuthScheme),
    AuthAlgorithm(AuthAlgorithm),
    Qop(Qop),
    Disposition(DispositionType),
    Handling(DispositionHandling),
    SubsState(SubsState),
    SubsReason(SubsStateReason),
    AccessType(AccessType),
    Mechanism(SecurityMechanism),
    SecAlgorithm(SecurityAlgorithm),
    SecProtocol(SecurityProtocol),
    SecMode(SecurityMode),
    Encryption(EncryptionAlgorithm),
    Answer(AnswerType),
    Osps(OspsTag),
    User(UserParam),
    Compression(Compression),
    Refresher(Refresher),
    Cpc(Cpc),
    Diameter(DiameterProtocol),
    Reason(ReasonProtocol),
}

impl KnownToken {
    /// Canonical wire text of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownToken::Transport(t) => t.as_str(),
            KnownToken::Method(t) => t.as_str(),
            KnownToken::MediaType(t) => t.as_str(),
            KnownToken::MediaSubType(t) => t.as_str(),
            KnownToken::AuthScheme(t) => t.as_str(),
            KnownToken::AuthAlgorithm(t) => t.as_str(),
            KnownToken::Qop(t) => t.as_str(),
            KnownToken::Disposition(t) => t.as_str(),
            KnownToken::Handling(t) => t.as_str(),
            KnownToken::SubsState(t) => t.as_str(),
            KnownToken::SubsReason(t) => t.as_str(),
            KnownToken::AccessType(t) => t.as_str(),
            KnownToken::Mechanism(t) => t.as_str(),
            KnownToken::SecAlgorithm(t) => t.as_str(),
            KnownToken::SecProtocol(t) => t.as_str(),
            KnownToken::SecMode(t) => t.as_str(),
            KnownToken::Encryption(t) => t.as_str(),
            KnownToken::Answer(t) => t.as_str(),
            KnownToken::Osps(t) => t.as_str(),
            KnownToken::User(t) => t.as_str(),
            KnownToken::Compression(t) => t.as_str(),
            KnownToken::Refresher(t) => t.as_str(),
            KnownToken::Cpc(t) => t.as_str(),
            KnownToken::Diameter(t) => t.as_str(),
            KnownToken::Reason(t) => t.as_str(),
        }
    }
}

impl fmt::Display for KnownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
