// URI recognisers (RFC 3261 Section 25.1, RFC 3966, RFC 6733)
// SIP-URI  = "sip:" [ userinfo ] hostport uri-parameters [ headers ]
// telephone-uri = "tel:" telephone-subscriber
// aaa-URI  = "aaa://" FQDN [ port ] [ transport ] [ protocol ]
//
// The recognisers only find where each part is. Parameters the URI builders
// have a slot for are returned by position; all others are returned as
// extension spans for the URL accumulator.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1, take_while_m_n},
    character::complete::digit1,
    combinator::{consumed, opt, recognize, rest},
    multi::many0,
    sequence::{pair, preceded, terminated},
};

use super::separators::{laquot, raquot};
use super::token::{host, quoted_string, reject, token_words};
use super::ParseResult;
use crate::parsed::{InputSpan, ParsedAddress, UriParam, UriPayload};
use crate::types::UriKind;

/// Where a URI stops and whether it may carry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMode {
    /// Inside `<...>`
    Bracketed,
    /// A Request-URI, which ends at the space before the version
    RequestLine,
    /// An addr-spec without brackets. Its `;params` belong to the header
    Bare,
    /// An input holding nothing but the URI
    Full,
}

impl UriMode {
    fn ends_at(self, c: u8) -> bool {
        match self {
            UriMode::Bracketed => c == b'>',
            UriMode::RequestLine => matches!(c, b' ' | b'\r' | b'\n'),
            UriMode::Bare => matches!(c, b';' | b',' | b' ' | b'\t' | b'\r' | b'\n' | b'>'),
            UriMode::Full => matches!(c, b' ' | b'\t' | b'\r' | b'\n'),
        }
    }

    fn allows_params(self) -> bool {
        self != UriMode::Bare
    }
}

fn is_user_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"-_.!~*'()%&=+$,;?/".contains(&c)
}

fn is_password_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"-_.!~*'()%&=+$,".contains(&c)
}

fn is_uri_param_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"-_.!~*'()%[]/:&+$".contains(&c)
}

fn is_uri_header_char(c: u8) -> bool {
    is_uri_param_char(c) || b"?=@".contains(&c)
}

fn is_phone_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"+-.()*#%".contains(&c)
}

fn is_scheme_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'+' || c == b'-' || c == b'.'
}

/// A recognised URI with its unrecognised parameters
pub type UriMatch = (UriPayload, Vec<InputSpan>);

/// Recognises a URI of any scheme. `im:` and `pres:` have no dedicated
/// variant and come out as absolute URIs
pub fn uri<'a>(base: &'a [u8], input: &'a [u8], mode: UriMode) -> ParseResult<'a, UriMatch> {
    let (after, extent) = take_while1(move |c: u8| !mode.ends_at(c))(input)?;
    let (tail, scheme) = recognize(pair(
        take_while_m_n(1, 1, |c: u8| c.is_ascii_alphabetic()),
        take_while(is_scheme_char),
    ))(extent)?;
    let (tail, _) = tag(b":")(tail)?;

    let (leftover, found) = if scheme.eq_ignore_ascii_case(b"sip") {
        sip(base, tail, false, mode)?
    } else if scheme.eq_ignore_ascii_case(b"sips") {
        sip(base, tail, true, mode)?
    } else if scheme.eq_ignore_ascii_case(b"tel") {
        tel(base, tail, mode)?
    } else if scheme.eq_ignore_ascii_case(b"aaa") {
        diameter(base, tail, false, mode)?
    } else if scheme.eq_ignore_ascii_case(b"aaas") {
        diameter(base, tail, true, mode)?
    } else {
        absolute(base, scheme, tail)?
    };

    if !leftover.is_empty() {
        return reject(leftover);
    }
    Ok((after, found))
}

// userinfo = ( user / telephone-subscriber ) [ ":" password ] "@"
fn userinfo(input: &[u8]) -> ParseResult<(&[u8], Option<&[u8]>)> {
    terminated(
        pair(take_while1(is_user_char), opt(preceded(tag(b":"), take_while(is_password_char)))),
        tag(b"@"),
    )(input)
}

fn port(input: &[u8]) -> ParseResult<Option<&[u8]>> {
    opt(preceded(tag(b":"), digit1))(input)
}

/// `;name[=value]` parameters, split into known and extension parameters
fn uri_params<'a>(
    base: &'a [u8],
    input: &'a [u8],
    kind: UriKind,
    mode: UriMode,
) -> ParseResult<'a, (Vec<UriParam>, Vec<InputSpan>)> {
    let mut known = Vec::new();
    let mut extensions = Vec::new();
    if !mode.allows_params() {
        return Ok((input, (known, extensions)));
    }

    let (input, params) = many0(preceded(
        tag(b";"),
        consumed(pair(
            take_while1(is_uri_param_char),
            opt(preceded(tag(b"="), take_while(is_uri_param_char))),
        )),
    ))(input)?;

    for (whole, (name, value)) in params {
        if kind.is_known_param(name) {
            known.push(UriParam {
                name: InputSpan::of(base, name),
                value: value.map(|v| InputSpan::of(base, v)),
            });
        } else {
            extensions.push(InputSpan::of(base, whole));
        }
    }
    Ok((input, (known, extensions)))
}

fn sip<'a>(base: &'a [u8], input: &'a [u8], secure: bool, mode: UriMode) -> ParseResult<'a, UriMatch> {
    let (input, userinfo) = opt(userinfo)(input)?;
    let (input, host) = host(input)?;
    let (input, port) = port(input)?;
    let (input, (params, extensions)) = uri_params(base, input, UriKind::SipUrl, mode)?;
    let (input, headers) = if mode.allows_params() {
        opt(preceded(tag(b"?"), take_while1(is_uri_header_char)))(input)?
    } else {
        (input, None)
    };

    let span = |s: &'a [u8]| InputSpan::of(base, s);
    let payload = UriPayload::Sip {
        secure,
        user: userinfo.map(|(user, _)| span(user)),
        password: userinfo.and_then(|(_, password)| password).map(span),
        host: span(host),
        port: port.map(span),
        params,
        headers: headers.map(span),
    };
    Ok((input, (payload, extensions)))
}

fn tel<'a>(base: &'a [u8], input: &'a [u8], mode: UriMode) -> ParseResult<'a, UriMatch> {
    let (input, number) = take_while1(is_phone_char)(input)?;
    let (input, (params, extensions)) = uri_params(base, input, UriKind::TelUri, mode)?;
    let payload = UriPayload::Tel {
        number: InputSpan::of(base, number),
        params,
    };
    Ok((input, (payload, extensions)))
}

fn diameter<'a>(base: &'a [u8], input: &'a [u8], secure: bool, mode: UriMode) -> ParseResult<'a, UriMatch> {
    let (input, _) = tag(b"//")(input)?;
    let (input, host) = host(input)?;
    let (input, port) = port(input)?;
    let (input, (params, extensions)) = uri_params(base, input, UriKind::DiameterUri, mode)?;
    let payload = UriPayload::Diameter {
        secure,
        host: InputSpan::of(base, host),
        port: port.map(|p| InputSpan::of(base, p)),
        params,
    };
    Ok((input, (payload, extensions)))
}

fn absolute<'a>(base: &'a [u8], scheme: &'a [u8], input: &'a [u8]) -> ParseResult<'a, UriMatch> {
    let (input, identifier) = rest(input)?;
    if identifier.is_empty() {
        return reject(input);
    }
    let payload = UriPayload::Absolute {
        scheme: InputSpan::of(base, scheme),
        identifier: InputSpan::of(base, identifier),
    };
    Ok((input, (payload, Vec::new())))
}

// name-addr = [ display-name ] LAQUOT addr-spec RAQUOT
fn name_addr<'a>(base: &'a [u8], input: &'a [u8]) -> ParseResult<'a, ParsedAddress> {
    let (input, display) = opt(alt((quoted_string, token_words)))(input)?;
    let (input, _) = laquot(input)?;
    let (input, (uri, uri_extensions)) = uri(base, input, UriMode::Bracketed)?;
    let (input, _) = raquot(input)?;
    Ok((
        input,
        ParsedAddress {
            display_name: display.map(|d| InputSpan::of(base, d)),
            uri,
            angle_brackets: true,
            uri_extensions,
        },
    ))
}

/// name-addr / addr-spec. `bare` decides how far an unbracketed URI reaches
pub fn address<'a>(base: &'a [u8], input: &'a [u8], bare: UriMode) -> ParseResult<'a, ParsedAddress> {
    if let Ok(found) = name_addr(base, input) {
        return Ok(found);
    }
    let (input, (uri, uri_extensions)) = uri(base, input, bare)?;
    Ok((
        input,
        ParsedAddress {
            display_name: None,
            uri,
            angle_brackets: false,
            uri_extensions,
        },
    ))
}

/// SIP-Version = "SIP" "/" 1*DIGIT "." 1*DIGIT
pub fn sip_version(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(pair(tag_no_case(b"SIP/"), pair(digit1, preceded(tag(b"."), digit1))))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text<'a>(base: &'a [u8], span: InputSpan) -> &'a [u8] {
        span.slice(base)
    }

    #[test]
    fn test_sip_uri_parts() {
        let input = b"sips:alice:secret@[2001:db8::1]:5061;transport=tls;foo=bar;lr?subject=hi";
        let (rem, (payload, ext)) = uri(input, input, UriMode::Full).unwrap();
        assert!(rem.is_empty());

        match payload {
            UriPayload::Sip {
                secure,
                user,
                password,
                host,
                port,
                params,
                headers,
            } => {
                assert!(secure);
                assert_eq!(text(input, user.unwrap()), b"alice");
                assert_eq!(text(input, password.unwrap()), b"secret");
                assert_eq!(text(input, host), b"[2001:db8::1]");
                assert_eq!(text(input, port.unwrap()), b"5061");
                assert_eq!(params.len(), 2);
                assert_eq!(text(input, params[1].name), b"lr");
                assert!(params[1].value.is_none());
                assert_eq!(text(input, headers.unwrap()), b"subject=hi");
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(ext.len(), 1);
        assert_eq!(text(input, ext[0]), b"foo=bar");
    }

    #[test]
    fn test_bare_uri_stops_at_params() {
        let input = b"sip:bob@example.com;tag=1";
        let (rem, (payload, ext)) = uri(input, input, UriMode::Bare).unwrap();
        assert_eq!(rem, b";tag=1");
        assert_eq!(payload.kind(), UriKind::SipUrl);
        assert!(ext.is_empty());
    }

    #[test]
    fn test_other_schemes() {
        let input = b"tel:+1-201-555-0123;ext=1234";
        let (_, (payload, _)) = uri(input, input, UriMode::Full).unwrap();
        assert_eq!(payload.kind(), UriKind::TelUri);

        let input = b"aaa://host.example.com:3868;transport=tcp;protocol=diameter";
        let (_, (payload, _)) = uri(input, input, UriMode::Full).unwrap();
        assert_eq!(payload.kind(), UriKind::DiameterUri);

        for input in [&b"im:alice@example.com"[..], b"pres:alice@example.com", b"mailto:a@b"] {
            let (_, (payload, _)) = uri(input, input, UriMode::Full).unwrap();
            assert_eq!(payload.kind(), UriKind::AbsoluteUri);
        }
    }

    #[test]
    fn test_malformed_uris() {
        let input = b"sip:";
        assert!(uri(input, input, UriMode::Full).is_err());
        let input = b"nocolon";
        assert!(uri(input, input, UriMode::Full).is_err());
        let input = b"sip:host:port";
        assert!(uri(input, input, UriMode::Full).is_err());
    }

    #[test]
    fn test_name_addr() {
        let input = b"\"Alice\" <sip:alice@example.com;x=1>;tag=88";
        let (rem, addr) = address(input, input, UriMode::Bare).unwrap();
        assert_eq!(rem, b";tag=88");
        assert!(addr.angle_brackets);
        assert_eq!(text(input, addr.display_name.unwrap()), b"\"Alice\"");
        assert_eq!(addr.uri_extensions.len(), 1);

        let input = b"Bob Smith <tel:1234>";
        let (_, addr) = address(input, input, UriMode::Bare).unwrap();
        assert_eq!(text(input, addr.display_name.unwrap()), b"Bob Smith");

        let input = b"sip:carol@example.com";
        let (_, addr) = address(input, input, UriMode::Bare).unwrap();
        assert!(!addr.angle_brackets);
        assert!(addr.display_name.is_none());
    }

    #[test]
    fn test_sip_version() {
        assert_eq!(sip_version(b"SIP/2.0 200").unwrap().1, b"SIP/2.0");
        assert!(sip_version(b"HTTP/1.1").is_err());
    }
}
