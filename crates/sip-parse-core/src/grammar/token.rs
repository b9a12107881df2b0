// Lexical rules shared by the header and URI recognisers
// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    combinator::{consumed, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use super::separators::equal;
use super::whitespace::lws;
use super::ParseResult;

pub fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"-.!%*_+`'~".contains(&c)
}

fn is_host_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_'
}

/// Unquoted parameter values: tokens plus the characters hosts and
/// addresses use
fn is_value_char(c: u8) -> bool {
    is_token_char(c) || b":[]/@?".contains(&c)
}

/// Characters of a whitespace-separated leading value
pub fn is_word_char(c: u8) -> bool {
    c > 0x20 && c < 0x7f && !b";,<>\"()".contains(&c)
}

/// Fails at `at` without consuming
pub fn reject<O>(at: &[u8]) -> ParseResult<O> {
    Err(nom::Err::Error(NomError::new(at, ErrorKind::Verify)))
}

pub fn token(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(is_token_char)(input)
}

/// A quoted string, quotes included. Backslash escapes the next byte
pub fn quoted_string(input: &[u8]) -> ParseResult<&[u8]> {
    let (body, _) = tag(b"\"")(input)?;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'\\' => i += 2,
            b'"' => {
                let len = i + 2;
                return Ok((&input[len..], &input[..len]));
            }
            _ => i += 1,
        }
    }
    reject(&body[body.len()..])
}

/// The content of a quoted string; anything else is returned as is
pub fn unquote(value: &[u8]) -> &[u8] {
    match value {
        [b'"', inner @ .., b'"'] => inner,
        _ => value,
    }
}

pub fn ipv6_reference(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(tuple((
        tag(b"["),
        take_while1(|c: u8| c.is_ascii_hexdigit() || c == b':' || c == b'.'),
        tag(b"]"),
    )))(input)
}

/// hostname / IPv4address / IPv6reference
pub fn host(input: &[u8]) -> ParseResult<&[u8]> {
    alt((ipv6_reference, take_while1(is_host_char)))(input)
}

pub fn param_value(input: &[u8]) -> ParseResult<&[u8]> {
    alt((quoted_string, ipv6_reference, take_while1(is_value_char)))(input)
}

/// A parsed `name[=value]` parameter with the bytes it spans
pub type GenericParam<'a> = (&'a [u8], (&'a [u8], Option<&'a [u8]>));

// generic-param = token [ EQUAL gen-value ]
pub fn generic_param(input: &[u8]) -> ParseResult<GenericParam<'_>> {
    consumed(pair(token, opt(preceded(equal, param_value))))(input)
}

/// Tokens separated by LWS, as in an unquoted display name
pub fn token_words(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(pair(token, many0(pair(lws, token))))(input)
}

/// A parenthesised comment; returns its content
pub fn comment(input: &[u8]) -> ParseResult<&[u8]> {
    delimited(tag(b"("), take_till(|c: u8| c == b')'), tag(b")"))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {
        let (rem, val) = token(b"z9hG4bK-1.x;rest").unwrap();
        assert_eq!(rem, b";rest");
        assert_eq!(val, b"z9hG4bK-1.x");
        assert!(token(b";").is_err());
    }

    #[test]
    fn test_quoted_string() {
        let (rem, val) = quoted_string(b"\"Alice \\\"A\\\" Smith\" <").unwrap();
        assert_eq!(val, b"\"Alice \\\"A\\\" Smith\"");
        assert_eq!(rem, b" <");
        assert_eq!(unquote(val), b"Alice \\\"A\\\" Smith");

        assert!(quoted_string(b"\"unterminated").is_err());
        assert!(quoted_string(b"plain").is_err());
    }

    #[test]
    fn test_host_forms() {
        assert_eq!(host(b"example.com:5060").unwrap().1, b"example.com");
        assert_eq!(host(b"192.0.2.1;x").unwrap().1, b"192.0.2.1");
        assert_eq!(host(b"[2001:db8::1]:5060").unwrap().1, b"[2001:db8::1]");
    }

    #[test]
    fn test_generic_param() {
        let (rem, (whole, (name, value))) = generic_param(b"branch = z9hG4bK;x").unwrap();
        assert_eq!(rem, b";x");
        assert_eq!(whole, b"branch = z9hG4bK");
        assert_eq!(name, b"branch");
        assert_eq!(value, Some(&b"z9hG4bK"[..]));

        let (_, (_, (name, value))) = generic_param(b"lr").unwrap();
        assert_eq!(name, b"lr");
        assert_eq!(value, None);

        let (_, (_, (_, value))) = generic_param(b"text=\"Busy Here\"").unwrap();
        assert_eq!(value, Some(&b"\"Busy Here\""[..]));
    }

    #[test]
    fn test_comment_and_words() {
        assert_eq!(comment(b"(in a meeting) rest").unwrap(), (&b" rest"[..], &b"in a meeting"[..]));
        assert_eq!(token_words(b"Bob  Smith <").unwrap(), (&b" <"[..], &b"Bob  Smith"[..]));
    }
}
