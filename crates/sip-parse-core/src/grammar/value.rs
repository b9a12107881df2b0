// Header value recognisers, one per header shape.
//
// Every recogniser fills a `ParsedHeader` with input positions. Which
// parameters are known, and under which key they are stored, comes from the
// header type's descriptor table.

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::digit1,
    combinator::opt,
    sequence::preceded,
};

use super::separators::{colon, comma, semi, slash};
use super::token::{comment, generic_param, host, is_word_char, token, unquote, GenericParam};
use super::uri::{address, UriMode};
use super::whitespace::{logical_line_len, lws, sws};
use super::ParseResult;
use crate::parsed::{InputSpan, ParsedField, ParsedHeader};
use crate::types::{FieldKey, FieldKind, HeaderType, Shape};

/// Whether a value may end here: end of input, end of line or list comma
fn at_value_end(input: &[u8]) -> bool {
    matches!(input.first(), None | Some(b'\r') | Some(b'\n') | Some(b','))
}

/// Recognises one value of `header_type`. The returned header's `end` is the
/// offset right after the value and its trailing whitespace
pub fn header_value<'a>(base: &'a [u8], input: &'a [u8], header_type: HeaderType) -> ParseResult<'a, ParsedHeader> {
    let mut parsed = ParsedHeader::new(header_type);
    let shape = header_type.shape();

    let input = if shape.allows_empty() && at_value_end(input) {
        input
    } else {
        let mut value = Value {
            base,
            header_type,
            parsed: &mut parsed,
        };
        let (rest, ()) = match shape {
            Shape::Via => value.via(input)?,
            Shape::Address { star, .. } => value.address(input, star)?,
            Shape::Leads { keys, .. } => value.leads(input, keys)?,
            Shape::Auth { scheme } => value.auth(input, scheme)?,
            Shape::MediaType { .. } => value.media_type(input)?,
            Shape::Params => value.params(input)?,
            Shape::Text => value.text(input)?,
        };
        rest
    };

    let (input, _) = sws(input)?;
    parsed.end = InputSpan::of(base, input).offset;
    Ok((input, parsed))
}

struct Value<'a, 'p> {
    base: &'a [u8],
    header_type: HeaderType,
    parsed: &'p mut ParsedHeader,
}

impl<'a> Value<'a, '_> {
    fn push(&mut self, key: FieldKey, value: &'a [u8]) {
        self.parsed.fields.push(ParsedField::span(key, InputSpan::of(self.base, value)));
    }

    /// Stores a `name[=value]` parameter under its descriptor key, or as an
    /// extension when the header type has no such parameter
    fn record(&mut self, (whole, (name, value)): GenericParam<'a>) {
        let Some(descriptor) = self.header_type.param_descriptor(name) else {
            self.parsed.extensions.push(InputSpan::of(self.base, whole));
            return;
        };
        match value {
            Some(value) => {
                let value = match descriptor.kind {
                    FieldKind::Token(_) | FieldKind::Number { .. } => unquote(value),
                    _ => value,
                };
                self.push(descriptor.key, value);
            }
            // a token parameter needs its value; without one it is kept verbatim
            None if matches!(descriptor.kind, FieldKind::Token(_)) => {
                self.parsed.extensions.push(InputSpan::of(self.base, whole));
            }
            None => self.parsed.fields.push(ParsedField::flag(descriptor.key)),
        }
    }

    // *( SEMI generic-param )
    fn header_params(&mut self, mut input: &'a [u8]) -> ParseResult<'a, ()> {
        while let Ok((rest, param)) = preceded(semi, generic_param)(input) {
            self.record(param);
            input = rest;
        }
        Ok((input, ()))
    }

    // via-parm = sent-protocol LWS sent-by *( SEMI via-params )
    // sent-protocol = protocol-name SLASH protocol-version SLASH transport
    fn via(&mut self, input: &'a [u8]) -> ParseResult<'a, ()> {
        let (input, name) = token(input)?;
        let (input, _) = slash(input)?;
        let (input, version) = token(input)?;
        let (input, _) = slash(input)?;
        let (input, transport) = token(input)?;
        let (input, _) = lws(input)?;
        let (input, sent_by) = host(input)?;
        let (input, port) = opt(preceded(colon, digit1))(input)?;

        self.push(FieldKey::ProtocolName, name);
        self.push(FieldKey::ProtocolVersion, version);
        self.push(FieldKey::Transport, transport);
        self.push(FieldKey::Host, sent_by);
        if let Some(port) = port {
            self.push(FieldKey::Port, port);
        }
        self.header_params(input)
    }

    // ( name-addr / addr-spec ) *( SEMI param ), or "*" for Contact
    fn address(&mut self, input: &'a [u8], star: bool) -> ParseResult<'a, ()> {
        if star {
            if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&[u8]>>(b"*")(input) {
                self.parsed.star = true;
                return Ok((rest, ()));
            }
        }
        let (input, found) = address(self.base, input, UriMode::Bare)?;
        self.parsed.address = Some(found);
        self.header_params(input)
    }

    /// Whitespace-separated leading values, an optional comment, then params
    fn leads(&mut self, mut input: &'a [u8], keys: &[FieldKey]) -> ParseResult<'a, ()> {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                input = lws(input)?.0;
            }
            let numeric = matches!(
                self.header_type.descriptor(*key).map(|d| d.kind),
                Some(FieldKind::Number { .. })
            );
            let (rest, value) = if numeric {
                digit1(input)?
            } else {
                take_while1(is_word_char)(input)?
            };
            self.push(*key, value);
            input = rest;
        }

        if self.header_type.descriptor(FieldKey::Comment).is_some() {
            if let Ok((rest, text)) = preceded(sws, comment)(input) {
                self.push(FieldKey::Comment, text);
                input = rest;
            }
        }
        self.header_params(input)
    }

    // challenge / credentials = auth-scheme LWS auth-param *(COMMA auth-param)
    fn auth(&mut self, mut input: &'a [u8], scheme: bool) -> ParseResult<'a, ()> {
        if scheme {
            let (rest, name) = token(input)?;
            self.push(FieldKey::AuthScheme, name);
            input = lws(rest)?.0;
        }

        let (mut input, first) = generic_param(input)?;
        self.auth_param(first);
        while let Ok((rest, param)) = preceded(comma, generic_param)(input) {
            self.auth_param(param);
            input = rest;
        }
        Ok((input, ()))
    }

    /// `algorithm=AKAv<n>-<alg>` carries the AKA version in front of the
    /// digest algorithm
    fn auth_param(&mut self, param: GenericParam<'a>) {
        let (_, (name, value)) = param;
        if name.eq_ignore_ascii_case(b"algorithm") && self.header_type.descriptor(FieldKey::AkaVersion).is_some() {
            if let Some((version, algorithm)) = value.map(unquote).and_then(split_aka) {
                self.push(FieldKey::AkaVersion, version);
                self.push(FieldKey::Algorithm, algorithm);
                return;
            }
        }
        self.record(param);
    }

    // media-type = m-type SLASH m-subtype *( SEMI m-parameter )
    fn media_type(&mut self, input: &'a [u8]) -> ParseResult<'a, ()> {
        let (input, media) = token(input)?;
        let (input, _) = slash(input)?;
        let (input, subtype) = token(input)?;
        self.push(FieldKey::MediaType, media);
        self.push(FieldKey::MediaSubType, subtype);
        self.header_params(input)
    }

    // generic-param *( SEMI generic-param )
    fn params(&mut self, input: &'a [u8]) -> ParseResult<'a, ()> {
        let (input, first) = generic_param(input)?;
        self.record(first);
        self.header_params(input)
    }

    /// Everything up to the end of the logical line, trailing whitespace
    /// excluded
    fn text(&mut self, input: &'a [u8]) -> ParseResult<'a, ()> {
        let line = &input[..logical_line_len(input)];
        let trimmed = line
            .iter()
            .rposition(|&c| !matches!(c, b' ' | b'\t' | b'\r' | b'\n'))
            .map_or(0, |last| last + 1);
        let value = &input[..trimmed];
        if !value.is_empty() {
            self.push(FieldKey::Value, value);
        }
        Ok((&input[trimmed..], ()))
    }
}

fn split_aka(value: &[u8]) -> Option<(&[u8], &[u8])> {
    if value.len() < 4 || !value[..4].eq_ignore_ascii_case(b"AKAv") {
        return None;
    }
    let tail = &value[4..];
    let digits = tail.iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || tail.get(digits) != Some(&b'-') {
        return None;
    }
    Some((&tail[..digits], &tail[digits + 1..]))
}
