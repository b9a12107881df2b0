//! The SIP grammar engine: walks the input line by line, recognises each
//! value and hands it to the semantic actions.
//!
//! The engine reports its outcome only through the parse context's verdict.

use nom::{
    bytes::complete::{tag, take_till, take_while_m_n},
    combinator::opt,
    sequence::pair,
};
use tracing::{debug, trace};

use super::separators::{comma, hcolon};
use super::token::token;
use super::uri::{address, sip_version, uri, UriMode};
use super::value::header_value;
use super::whitespace::{crlf, line_end, sws};
use super::{GrammarEngine, ParseResult};
use crate::builder::actions;
use crate::context::{ExtensionSlot, ParseContext};
use crate::error::Error;
use crate::parsed::{InputSpan, ParsedAddress, ParsedHeader, ParsedStartLine};
use crate::types::{HeaderType, ParseType};

/// The built-in grammar for SIP messages, headers and addresses
#[derive(Debug, Default, Clone)]
pub struct SipGrammar;

impl GrammarEngine for SipGrammar {
    fn run(&self, ctx: &mut ParseContext<'_>) {
        let outcome = match (ctx.parse_type(), ctx.take_prefix()) {
            (ParseType::Address | ParseType::UriProbe, _) => standalone_address(ctx),
            (ParseType::Header(_), Some(prefix)) => value_only(ctx, prefix, true),
            (_, Some(prefix)) => value_only(ctx, prefix, false),
            (ParseType::Header(_), None) => standalone_header(ctx),
            (ParseType::Message, None) => header_lines(ctx, true),
            (ParseType::HeaderList, None) => header_lines(ctx, false),
        };

        match outcome {
            Ok(()) => ctx.accept(),
            Err(halt) => halt.record(ctx),
        }
    }
}

/// Why a run stopped before the end of the input
#[derive(Debug)]
enum Halt {
    Syntax(usize),
    Reduction(Error),
    Stack,
}

impl Halt {
    fn at(base: &[u8], err: nom::Err<nom::error::Error<&[u8]>>) -> Halt {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => Halt::Syntax(InputSpan::of(base, e.input).offset),
            nom::Err::Incomplete(_) => Halt::Syntax(base.len()),
        }
    }

    fn record(self, ctx: &mut ParseContext<'_>) {
        debug!(halt = ?self, "grammar run stopped");
        match self {
            Halt::Syntax(column) => ctx.fail_syntax(column),
            Halt::Reduction(err) => ctx.fail_reduction(err),
            Halt::Stack => ctx.fail_stack(),
        }
    }
}

type Step<T> = std::result::Result<T, Halt>;

/// Runs a recogniser and turns its failure into a syntax halt
fn scan<'a, O>(base: &'a [u8], result: ParseResult<'a, O>) -> Step<(&'a [u8], O)> {
    result.map_err(|e| Halt::at(base, e))
}

/// Reads a header name; returns it with its type and whether it was the
/// compact form
fn header_name(input: &[u8]) -> ParseResult<(&[u8], HeaderType, bool)> {
    let (rest, name) = token(input)?;
    let header_type = HeaderType::from_name(name);
    let compact = header_type.matches_compact(name);
    Ok((rest, (name, header_type, compact)))
}

/// Requires an optional line break followed by the end of input
fn finish<'a>(base: &'a [u8], input: &'a [u8]) -> Step<()> {
    let (input, _) = scan(base, opt(crlf)(input))?;
    if input.is_empty() {
        Ok(())
    } else {
        Err(Halt::Syntax(InputSpan::of(base, input).offset))
    }
}

fn reduce_header(ctx: &mut ParseContext<'_>, parsed: &ParsedHeader) -> Step<()> {
    let input = ctx.input();
    for span in &parsed.extensions {
        ctx.append_extension(ExtensionSlot::Header, span.slice(input))
            .map_err(Halt::Reduction)?;
    }
    if let Some(address) = &parsed.address {
        append_url_extensions(ctx, address)?;
    }
    actions::build_header(ctx, parsed).map_err(Halt::Reduction)
}

fn append_url_extensions(ctx: &mut ParseContext<'_>, address: &ParsedAddress) -> Step<()> {
    let input = ctx.input();
    for span in &address.uri_extensions {
        ctx.append_extension(ExtensionSlot::Url, span.slice(input))
            .map_err(Halt::Reduction)?;
    }
    Ok(())
}

/// Recognises and reduces the values of one header line. Only list headers
/// take further comma-separated values, and a standalone target takes one
fn values<'a>(
    ctx: &mut ParseContext<'a>,
    mut input: &'a [u8],
    header_type: HeaderType,
    name: Option<&'a [u8]>,
    compact: bool,
    single: bool,
) -> Step<&'a [u8]> {
    let base = ctx.input();
    let list = header_type.shape().is_list() && !single;
    let mut count = 0;

    loop {
        let (rest, mut parsed) = scan(base, header_value(base, input, header_type))?;
        count += 1;
        if count > ctx.max_list_elements() {
            return Err(Halt::Stack);
        }
        parsed.name = name.map(|n| InputSpan::of(base, n));
        parsed.compact = compact;

        reduce_header(ctx, &parsed)?;
        trace!(%header_type, count, "header value reduced");

        input = rest;
        match comma(input) {
            Ok((rest, _)) if list => input = rest,
            _ => return Ok(input),
        }
    }
}

/// A value without a header name, typed by the injected prefix
fn value_only(ctx: &mut ParseContext<'_>, prefix: &'static [u8], single: bool) -> Step<()> {
    let base = ctx.input();
    let header_type = HeaderType::from_prefix(prefix).ok_or(Halt::Syntax(0))?;
    let compact = ctx.is_compact_form();
    let (input, _) = scan(base, sws(base))?;
    let rest = values(ctx, input, header_type, None, compact, single)?;
    finish(base, rest)
}

// message-header = header-name HCOLON header-value *(COMMA header-value) CRLF
fn header_line<'a>(ctx: &mut ParseContext<'a>, input: &'a [u8]) -> Step<&'a [u8]> {
    let base = ctx.input();
    let (rest, (name, header_type, compact)) = scan(base, header_name(input))?;
    let (rest, _) = scan(base, hcolon(rest))?;
    let compact = compact || ctx.is_compact_form();
    values(ctx, rest, header_type, Some(name), compact, false)
}

/// Header lines up to an empty line or the end of input, optionally after a
/// start line
fn header_lines(ctx: &mut ParseContext<'_>, start_line_allowed: bool) -> Step<()> {
    let base = ctx.input();
    let mut input = base;
    let mut first = true;

    while !input.is_empty() {
        if let Ok((_, _)) = crlf(input) {
            break;
        }
        let is_header = pair(token, hcolon)(input).is_ok();
        input = if first && start_line_allowed && !is_header {
            start_line(ctx, input)?
        } else {
            header_line(ctx, input)?
        };
        let (rest, _) = scan(base, line_end(input))?;
        input = rest;
        first = false;
    }
    Ok(())
}

// Status-Line  = SIP-Version SP Status-Code SP Reason-Phrase
fn status_line<'a>(base: &'a [u8], input: &'a [u8]) -> ParseResult<'a, ParsedStartLine> {
    let (input, version) = sip_version(input)?;
    let (input, _) = tag(b" ")(input)?;
    let (input, code) = take_while_m_n(3, 3, |c: u8| c.is_ascii_digit())(input)?;
    let (input, _) = tag(b" ")(input)?;
    let (input, reason) = take_till(|c: u8| c == b'\r' || c == b'\n')(input)?;
    Ok((
        input,
        ParsedStartLine::Status {
            version: InputSpan::of(base, version),
            code: InputSpan::of(base, code),
            reason: InputSpan::of(base, reason),
        },
    ))
}

// Request-Line = Method SP Request-URI SP SIP-Version
fn request_line<'a>(base: &'a [u8], input: &'a [u8]) -> ParseResult<'a, ParsedStartLine> {
    let (input, method) = token(input)?;
    let (input, _) = tag(b" ")(input)?;
    let (input, (payload, uri_extensions)) = uri(base, input, UriMode::RequestLine)?;
    let (input, _) = tag(b" ")(input)?;
    let (input, version) = sip_version(input)?;
    Ok((
        input,
        ParsedStartLine::Request {
            method: InputSpan::of(base, method),
            uri: ParsedAddress {
                display_name: None,
                uri: payload,
                angle_brackets: false,
                uri_extensions,
            },
            version: InputSpan::of(base, version),
        },
    ))
}

fn start_line<'a>(ctx: &mut ParseContext<'a>, input: &'a [u8]) -> Step<&'a [u8]> {
    let base = ctx.input();
    let recognised = match status_line(base, input) {
        Ok(found) => Ok(found),
        Err(_) => request_line(base, input),
    };
    let (rest, parsed) = scan(base, recognised)?;
    if let ParsedStartLine::Request { uri, .. } = &parsed {
        append_url_extensions(ctx, uri)?;
    }
    actions::build_start_line(ctx, &parsed).map_err(Halt::Reduction)?;
    Ok(rest)
}

/// One header, name included unless a prefix stands in for it. A bare
/// name is an empty value for headers that allow one
fn standalone_header(ctx: &mut ParseContext<'_>) -> Step<()> {
    let base = ctx.input();
    let (rest, (name, header_type, compact)) = scan(base, header_name(base))?;
    let compact = compact || ctx.is_compact_form();

    if header_type.shape().allows_empty() && finish(base, rest).is_ok() {
        let mut parsed = ParsedHeader::new(header_type);
        parsed.name = Some(InputSpan::of(base, name));
        parsed.compact = compact;
        parsed.end = InputSpan::of(base, rest).offset;
        reduce_header(ctx, &parsed)?;
        return Ok(());
    }

    let (rest, _) = scan(base, hcolon(rest))?;
    let rest = values(ctx, rest, header_type, Some(name), compact, true)?;
    finish(base, rest)
}

/// A name-addr or a URI with its parameters. A type probe records only the
/// URI variant, so unknown URI parameters are not collected
fn standalone_address(ctx: &mut ParseContext<'_>) -> Step<()> {
    let base = ctx.input();
    let (input, _) = scan(base, sws(base))?;
    let (rest, parsed) = scan(base, address(base, input, UriMode::Full))?;
    if ctx.parse_type() == ParseType::Address {
        append_url_extensions(ctx, &parsed)?;
    }
    actions::build_standalone_address(ctx, &parsed).map_err(Halt::Reduction)?;
    let (rest, _) = scan(base, sws(rest))?;
    finish(base, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ArenaLimits, Pool};
    use crate::context::{Destination, EngineExit};
    use crate::model::{HeaderList, Message, StandaloneHeader};
    use crate::types::FieldKey;

    fn run(input: &[u8], parse_type: ParseType, destination: Destination<'_>) -> EngineExit {
        let mut scratch = Pool::new("scratch", ArenaLimits::default());
        let mut ctx = ParseContext::new(&mut scratch, input, parse_type, destination);
        SipGrammar.run(&mut ctx);
        ctx.take_exit()
    }

    #[test]
    fn test_message_with_request_line() {
        let mut message = Message::new(ArenaLimits::default()).unwrap();
        let input = b"INVITE sip:bob@example.com SIP/2.0\r\n\
                      Via: SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/TCP b.example.com\r\n\
                      Max-Forwards: 70\r\n\
                      \r\n";
        let exit = run(input, ParseType::Message, Destination::Message(&mut message));
        assert_eq!(exit, EngineExit::Accepted);
        assert!(message.start_line().is_some());
        assert_eq!(message.headers_of(HeaderType::Via).count(), 2);
        assert_eq!(message.first(HeaderType::MaxForwards).unwrap().number(FieldKey::Value), Some(70));
    }

    #[test]
    fn test_status_line() {
        let mut message = Message::new(ArenaLimits::default()).unwrap();
        let input = b"SIP/2.0 180 Ringing\r\nCSeq: 1 INVITE\r\n";
        let exit = run(input, ParseType::Message, Destination::Message(&mut message));
        assert_eq!(exit, EngineExit::Accepted);
        assert_eq!(message.len(), 1);
    }

    #[test]
    fn test_bad_line_end_is_syntax() {
        let mut list = HeaderList::new(ArenaLimits::default(), 8).unwrap();
        let input = b"Subject: hi\r\n: broken\r\n";
        let exit = run(input, ParseType::HeaderList, Destination::HeaderList(&mut list));
        assert_eq!(exit, EngineExit::SyntaxError { column: 13 });
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_list_limit_is_stack_error() {
        let mut list = HeaderList::new(ArenaLimits::default(), 8).unwrap();
        let mut scratch = Pool::new("scratch", ArenaLimits::default());
        let input = b"Supported: a, b, c";
        let mut ctx = ParseContext::new(&mut scratch, input, ParseType::HeaderList, Destination::HeaderList(&mut list))
            .with_max_list_elements(2);
        SipGrammar.run(&mut ctx);
        assert_eq!(ctx.take_exit(), EngineExit::StackError);
    }

    #[test]
    fn test_standalone_single_value() {
        let mut header = StandaloneHeader::new(HeaderType::Supported, ArenaLimits::default()).unwrap();
        let input = b"Supported: timer, 100rel";
        let exit = run(input, ParseType::Header(HeaderType::Supported), Destination::Header(&mut header));
        assert!(matches!(exit, EngineExit::SyntaxError { .. }));
    }
}
