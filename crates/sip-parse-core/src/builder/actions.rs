//! Semantic actions run by the grammar engine once a value is recognised.

use tracing::{debug, trace};

use super::construct::construct;
use super::materialize::{classify, materialize_token, parse_number, populate};
use super::uri::{build_address, dispatch, UriTarget, UrlExtensions};
use crate::arena::Pool;
use crate::context::{Destination, ParseContext, TargetKind};
use crate::error::{Error, Result};
use crate::model::StartLine;
use crate::parsed::{ParsedAddress, ParsedHeader, ParsedStartLine};
use crate::types::tokens::Method;
use crate::types::{FieldKey, HeaderType, ParseType, StoredValue};

/// Builds one header object from a recognised header value
pub fn build_header(ctx: &mut ParseContext<'_>, parsed: &ParsedHeader) -> Result<()> {
    let ParseContext {
        input,
        line,
        parse_type,
        destination,
        scratch,
        header_ext,
        url_ext,
        ..
    } = ctx;
    let input: &[u8] = *input;
    let line = *line;
    let scratch: &mut Pool = scratch;

    let target = TargetKind::for_parse_type(*parse_type)
        .ok_or_else(|| Error::unknown(format!("parse type {:?} does not build headers", parse_type)))?;
    let mut header = construct(destination, target, parsed.header_type, input, parsed.end, line)?;
    header.set_compact(parsed.compact);
    if parsed.star {
        header.set_star();
    }

    if let (HeaderType::Other, Some(name)) = (parsed.header_type, parsed.name) {
        let (arena, page) = header.arena();
        let span = arena.append(page, name.slice(input))?;
        header.set_name(span);
    }

    populate(&mut header, &parsed.fields, input, line, parsed.end)?;

    if let Some(address) = &parsed.address {
        let extensions = UrlExtensions {
            scratch: &*scratch,
            accumulator: &*url_ext,
        };
        let (arena, page) = header.arena();
        let built = build_address(arena, page, address, input, line, Some(extensions))?;
        header.set_address(built);
    }

    if !header_ext.is_empty() {
        let (arena, page) = header.arena();
        if let Some(span) = header_ext.copy_to(&*scratch, arena, page)? {
            header.set_field(FieldKey::OtherParams, StoredValue::Text(span), false);
        }
    }

    trace!(header = %parsed.header_type, fields = parsed.fields.len(), "header built");
    header_ext.release(scratch);
    url_ext.release(scratch);
    Ok(())
}

/// Stores the start line of a message
pub fn build_start_line(ctx: &mut ParseContext<'_>, parsed: &ParsedStartLine) -> Result<()> {
    let ParseContext {
        input,
        line,
        destination,
        scratch,
        url_ext,
        ..
    } = ctx;
    let input: &[u8] = *input;
    let line = *line;
    let scratch: &mut Pool = scratch;

    let message = match destination {
        Destination::Message(message) => message,
        other => {
            return Err(Error::unknown(format!(
                "start line cannot be stored on a {} target",
                other.name()
            )))
        }
    };
    let (arena, page, slot) = message.start_line_slot();

    let start_line = match parsed {
        ParsedStartLine::Request { method, uri, version } => {
            let source = method.slice(input);
            let method = materialize_token(arena, page, classify(&Method::TABLE, source), source)?;
            let extensions = UrlExtensions {
                scratch: &*scratch,
                accumulator: &*url_ext,
            };
            let uri = dispatch(
                uri.uri.kind(),
                &uri.uri,
                input,
                line,
                Some(extensions),
                UriTarget::Build { arena: &mut *arena, page },
            )?
            .ok_or_else(|| Error::unknown("request uri produced no value"))?;
            let version = arena.append(page, version.slice(input))?;
            StartLine::Request { method, uri, version }
        }
        ParsedStartLine::Status { version, code, reason } => {
            let code = parse_number(code.slice(input), 999, line, code.offset)? as u16;
            StartLine::Status {
                version: arena.append(page, version.slice(input))?,
                code,
                reason: arena.append(page, reason.slice(input))?,
            }
        }
    };

    debug!(?start_line, "start line built");
    *slot = Some(start_line);
    url_ext.release(scratch);
    Ok(())
}

/// Builds a standalone address, or only records the URI variant when probing
pub fn build_standalone_address(ctx: &mut ParseContext<'_>, parsed: &ParsedAddress) -> Result<()> {
    let ParseContext {
        input,
        line,
        parse_type,
        destination,
        scratch,
        url_ext,
        ..
    } = ctx;
    let input: &[u8] = *input;
    let line = *line;
    let scratch: &mut Pool = scratch;

    match (parse_type, destination) {
        (ParseType::Address, Destination::Address(standalone)) => {
            let extensions = UrlExtensions {
                scratch: &*scratch,
                accumulator: &*url_ext,
            };
            let (arena, page, slot) = standalone.reuse()?;
            let address = build_address(arena, page, parsed, input, line, Some(extensions))?;
            *slot = Some(address);
        }
        (ParseType::UriProbe, Destination::UriProbe(slot)) => {
            dispatch(parsed.uri.kind(), &parsed.uri, input, line, None, UriTarget::Probe(&mut **slot))?;
        }
        (parse_type, destination) => {
            return Err(Error::unknown(format!(
                "parse type {:?} cannot build an address into a {} target",
                parse_type,
                destination.name()
            )))
        }
    }

    url_ext.release(scratch);
    Ok(())
}
