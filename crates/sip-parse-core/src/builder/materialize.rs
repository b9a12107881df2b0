//! Field materializer: turns a raw field into a stored value.
//!
//! Recognised tokens are stored as enum values and never copied. Everything
//! else is appended to the destination arena and referenced by span.

use tracing::trace;

use crate::arena::{PageId, Pool, Span};
use crate::error::{Error, Result};
use crate::model::HeaderMut;
use crate::parsed::{ParsedField, RawValue};
use crate::types::{Discriminant, FieldKind, FieldValue, StoredValue, TokenTable};

/// Classifies raw token bytes against a vocabulary
pub fn classify(table: &TokenTable, text: &[u8]) -> Discriminant {
    match table.lookup(text) {
        Some(token) => Discriminant::Known(token),
        None => Discriminant::Other,
    }
}

/// Materializes a token field. Known tokens allocate nothing
pub fn materialize_token(
    arena: &mut Pool,
    page: PageId,
    discriminant: Discriminant,
    source: &[u8],
) -> Result<FieldValue> {
    match discriminant {
        Discriminant::Known(token) => Ok(FieldValue::Enumerated(token)),
        Discriminant::Other => arena.append(page, source).map(FieldValue::Other),
    }
}

/// Copies a text field into the arena. A zero-length value is absent
pub fn materialize_text(arena: &mut Pool, page: PageId, source: &[u8]) -> Result<Option<Span>> {
    if source.is_empty() {
        return Ok(None);
    }
    arena.append(page, source).map(Some)
}

/// Parses a decimal number not greater than `max`
pub fn parse_number(text: &[u8], max: u32, line: u32, column: usize) -> Result<u32> {
    if text.is_empty() {
        return Err(Error::syntax(line, column));
    }
    let mut value: u32 = 0;
    for (i, b) in text.iter().enumerate() {
        if !b.is_ascii_digit() {
            return Err(Error::syntax(line, column + i));
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| Error::syntax(line, column))?;
    }
    if value > max {
        return Err(Error::syntax(line, column));
    }
    Ok(value)
}

/// Stores every recognised field on the header, as its descriptor says.
///
/// Fields are applied in order; a failure leaves the fields already stored
/// in place.
pub fn populate(header: &mut HeaderMut<'_>, fields: &[ParsedField], input: &[u8], line: u32, end: usize) -> Result<()> {
    let header_type = header.header_type();

    for field in fields {
        let descriptor = header_type.descriptor(field.key).ok_or_else(|| {
            Error::unknown(format!("{} has no field {:?}", header_type, field.key))
        })?;
        let repeatable = descriptor.repeatable;

        let span = match field.value {
            RawValue::Span(span) => span,
            RawValue::Flag => {
                match descriptor.kind {
                    FieldKind::Number { .. } | FieldKind::Address => return Err(Error::syntax(line, end)),
                    FieldKind::Token(_) | FieldKind::Text | FieldKind::Flag | FieldKind::FlagOrText => {
                        header.set_field(field.key, StoredValue::Flag, repeatable)
                    }
                }
                continue;
            }
        };
        let source = span.slice(input);

        match descriptor.kind {
            FieldKind::Text | FieldKind::FlagOrText => {
                let (arena, page) = header.arena();
                if let Some(stored) = materialize_text(arena, page, source)? {
                    header.set_field(field.key, StoredValue::Text(stored), repeatable);
                }
            }
            FieldKind::Token(_) if source.is_empty() => {
                header.set_field(field.key, StoredValue::Flag, repeatable);
            }
            FieldKind::Token(table) => {
                let discriminant = classify(table, source);
                let (arena, page) = header.arena();
                let value = materialize_token(arena, page, discriminant, source)?;
                header.set_token(field.key, discriminant, value.other(), repeatable)?;
            }
            FieldKind::Number { max } => {
                let n = parse_number(source, max, line, span.offset)?;
                header.set_field(field.key, StoredValue::Number(n), repeatable);
            }
            FieldKind::Flag => header.set_field(field.key, StoredValue::Flag, repeatable),
            FieldKind::Address => {
                return Err(Error::unknown(format!(
                    "address of {} must be built through the URI dispatcher",
                    header_type
                )))
            }
        }
        trace!(header = %header_type, key = ?field.key, "field stored");
    }
    Ok(())
}
