//! Generic header constructor: one entry point that yields a writable header
//! object for any header type, whatever the destination.

use tracing::debug;

use crate::context::{Destination, TargetKind};
use crate::error::{Error, Result};
use crate::model::HeaderMut;
use crate::types::HeaderType;

/// Bytes that may follow a header value inside a message
fn is_value_terminator(byte: Option<&u8>) -> bool {
    matches!(byte, None | Some(b'\r') | Some(b'\n') | Some(b','))
}

/// Yields a header object of `header_type` for the `target` kind, which must
/// be the kind of the destination.
///
/// * In a message, the byte at `cursor` must end the value; then the message
///   constructs and attaches the header.
/// * In a generic list, the header is constructed and pushed. A rejected push
///   is an internal error.
/// * A standalone header is never constructed: it is reused when its type
///   matches.
pub fn construct<'d>(
    destination: &'d mut Destination<'_>,
    target: TargetKind,
    header_type: HeaderType,
    input: &[u8],
    cursor: usize,
    line: u32,
) -> Result<HeaderMut<'d>> {
    if destination.target_kind() != Some(target) {
        return Err(target_mismatch(target, destination.name()));
    }

    match destination {
        Destination::Message(message) => {
            if !is_value_terminator(input.get(cursor)) {
                debug!(%header_type, cursor, "header value not followed by a terminator");
                return Err(Error::syntax(line, cursor));
            }
            message.construct_header(header_type)
        }
        Destination::HeaderList(list) => list.construct_and_push(header_type),
        Destination::Header(standalone) => {
            if standalone.header_type() != header_type {
                debug!(expected = %standalone.header_type(), found = %header_type, "standalone header type mismatch");
                return Err(Error::syntax(line, 0));
            }
            standalone.reuse()
        }
        Destination::Address(_) | Destination::UriProbe(_) => Err(target_mismatch(target, "non-header")),
    }
}

fn target_mismatch(target: TargetKind, destination: &str) -> Error {
    Error::unknown(format!("{:?} headers cannot be built into a {} target", target, destination))
}
