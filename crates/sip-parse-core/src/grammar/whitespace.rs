// Whitespace rules (RFC 3261 Section 25.1)
// LWS = [*WSP CRLF] 1*WSP
// SWS = [LWS]

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, opt, recognize},
    multi::{many0, many1},
    sequence::pair,
};

use super::ParseResult;

/// A single SP or HTAB
pub fn wsp(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(alt((tag(b" "), tag(b"\t"))))(input)
}

/// Zero or more SP / HTAB
pub fn owsp(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(many0(wsp))(input)
}

/// CRLF, or a bare LF
pub fn crlf(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(alt((tag(b"\r\n"), tag(b"\n"))))(input)
}

/// Linear whitespace, including a folded line
pub fn lws(input: &[u8]) -> ParseResult<&[u8]> {
    alt((recognize(pair(pair(owsp, crlf), many1(wsp))), recognize(many1(wsp))))(input)
}

/// Optional linear whitespace
pub fn sws(input: &[u8]) -> ParseResult<&[u8]> {
    opt(lws)(input).map(|(rem, val)| (rem, val.unwrap_or(&[])))
}

/// End of a header line: CRLF or end of input
pub fn line_end(input: &[u8]) -> ParseResult<&[u8]> {
    alt((crlf, eof))(input)
}

/// Length of the logical line at the start of `input`. A line break followed
/// by SP or HTAB is a fold and does not end the line
pub fn logical_line_len(input: &[u8]) -> usize {
    let mut i = 0;
    while i < input.len() {
        let brk = match (input[i], input.get(i + 1)) {
            (b'\r', Some(b'\n')) => 2,
            (b'\n', _) => 1,
            _ => {
                i += 1;
                continue;
            }
        };
        match input.get(i + brk) {
            Some(b' ') | Some(b'\t') => i += brk,
            _ => return i,
        }
    }
    input.len()
}
