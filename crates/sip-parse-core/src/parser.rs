//! Parse orchestrator.
//!
//! Every parse goes through [`SipParser::start_parsing`]:
//!
//! 1. reject a missing buffer or destination,
//! 2. build the parse context (optionally over a private copy of the input),
//! 3. mark value-only input with the header's internal prefix,
//! 4. run the grammar engine,
//! 5. release both extension accumulators,
//! 6. map the engine's verdict onto [`Error`].

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::arena::Pool;
use crate::config::ParserConfig;
use crate::context::{Destination, EngineExit, ParseContext};
use crate::error::{Error, Result};
use crate::grammar::{GrammarEngine, SipGrammar};
use crate::model::{HeaderList, Message, StandaloneAddress, StandaloneHeader};
use crate::types::{HeaderType, ParseType, UriKind};

/// Arguments of one parse.
///
/// `buffer` and `destination` are options so a caller that forgets either
/// gets [`Error::NullPointer`] instead of a panic.
#[derive(Debug)]
pub struct ParseRequest<'b, 'd> {
    parse_type: ParseType,
    buffer: Option<&'b [u8]>,
    line: u32,
    specific_header: Option<HeaderType>,
    compact_form: bool,
    inject_prefix: bool,
    destination: Option<Destination<'d>>,
}

impl<'b, 'd> ParseRequest<'b, 'd> {
    pub fn new(parse_type: ParseType) -> Self {
        Self {
            parse_type,
            buffer: None,
            line: 1,
            specific_header: None,
            compact_form: false,
            inject_prefix: false,
            destination: None,
        }
    }

    pub fn buffer(mut self, buffer: &'b [u8]) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Line number reported with syntax errors
    pub fn line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn specific_header(mut self, header_type: HeaderType) -> Self {
        self.specific_header = Some(header_type);
        self
    }

    pub fn compact_form(mut self, compact: bool) -> Self {
        self.compact_form = compact;
        self
    }

    /// The buffer holds a bare value of the specific header
    pub fn inject_prefix(mut self, inject: bool) -> Self {
        self.inject_prefix = inject;
        self
    }

    pub fn destination(mut self, destination: Destination<'d>) -> Self {
        self.destination = Some(destination);
        self
    }
}

/// A SIP parser: configuration, the scratch pool for extension parameters
/// and a grammar engine
#[derive(Debug)]
pub struct SipParser<E: GrammarEngine = SipGrammar> {
    config: ParserConfig,
    scratch: Pool,
    engine: E,
}

impl SipParser {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_engine(config, SipGrammar)
    }
}

impl Default for SipParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl<E: GrammarEngine> SipParser<E> {
    pub fn with_engine(config: ParserConfig, engine: E) -> Self {
        let scratch = Pool::new("scratch", config.scratch);
        Self {
            config,
            scratch,
            engine,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The pool backing the extension accumulators. Empty between parses
    pub fn scratch_pool(&self) -> &Pool {
        &self.scratch
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs one parse described by `request`
    pub fn start_parsing(&mut self, request: ParseRequest<'_, '_>) -> Result<()> {
        let ParseRequest {
            parse_type,
            buffer,
            line,
            specific_header,
            compact_form,
            inject_prefix,
            destination,
        } = request;

        let buffer = buffer.ok_or(Error::NullPointer("buffer"))?;
        let destination = destination.ok_or(Error::NullPointer("destination"))?;

        let specific_header = specific_header.or(match parse_type {
            ParseType::Header(header_type) => Some(header_type),
            _ => None,
        });
        let prefix = match (inject_prefix, specific_header) {
            (false, _) => None,
            (true, Some(header_type)) => Some(header_type.prefix()),
            (true, None) => {
                return Err(Error::BadParam(
                    "a value-only parse needs a specific header type".to_string(),
                ))
            }
        };

        debug!(
            ?parse_type,
            line,
            ?specific_header,
            compact_form,
            value_only = prefix.is_some(),
            destination = destination.name(),
            "start parsing"
        );

        let private = self.private_copy(buffer);
        let input: &[u8] = private.as_deref().unwrap_or(buffer);

        let mut ctx = ParseContext::new(&mut self.scratch, input, parse_type, destination)
            .with_line(line)
            .with_specific_header(specific_header)
            .with_compact_form(compact_form)
            .with_prefix(prefix)
            .with_max_list_elements(self.config.max_list_elements);

        self.engine.run(&mut ctx);
        ctx.release_extensions();
        let exit = ctx.take_exit();
        drop(ctx);

        let result = match exit {
            EngineExit::Accepted => Ok(()),
            EngineExit::SyntaxError { column } => Err(Error::syntax(line, column)),
            EngineExit::ReductionError(err) => Err(err),
            EngineExit::StackError => Err(Error::unknown("grammar engine stack failure")),
            EngineExit::Running => Err(Error::unknown("grammar engine finished without a verdict")),
        };

        match &result {
            Ok(()) => debug!(?parse_type, "parse complete"),
            Err(err) => warn!(?parse_type, line, error = %err, "parse failed"),
        }
        result
    }

    /// A private copy of the input when the configuration asks for one
    fn private_copy(&self, buffer: &[u8]) -> Option<Bytes> {
        if self.config.unfold_lws {
            Some(unfold_lws(buffer))
        } else if self.config.copy_input {
            Some(Bytes::copy_from_slice(buffer))
        } else {
            None
        }
    }

    /// Parses a message: optional start line, then header lines
    pub fn parse_message(&mut self, buffer: &[u8], message: &mut Message) -> Result<()> {
        self.start_parsing(
            ParseRequest::new(ParseType::Message)
                .buffer(buffer)
                .destination(Destination::Message(message)),
        )
    }

    /// Parses header lines onto a generic list
    pub fn parse_into_list(&mut self, buffer: &[u8], list: &mut HeaderList) -> Result<()> {
        self.start_parsing(
            ParseRequest::new(ParseType::HeaderList)
                .buffer(buffer)
                .destination(Destination::HeaderList(list)),
        )
    }

    /// Parses one `Name: value` header into `header`
    pub fn parse_header(&mut self, buffer: &[u8], header: &mut StandaloneHeader) -> Result<()> {
        let header_type = header.header_type();
        self.start_parsing(
            ParseRequest::new(ParseType::Header(header_type))
                .buffer(buffer)
                .destination(Destination::Header(header)),
        )
    }

    /// Parses a bare header value into `header`
    pub fn parse_header_value(&mut self, value: &[u8], header: &mut StandaloneHeader, compact: bool) -> Result<()> {
        let header_type = header.header_type();
        self.start_parsing(
            ParseRequest::new(ParseType::Header(header_type))
                .buffer(value)
                .specific_header(header_type)
                .compact_form(compact)
                .inject_prefix(true)
                .destination(Destination::Header(header)),
        )
    }

    /// Parses a name-addr or URI into `address`
    pub fn parse_address(&mut self, buffer: &[u8], address: &mut StandaloneAddress) -> Result<()> {
        self.start_parsing(
            ParseRequest::new(ParseType::Address)
                .buffer(buffer)
                .destination(Destination::Address(address)),
        )
    }

    /// Reports which URI variant `buffer` holds without building it
    pub fn probe_uri_type(&mut self, buffer: &[u8]) -> Result<UriKind> {
        let mut kind = None;
        self.start_parsing(
            ParseRequest::new(ParseType::UriProbe)
                .buffer(buffer)
                .destination(Destination::UriProbe(&mut kind)),
        )?;
        kind.ok_or_else(|| Error::unknown("uri probe resolved no variant"))
    }
}

/// Replaces every folded line break (CRLF or LF followed by SP / HTAB, plus
/// the whitespace that follows it) with a single SP. Other bytes are kept
pub fn unfold_lws(input: &[u8]) -> Bytes {
    let mut unfolded = BytesMut::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let brk = match (input[i], input.get(i + 1)) {
            (b'\r', Some(b'\n')) => 2,
            (b'\n', _) => 1,
            (byte, _) => {
                unfolded.put_u8(byte);
                i += 1;
                continue;
            }
        };
        match input.get(i + brk) {
            Some(b' ') | Some(b'\t') => {
                unfolded.put_u8(b' ');
                i += brk;
                while i < input.len() && (input[i] == b' ' || input[i] == b'\t') {
                    i += 1;
                }
            }
            _ => {
                unfolded.put_slice(&input[i..i + brk]);
                i += brk;
            }
        }
    }

    unfolded.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaLimits;
    use crate::types::FieldKey;

    #[test]
    fn test_unfold_lws_folding() {
        assert_eq!(&unfold_lws(b"Line 1\r\n Line 2")[..], b"Line 1 Line 2");
        assert_eq!(&unfold_lws(b"Line 1\r\n\t  Line 2")[..], b"Line 1 Line 2");
        assert_eq!(&unfold_lws(b"Line 1\n Line 2")[..], b"Line 1 Line 2");
        // Not a fold
        assert_eq!(&unfold_lws(b"Line 1\r\nLine 2")[..], b"Line 1\r\nLine 2");
        // Whitespace that is not part of a fold is kept as is
        assert_eq!(&unfold_lws(b"a  b")[..], b"a  b");
    }

    #[test]
    fn test_missing_arguments_are_null_pointer() {
        let mut parser = SipParser::default();
        let mut message = Message::new(ArenaLimits::default()).unwrap();

        let err = parser
            .start_parsing(ParseRequest::new(ParseType::Message).destination(Destination::Message(&mut message)))
            .unwrap_err();
        assert_eq!(err, Error::NullPointer("buffer"));

        let err = parser
            .start_parsing(ParseRequest::new(ParseType::Message).buffer(b"Max-Forwards: 70"))
            .unwrap_err();
        assert_eq!(err, Error::NullPointer("destination"));
    }

    #[test]
    fn test_prefix_needs_a_header_type() {
        let mut parser = SipParser::default();
        let mut list = HeaderList::new(ArenaLimits::default(), 4).unwrap();
        let err = parser
            .start_parsing(
                ParseRequest::new(ParseType::HeaderList)
                    .buffer(b"70")
                    .inject_prefix(true)
                    .destination(Destination::HeaderList(&mut list)),
            )
            .unwrap_err();
        assert!(matches!(err, Error::BadParam(_)));
    }

    #[test]
    fn test_value_only_list_parse() {
        let mut parser = SipParser::default();
        let mut list = HeaderList::new(ArenaLimits::default(), 4).unwrap();
        parser
            .start_parsing(
                ParseRequest::new(ParseType::HeaderList)
                    .buffer(b"timer, 100rel")
                    .specific_header(HeaderType::Supported)
                    .inject_prefix(true)
                    .destination(Destination::HeaderList(&mut list)),
            )
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().text(FieldKey::OptionTag), Some("100rel"));
    }

    #[test]
    fn test_unfolded_private_copy() {
        let config = ParserConfig::default().with_unfold_lws(true);
        let mut parser = SipParser::new(config);
        let mut header = StandaloneHeader::new(HeaderType::Subject, ArenaLimits::default()).unwrap();
        parser.parse_header(b"Subject: lunch\r\n today", &mut header).unwrap();
        assert_eq!(header.view().text(FieldKey::Value), Some("lunch today"));
    }

    #[test]
    fn test_probe_uri_type() {
        let mut parser = SipParser::default();
        assert_eq!(parser.probe_uri_type(b"sips:alice@example.com").unwrap(), UriKind::SipUrl);
        assert_eq!(parser.probe_uri_type(b"tel:+15551234").unwrap(), UriKind::TelUri);
        assert_eq!(parser.probe_uri_type(b"im:alice@example.com").unwrap(), UriKind::AbsoluteUri);
        assert_eq!(parser.probe_uri_type(b"<aaa://host.example.com>").unwrap(), UriKind::DiameterUri);
        assert!(parser.probe_uri_type(b"not a uri").unwrap_err().is_syntax());
    }
}
