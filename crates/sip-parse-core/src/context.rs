//! Per-call state shared by the grammar engine and the semantic actions.

use tracing::trace;

use crate::arena::{ExtensionAccumulator, Pool};
use crate::error::{Error, Result};
use crate::model::{HeaderList, Message, StandaloneAddress, StandaloneHeader};
use crate::types::{HeaderType, ParseType, UriKind};

/// Where built objects go
#[derive(Debug)]
pub enum Destination<'a> {
    /// Headers are created inside the message
    Message(&'a mut Message),
    /// Headers are created and pushed onto a generic list
    HeaderList(&'a mut HeaderList),
    /// The single header object is filled in place
    Header(&'a mut StandaloneHeader),
    /// The single address object is filled in place
    Address(&'a mut StandaloneAddress),
    /// Only the URI variant is recorded
    UriProbe(&'a mut Option<UriKind>),
}

/// How a header object comes into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Constructed inside a message
    InMessage,
    /// Constructed and pushed onto a generic header list
    InGenericHeaderList,
    /// Already exists; only filled
    Standalone,
}

impl TargetKind {
    /// The target kind a parse of `parse_type` builds headers into
    pub fn for_parse_type(parse_type: ParseType) -> Option<TargetKind> {
        match parse_type {
            ParseType::Message => Some(TargetKind::InMessage),
            ParseType::HeaderList => Some(TargetKind::InGenericHeaderList),
            ParseType::Header(_) => Some(TargetKind::Standalone),
            ParseType::Address | ParseType::UriProbe => None,
        }
    }
}

impl Destination<'_> {
    /// Target kind for header destinations
    pub fn target_kind(&self) -> Option<TargetKind> {
        match self {
            Destination::Message(_) => Some(TargetKind::InMessage),
            Destination::HeaderList(_) => Some(TargetKind::InGenericHeaderList),
            Destination::Header(_) => Some(TargetKind::Standalone),
            Destination::Address(_) | Destination::UriProbe(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Destination::Message(_) => "message",
            Destination::HeaderList(_) => "header-list",
            Destination::Header(_) => "header",
            Destination::Address(_) => "address",
            Destination::UriProbe(_) => "uri-probe",
        }
    }
}

/// Final state of one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineExit {
    Running,
    Accepted,
    /// The input does not match the grammar at `column`
    SyntaxError { column: usize },
    /// A semantic action failed
    ReductionError(Error),
    /// The engine ran out of room for nested or listed values
    StackError,
}

/// Selects one of the two extension-parameter accumulators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionSlot {
    /// Parameters of the header itself
    Header,
    /// Parameters of the URI inside the header
    Url,
}

/// Parse context for one call
#[derive(Debug)]
pub struct ParseContext<'a> {
    pub(crate) input: &'a [u8],
    pub(crate) line: u32,
    pub(crate) parse_type: ParseType,
    pub(crate) specific_header: Option<HeaderType>,
    pub(crate) compact_form: bool,
    pub(crate) prefix: Option<&'static [u8]>,
    pub(crate) max_list_elements: usize,
    pub(crate) destination: Destination<'a>,
    pub(crate) scratch: &'a mut Pool,
    pub(crate) header_ext: ExtensionAccumulator,
    pub(crate) url_ext: ExtensionAccumulator,
    exit: EngineExit,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        scratch: &'a mut Pool,
        input: &'a [u8],
        parse_type: ParseType,
        destination: Destination<'a>,
    ) -> Self {
        let specific_header = match parse_type {
            ParseType::Header(header_type) => Some(header_type),
            _ => None,
        };
        Self {
            input,
            line: 1,
            parse_type,
            specific_header,
            compact_form: false,
            prefix: None,
            max_list_elements: usize::MAX,
            destination,
            scratch,
            header_ext: ExtensionAccumulator::new(),
            url_ext: ExtensionAccumulator::new(),
            exit: EngineExit::Running,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_specific_header(mut self, header_type: Option<HeaderType>) -> Self {
        if header_type.is_some() {
            self.specific_header = header_type;
        }
        self
    }

    pub fn with_compact_form(mut self, compact: bool) -> Self {
        self.compact_form = compact;
        self
    }

    /// Marks the input as a bare header value preceded by `prefix`
    pub fn with_prefix(mut self, prefix: Option<&'static [u8]>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_max_list_elements(mut self, max: usize) -> Self {
        self.max_list_elements = max;
        self
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn parse_type(&self) -> ParseType {
        self.parse_type
    }

    pub fn specific_header(&self) -> Option<HeaderType> {
        self.specific_header
    }

    pub fn is_compact_form(&self) -> bool {
        self.compact_form
    }

    pub fn max_list_elements(&self) -> usize {
        self.max_list_elements
    }

    /// Takes the injected header prefix, if any. The grammar consumes it once
    pub fn take_prefix(&mut self) -> Option<&'static [u8]> {
        self.prefix.take()
    }

    pub fn destination(&self) -> &Destination<'a> {
        &self.destination
    }

    pub fn scratch(&self) -> &Pool {
        &*self.scratch
    }

    pub fn exit(&self) -> &EngineExit {
        &self.exit
    }

    pub fn is_running(&self) -> bool {
        self.exit == EngineExit::Running
    }

    pub(crate) fn take_exit(&mut self) -> EngineExit {
        std::mem::replace(&mut self.exit, EngineExit::Running)
    }

    /// The first verdict of a run is kept; later ones are ignored
    fn finish(&mut self, exit: EngineExit) {
        if self.is_running() {
            trace!(?exit, "engine verdict");
            self.exit = exit;
        }
    }

    pub fn accept(&mut self) {
        self.finish(EngineExit::Accepted);
    }

    pub fn fail_syntax(&mut self, column: usize) {
        self.finish(EngineExit::SyntaxError { column });
    }

    pub fn fail_reduction(&mut self, error: Error) {
        self.finish(EngineExit::ReductionError(error));
    }

    pub fn fail_stack(&mut self) {
        self.finish(EngineExit::StackError);
    }

    /// Adds an unrecognised parameter to one of the accumulators
    pub fn append_extension(&mut self, slot: ExtensionSlot, bytes: &[u8]) -> Result<()> {
        let acc = match slot {
            ExtensionSlot::Header => &mut self.header_ext,
            ExtensionSlot::Url => &mut self.url_ext,
        };
        acc.append(self.scratch, bytes)
    }

    pub fn extension(&self, slot: ExtensionSlot) -> &ExtensionAccumulator {
        match slot {
            ExtensionSlot::Header => &self.header_ext,
            ExtensionSlot::Url => &self.url_ext,
        }
    }

    /// Frees both accumulator pages. Safe to call any number of times
    pub fn release_extensions(&mut self) {
        self.header_ext.release(self.scratch);
        self.url_ext.release(self.scratch);
    }
}

impl Drop for ParseContext<'_> {
    fn drop(&mut self) {
        self.release_extensions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaLimits;

    #[test]
    fn test_first_verdict_wins() {
        let mut scratch = Pool::new("scratch", ArenaLimits::default());
        let mut probe = None;
        let mut ctx = ParseContext::new(&mut scratch, b"sip:a@b", ParseType::UriProbe, Destination::UriProbe(&mut probe));

        ctx.fail_syntax(3);
        ctx.accept();
        ctx.fail_stack();
        assert_eq!(ctx.exit(), &EngineExit::SyntaxError { column: 3 });
    }

    #[test]
    fn test_drop_releases_accumulators() {
        let mut scratch = Pool::new("scratch", ArenaLimits::default());
        let mut probe = None;
        {
            let mut ctx =
                ParseContext::new(&mut scratch, b"", ParseType::UriProbe, Destination::UriProbe(&mut probe));
            ctx.append_extension(ExtensionSlot::Header, b"a=b").unwrap();
            ctx.append_extension(ExtensionSlot::Url, b"c").unwrap();
            assert_eq!(ctx.scratch().pages_in_use(), 2);
            ctx.release_extensions();
            ctx.release_extensions();
            ctx.append_extension(ExtensionSlot::Url, b"d").unwrap();
        }
        assert_eq!(scratch.pages_in_use(), 0);
    }

    #[test]
    fn test_specific_header_defaults_from_parse_type() {
        let mut scratch = Pool::new("scratch", ArenaLimits::default());
        let mut probe = None;
        let ctx = ParseContext::new(
            &mut scratch,
            b"",
            ParseType::Header(HeaderType::Via),
            Destination::UriProbe(&mut probe),
        );
        assert_eq!(ctx.specific_header(), Some(HeaderType::Via));
    }
}
