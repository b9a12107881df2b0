//! Recognisers for SIP start lines, header lines, header values and URIs,
//! built with nom over byte slices.
//!
//! The grammar never builds objects itself. It records positions in the
//! input and calls the semantic actions in [`crate::builder::actions`].

use nom::IResult;

use crate::context::ParseContext;

mod engine;
pub mod separators;
pub mod token;
pub mod uri;
pub mod value;
pub mod whitespace;

pub use engine::SipGrammar;

// Type alias for parser result
pub type ParseResult<'a, O> = IResult<&'a [u8], O>;

/// A grammar that drives the semantic actions over a parse context.
///
/// Implementations report their outcome through the context's verdict
/// (`accept`, `fail_syntax`, `fail_reduction` or `fail_stack`), never
/// through a return value.
pub trait GrammarEngine {
    fn run(&self, ctx: &mut ParseContext<'_>);
}
