//! # rvoip-sip-parse-core
//!
//! The object-construction side of the rvoip SIP parser. A grammar engine
//! recognises SIP syntax; this crate turns what it recognises into header,
//! address and message objects whose text lives in page-based arenas.
//!
//! ## Overview
//!
//! - [`arena`]: pools of append-only pages and the extension accumulators
//! - [`context`]: per-call state shared by the grammar and the builders
//! - [`builder`]: field materialization, header construction and URI dispatch
//! - [`grammar`]: the nom-based SIP grammar engine
//! - [`parser`]: the parse orchestrator and its entry points
//! - [`model`]: the destination objects (messages, header lists, standalone
//!   headers and addresses)
//!
//! ## Example
//!
//! ```rust
//! use rvoip_sip_parse_core::prelude::*;
//!
//! let mut parser = SipParser::default();
//! let mut message = Message::new(ArenaLimits::default()).unwrap();
//! parser
//!     .parse_message(b"Via: SIP/2.0/UDP host.example.com:5060;branch=z9hG4bK1", &mut message)
//!     .unwrap();
//!
//! let via = message.first(HeaderType::Via).unwrap();
//! assert_eq!(via.text(FieldKey::Branch), Some("z9hG4bK1"));
//! assert_eq!(via.number(FieldKey::Port), Some(5060));
//! ```

pub mod arena;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod model;
pub mod parsed;
pub mod parser;
pub mod types;

pub use arena::{ArenaLimits, ExtensionAccumulator, PageId, Pool, Span};
pub use config::ParserConfig;
pub use context::{Destination, EngineExit, ExtensionSlot, ParseContext, TargetKind};
pub use error::{Error, ErrorKind, Result};
pub use grammar::{GrammarEngine, SipGrammar};
pub use model::{HeaderList, HeaderSnapshot, HeaderView, Message, StandaloneAddress, StandaloneHeader, StartLine};
pub use parser::{ParseRequest, SipParser};
pub use types::{FieldKey, FieldValue, HeaderType, KnownToken, ParseType, StoredValue, UriKind, UriValue};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{
        ArenaLimits, Destination, Error, FieldKey, FieldValue, HeaderList, HeaderType, HeaderView, KnownToken,
        Message, ParseRequest, ParseType, ParserConfig, Result, SipParser, StandaloneAddress, StandaloneHeader,
        StoredValue, UriKind, UriValue,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
