//! Closed discriminants and value types shared by the grammar and the builders.

mod descriptors;
pub mod field;
pub mod header_type;
pub mod tokens;
pub mod uri;

pub use field::{Discriminant, FieldDescriptor, FieldKey, FieldKind, FieldValue, StoredValue};
pub use header_type::{HeaderType, ParseType, Shape};
pub use tokens::{KnownToken, TokenTable};
pub use uri::{AbsoluteUri, Address, DiameterUri, LrParam, SipUrl, TelUri, UriKind, UriValue};
