//! Destination objects the parser builds into.

pub mod encode;
mod header;
mod list;
mod message;
mod standalone;

pub use header::{Header, HeaderMut, HeaderSnapshot, HeaderView};
pub use list::HeaderList;
pub use message::{Message, StartLine};
pub use standalone::{StandaloneAddress, StandaloneHeader};
