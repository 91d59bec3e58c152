pub mod value;

pub use value::{Elements, Entries, Node, Value, ValueKind};
