pub mod number;

pub use number::format_number;
