//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, slicing fixed-column text records or using prettier
//! formatting for scientific numbers are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod column_ext;
mod option_ext;
mod string_ext;
mod value_ext;

// Flatten
pub use column_ext::ColumnExt;
pub use option_ext::OptionExt;
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
