pub mod json;
pub mod text;

pub use json::JsonWriter;
pub use text::TextWriter;
