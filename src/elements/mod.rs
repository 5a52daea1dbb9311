pub mod element;
pub mod viewport;

pub use element::{DrawElement, ElementBinding, Label, RawRecord};
pub use viewport::ViewportCommand;
