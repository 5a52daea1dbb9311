pub mod classifier;
pub mod decoder;

pub use classifier::{classify, trim_unconfirmed, ClassifiedBatch};
pub use decoder::decode_stream;
