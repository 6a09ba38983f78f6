pub mod conversion;
pub mod media;

pub use conversion::{ConversionRequest, ConversionSpec};
pub use media::{sanitize_file_name, Media, NewMedia};
