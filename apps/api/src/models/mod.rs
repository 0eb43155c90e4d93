pub mod job;
pub mod localized;
pub mod profile;

pub use localized::LocalizedText;
