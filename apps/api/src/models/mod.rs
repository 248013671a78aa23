pub mod document;
pub mod message;

pub use document::{CvDocument, DocumentError, Education, Experience};
pub use message::Message;
