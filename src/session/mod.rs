pub mod busy;
pub mod store;
pub mod types;

pub use busy::{BusyFlag, BusyGuard, SharedGuard};
pub use store::{History, Ordering};
pub use types::{GeneratedAudio, GeneratedImage, Message, Role, Turn};
