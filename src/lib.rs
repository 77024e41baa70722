pub mod echo;
pub mod error;
pub mod payload;
pub mod playback;
pub mod rows;

pub use error::{FeedError, FeedResult};
