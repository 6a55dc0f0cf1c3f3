mod channel;
mod error;
mod frame;
mod link;
mod recording;
pub use channel::*;
pub use error::*;
pub use frame::*;
pub use link::*;
pub use recording::*;
