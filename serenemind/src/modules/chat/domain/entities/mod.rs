// Chat Domain - Entities

mod message;
mod mood;
mod session;

pub use message::*;
pub use mood::*;
pub use session::*;
