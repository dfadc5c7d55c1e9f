// Chat Domain - Value Objects
// 值对象是不可变的，通过值而非标识来比较

mod emotion;
mod session_id;
mod turn_outcome;

pub use emotion::*;
pub use session_id::*;
pub use turn_outcome::*;
