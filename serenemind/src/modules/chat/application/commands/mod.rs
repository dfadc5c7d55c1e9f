// Chat Commands - 命令定义和处理器

mod send_message;
mod set_display_name;

pub use send_message::*;
pub use set_display_name::*;
