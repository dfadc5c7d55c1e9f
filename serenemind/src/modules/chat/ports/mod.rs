// Chat Ports Layer
// 端口定义了模块与外部世界的接口

mod classifier_port;
mod generator_port;
mod key_value_store;

pub use classifier_port::*;
pub use generator_port::*;
pub use key_value_store::*;
