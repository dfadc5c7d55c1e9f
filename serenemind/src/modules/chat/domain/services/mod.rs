// Chat Domain - Services
// 领域服务处理不属于任何实体的业务逻辑，全部同步、无外部调用

mod content_selector;
mod fixed_replies;
mod prompt_builder;
mod safety_gate;

pub use content_selector::*;
pub use fixed_replies::*;
pub use prompt_builder::*;
pub use safety_gate::*;
