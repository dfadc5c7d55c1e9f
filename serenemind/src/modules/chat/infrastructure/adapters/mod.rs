// Chat Adapters
// 外部情绪分类与回复生成服务的适配器实现

mod gemini;
mod huggingface;
mod scripted;

#[cfg(test)]
pub(crate) mod test_server;

pub use gemini::*;
pub use huggingface::*;
pub use scripted::*;
