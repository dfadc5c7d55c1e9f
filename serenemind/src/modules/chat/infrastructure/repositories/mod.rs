// Chat Infrastructure - Repositories
//
// 存储实现：
// - InMemoryKeyValueStore: 内存存储，用于开发和测试
// - FileKeyValueStore: 文件持久化存储
// - SessionRecords: 会话到键值记录的映射

mod file_key_value_store;
mod in_memory_key_value_store;
mod session_records;

pub use file_key_value_store::*;
pub use in_memory_key_value_store::*;
pub use session_records::*;
