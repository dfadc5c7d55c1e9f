// Config Application Layer
//
// 应用层提供配置加载服务

pub mod service;

pub use service::*;
