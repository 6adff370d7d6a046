//! Scalpel 工具集
//!
//! 提供日志初始化、编译后 shader 的路径解析等通用工具。

pub mod init_log;
pub mod resource;
