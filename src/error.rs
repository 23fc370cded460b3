//! 错误类型定义
//!
//! 所有错误都是调用方可纠正的前置条件违反：失败的操作不会修改图。

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    MissingVertex(VertexId),

    #[error("边不存在: {0}")]
    MissingEdge(EdgeId),

    #[error("顶点已存在: {0}")]
    DuplicateVertex(VertexId),

    #[error("边已存在: {0}")]
    DuplicateEdge(EdgeId),

    /// 仅在 `SelfLoopPolicy::Reject` 下出现
    #[error("不允许自环边: {0}")]
    SelfLoop(VertexId),

    #[error("配置错误: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::MissingVertex(VertexId::new(7));
        assert_eq!(err.to_string(), "顶点不存在: 7");

        let err = Error::DuplicateEdge(EdgeId::new(VertexId::new(1), VertexId::new(2)));
        assert_eq!(err.to_string(), "边已存在: 1 -> 2");
    }
}
