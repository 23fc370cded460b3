//! Digraph - 泛型有向图
//!
//! 以整数 ID 标识顶点、顶点和边都携带任意载荷的有向图容器，支持：
//! - 顶点和边的增删查，删除顶点时级联删除关联边
//! - 深拷贝值语义，副本之间没有共享状态
//! - Dijkstra 单源最短路径树
//! - 强连通判定

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;

// 重导出常用类型
pub use algorithm::{ConnectivityChecker, ShortestPathEngine, ShortestPathTree};
pub use config::{ConnectivityStrategy, DigraphConfig, QueueStrategy, SelfLoopPolicy};
pub use error::{Error, Result};
pub use graph::{Digraph, EdgeId, VertexId};
pub use metrics::{global_metrics, Metrics, MetricsSnapshot};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
