//! 图核心模块
//!
//! 定义顶点、边和有向图的核心数据结构

mod digraph;
mod edge;
mod vertex;

pub use digraph::Digraph;
pub use edge::EdgeId;
pub(crate) use vertex::Vertex;
pub use vertex::VertexId;
