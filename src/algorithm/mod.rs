//! 图算法模块
//!
//! 包含单源最短路径和强连通判定，二者都是对图的只读查询

mod connectivity;
mod shortest_path;
mod traversal;

pub use connectivity::ConnectivityChecker;
pub use shortest_path::{ShortestPathEngine, ShortestPathTree};
pub use traversal::{Traversal, TraversalDirection, VisitedSet};
