//! 边定义
//!
//! 边由有序顶点对 (from, to) 唯一标识，载荷存放在源顶点的出边表中。

use super::vertex::VertexId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（有序顶点对）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EdgeId {
    /// 源顶点 ID
    pub from: VertexId,
    /// 目标顶点 ID
    pub to: VertexId,
}

impl EdgeId {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// 源顶点
    pub fn src(&self) -> VertexId {
        self.from
    }

    /// 目标顶点
    pub fn dst(&self) -> VertexId {
        self.to
    }

    /// 是否为自环边
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// 反向边 ID
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from)
    }

    /// 是否与顶点相关联（作为源或目标）
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.from == vertex || self.to == vertex
    }
}

impl From<(VertexId, VertexId)> for EdgeId {
    fn from((from, to): (VertexId, VertexId)) -> Self {
        Self::new(from, to)
    }
}

impl From<(i64, i64)> for EdgeId {
    fn from((from, to): (i64, i64)) -> Self {
        Self::new(VertexId::new(from), VertexId::new(to))
    }
}

impl From<(i32, i32)> for EdgeId {
    fn from((from, to): (i32, i32)) -> Self {
        Self::new(VertexId::from(from), VertexId::from(to))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id() {
        let e = EdgeId::from((1, 2));
        assert_eq!(e.src().as_i64(), 1);
        assert_eq!(e.dst().as_i64(), 2);
        assert!(!e.is_self_loop());
        assert_eq!(e.reversed(), EdgeId::from((2, 1)));
        assert!(e.touches(VertexId::new(2)));
        assert!(!e.touches(VertexId::new(3)));
        assert!(EdgeId::from((4, 4)).is_self_loop());
    }
}
