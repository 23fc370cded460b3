//! 顶点定义
//!
//! 顶点由调用方选择的整数 ID 标识，携带一个任意类型的载荷，
//! 以及按插入顺序排列的出边集合。

use super::edge::EdgeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（图内唯一）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VertexId(pub i64);

impl VertexId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for VertexId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 顶点记录
///
/// 出边以目标顶点为键：同一有序顶点对至多一条边。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex<V, E> {
    /// 顶点载荷
    info: V,
    /// 出边（目标顶点 -> 边载荷），保持插入顺序
    edges: IndexMap<VertexId, E>,
}

impl<V, E> Vertex<V, E> {
    /// 创建没有出边的顶点
    pub fn new(info: V) -> Self {
        Self {
            info,
            edges: IndexMap::new(),
        }
    }

    /// 获取顶点载荷
    pub fn info(&self) -> &V {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut V {
        &mut self.info
    }

    /// 取出载荷并丢弃出边
    pub fn into_info(self) -> V {
        self.info
    }

    /// 获取指向 `to` 的边载荷
    pub fn edge(&self, to: VertexId) -> Option<&E> {
        self.edges.get(&to)
    }

    pub fn edge_mut(&mut self, to: VertexId) -> Option<&mut E> {
        self.edges.get_mut(&to)
    }

    pub fn has_edge_to(&self, to: VertexId) -> bool {
        self.edges.contains_key(&to)
    }

    /// 追加出边；若已存在则原样返回载荷
    pub(crate) fn insert_edge(&mut self, to: VertexId, info: E) -> std::result::Result<(), E> {
        if self.edges.contains_key(&to) {
            return Err(info);
        }
        self.edges.insert(to, info);
        Ok(())
    }

    /// 移除出边，保持其余边的顺序
    pub(crate) fn remove_edge(&mut self, to: VertexId) -> Option<E> {
        self.edges.shift_remove(&to)
    }

    /// 出边数量
    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    /// 出边目标（插入顺序）
    pub fn targets(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.edges.keys().copied()
    }

    /// 出边（目标, 载荷）
    pub fn outgoing(&self) -> impl Iterator<Item = (VertexId, &E)> + '_ {
        self.edges.iter().map(|(&to, info)| (to, info))
    }

    /// 以 `from` 为源的边 ID 快照
    pub fn edge_ids(&self, from: VertexId) -> Vec<EdgeId> {
        self.targets().map(|to| EdgeId::new(from, to)).collect()
    }
}
