//! 有向图数据结构
//!
//! 以顶点 ID 为键的邻接表存储。每个顶点持有自己的载荷和出边表，
//! 边载荷存放在源顶点中。所有变更都先完成校验再修改存储，
//! 因此任何失败路径都不会留下部分修改。

use super::edge::EdgeId;
use super::vertex::{Vertex, VertexId};
use crate::algorithm::{ConnectivityChecker, ShortestPathEngine, ShortestPathTree};
use crate::config::{DigraphConfig, SelfLoopPolicy};
use crate::error::{Error, Result};
use crate::metrics::global_metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 泛型有向图
///
/// `V` 为顶点载荷类型，`E` 为边载荷类型。`Clone` 产生完全独立的深拷贝：
/// 两个实例之间没有共享的可变状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDigraph<V, E>")]
pub struct Digraph<V, E> {
    /// 顶点 ID -> 顶点记录
    vertices: BTreeMap<VertexId, Vertex<V, E>>,
    /// 图配置
    #[serde(default)]
    config: DigraphConfig,
}

/// 反序列化的中间形式，校验通过后才转换为 `Digraph`
#[derive(Deserialize)]
struct RawDigraph<V, E> {
    vertices: BTreeMap<VertexId, Vertex<V, E>>,
    #[serde(default)]
    config: DigraphConfig,
}

impl<V, E> TryFrom<RawDigraph<V, E>> for Digraph<V, E> {
    type Error = Error;

    /// 出边目标必须是已有顶点；拒绝自环时也不接受自环边
    fn try_from(raw: RawDigraph<V, E>) -> Result<Self> {
        for (&from, record) in &raw.vertices {
            for to in record.targets() {
                if !raw.vertices.contains_key(&to) {
                    return Err(Error::MissingVertex(to));
                }
                if from == to && raw.config.self_loops == SelfLoopPolicy::Reject {
                    return Err(Error::SelfLoop(from));
                }
            }
        }

        Ok(Self {
            vertices: raw.vertices,
            config: raw.config,
        })
    }
}

impl<V, E> Default for Digraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Digraph<V, E> {
    /// 创建空图
    pub fn new() -> Self {
        Self::with_config(DigraphConfig::default())
    }

    /// 使用指定配置创建空图
    pub fn with_config(config: DigraphConfig) -> Self {
        Self {
            vertices: BTreeMap::new(),
            config,
        }
    }

    /// 获取图配置
    pub fn config(&self) -> &DigraphConfig {
        &self.config
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点
    pub fn add_vertex(&mut self, id: impl Into<VertexId>, info: V) -> Result<()> {
        let id = id.into();
        if self.vertices.contains_key(&id) {
            return rejected(Error::DuplicateVertex(id));
        }

        self.vertices.insert(id, Vertex::new(info));
        global_metrics().record_vertex_insert();
        debug!(vertex = %id, "添加顶点");
        Ok(())
    }

    /// 删除顶点及所有以其为源或目标的边，返回顶点载荷
    pub fn remove_vertex(&mut self, id: impl Into<VertexId>) -> Result<V> {
        let id = id.into();
        let Some(record) = self.vertices.remove(&id) else {
            return rejected(Error::MissingVertex(id));
        };

        let mut removed_edges = record.out_degree();
        for other in self.vertices.values_mut() {
            if other.remove_edge(id).is_some() {
                removed_edges += 1;
            }
        }

        let metrics = global_metrics();
        metrics.record_vertex_remove();
        metrics.record_edges_removed(removed_edges);
        debug!(vertex = %id, removed_edges, "删除顶点");

        Ok(record.into_info())
    }

    /// 获取顶点载荷
    pub fn vertex_info(&self, id: impl Into<VertexId>) -> Result<&V> {
        let id = id.into();
        self.vertex(id)
            .map(Vertex::info)
            .ok_or(Error::MissingVertex(id))
    }

    /// 获取可变顶点载荷
    pub fn vertex_info_mut(&mut self, id: impl Into<VertexId>) -> Result<&mut V> {
        let id = id.into();
        self.vertices
            .get_mut(&id)
            .map(Vertex::info_mut)
            .ok_or(Error::MissingVertex(id))
    }

    pub fn contains_vertex(&self, id: impl Into<VertexId>) -> bool {
        self.vertices.contains_key(&id.into())
    }

    /// 所有顶点 ID 的快照（按 ID 升序）
    pub fn vertices(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 两个端点都必须存在，且同一有序顶点对上不能已有边。
    pub fn add_edge(
        &mut self,
        from: impl Into<VertexId>,
        to: impl Into<VertexId>,
        info: E,
    ) -> Result<()> {
        let edge = EdgeId::new(from.into(), to.into());
        if !self.vertices.contains_key(&edge.to) {
            return rejected(Error::MissingVertex(edge.to));
        }
        if !self.vertices.contains_key(&edge.from) {
            return rejected(Error::MissingVertex(edge.from));
        }
        if edge.is_self_loop() && self.config.self_loops == SelfLoopPolicy::Reject {
            return rejected(Error::SelfLoop(edge.from));
        }

        let inserted = self
            .vertices
            .get_mut(&edge.from)
            .map(|record| record.insert_edge(edge.to, info).is_ok())
            .unwrap_or(false);
        if !inserted {
            return rejected(Error::DuplicateEdge(edge));
        }

        global_metrics().record_edge_insert();
        debug!(edge = %edge, "添加边");
        Ok(())
    }

    /// 删除边，返回边载荷
    pub fn remove_edge(&mut self, from: impl Into<VertexId>, to: impl Into<VertexId>) -> Result<E> {
        let edge = EdgeId::new(from.into(), to.into());
        if !self.vertices.contains_key(&edge.to) {
            return rejected(Error::MissingVertex(edge.to));
        }
        let Some(record) = self.vertices.get_mut(&edge.from) else {
            return rejected(Error::MissingVertex(edge.from));
        };
        let Some(info) = record.remove_edge(edge.to) else {
            return rejected(Error::MissingEdge(edge));
        };

        global_metrics().record_edges_removed(1);
        debug!(edge = %edge, "删除边");
        Ok(info)
    }

    /// 获取边载荷
    pub fn edge_info(&self, from: impl Into<VertexId>, to: impl Into<VertexId>) -> Result<&E> {
        let edge = EdgeId::new(from.into(), to.into());
        if !self.vertices.contains_key(&edge.to) {
            return Err(Error::MissingVertex(edge.to));
        }
        self.vertex(edge.from)
            .ok_or(Error::MissingVertex(edge.from))?
            .edge(edge.to)
            .ok_or(Error::MissingEdge(edge))
    }

    /// 获取可变边载荷
    pub fn edge_info_mut(
        &mut self,
        from: impl Into<VertexId>,
        to: impl Into<VertexId>,
    ) -> Result<&mut E> {
        let edge = EdgeId::new(from.into(), to.into());
        if !self.vertices.contains_key(&edge.to) {
            return Err(Error::MissingVertex(edge.to));
        }
        self.vertices
            .get_mut(&edge.from)
            .ok_or(Error::MissingVertex(edge.from))?
            .edge_mut(edge.to)
            .ok_or(Error::MissingEdge(edge))
    }

    pub fn contains_edge(&self, from: impl Into<VertexId>, to: impl Into<VertexId>) -> bool {
        let to = to.into();
        self.vertex(from.into())
            .map(|record| record.has_edge_to(to))
            .unwrap_or(false)
    }

    /// 所有边的快照
    ///
    /// 按源顶点 ID 升序，同一源顶点内按插入顺序。
    pub fn edges(&self) -> Vec<EdgeId> {
        self.vertices
            .iter()
            .flat_map(|(&from, record)| record.targets().map(move |to| EdgeId::new(from, to)))
            .collect()
    }

    /// 顶点出边的快照（插入顺序）
    pub fn edges_from(&self, id: impl Into<VertexId>) -> Result<Vec<EdgeId>> {
        let id = id.into();
        self.vertex(id)
            .map(|record| record.edge_ids(id))
            .ok_or(Error::MissingVertex(id))
    }

    /// 获取边总数
    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(Vertex::out_degree).sum()
    }

    /// 获取顶点的出边数量
    pub fn edge_count_from(&self, id: impl Into<VertexId>) -> Result<usize> {
        let id = id.into();
        self.vertex(id)
            .map(Vertex::out_degree)
            .ok_or(Error::MissingVertex(id))
    }

    // ==================== 邻居查询 ====================

    /// 获取顶点的邻居（出边指向的顶点，插入顺序）
    pub fn neighbors(&self, id: impl Into<VertexId>) -> Result<Vec<VertexId>> {
        let id = id.into();
        self.vertex(id)
            .map(|record| record.targets().collect())
            .ok_or(Error::MissingVertex(id))
    }

    /// 获取顶点的入度
    pub fn in_degree(&self, id: impl Into<VertexId>) -> Result<usize> {
        let id = id.into();
        if !self.vertices.contains_key(&id) {
            return Err(Error::MissingVertex(id));
        }
        Ok(self
            .vertices
            .values()
            .filter(|record| record.has_edge_to(id))
            .count())
    }

    // ==================== 整体操作 ====================

    /// 清空图（保留配置）
    pub fn clear(&mut self) {
        let vertices = self.vertices.len();
        let edges = self.edge_count();
        self.vertices.clear();

        let metrics = global_metrics();
        metrics.record_vertices_removed(vertices);
        metrics.record_edges_removed(edges);
        debug!(vertices, edges, "清空图");
    }

    /// 赋值：丢弃当前存储，深拷贝 `other` 的全部内容
    pub fn assign_from(&mut self, other: &Self)
    where
        V: Clone,
        E: Clone,
    {
        self.clone_from(other);
    }

    /// 判断图是否强连通
    pub fn is_strongly_connected(&self) -> bool {
        ConnectivityChecker::new(self)
            .with_strategy(self.config.connectivity)
            .is_strongly_connected()
    }

    /// 计算从 `start` 出发的最短路径树
    pub fn find_shortest_paths<F>(
        &self,
        start: impl Into<VertexId>,
        edge_weight: F,
    ) -> Result<ShortestPathTree>
    where
        F: Fn(&E) -> f64,
    {
        ShortestPathEngine::new(self)
            .with_queue(self.config.shortest_path_queue)
            .run(start.into(), edge_weight)
    }

    // ==================== 内部访问 ====================

    /// 获取顶点记录
    pub(crate) fn vertex(&self, id: VertexId) -> Option<&Vertex<V, E>> {
        self.vertices.get(&id)
    }

    /// 遍历所有顶点记录（按 ID 升序）
    pub(crate) fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex<V, E>)> + '_ {
        self.vertices.iter().map(|(&id, record)| (id, record))
    }
}

fn rejected<T>(err: Error) -> Result<T> {
    global_metrics().record_rejected();
    Err(err)
}
