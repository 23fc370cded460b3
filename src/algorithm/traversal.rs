//! 遍历支持
//!
//! 访问集合与基于显式栈的可达性遍历，供强连通判定和最短路径共用

use crate::graph::{Digraph, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 遍历方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalDirection {
    /// 正向遍历（沿出边方向）
    Forward,
    /// 反向遍历（沿入边方向）
    Backward,
}

/// 访问集合，记录发现顺序
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    seen: HashSet<VertexId>,
    order: Vec<VertexId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// 标记为已访问；首次访问时返回 true
    pub fn insert(&mut self, vertex: VertexId) -> bool {
        if self.seen.insert(vertex) {
            self.order.push(vertex);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.seen.contains(&vertex)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 发现顺序
    pub fn order(&self) -> &[VertexId] {
        &self.order
    }
}

/// 可达性遍历器
pub struct Traversal<'g, V, E> {
    graph: &'g Digraph<V, E>,
    direction: TraversalDirection,
    /// 反向邻接表（仅反向遍历时构建）
    reverse: HashMap<VertexId, Vec<VertexId>>,
}

impl<'g, V, E> Traversal<'g, V, E> {
    /// 创建遍历器
    pub fn new(graph: &'g Digraph<V, E>, direction: TraversalDirection) -> Self {
        let reverse = match direction {
            TraversalDirection::Forward => HashMap::new(),
            TraversalDirection::Backward => reverse_adjacency(graph),
        };

        Self {
            graph,
            direction,
            reverse,
        }
    }

    pub fn forward(graph: &'g Digraph<V, E>) -> Self {
        Self::new(graph, TraversalDirection::Forward)
    }

    pub fn backward(graph: &'g Digraph<V, E>) -> Self {
        Self::new(graph, TraversalDirection::Backward)
    }

    pub fn direction(&self) -> TraversalDirection {
        self.direction
    }

    /// 从 `start` 出发可达的全部顶点（含 `start`）
    ///
    /// 深度优先，每个顶点至多入栈一次。`start` 不存在时返回空集合。
    pub fn reach(&self, start: VertexId) -> VisitedSet {
        let mut visited = VisitedSet::with_capacity(self.graph.vertex_count());
        if !self.graph.contains_vertex(start) {
            return visited;
        }

        let mut stack = vec![start];
        visited.insert(start);

        while let Some(current) = stack.pop() {
            match self.direction {
                TraversalDirection::Forward => {
                    if let Some(record) = self.graph.vertex(current) {
                        for next in record.targets() {
                            if visited.insert(next) {
                                stack.push(next);
                            }
                        }
                    }
                }
                TraversalDirection::Backward => {
                    if let Some(sources) = self.reverse.get(&current) {
                        for &next in sources {
                            if visited.insert(next) {
                                stack.push(next);
                            }
                        }
                    }
                }
            }
        }

        visited
    }

    /// 从 `start` 是否能到达图中所有顶点
    pub fn covers_all(&self, start: VertexId) -> bool {
        self.reach(start).len() == self.graph.vertex_count()
    }
}

/// 构建反向邻接表：目标顶点 -> 源顶点列表
fn reverse_adjacency<V, E>(graph: &Digraph<V, E>) -> HashMap<VertexId, Vec<VertexId>> {
    let mut reverse: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for (from, record) in graph.iter() {
        for to in record.targets() {
            reverse.entry(to).or_default().push(from);
        }
    }
    reverse
}
