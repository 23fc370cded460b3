//! 单源最短路径算法
//!
//! Dijkstra 算法，边权由调用方提供的函数从边载荷计算，必须非负。
//! 支持两种优先队列：惰性删除的二叉堆，以及带 decrease-key 的索引优先队列。

use super::traversal::VisitedSet;
use crate::config::QueueStrategy;
use crate::error::{Error, Result};
use crate::graph::{Digraph, VertexId};
use crate::metrics::global_metrics;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::ops::Index;
use tracing::{debug, trace};

/// 最短路径树
///
/// 每个顶点映射到其最短路径上的前驱。起点和不可达顶点映射到自身。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathTree {
    start: VertexId,
    predecessors: BTreeMap<VertexId, VertexId>,
}

impl ShortestPathTree {
    /// 起点
    pub fn start(&self) -> VertexId {
        self.start
    }

    /// 顶点的前驱；顶点不在图中时返回 None
    pub fn predecessor(&self, vertex: VertexId) -> Option<VertexId> {
        self.predecessors.get(&vertex).copied()
    }

    pub fn predecessors(&self) -> &BTreeMap<VertexId, VertexId> {
        &self.predecessors
    }

    pub fn into_predecessors(self) -> BTreeMap<VertexId, VertexId> {
        self.predecessors
    }

    /// 顶点是否从起点可达
    pub fn is_reached(&self, vertex: VertexId) -> bool {
        vertex == self.start
            || self
                .predecessor(vertex)
                .map(|prev| prev != vertex)
                .unwrap_or(false)
    }

    /// 重构从起点到 `target` 的路径（含两端）
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if !self.is_reached(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != self.start {
            current = self.predecessor(current)?;
            path.push(current);
            // 前驱链长度不会超过顶点数
            if path.len() > self.predecessors.len() {
                return None;
            }
        }

        path.reverse();
        Some(path)
    }

    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }
}

impl Index<VertexId> for ShortestPathTree {
    type Output = VertexId;

    fn index(&self, vertex: VertexId) -> &VertexId {
        &self.predecessors[&vertex]
    }
}

/// 优先队列条目
///
/// 排序反转：距离越小优先级越高，距离相同时 ID 越小优先级越高。
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    vertex: VertexId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// 算法工作状态
struct SearchState {
    distances: HashMap<VertexId, f64>,
    predecessors: BTreeMap<VertexId, VertexId>,
    finalized: VisitedSet,
}

impl SearchState {
    fn new<V, E>(graph: &Digraph<V, E>, start: VertexId) -> Self {
        let mut distances = HashMap::with_capacity(graph.vertex_count());
        let mut predecessors = BTreeMap::new();
        for id in graph.vertices() {
            distances.insert(id, f64::INFINITY);
            predecessors.insert(id, id);
        }
        distances.insert(start, 0.0);

        Self {
            distances,
            predecessors,
            finalized: VisitedSet::with_capacity(graph.vertex_count()),
        }
    }

    fn distance(&self, vertex: VertexId) -> f64 {
        self.distances
            .get(&vertex)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// 松弛：严格更短时更新距离和前驱，返回是否更新
    fn relax(&mut self, from: VertexId, to: VertexId, candidate: f64) -> bool {
        if candidate < self.distance(to) {
            trace!(from = %from, to = %to, distance = candidate, "松弛");
            self.distances.insert(to, candidate);
            self.predecessors.insert(to, from);
            true
        } else {
            false
        }
    }
}

/// 最短路径引擎
pub struct ShortestPathEngine<'g, V, E> {
    graph: &'g Digraph<V, E>,
    queue: QueueStrategy,
}

impl<'g, V, E> ShortestPathEngine<'g, V, E> {
    /// 创建引擎
    pub fn new(graph: &'g Digraph<V, E>) -> Self {
        Self {
            graph,
            queue: QueueStrategy::default(),
        }
    }

    /// 设置优先队列实现
    pub fn with_queue(mut self, queue: QueueStrategy) -> Self {
        self.queue = queue;
        self
    }

    /// 计算从 `start` 出发的最短路径树
    pub fn run<F>(&self, start: VertexId, edge_weight: F) -> Result<ShortestPathTree>
    where
        F: Fn(&E) -> f64,
    {
        if !self.graph.contains_vertex(start) {
            return Err(Error::MissingVertex(start));
        }

        let metrics = global_metrics();
        let timer = metrics.record_shortest_path_start();

        let mut state = SearchState::new(self.graph, start);
        match self.queue {
            QueueStrategy::LazyDeletion => self.run_lazy(start, &edge_weight, &mut state),
            QueueStrategy::DecreaseKey => self.run_decrease_key(start, &edge_weight, &mut state),
        }

        metrics.record_algorithm_complete(timer);
        debug!(
            start = %start,
            reached = state.finalized.len(),
            vertices = self.graph.vertex_count(),
            "最短路径计算完成"
        );

        Ok(ShortestPathTree {
            start,
            predecessors: state.predecessors,
        })
    }

    /// 二叉堆 + 惰性删除：同一顶点可有多个条目，出堆时丢弃已确定的顶点
    fn run_lazy<F>(&self, start: VertexId, edge_weight: &F, state: &mut SearchState)
    where
        F: Fn(&E) -> f64,
    {
        let mut heap = BinaryHeap::new();
        heap.push(Candidate {
            distance: 0.0,
            vertex: start,
        });

        while let Some(Candidate { distance, vertex }) = heap.pop() {
            if !state.finalized.insert(vertex) {
                trace!(vertex = %vertex, distance, "丢弃过期条目");
                continue;
            }

            let Some(record) = self.graph.vertex(vertex) else {
                continue;
            };
            for (to, info) in record.outgoing() {
                let candidate = distance + edge_weight(info);
                if state.relax(vertex, to, candidate) {
                    heap.push(Candidate {
                        distance: candidate,
                        vertex: to,
                    });
                }
            }
        }
    }

    /// 索引优先队列：每个顶点至多一个条目，更短距离直接提升其优先级
    fn run_decrease_key<F>(&self, start: VertexId, edge_weight: &F, state: &mut SearchState)
    where
        F: Fn(&E) -> f64,
    {
        let mut queue: PriorityQueue<VertexId, Candidate> = PriorityQueue::new();
        queue.push(
            start,
            Candidate {
                distance: 0.0,
                vertex: start,
            },
        );

        while let Some((vertex, Candidate { distance, .. })) = queue.pop() {
            state.finalized.insert(vertex);

            let Some(record) = self.graph.vertex(vertex) else {
                continue;
            };
            for (to, info) in record.outgoing() {
                if state.finalized.contains(to) {
                    continue;
                }
                let candidate = distance + edge_weight(info);
                if state.relax(vertex, to, candidate) {
                    queue.push_increase(
                        to,
                        Candidate {
                            distance: candidate,
                            vertex: to,
                        },
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DigraphConfig;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn v(id: i64) -> VertexId {
        VertexId::new(id)
    }

    /// A=1, B=2, C=3: A -> B (1), B -> C (1), A -> C (5)
    fn create_test_graph() -> Digraph<&'static str, f64> {
        let mut graph = Digraph::new();
        graph.add_vertex(1, "A").unwrap();
        graph.add_vertex(2, "B").unwrap();
        graph.add_vertex(3, "C").unwrap();
        graph.add_edge(1, 2, 1.0).unwrap();
        graph.add_edge(2, 3, 1.0).unwrap();
        graph.add_edge(1, 3, 5.0).unwrap();
        graph
    }

    fn weight(w: &f64) -> f64 {
        *w
    }

    fn both_strategies(graph: &Digraph<&'static str, f64>, start: i64) -> ShortestPathTree {
        let lazy = ShortestPathEngine::new(graph)
            .with_queue(QueueStrategy::LazyDeletion)
            .run(v(start), weight)
            .unwrap();
        let indexed = ShortestPathEngine::new(graph)
            .with_queue(QueueStrategy::DecreaseKey)
            .run(v(start), weight)
            .unwrap();
        assert_eq!(lazy, indexed);
        lazy
    }

    #[test]
    fn test_prefers_cheaper_two_hop_path() {
        let graph = create_test_graph();
        let tree = both_strategies(&graph, 1);

        assert_eq!(tree[v(1)], v(1));
        assert_eq!(tree[v(2)], v(1));
        assert_eq!(tree[v(3)], v(2));
        assert_eq!(tree.path_to(v(3)), Some(vec![v(1), v(2), v(3)]));
    }

    #[test]
    fn test_unreached_vertex_maps_to_itself() {
        let mut graph = create_test_graph();
        graph.add_vertex(4, "D").unwrap();
        graph.add_edge(4, 1, 1.0).unwrap();

        let tree = both_strategies(&graph, 1);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[v(4)], v(4));
        assert!(!tree.is_reached(v(4)));
        assert!(tree.is_reached(v(1)));
        assert_eq!(tree.path_to(v(4)), None);
        assert_eq!(tree.path_to(v(1)), Some(vec![v(1)]));
    }

    #[test]
    fn test_missing_start() {
        let graph = create_test_graph();
        assert_eq!(
            graph.find_shortest_paths(9, weight),
            Err(Error::MissingVertex(v(9)))
        );
    }

    #[test]
    fn test_cycles_and_self_loops() {
        let mut graph = create_test_graph();
        graph.add_edge(3, 1, 1.0).unwrap();
        graph.add_edge(2, 2, 0.0).unwrap();
        graph.add_edge(3, 3, 0.0).unwrap();

        let tree = both_strategies(&graph, 2);
        assert_eq!(tree[v(2)], v(2));
        assert_eq!(tree[v(3)], v(2));
        assert_eq!(tree[v(1)], v(3));
    }

    #[test]
    fn test_single_vertex() {
        let mut graph: Digraph<&'static str, f64> = Digraph::new();
        graph.add_vertex(7, "solo").unwrap();

        let tree = both_strategies(&graph, 7);
        assert_eq!(tree.into_predecessors(), BTreeMap::from([(v(7), v(7))]));
    }

    #[test]
    fn test_weight_function_over_payload() {
        // 载荷为结构化数据，权重来自其中一个字段
        #[derive(Clone)]
        struct Road {
            minutes: u32,
        }

        let mut graph: Digraph<(), Road> = Digraph::new();
        for id in 1..=3 {
            graph.add_vertex(id, ()).unwrap();
        }
        graph.add_edge(1, 2, Road { minutes: 10 }).unwrap();
        graph.add_edge(1, 3, Road { minutes: 3 }).unwrap();
        graph.add_edge(3, 2, Road { minutes: 4 }).unwrap();

        let tree = graph
            .find_shortest_paths(1, |road: &Road| f64::from(road.minutes))
            .unwrap();
        assert_eq!(tree.path_to(v(2)), Some(vec![v(1), v(3), v(2)]));
    }

    #[test]
    fn test_uses_configured_queue() {
        let config = DigraphConfig::new().with_shortest_path_queue(QueueStrategy::DecreaseKey);
        let mut graph: Digraph<(), f64> = Digraph::with_config(config);
        graph.add_vertex(1, ()).unwrap();
        graph.add_vertex(2, ()).unwrap();
        graph.add_edge(1, 2, 2.5).unwrap();

        let tree = graph.find_shortest_paths(1, |w| *w).unwrap();
        assert_eq!(tree.predecessor(v(2)), Some(v(1)));
        assert_eq!(tree.predecessor(v(3)), None);
    }

    /// 随机图上两种队列结果一致，且树上路径长度与 Bellman-Ford 松弛结果一致
    #[test]
    fn test_random_graphs_match_reference() {
        let mut rng = StdRng::seed_from_u64(2015);

        for _ in 0..25 {
            let mut graph: Digraph<&'static str, f64> = Digraph::new();
            let n: i64 = rng.gen_range(1..30);
            for id in 0..n {
                graph.add_vertex(id, "").unwrap();
            }
            for _ in 0..(n * 3) {
                let from = rng.gen_range(0..n);
                let to = rng.gen_range(0..n);
                let w = f64::from(rng.gen_range(0..10u32));
                let _ = graph.add_edge(from, to, w);
            }

            let tree = both_strategies(&graph, 0);

            // 参考距离
            let mut reference: HashMap<VertexId, f64> =
                graph.vertices().into_iter().map(|id| (id, f64::INFINITY)).collect();
            reference.insert(v(0), 0.0);
            for _ in 0..n {
                for edge in graph.edges() {
                    let w = *graph.edge_info(edge.from, edge.to).unwrap();
                    let candidate = reference[&edge.from] + w;
                    if candidate < reference[&edge.to] {
                        reference.insert(edge.to, candidate);
                    }
                }
            }

            for id in graph.vertices() {
                match tree.path_to(id) {
                    Some(path) => {
                        let length: f64 = path
                            .windows(2)
                            .map(|pair| *graph.edge_info(pair[0], pair[1]).unwrap())
                            .sum();
                        assert_eq!(length, reference[&id]);
                    }
                    None => assert!(reference[&id].is_infinite()),
                }
            }
        }
    }
}
