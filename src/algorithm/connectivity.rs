//! 强连通判定
//!
//! 判断任意两个顶点之间是否都存在有向路径。空图和单个顶点视为强连通。

use super::traversal::Traversal;
use crate::config::ConnectivityStrategy;
use crate::graph::Digraph;
use crate::metrics::global_metrics;
use tracing::debug;

/// 强连通判定器
pub struct ConnectivityChecker<'g, V, E> {
    graph: &'g Digraph<V, E>,
    strategy: ConnectivityStrategy,
}

impl<'g, V, E> ConnectivityChecker<'g, V, E> {
    pub fn new(graph: &'g Digraph<V, E>) -> Self {
        Self {
            graph,
            strategy: ConnectivityStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ConnectivityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 判断图是否强连通
    pub fn is_strongly_connected(&self) -> bool {
        let metrics = global_metrics();
        let timer = metrics.record_connectivity_start();

        let connected = match self.strategy {
            ConnectivityStrategy::PerVertex => self.per_vertex(),
            ConnectivityStrategy::ForwardBackward => self.forward_backward(),
        };

        metrics.record_algorithm_complete(timer);
        debug!(
            strategy = ?self.strategy,
            vertices = self.graph.vertex_count(),
            connected,
            "强连通判定完成"
        );
        connected
    }

    /// 从每个顶点正向遍历，任一遍历未覆盖全图即返回
    fn per_vertex(&self) -> bool {
        let traversal = Traversal::forward(self.graph);
        self.graph
            .vertices()
            .into_iter()
            .all(|vertex| traversal.covers_all(vertex))
    }

    /// 从 ID 最小的顶点正向、反向各遍历一次
    fn forward_backward(&self) -> bool {
        let Some(root) = self.graph.vertices().first().copied() else {
            return true;
        };

        Traversal::forward(self.graph).covers_all(root)
            && Traversal::backward(self.graph).covers_all(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DigraphConfig;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const STRATEGIES: [ConnectivityStrategy; 2] = [
        ConnectivityStrategy::PerVertex,
        ConnectivityStrategy::ForwardBackward,
    ];

    fn check(graph: &Digraph<(), ()>) -> bool {
        let results: Vec<bool> = STRATEGIES
            .iter()
            .map(|&s| ConnectivityChecker::new(graph).with_strategy(s).is_strongly_connected())
            .collect();
        assert_eq!(results[0], results[1]);
        results[0]
    }

    /// 1 -> 2 -> 3 -> 1
    fn create_cycle() -> Digraph<(), ()> {
        let mut graph = Digraph::new();
        for id in 1..=3 {
            graph.add_vertex(id, ()).unwrap();
        }
        graph.add_edge(1, 2, ()).unwrap();
        graph.add_edge(2, 3, ()).unwrap();
        graph.add_edge(3, 1, ()).unwrap();
        graph
    }

    #[test]
    fn test_cycle_is_strongly_connected() {
        let mut graph = create_cycle();
        assert!(check(&graph));

        graph.remove_edge(3, 1).unwrap();
        assert!(!check(&graph));
    }

    #[test]
    fn test_trivial_graphs() {
        let mut graph: Digraph<(), ()> = Digraph::new();
        assert!(check(&graph));

        graph.add_vertex(1, ()).unwrap();
        assert!(check(&graph));

        graph.add_edge(1, 1, ()).unwrap();
        assert!(check(&graph));

        graph.add_vertex(2, ()).unwrap();
        assert!(!check(&graph));
    }

    #[test]
    fn test_isolated_vertex_breaks_connectivity() {
        let mut graph = create_cycle();
        graph.add_vertex(4, ()).unwrap();
        graph.add_edge(4, 1, ()).unwrap();
        assert!(!check(&graph));

        graph.add_edge(3, 4, ()).unwrap();
        assert!(check(&graph));
    }

    #[test]
    fn test_graph_method_uses_configured_strategy() {
        let config = DigraphConfig::new().with_connectivity(ConnectivityStrategy::ForwardBackward);
        let mut graph: Digraph<(), ()> = Digraph::with_config(config);
        graph.add_vertex(1, ()).unwrap();
        graph.add_vertex(2, ()).unwrap();
        graph.add_edge(1, 2, ()).unwrap();
        assert!(!graph.is_strongly_connected());

        graph.add_edge(2, 1, ()).unwrap();
        assert!(graph.is_strongly_connected());
    }

    #[test]
    fn test_random_graphs_agree() {
        let mut rng = StdRng::seed_from_u64(46);

        for _ in 0..50 {
            let mut graph: Digraph<(), ()> = Digraph::new();
            let n: i64 = rng.gen_range(0..8);
            for id in 0..n {
                graph.add_vertex(id, ()).unwrap();
            }
            for _ in 0..rng.gen_range(0..=n * 2) {
                let _ = graph.add_edge(rng.gen_range(0..n), rng.gen_range(0..n), ());
            }
            check(&graph);
        }
    }
}
