//! 图操作指标收集模块
//!
//! 统计结构变更、被拒绝的操作以及算法运行次数和耗时

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 全局图操作指标
#[derive(Debug)]
pub struct Metrics {
    /// 结构变更统计
    mutation_stats: MutationStats,
    /// 算法统计
    algorithm_stats: AlgorithmStats,
    /// 启动时间
    start_time: Instant,
}

/// 结构变更统计
#[derive(Debug, Default)]
struct MutationStats {
    vertices_inserted: AtomicU64,
    vertices_removed: AtomicU64,
    edges_inserted: AtomicU64,
    /// 包含删除顶点时级联删除的边
    edges_removed: AtomicU64,
    /// 因前置条件失败而未执行的操作
    rejected_operations: AtomicU64,
}

/// 算法统计
#[derive(Debug, Default)]
struct AlgorithmStats {
    shortest_path_runs: AtomicU64,
    connectivity_checks: AtomicU64,
    /// 算法总耗时（微秒）
    total_duration_us: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub vertices_inserted: u64,
    pub vertices_removed: u64,
    pub edges_inserted: u64,
    pub edges_removed: u64,
    pub rejected_operations: u64,

    pub shortest_path_runs: u64,
    pub connectivity_checks: u64,
    pub avg_algorithm_duration_ms: f64,

    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

/// 算法计时器
pub struct AlgorithmTimer {
    start: Instant,
}

impl AlgorithmTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            mutation_stats: MutationStats::default(),
            algorithm_stats: AlgorithmStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn record_vertex_insert(&self) {
        self.mutation_stats
            .vertices_inserted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vertex_remove(&self) {
        self.record_vertices_removed(1);
    }

    /// 记录删除的顶点（清空图时为批量数量）
    pub fn record_vertices_removed(&self, count: usize) {
        self.mutation_stats
            .vertices_removed
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_edge_insert(&self) {
        self.mutation_stats
            .edges_inserted
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录删除的边（`count` 可为级联删除的数量）
    pub fn record_edges_removed(&self, count: usize) {
        self.mutation_stats
            .edges_removed
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.mutation_stats
            .rejected_operations
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录最短路径计算开始
    pub fn record_shortest_path_start(&self) -> AlgorithmTimer {
        self.algorithm_stats
            .shortest_path_runs
            .fetch_add(1, Ordering::Relaxed);
        AlgorithmTimer::new()
    }

    /// 记录强连通判定开始
    pub fn record_connectivity_start(&self) -> AlgorithmTimer {
        self.algorithm_stats
            .connectivity_checks
            .fetch_add(1, Ordering::Relaxed);
        AlgorithmTimer::new()
    }

    /// 记录算法完成
    pub fn record_algorithm_complete(&self, timer: AlgorithmTimer) {
        self.algorithm_stats
            .total_duration_us
            .fetch_add(timer.elapsed().as_micros() as u64, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let shortest_path_runs = self
            .algorithm_stats
            .shortest_path_runs
            .load(Ordering::Relaxed);
        let connectivity_checks = self
            .algorithm_stats
            .connectivity_checks
            .load(Ordering::Relaxed);
        let total_duration_us = self
            .algorithm_stats
            .total_duration_us
            .load(Ordering::Relaxed);

        let runs = shortest_path_runs + connectivity_checks;
        let avg_algorithm_duration_ms = if runs > 0 {
            (total_duration_us as f64) / (runs as f64) / 1000.0
        } else {
            0.0
        };

        let stats = &self.mutation_stats;
        MetricsSnapshot {
            vertices_inserted: stats.vertices_inserted.load(Ordering::Relaxed),
            vertices_removed: stats.vertices_removed.load(Ordering::Relaxed),
            edges_inserted: stats.edges_inserted.load(Ordering::Relaxed),
            edges_removed: stats.edges_removed.load(Ordering::Relaxed),
            rejected_operations: stats.rejected_operations.load(Ordering::Relaxed),
            shortest_path_runs,
            connectivity_checks,
            avg_algorithm_duration_ms,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let s = self.snapshot();

        let counters: [(&str, &str, u64); 8] = [
            ("vertices_inserted_total", "Total vertices inserted", s.vertices_inserted),
            ("vertices_removed_total", "Total vertices removed", s.vertices_removed),
            ("edges_inserted_total", "Total edges inserted", s.edges_inserted),
            ("edges_removed_total", "Total edges removed, including cascades", s.edges_removed),
            ("rejected_operations_total", "Operations rejected by a precondition", s.rejected_operations),
            ("shortest_path_runs_total", "Shortest path computations", s.shortest_path_runs),
            ("connectivity_checks_total", "Strong connectivity checks", s.connectivity_checks),
            ("uptime_seconds", "Seconds since metrics start", s.uptime_seconds),
        ];

        let mut content = String::new();
        for (name, help, value) in counters {
            let _ = writeln!(content, "# HELP digraph_{} {}", name, help);
            let _ = writeln!(content, "# TYPE digraph_{} counter", name);
            let _ = writeln!(content, "digraph_{} {}", name, value);
        }

        content.push_str("# HELP digraph_algorithm_duration_avg_ms Average algorithm duration in milliseconds\n");
        content.push_str("# TYPE digraph_algorithm_duration_avg_ms gauge\n");
        let _ = writeln!(
            content,
            "digraph_algorithm_duration_avg_ms {:.2}",
            s.avg_algorithm_duration_ms
        );

        PrometheusMetrics { content }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        let m = &self.mutation_stats;
        for counter in [
            &m.vertices_inserted,
            &m.vertices_removed,
            &m.edges_inserted,
            &m.edges_removed,
            &m.rejected_operations,
        ] {
            counter.store(0, Ordering::Relaxed);
        }

        let a = &self.algorithm_stats;
        for counter in [
            &a.shortest_path_runs,
            &a.connectivity_checks,
            &a.total_duration_us,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}
