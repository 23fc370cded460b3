//! 图配置
//!
//! 控制自环策略和算法实现的选择。配置随图一起复制。

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 自环边策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfLoopPolicy {
    /// 允许自环（对最短路径无影响）
    #[default]
    Allow,
    /// 拒绝自环，`add_edge` 返回 `Error::SelfLoop`
    Reject,
}

/// 最短路径使用的优先队列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStrategy {
    /// 二叉堆 + 惰性删除（允许同一顶点的过期条目）
    #[default]
    LazyDeletion,
    /// 支持 decrease-key 的索引优先队列
    DecreaseKey,
}

/// 强连通判定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStrategy {
    /// 从每个顶点各遍历一次
    #[default]
    PerVertex,
    /// 从一个顶点正向、反向各遍历一次
    ForwardBackward,
}

/// 图配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigraphConfig {
    pub self_loops: SelfLoopPolicy,
    pub shortest_path_queue: QueueStrategy,
    pub connectivity: ConnectivityStrategy,
}

impl DigraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置自环策略
    pub fn with_self_loops(mut self, policy: SelfLoopPolicy) -> Self {
        self.self_loops = policy;
        self
    }

    /// 设置最短路径优先队列
    pub fn with_shortest_path_queue(mut self, strategy: QueueStrategy) -> Self {
        self.shortest_path_queue = strategy;
        self
    }

    /// 设置强连通判定方式
    pub fn with_connectivity(mut self, strategy: ConnectivityStrategy) -> Self {
        self.connectivity = strategy;
        self
    }

    /// 从 JSON 解析，缺省字段取默认值
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
