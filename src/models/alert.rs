use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// 告警类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// 当日涨跌幅超阈值
    #[serde(rename = "price")]
    Price,
    /// 量比（成交量/均量）放大超阈值
    #[serde(rename = "volume")]
    Volume,
    /// 相对上一快照（或加自选时点）的价格变动超阈值
    #[serde(rename = "movement")]
    Movement,
}

/// 告警评估频率：只约束调用方多久跑一次评估，评估本身是无状态的时点检查
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertFrequency {
    #[serde(rename = "realtime")]
    Realtime,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
}

/// 告警规则配置
///
/// 生命周期独立于筛选/排序配置：重新筛选同一快照不影响已建的告警与自选集。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub kind: AlertKind,
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
    #[serde(default = "default_frequency")]
    pub frequency: AlertFrequency,
    /// 参与告警评估的自选代码集合
    #[serde(default)]
    pub watched_symbols: HashSet<String>,
}

fn default_threshold() -> f64 { 5.0 }
fn default_frequency() -> AlertFrequency { AlertFrequency::Realtime }

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            kind: AlertKind::Price,
            threshold_percent: 5.0,
            frequency: AlertFrequency::Realtime,
            watched_symbols: HashSet::new(),
        }
    }
}

impl AlertConfig {
    pub fn new(kind: AlertKind, threshold_percent: f64, frequency: AlertFrequency) -> Self {
        Self {
            kind,
            threshold_percent,
            frequency,
            watched_symbols: HashSet::new(),
        }
    }

    /// 加自选；重复加为幂等 no-op，返回是否实际新增
    pub fn watch(&mut self, symbol: impl Into<String>) -> bool {
        self.watched_symbols.insert(symbol.into())
    }

    /// 移除自选；移除未自选代码同样是 no-op
    pub fn unwatch(&mut self, symbol: &str) -> bool {
        self.watched_symbols.remove(symbol)
    }

    pub fn is_watched(&self, symbol: &str) -> bool {
        self.watched_symbols.contains(symbol)
    }
}
