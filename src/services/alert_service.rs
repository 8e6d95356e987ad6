use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};

use crate::models::alert::{AlertConfig, AlertFrequency, AlertKind};
use crate::models::stock::StockRecord;

/// 单条记录的时点告警检查，纯函数
///
/// - `Price`：当日涨跌幅绝对值达到阈值（含等于）
/// - `Volume`：量比超过 1 + 阈值/100
/// - `Movement`：相对 `previous`（或加自选基线）的价格变动绝对值超过阈值
///
/// 非自选代码一律不触发；数据缺失按不触发处理，绝不 panic。
pub fn should_notify(
    record: &StockRecord,
    previous: Option<&StockRecord>,
    config: &AlertConfig,
) -> bool {
    if !config.is_watched(&record.symbol) {
        return false;
    }

    match config.kind {
        AlertKind::Price => {
            record.change_percent.is_finite()
                && record.change_percent.abs() >= config.threshold_percent
        }
        AlertKind::Volume => match record.relative_volume() {
            Some(ratio) => ratio > 1.0 + config.threshold_percent / 100.0,
            None => false,
        },
        AlertKind::Movement => {
            let moved = match previous {
                Some(prev) if prev.price > 0.0 => {
                    (record.price - prev.price) / prev.price * 100.0
                }
                // 无历史快照：以加自选时点为基线；连基线都没有时
                // 退化为相对昨收的当日涨跌幅
                _ => record.change_percent,
            };
            moved.is_finite() && moved.abs() > config.threshold_percent
        }
    }
}

/// 告警服务：维护自选基线快照并按频率节流评估轮次
///
/// 评估本身始终是时点检查；`frequency` 只决定 `is_due` 何时放行下一轮。
/// 告警状态的生命周期独立于筛选/排序——换一组筛选条件不影响这里。
pub struct AlertService {
    config: AlertConfig,
    /// 每个自选代码的基线快照：加自选时点写入，之后随评估轮次滚动
    baselines: HashMap<String, StockRecord>,
    last_pass: Option<DateTime<Local>>,
}

impl AlertService {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            baselines: HashMap::new(),
            last_pass: None,
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// 加自选并记录基线；重复加为幂等 no-op（不重置已有基线）
    pub fn watch(&mut self, record: &StockRecord) -> bool {
        let added = self.config.watch(record.symbol.clone());
        if added {
            self.baselines.insert(record.symbol.clone(), record.clone());
        }
        added
    }

    /// 只知道代码、还没有行情时加自选（基线留空，首轮评估退化为当日涨跌幅）
    pub fn watch_symbol(&mut self, symbol: impl Into<String>) -> bool {
        self.config.watch(symbol.into())
    }

    pub fn unwatch(&mut self, symbol: &str) -> bool {
        self.baselines.remove(symbol);
        self.config.unwatch(symbol)
    }

    /// 按配置频率判断是否该跑下一轮评估
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        let last = match self.last_pass {
            Some(t) => t,
            None => return true,
        };
        match self.config.frequency {
            AlertFrequency::Realtime => true,
            AlertFrequency::Daily => last.date_naive() != now.date_naive(),
            AlertFrequency::Weekly => now.signed_duration_since(last) >= Duration::days(7),
        }
    }

    /// 对一份快照跑一轮评估，返回应触发通知的代码列表；
    /// 评估完成后基线滚动到本次快照
    pub fn evaluate(&mut self, snapshot: &[StockRecord], now: DateTime<Local>) -> Vec<String> {
        let mut hits = Vec::new();
        for record in snapshot {
            if !self.config.is_watched(&record.symbol) {
                continue;
            }
            let previous = self.baselines.get(&record.symbol);
            if should_notify(record, previous, &self.config) {
                hits.push(record.symbol.clone());
            }
        }

        for record in snapshot {
            if self.config.is_watched(&record.symbol) {
                self.baselines
                    .insert(record.symbol.clone(), record.clone());
            }
        }

        if !hits.is_empty() {
            log::info!("告警轮次命中 {} 条: {:?}", hits.len(), hits);
        }
        self.last_pass = Some(now);
        hits
    }
}
