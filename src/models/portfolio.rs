use serde::{Deserialize, Serialize};

/// 持仓条目（由外部传入，不在本层持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: f64,
    pub cost_basis: f64, // 每股成本
}

/// 板块占比切片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSlice {
    pub sector: String,
    pub weight_percent: f64, // 占组合市值 %
}

/// 组合概览卡片数据：总市值 / 总盈亏 / 当日变动 / 板块分布 / 涨幅榜
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
    pub day_change: f64,          // 当日盈亏（美元）
    pub allocation: Vec<SectorSlice>,
    /// (代码, 当日涨跌幅%)，按涨幅降序
    pub top_performers: Vec<(String, f64)>,
}
