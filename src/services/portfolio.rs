use std::collections::HashMap;

use crate::models::portfolio::{Holding, PortfolioSummary, SectorSlice};
use crate::models::stock::StockRecord;

/// 汇总持仓对当前快照的估值：总市值、总/当日盈亏、板块分布、涨幅榜
///
/// 纯计算，持仓与快照都不在本层持久化；快照里找不到的持仓代码
/// 跳过并告警，不让单条脏数据拖垮整个概览。
pub fn summarize(holdings: &[Holding], snapshot: &[StockRecord]) -> PortfolioSummary {
    let by_symbol: HashMap<&str, &StockRecord> = snapshot
        .iter()
        .map(|r| (r.symbol.as_str(), r))
        .collect();

    let mut total_value = 0.0;
    let mut total_cost = 0.0;
    let mut day_change = 0.0;
    let mut sector_values: HashMap<String, f64> = HashMap::new();
    let mut performers: Vec<(String, f64)> = Vec::new();

    for holding in holdings {
        let record = match by_symbol.get(holding.symbol.as_str()) {
            Some(r) => *r,
            None => {
                log::warn!("持仓代码 {} 不在当前快照中，跳过", holding.symbol);
                continue;
            }
        };

        let value = holding.shares * record.price;
        total_value += value;
        total_cost += holding.shares * holding.cost_basis;
        day_change += holding.shares * record.change;

        let sector = record
            .sector
            .clone()
            .unwrap_or_else(|| "Other".to_string());
        *sector_values.entry(sector).or_insert(0.0) += value;

        if record.change_percent.is_finite() {
            performers.push((record.symbol.clone(), record.change_percent));
        }
    }

    let total_gain = total_value - total_cost;
    let total_gain_percent = if total_cost > 0.0 {
        total_gain / total_cost * 100.0
    } else {
        0.0
    };

    let mut allocation: Vec<SectorSlice> = sector_values
        .into_iter()
        .map(|(sector, value)| SectorSlice {
            sector,
            weight_percent: if total_value > 0.0 {
                value / total_value * 100.0
            } else {
                0.0
            },
        })
        .collect();
    // 占比降序，占比相同按板块名稳定展示
    allocation.sort_by(|a, b| {
        b.weight_percent
            .partial_cmp(&a.weight_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.sector.cmp(&b.sector))
    });

    performers.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    performers.truncate(3);

    PortfolioSummary {
        total_value,
        total_cost,
        total_gain,
        total_gain_percent,
        day_change,
        allocation,
        top_performers: performers,
    }
}
