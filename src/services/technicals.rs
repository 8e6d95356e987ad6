use serde::{Deserialize, Serialize};

use crate::models::stock::StockRecord;

/// 日线历史单点：详情页图表与指标推算共用的数据形状
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String, // "YYYY-MM-DD"
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// 用历史行情补全快照的技术面字段
///
/// 上游概览端点缺 SMA/RSI/动量等指标时，从日线历史就地推算，
/// 写入 `rsi` 字段与附加指标集合。历史长度不足的指标保持缺失。
pub fn enrich_with_technicals(record: &mut StockRecord, history: &[PricePoint]) {
    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
    let volumes: Vec<f64> = history.iter().map(|p| p.volume).collect();

    for (key, period) in [("sma10", 10), ("sma20", 20), ("sma50", 50), ("sma200", 200)] {
        if record.metric(key).is_none() {
            if let Some(v) = latest_sma(&closes, period) {
                record.metrics.insert(key.to_string(), v);
            }
        }
    }

    if record.rsi.is_none() {
        record.rsi = latest_rsi(&closes, 14);
    }

    if record.metric("momentum").is_none() {
        if let Some(v) = latest_momentum(&closes, 10) {
            record.metrics.insert("momentum".to_string(), v);
        }
    }

    if record.average_volume.is_none() {
        record.average_volume = trailing_average(&volumes, 20);
    }
    if record.metric("relative_volume").is_none() {
        if let Some(rv) = latest_relative_volume(&volumes, 20) {
            record.metrics.insert("relative_volume".to_string(), rv);
        }
    }
}

/// 末位简单均线
fn latest_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let sum: f64 = data[data.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// 末位 RSI（Wilder 平滑）
fn latest_rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    for i in (period + 1)..data.len() {
        let change = data[i] - data[i - 1];
        let (gain, loss) = if change > 0.0 { (change, 0.0) } else { (0.0, change.abs()) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
    }

    if avg_loss.abs() < 1e-10 {
        Some(100.0)
    } else {
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

/// N 日动量：末收盘减 N 日前收盘
fn latest_momentum(data: &[f64], period: usize) -> Option<f64> {
    if data.len() <= period {
        return None;
    }
    Some(data[data.len() - 1] - data[data.len() - 1 - period])
}

/// 量比：末日成交量 / 之前 N 日均量（不含末日）
fn latest_relative_volume(volumes: &[f64], period: usize) -> Option<f64> {
    if volumes.len() <= period {
        return None;
    }
    let today = volumes[volumes.len() - 1];
    let avg = trailing_average(&volumes[..volumes.len() - 1], period)?;
    if avg <= 0.0 {
        return None;
    }
    Some(today / avg)
}

fn trailing_average(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let sum: f64 = data[data.len() - period..].iter().sum();
    Some(sum / period as f64)
}
