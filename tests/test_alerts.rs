//! 告警评估与组合概览集成测试
//!
//! 覆盖：三类告警阈值判定、自选幂等、基线滚动、频率节流、组合汇总。

use chrono::{Local, TimeZone};

use actinovate::services::portfolio::summarize;
use actinovate::{
    should_notify, AlertConfig, AlertFrequency, AlertKind, AlertService, Holding, StockRecord,
};

fn watched_record(symbol: &str, price: f64, change_percent: f64) -> StockRecord {
    StockRecord {
        symbol: symbol.to_string(),
        price,
        change: price * change_percent / 100.0,
        change_percent,
        ..Default::default()
    }
}

fn price_config(threshold: f64, symbols: &[&str]) -> AlertConfig {
    let mut config = AlertConfig::new(AlertKind::Price, threshold, AlertFrequency::Realtime);
    for s in symbols {
        config.watch(s.to_string());
    }
    config
}

// ==================== 涨跌幅告警 ====================

#[test]
fn test_price_alert_threshold_examples() {
    let config = price_config(5.0, &["AAPL"]);

    let up = watched_record("AAPL", 185.92, 6.2);
    assert!(should_notify(&up, None, &config), "+6.2% 达到 5% 阈值应触发");

    let down_small = watched_record("AAPL", 185.92, -4.9);
    assert!(!should_notify(&down_small, None, &config), "|-4.9%| < 5% 不应触发");

    let down_big = watched_record("AAPL", 185.92, -5.0);
    assert!(should_notify(&down_big, None, &config), "阈值判定含等于");
}

#[test]
fn test_unwatched_symbol_never_notifies() {
    let config = price_config(1.0, &["AAPL"]);
    let record = watched_record("TSLA", 273.58, 9.0);
    assert!(!should_notify(&record, None, &config), "非自选代码不参与告警");
}

#[test]
fn test_nan_change_percent_does_not_notify() {
    let config = price_config(5.0, &["AAPL"]);
    let record = watched_record("AAPL", 185.92, f64::NAN);
    assert!(!should_notify(&record, None, &config), "脏数据按不触发处理");
}

// ==================== 量比告警 ====================

#[test]
fn test_volume_alert_relative_volume() {
    let mut config = AlertConfig::new(AlertKind::Volume, 50.0, AlertFrequency::Realtime);
    config.watch("NVDA");

    let mut record = watched_record("NVDA", 435.10, 0.0);
    record.volume = Some(3_000_000.0);
    record.average_volume = Some(1_500_000.0); // 量比 2.0
    assert!(should_notify(&record, None, &config), "量比 2.0 > 1.5 应触发");

    let mut calm = record.clone();
    calm.volume = Some(1_600_000.0); // 量比约 1.07
    assert!(!should_notify(&calm, None, &config));

    let mut missing = watched_record("NVDA", 435.10, 0.0);
    missing.volume = None;
    assert!(!should_notify(&missing, None, &config), "无量数据不应触发");
}

// ==================== 价格变动告警 ====================

#[test]
fn test_movement_alert_against_previous_snapshot() {
    let mut config = AlertConfig::new(AlertKind::Movement, 5.0, AlertFrequency::Realtime);
    config.watch("META");

    let previous = watched_record("META", 100.0, 0.0);
    let moved = watched_record("META", 106.0, 1.0);
    assert!(
        should_notify(&moved, Some(&previous), &config),
        "较上一快照 +6% 应触发"
    );

    let flat = watched_record("META", 104.0, 1.0);
    assert!(!should_notify(&flat, Some(&previous), &config), "+4% 未超阈值");

    // 无历史快照：退化为当日涨跌幅
    let armed_today = watched_record("META", 106.0, 7.5);
    assert!(should_notify(&armed_today, None, &config));
}

// ==================== 告警服务：基线滚动与频率 ====================

#[test]
fn test_alert_service_rolls_baseline() {
    let config = AlertConfig::new(AlertKind::Movement, 5.0, AlertFrequency::Realtime);
    let mut service = AlertService::new(config);

    let armed = watched_record("META", 100.0, 0.0);
    assert!(service.watch(&armed));
    assert!(!service.watch(&armed), "重复加自选应为 no-op");

    let now = Local.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
    let snapshot = vec![watched_record("META", 106.0, 1.0)];
    let hits = service.evaluate(&snapshot, now);
    assert_eq!(hits, vec!["META".to_string()], "相对基线 +6% 应触发");

    // 基线已滚动到 106，同一快照再评估不应重复触发
    let later = Local.with_ymd_and_hms(2026, 8, 6, 10, 5, 0).unwrap();
    let hits = service.evaluate(&snapshot, later);
    assert!(hits.is_empty(), "基线滚动后同价位不应再触发");
}

#[test]
fn test_alert_service_frequency_gate() {
    let config = AlertConfig::new(AlertKind::Price, 5.0, AlertFrequency::Daily);
    let mut service = AlertService::new(config);
    let morning = Local.with_ymd_and_hms(2026, 8, 6, 9, 30, 0).unwrap();
    assert!(service.is_due(morning), "从未评估过应放行");

    service.evaluate(&[], morning);
    let noon = Local.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
    assert!(!service.is_due(noon), "daily 同日内不应再次放行");

    let next_day = Local.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
    assert!(service.is_due(next_day));

    let mut weekly = AlertService::new(AlertConfig::new(
        AlertKind::Price,
        5.0,
        AlertFrequency::Weekly,
    ));
    weekly.evaluate(&[], morning);
    assert!(!weekly.is_due(next_day), "weekly 隔天不应放行");
    let next_week = Local.with_ymd_and_hms(2026, 8, 13, 9, 30, 0).unwrap();
    assert!(weekly.is_due(next_week));
}

#[test]
fn test_alerts_survive_refiltering() {
    // 告警生命周期独立于筛选配置：换筛选条件不应影响自选集
    let mut service = AlertService::new(price_config(5.0, &["AAPL", "TSLA"]));
    let _ = actinovate::FilterConfig::default().with_search("msft");
    assert!(service.config().is_watched("AAPL"));
    assert!(service.config().is_watched("TSLA"));
    assert!(service.unwatch("TSLA"));
    assert!(!service.config().is_watched("TSLA"));
}

// ==================== 组合概览 ====================

#[test]
fn test_portfolio_summary_totals() {
    let snapshot = vec![
        StockRecord {
            symbol: "AAPL".to_string(),
            sector: Some("Technology".to_string()),
            price: 200.0,
            change: 2.0,
            change_percent: 1.0,
            ..Default::default()
        },
        StockRecord {
            symbol: "JNJ".to_string(),
            sector: Some("Healthcare".to_string()),
            price: 100.0,
            change: -1.0,
            change_percent: -1.0,
            ..Default::default()
        },
    ];
    let holdings = vec![
        Holding { symbol: "AAPL".to_string(), shares: 15.0, cost_basis: 150.0 },
        Holding { symbol: "JNJ".to_string(), shares: 10.0, cost_basis: 110.0 },
        Holding { symbol: "GONE".to_string(), shares: 5.0, cost_basis: 10.0 },
    ];

    let summary = summarize(&holdings, &snapshot);
    assert!((summary.total_value - 4000.0).abs() < 1e-9, "15*200 + 10*100");
    assert!((summary.total_cost - 3350.0).abs() < 1e-9, "快照外持仓应被跳过");
    assert!((summary.total_gain - 650.0).abs() < 1e-9);
    assert!((summary.day_change - 20.0).abs() < 1e-9, "15*2.0 + 10*(-1.0)");

    assert_eq!(summary.allocation.len(), 2);
    assert_eq!(summary.allocation[0].sector, "Technology");
    assert!((summary.allocation[0].weight_percent - 75.0).abs() < 1e-9);

    assert_eq!(summary.top_performers[0].0, "AAPL", "涨幅榜按当日涨跌幅降序");
}

#[test]
fn test_portfolio_empty_inputs() {
    let summary = summarize(&[], &[]);
    assert_eq!(summary.total_value, 0.0);
    assert_eq!(summary.total_gain_percent, 0.0);
    assert!(summary.allocation.is_empty());
    assert!(summary.top_performers.is_empty());
}
