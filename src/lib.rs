//! 美股行情看板核心：筛选/排序/分页查询引擎与告警评估
//!
//! 数据流单向：数据提供方产出只读快照 → 筛选会话执行
//! 过滤 → 排序 → 分页 → 结果页；告警评估在同一快照上独立运行。
//! 核心全部是内存纯计算，唯一的异步边界是快照拉取。

pub mod models;
pub mod services;
pub mod utils;

pub use models::alert::{AlertConfig, AlertFrequency, AlertKind};
pub use models::portfolio::{Holding, PortfolioSummary, SectorSlice};
pub use models::query::{
    CategoryFilter, FilterConfig, RangeFilter, ScreeningResult, SortConfig, SortDirection,
};
pub use models::stock::{Field, FieldValue, StockRecord};
pub use services::alert_service::{should_notify, AlertService};
pub use services::provider::MarketDataProvider;
pub use services::screener::{matches, sort_records, ScreeningSession};
