use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// 单只股票的可筛选快照（由数据提供方聚合多个来源后产出）
///
/// `symbol` 在一个快照内唯一且载入后不可变；其余字段只能随快照整体替换刷新。
/// 基本面字段缺失（亏损公司无 PE、不分红无股息率）是常态，统一用 `Option` 表达。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,              // 代码，大写
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,      // 行业板块，板块筛选依赖此字段
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub price: f64,                  // 最新价
    #[serde(default)]
    pub change: f64,                 // 涨跌额
    #[serde(default)]
    pub change_percent: f64,         // 涨跌幅 %
    #[serde(default)]
    pub volume: Option<f64>,         // 成交量（股）
    #[serde(default)]
    pub average_volume: Option<f64>, // 均量（用于量比）
    #[serde(default)]
    pub market_cap: Option<f64>,     // 总市值（美元）
    #[serde(default)]
    pub pe_ratio: Option<f64>,       // 市盈率 TTM
    #[serde(default)]
    pub dividend_yield: Option<f64>, // 股息率，统一为小数 0-1
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,        // 营收 TTM（美元）
    #[serde(default)]
    pub net_profit: Option<f64>,     // 净利润 TTM（美元）
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub rsi: Option<f64>,            // RSI(14)，0-100
    /// 开放式附加指标集合：sma10/sma20/sma50/sma200、ps_ratio、pb_ratio、
    /// pcf_ratio、momentum、relative_volume 等按名寻址
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
}

/// 可用于筛选/排序的字段全集
///
/// 历史上各版本筛选器字段集不一致，这里收敛为一个枚举：
/// 写错字段名在构造配置时就报错，而不是静默比较 undefined。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Name,
    Sector,
    Industry,
    Price,
    Change,
    ChangePercent,
    Volume,
    MarketCap,
    PeRatio,
    DividendYield,
    Eps,
    Revenue,
    NetProfit,
    Beta,
    Rsi,
    Sma10,
    Sma20,
    Sma50,
    Sma200,
    PsRatio,
    PbRatio,
    PcfRatio,
    Momentum,
    RelativeVolume,
}

impl Field {
    /// 按名解析字段，未知名称直接报错（调用方编程错误，不静默吞掉）
    pub fn from_name(name: &str) -> Result<Field> {
        let field = match name {
            "symbol" => Field::Symbol,
            "name" => Field::Name,
            "sector" => Field::Sector,
            "industry" => Field::Industry,
            "price" => Field::Price,
            "change" => Field::Change,
            "change_percent" => Field::ChangePercent,
            "volume" => Field::Volume,
            "market_cap" => Field::MarketCap,
            "pe_ratio" => Field::PeRatio,
            "dividend_yield" => Field::DividendYield,
            "eps" => Field::Eps,
            "revenue" => Field::Revenue,
            "net_profit" => Field::NetProfit,
            "beta" => Field::Beta,
            "rsi" => Field::Rsi,
            "sma10" => Field::Sma10,
            "sma20" => Field::Sma20,
            "sma50" => Field::Sma50,
            "sma200" => Field::Sma200,
            "ps_ratio" => Field::PsRatio,
            "pb_ratio" => Field::PbRatio,
            "pcf_ratio" => Field::PcfRatio,
            "momentum" => Field::Momentum,
            "relative_volume" => Field::RelativeVolume,
            other => bail!("未知筛选字段: {}", other),
        };
        Ok(field)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Name => "name",
            Field::Sector => "sector",
            Field::Industry => "industry",
            Field::Price => "price",
            Field::Change => "change",
            Field::ChangePercent => "change_percent",
            Field::Volume => "volume",
            Field::MarketCap => "market_cap",
            Field::PeRatio => "pe_ratio",
            Field::DividendYield => "dividend_yield",
            Field::Eps => "eps",
            Field::Revenue => "revenue",
            Field::NetProfit => "net_profit",
            Field::Beta => "beta",
            Field::Rsi => "rsi",
            Field::Sma10 => "sma10",
            Field::Sma20 => "sma20",
            Field::Sma50 => "sma50",
            Field::Sma200 => "sma200",
            Field::PsRatio => "ps_ratio",
            Field::PbRatio => "pb_ratio",
            Field::PcfRatio => "pcf_ratio",
            Field::Momentum => "momentum",
            Field::RelativeVolume => "relative_volume",
        }
    }

    /// 文本字段按字典序比较，其余按数值比较
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Field::Symbol | Field::Name | Field::Sector | Field::Industry
        )
    }
}

/// 字段取值：数值或文本
///
/// 缺失与非有限值（NaN/inf）统一折叠为 `None`，由筛选/排序侧按各自策略处理。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl StockRecord {
    /// 按字段取值；数值字段缺失或为 NaN 时返回 None
    pub fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::Symbol => Some(FieldValue::Text(&self.symbol)),
            Field::Name => self.name.as_deref().map(FieldValue::Text),
            Field::Sector => self.sector.as_deref().map(FieldValue::Text),
            Field::Industry => self.industry.as_deref().map(FieldValue::Text),
            Field::Price => finite_number(Some(self.price)),
            Field::Change => finite_number(Some(self.change)),
            Field::ChangePercent => finite_number(Some(self.change_percent)),
            Field::Volume => finite_number(self.volume),
            Field::MarketCap => finite_number(self.market_cap),
            Field::PeRatio => finite_number(self.pe_ratio),
            Field::DividendYield => finite_number(self.dividend_yield),
            Field::Eps => finite_number(self.eps),
            Field::Revenue => finite_number(self.revenue),
            Field::NetProfit => finite_number(self.net_profit),
            Field::Beta => finite_number(self.beta),
            Field::Rsi => finite_number(self.rsi),
            // 其余指标统一走附加指标集合
            _ => finite_number(self.metric(field.name())),
        }
    }

    /// 数值视角取值：文本字段恒为 None
    pub fn numeric(&self, field: Field) -> Option<f64> {
        match self.field(field) {
            Some(FieldValue::Number(v)) => Some(v),
            _ => None,
        }
    }

    /// 按名读取附加指标
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    /// 今日相对均量的量比；有实时成交量和均量时现算，否则回退到快照自带指标
    pub fn relative_volume(&self) -> Option<f64> {
        match (self.volume, self.average_volume) {
            (Some(v), Some(avg)) if avg > 0.0 => Some(v / avg),
            _ => self.metric("relative_volume").filter(|v| v.is_finite()),
        }
    }
}

fn finite_number(value: Option<f64>) -> Option<FieldValue<'static>> {
    value.filter(|v| v.is_finite()).map(FieldValue::Number)
}
