use anyhow::{anyhow, Result};
use futures::future::join_all;
use serde_json::Value;

use crate::models::stock::StockRecord;
use crate::utils::http::build_provider_client;
use crate::utils::retry::retry_with_backoff;

const QUERY_URL: &str = "https://www.alphavantage.co/query";

/// 行情数据提供方：聚合行情(GLOBAL_QUOTE)与基本面概览(OVERVIEW)两个端点，
/// 按字段优先非空合并成一条快照记录
///
/// 快照是一次性拉全的物化序列：调用方拿到整份 `Vec<StockRecord>` 后
/// 重建筛选会话，不做流式/增量推送。
pub struct MarketDataProvider {
    client: reqwest::Client,
    api_key: String,
    concurrency: usize, // 并发拉取的代码数上限
}

impl MarketDataProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = build_provider_client()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            concurrency: 4,
        })
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 16);
        self
    }

    /// 按代码列表拉取完整快照；个别代码失败只告警跳过，不拖垮整批
    pub async fn fetch_snapshot(&self, symbols: &[String]) -> Result<Vec<StockRecord>> {
        if symbols.is_empty() {
            return Ok(vec![]);
        }

        let mut records = Vec::with_capacity(symbols.len());
        for chunk in symbols.chunks(self.concurrency) {
            let futures = chunk.iter().map(|s| self.fetch_symbol(s));
            for (symbol, result) in chunk.iter().zip(join_all(futures).await) {
                match result {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => log::warn!("{} 无有效行情数据，跳过", symbol),
                    Err(e) => log::warn!("{} 快照拉取失败，跳过: {}", symbol, e),
                }
            }
        }

        log::info!("快照拉取完成: 请求 {} 只，得到 {} 条", symbols.len(), records.len());
        Ok(records)
    }

    /// 拉取单只股票并合并两个端点的数据
    async fn fetch_symbol(&self, raw_symbol: &str) -> Result<Option<StockRecord>> {
        let symbol = normalize_symbol(raw_symbol)?;

        let quote = self.fetch_function("GLOBAL_QUOTE", &symbol).await?;
        // 概览端点失败不阻断行情（新股/ETF 往往没有概览）
        let overview = match self.fetch_function("OVERVIEW", &symbol).await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("{} 概览拉取失败，仅保留行情: {}", symbol, e);
                Value::Null
            }
        };

        let quote_rec = parse_global_quote(&symbol, &quote);
        let overview_rec = parse_overview(&symbol, &overview);
        Ok(merge_records(quote_rec, overview_rec))
    }

    async fn fetch_function(&self, function: &str, symbol: &str) -> Result<Value> {
        let url = format!(
            "{}?function={}&symbol={}&apikey={}",
            QUERY_URL,
            function,
            urlencoding::encode(symbol),
            urlencoding::encode(&self.api_key)
        );
        retry_with_backoff(2, || async {
            let resp = self.client.get(&url).send().await?;
            let json = resp.json::<Value>().await?;
            Ok(json)
        })
        .await
    }
}

/// 校验并规整代码：大写、1-10 位字母数字与 . -
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    let valid = regex::Regex::new(r"^[A-Z][A-Z0-9.\-]{0,9}$")
        .map(|re| re.is_match(&symbol))
        .unwrap_or(false);
    if !valid {
        return Err(anyhow!("非法股票代码: {}", raw));
    }
    Ok(symbol)
}

/// 解析行情端点（GLOBAL_QUOTE）
pub fn parse_global_quote(symbol: &str, json: &Value) -> Option<StockRecord> {
    let quote = json.get("Global Quote")?;
    let price = get_f64(quote, "05. price")?;
    if price <= 0.0 {
        return None;
    }

    let mut record = StockRecord {
        symbol: symbol.to_string(),
        price,
        ..Default::default()
    };
    record.change = get_f64(quote, "09. change").unwrap_or(0.0);
    // 涨跌幅字段形如 "1.2345%"
    record.change_percent = quote
        .get("10. change percent")
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim_end_matches('%').parse::<f64>().ok())
        .unwrap_or(0.0);
    record.volume = get_f64(quote, "06. volume");
    Some(record)
}

/// 解析概览端点（OVERVIEW），只产出基本面部分
pub fn parse_overview(symbol: &str, json: &Value) -> Option<StockRecord> {
    if !json.is_object() || json.get("Symbol").is_none() {
        return None;
    }

    let mut record = StockRecord {
        symbol: symbol.to_string(),
        ..Default::default()
    };
    record.name = get_text(json, "Name");
    record.sector = get_text(json, "Sector");
    record.industry = get_text(json, "Industry");
    record.market_cap = get_f64(json, "MarketCapitalization");
    record.pe_ratio = get_f64(json, "PERatio");
    record.dividend_yield = get_f64(json, "DividendYield").map(normalize_dividend_yield);
    record.eps = get_f64(json, "EPS");
    record.revenue = get_f64(json, "RevenueTTM");
    record.net_profit = get_f64(json, "NetIncomeTTM");
    record.beta = get_f64(json, "Beta");
    if let Some(v) = get_f64(json, "PriceToSalesRatioTTM") {
        record.metrics.insert("ps_ratio".to_string(), v);
    }
    if let Some(v) = get_f64(json, "PriceToBookRatio") {
        record.metrics.insert("pb_ratio".to_string(), v);
    }
    if let Some(v) = get_f64(json, "50DayMovingAverage") {
        record.metrics.insert("sma50".to_string(), v);
    }
    if let Some(v) = get_f64(json, "200DayMovingAverage") {
        record.metrics.insert("sma200".to_string(), v);
    }
    Some(record)
}

/// 合并两个来源的部分记录：逐字段先到先得（primary 优先，缺的拿 secondary 补）
pub fn merge_records(
    primary: Option<StockRecord>,
    secondary: Option<StockRecord>,
) -> Option<StockRecord> {
    let mut base = match (primary, secondary) {
        (Some(p), None) => return Some(p),
        (None, Some(s)) => return Some(s),
        (None, None) => return None,
        (Some(p), Some(s)) => {
            let mut base = p;
            if base.name.is_none() { base.name = s.name; }
            if base.sector.is_none() { base.sector = s.sector; }
            if base.industry.is_none() { base.industry = s.industry; }
            if base.price <= 0.0 { base.price = s.price; }
            if base.volume.is_none() { base.volume = s.volume; }
            if base.average_volume.is_none() { base.average_volume = s.average_volume; }
            if base.market_cap.is_none() { base.market_cap = s.market_cap; }
            if base.pe_ratio.is_none() { base.pe_ratio = s.pe_ratio; }
            if base.dividend_yield.is_none() { base.dividend_yield = s.dividend_yield; }
            if base.eps.is_none() { base.eps = s.eps; }
            if base.revenue.is_none() { base.revenue = s.revenue; }
            if base.net_profit.is_none() { base.net_profit = s.net_profit; }
            if base.beta.is_none() { base.beta = s.beta; }
            if base.rsi.is_none() { base.rsi = s.rsi; }
            for (k, v) in s.metrics {
                base.metrics.entry(k).or_insert(v);
            }
            base
        }
    };
    if base.symbol.is_empty() {
        return None;
    }
    base.symbol = base.symbol.to_uppercase();
    Some(base)
}

/// 股息率统一为小数 0-1：上游偶见已乘过 100 的百分数，大于 1 时按百分数回折。
/// 真实单位上游并不一致，折算只发生在这一个入口。
pub fn normalize_dividend_yield(raw: f64) -> f64 {
    if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}

/// 宽容取数：数值、整数、数值字符串都接受，"None"/"-" 等占位符视为缺失
fn get_f64(item: &Value, key: &str) -> Option<f64> {
    let v = item.get(key)?;
    let parsed = if v.is_f64() {
        v.as_f64()
    } else if v.is_i64() {
        v.as_i64().map(|i| i as f64)
    } else if v.is_string() {
        v.as_str().and_then(|s| s.trim().parse::<f64>().ok())
    } else {
        None
    };
    parsed.filter(|x| x.is_finite())
}

fn get_text(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "None" && *s != "-")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_global_quote_basic() {
        let payload = json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "185.9200",
                "06. volume": "54637891",
                "09. change": "1.3400",
                "10. change percent": "0.7261%"
            }
        });
        let record = parse_global_quote("AAPL", &payload).expect("应解析出记录");
        assert_eq!(record.symbol, "AAPL");
        assert!((record.price - 185.92).abs() < 1e-9);
        assert!((record.change_percent - 0.7261).abs() < 1e-9);
        assert_eq!(record.volume, Some(54637891.0));
    }

    #[test]
    fn test_parse_global_quote_rejects_zero_price() {
        let payload = json!({ "Global Quote": { "05. price": "0.0" } });
        assert!(parse_global_quote("XXXX", &payload).is_none());
    }

    #[test]
    fn test_parse_overview_placeholder_values() {
        let payload = json!({
            "Symbol": "TSLA",
            "Name": "Tesla Inc",
            "Sector": "Consumer Cyclical",
            "PERatio": "None",
            "DividendYield": "0",
            "MarketCapitalization": "870000000000"
        });
        let record = parse_overview("TSLA", &payload).expect("应解析出记录");
        assert_eq!(record.pe_ratio, None, "占位符 None 应视为缺失");
        assert_eq!(record.market_cap, Some(870_000_000_000.0));
        assert_eq!(record.sector.as_deref(), Some("Consumer Cyclical"));
    }

    #[test]
    fn test_merge_prefers_primary_fills_gaps() {
        let quote = StockRecord {
            symbol: "MSFT".to_string(),
            price: 328.79,
            change_percent: 1.2,
            ..Default::default()
        };
        let overview = StockRecord {
            symbol: "MSFT".to_string(),
            name: Some("Microsoft Corporation".to_string()),
            pe_ratio: Some(35.1),
            ..Default::default()
        };
        let merged = merge_records(Some(quote), Some(overview)).expect("合并结果不应为空");
        assert!((merged.price - 328.79).abs() < 1e-9);
        assert_eq!(merged.name.as_deref(), Some("Microsoft Corporation"));
        assert_eq!(merged.pe_ratio, Some(35.1));
    }

    #[test]
    fn test_normalize_dividend_yield_units() {
        assert!((normalize_dividend_yield(0.0044) - 0.0044).abs() < 1e-12);
        assert!((normalize_dividend_yield(2.5) - 0.025).abs() < 1e-12, "大于 1 应按百分数回折");
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("bad symbol!").is_err());
    }
}
