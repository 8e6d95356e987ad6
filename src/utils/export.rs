use crate::models::stock::StockRecord;
use crate::utils::format::{format_currency, format_magnitude, format_optional, format_percent};

const HEADER: &str = "Symbol,Name,Sector,Industry,Price,Change %,Market Cap,P/E,Dividend Yield";

/// 把筛选结果行导出为 CSV 文本（筛选页 Download 按钮的数据源）
///
/// 展示列复用格式化函数，与表格显示保持一致；落盘/下载由调用方负责。
pub fn screener_csv(rows: &[StockRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for r in rows {
        let columns = [
            r.symbol.clone(),
            r.name.clone().unwrap_or_else(|| "N/A".to_string()),
            r.sector.clone().unwrap_or_else(|| "N/A".to_string()),
            r.industry.clone().unwrap_or_else(|| "N/A".to_string()),
            format_currency(r.price),
            format_percent(r.change_percent),
            format_optional(r.market_cap, format_magnitude),
            format_optional(r.pe_ratio, |v| format!("{:.2}", v)),
            // 股息率内部是小数，展示为百分比
            format_optional(r.dividend_yield.map(|v| v * 100.0), format_percent),
        ];
        let line: Vec<String> = columns.iter().map(|c| escape_csv(c)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
