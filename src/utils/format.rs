//! 显示格式化：全部是全函数，任何输入（含 NaN/缺失）都不会 panic，
//! 非有限值统一降级为 "N/A"。

/// 美元金额：$ + 千分位 + 固定两位小数
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(value.abs(), 2))
}

/// 百分比：非负带 + 前缀（负数自身带 -），两位小数，尾随 %
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// 大数缩写：1e12 → T、1e9 → B、1e6 → M（两位小数），其余千分位原样
pub fn format_magnitude(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        group_thousands(value, 2)
    }
}

/// 成交量缩写：1e6 → M、1e3 → K，一位小数
pub fn format_volume(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// 可缺失数值的便捷包装：None 直接给 "N/A"
pub fn format_optional(value: Option<f64>, formatter: fn(f64) -> String) -> String {
    match value {
        Some(v) => formatter(v),
        None => "N/A".to_string(),
    }
}

/// 千分位分组，保留 decimals 位小数
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
