use std::cmp::Ordering;

use crate::models::query::{
    CategoryFilter, FilterConfig, RangeFilter, ScreeningResult, SortConfig, SortDirection,
    CATEGORY_ALL,
};
use crate::models::stock::{Field, FieldValue, StockRecord};

/// 筛选会话：持有一份只读数据集快照，对外只暴露幂等的 `query`
///
/// 快照由数据提供方整体换入（symbol 非空、大写、快照内唯一由供数侧保证），
/// 会话内部不做任何增量修改；刷新 = 丢弃会话重建。同一快照上以相同参数
/// 调用 `query` 任意多次，结果逐位一致。
pub struct ScreeningSession {
    dataset: Vec<StockRecord>,
}

impl ScreeningSession {
    pub fn new(dataset: Vec<StockRecord>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &[StockRecord] {
        &self.dataset
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 执行一次完整查询：过滤 → 稳定排序 → 分页切片
    ///
    /// `total_matched` 是分页前的命中总数；页码越界时返回空行集而非错误。
    pub fn query(&self, filter: &FilterConfig, sort: &SortConfig) -> ScreeningResult {
        // Step 1: 保序单遍过滤
        let mut matched: Vec<&StockRecord> = self
            .dataset
            .iter()
            .filter(|r| matches(r, filter))
            .collect();
        let total_matched = matched.len();

        // Step 2: 稳定排序（并列保持输入相对顺序）
        matched.sort_by(|a, b| compare_records(a, b, sort));

        // Step 3: 切片 [(page-1)*limit, page*limit)
        let start = filter.page.saturating_sub(1).saturating_mul(filter.limit);
        let rows: Vec<StockRecord> = matched
            .into_iter()
            .skip(start)
            .take(filter.limit)
            .cloned()
            .collect();

        ScreeningResult {
            rows,
            total_matched,
            page: filter.page,
            limit: filter.limit,
        }
    }

    /// 文本字段去重取值，供筛选下拉框使用（板块/细分行业列表）
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        let mut values: Vec<String> = self
            .dataset
            .iter()
            .filter_map(|r| match r.field(field) {
                Some(FieldValue::Text(t)) => Some(t.to_string()),
                _ => None,
            })
            .collect();
        values.sort();
        values.dedup();
        values
    }
}

/// 单条记录是否命中筛选配置：搜索 AND 所有区间条件 AND 所有分类条件
///
/// 纯函数，无副作用，可在只读快照上并发调用。
pub fn matches(record: &StockRecord, config: &FilterConfig) -> bool {
    if !matches_search(record, config.search.as_deref()) {
        return false;
    }
    for range in &config.ranges {
        if !passes_range(record, range) {
            return false;
        }
    }
    for category in &config.categories {
        if !passes_category(record, category) {
            return false;
        }
    }
    true
}

/// 生成一个新的有序序列，不改动输入
pub fn sort_records(records: &[StockRecord], sort: &SortConfig) -> Vec<StockRecord> {
    let mut out: Vec<StockRecord> = records.to_vec();
    out.sort_by(|a, b| compare_records(a, b, sort));
    out
}

fn matches_search(record: &StockRecord, search: Option<&str>) -> bool {
    let term = match search {
        Some(s) => s.trim().to_uppercase(),
        None => return true,
    };
    if term.is_empty() {
        return true;
    }
    if record.symbol.to_uppercase().contains(&term) {
        return true;
    }
    match &record.name {
        Some(name) => name.to_uppercase().contains(&term),
        None => false,
    }
}

/// 区间条件为开放策略：字段缺失/非数值的记录不因该条件被剔除。
/// 基本面数据天然稀疏，按缺失剔除会把筛选器变得不可用。
fn passes_range(record: &StockRecord, range: &RangeFilter) -> bool {
    let value = match record.numeric(range.field) {
        Some(v) => v,
        None => return true,
    };
    if let Some(min) = range.min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = range.max {
        if value > max {
            return false;
        }
    }
    true
}

fn passes_category(record: &StockRecord, filter: &CategoryFilter) -> bool {
    let want = match &filter.value {
        Some(v) if v != CATEGORY_ALL => v.as_str(),
        // 未设或哨兵 "All"：不限
        _ => return true,
    };
    match record.field(filter.field) {
        Some(FieldValue::Text(have)) => have == want,
        // 字段缺失无从相等，视为不命中
        _ => false,
    }
}

fn compare_records(a: &StockRecord, b: &StockRecord, sort: &SortConfig) -> Ordering {
    let ord = compare_by_field(a, b, sort.key);
    match sort.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// 升序视角比较；缺失/NaN 恒大于任何已定义值，升序沉底、降序置顶。
/// 这是显式策略，不依赖比较运算对 undefined 的偶然行为。
fn compare_by_field(a: &StockRecord, b: &StockRecord, key: Field) -> Ordering {
    match (a.field(key), b.field(key)) {
        (Some(va), Some(vb)) => compare_values(va, vb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: FieldValue, b: FieldValue) -> Ordering {
    match (a, b) {
        // 取值层已过滤非有限值，partial_cmp 不会落空
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        // 同一字段混出两种类型只会来自畸形快照，给个确定顺序即可
        (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
        (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
    }
}
