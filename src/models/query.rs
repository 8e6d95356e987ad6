use serde::{Deserialize, Serialize};

use super::stock::{Field, StockRecord};

/// 分类筛选的"不限"哨兵值（前端下拉框的 "All Sectors" / "All Industries"）
pub const CATEGORY_ALL: &str = "All";

/// 数值区间筛选条件，闭区间 [min, max]，单边不设即不限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub field: Field,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// 分类筛选条件；value 为空或哨兵 "All" 时不限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub field: Field,
    #[serde(default)]
    pub value: Option<String>,
}

impl CategoryFilter {
    /// 是否实际构成约束
    pub fn is_constrained(&self) -> bool {
        matches!(&self.value, Some(v) if v != CATEGORY_ALL)
    }
}

/// 一次筛选的完整不可变描述
///
/// UI 侧的一堆输入框状态在这里收敛为一个值对象，整体传入纯函数，
/// 不存在跨查询的隐藏可变状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// 代码/名称子串搜索，大小写不敏感
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub ranges: Vec<RangeFilter>,
    #[serde(default)]
    pub categories: Vec<CategoryFilter>,
    #[serde(default = "default_page")]
    pub page: usize,   // 1-based
    #[serde(default = "default_limit")]
    pub limit: usize,  // 每页行数
}

fn default_page() -> usize { 1 }
fn default_limit() -> usize { 10 }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search: None,
            ranges: vec![],
            categories: vec![],
            page: 1,
            limit: 10,
        }
    }
}

impl FilterConfig {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_range(mut self, field: Field, min: Option<f64>, max: Option<f64>) -> Self {
        self.ranges.push(RangeFilter { field, min, max });
        self
    }

    pub fn with_category(mut self, field: Field, value: impl Into<String>) -> Self {
        self.categories.push(CategoryFilter {
            field,
            value: Some(value.into()),
        });
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// 排序配置：字段 + 方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Field,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// 筛选器默认按市值降序展示
    fn default() -> Self {
        Self {
            key: Field::MarketCap,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    pub fn new(key: Field, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// 表头点击语义：再点同一列翻转方向，点新列重置为升序
    pub fn toggled(&self, key: Field) -> SortConfig {
        if key == self.key {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            SortConfig { key, direction }
        } else {
            SortConfig {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// 一次查询的结果页：固定为 过滤 → 排序 → 分页 之后的切片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub rows: Vec<StockRecord>,
    pub total_matched: usize, // 分页前的命中总数
    pub page: usize,
    pub limit: usize,
}
