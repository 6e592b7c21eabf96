//! 商品列表查询构建
//!
//! 把原始 HTTP 查询参数转换为过滤 / 排序 / 分页规格。
//! 参数保持字符串类型，布尔与数字的宽松解析规则在这里集中实现。

use serde::Deserialize;

use super::product::Product;

/// Raw list query parameters, all optional and string-typed
///
/// Keeping the raw strings lets the flag and number parsing quirks live in
/// one place: a flag param only filters when present and non-empty, and its
/// value is the equality `param == "true"`. `featured=false` therefore
/// filters for unfeatured products, while omitting the param filters nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub featured: Option<String>,
    pub on_sale: Option<String>,
    pub in_stock: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Structured filter over products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
    /// Inclusive lower bound; may be NaN when the param was malformed
    pub min_price: Option<f64>,
    /// Inclusive upper bound; may be NaN when the param was malformed
    pub max_price: Option<f64>,
    pub in_stock: bool,
}

impl ProductFilter {
    /// A NaN price bound excludes every record
    pub fn is_unsatisfiable(&self) -> bool {
        self.min_price.is_some_and(f64::is_nan) || self.max_price.is_some_and(f64::is_nan)
    }
}

/// Sort order for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Newest,
    Rating,
}

impl ProductSort {
    /// Unrecognized or missing tokens fall back to newest-first
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("newest") => Self::Newest,
            Some("rating") => Self::Rating,
            _ => Self::Newest,
        }
    }

    /// Stable sort, so equal keys keep their store order
    pub fn apply(self, products: &mut [Product]) {
        match self {
            Self::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

/// Page specification, clamped so a skip is never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

pub const DEFAULT_PAGE_LIMIT: u64 = 20;

impl Page {
    pub fn skip(&self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }

    /// Total page count: ceil(total / limit)
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ProductListQuery {
    /// Pure transformation of the raw parameters into filter, sort and page
    pub fn build(&self) -> (ProductFilter, ProductSort, Page) {
        let filter = ProductFilter {
            category: present(&self.category),
            brand: present(&self.brand),
            featured: flag_filter(&self.featured),
            on_sale: flag_filter(&self.on_sale),
            min_price: numeric(&self.min_price),
            max_price: numeric(&self.max_price),
            in_stock: self.in_stock.as_deref() == Some("true"),
        };

        let sort = ProductSort::from_token(self.sort.as_deref());

        let page = Page {
            page: int_param(&self.page, 1),
            limit: int_param(&self.limit, DEFAULT_PAGE_LIMIT),
        };

        (filter, sort, page)
    }
}

/// Present and non-empty; an empty param never activates a filter
fn present(param: &Option<String>) -> Option<String> {
    param.as_deref().filter(|s| !s.is_empty()).map(str::to_owned)
}

/// A flag param filters only when present; its value is `param == "true"`
fn flag_filter(param: &Option<String>) -> Option<bool> {
    param
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s == "true")
}

/// Lenient number parsing: malformed input becomes NaN rather than an error
fn numeric(param: &Option<String>) -> Option<f64> {
    param
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.trim().parse().unwrap_or(f64::NAN))
}

/// Lenient integer parsing, floored at 1
fn int_param(param: &Option<String>, default: u64) -> u64 {
    param
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(1) as u64)
        .unwrap_or(default)
}
