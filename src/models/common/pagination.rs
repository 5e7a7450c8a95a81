use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::query::deserialize_i64_or;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

fn default_page<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserialize_i64_or(deserializer, 1)
}

fn default_size<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserialize_i64_or(deserializer, DEFAULT_PAGE_SIZE)
}

/// 分页查询参数；页码从 1 开始
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "PaginationQuery::first_page", deserialize_with = "default_page")]
    pub page: i64,
    #[serde(
        default = "PaginationQuery::default_size",
        deserialize_with = "default_size"
    )]
    pub size: i64,
}

impl PaginationQuery {
    fn first_page() -> i64 {
        1
    }

    fn default_size() -> i64 {
        DEFAULT_PAGE_SIZE
    }

    /// 越界的页码与页大小收敛到合法范围
    pub fn normalized(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
        let page = page.unwrap_or(1).max(1);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        (page as u64, size as u64)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// 列表响应里的分页信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total.div_ceil(page_size.max(1)) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_bounds() {
        assert_eq!(PaginationQuery::normalized(None, None), (1, 10));
        assert_eq!(PaginationQuery::normalized(Some(0), Some(500)), (1, 100));
        assert_eq!(PaginationQuery::normalized(Some(3), Some(0)), (3, 1));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationInfo::new(2, 10, 21).total_pages, 3);
    }
}
