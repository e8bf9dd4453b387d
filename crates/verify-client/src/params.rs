//! Query and addressing parameters shared by the resource clients.

/// Items per page requested from SCIM endpoints when only `page` is given.
pub const DEFAULT_SCIM_COUNT: u32 = 100;

/// Optional list parameters. Values are passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Search expression (`search=` or SCIM `filter=`).
    pub search: Option<String>,
    /// Sort key; a leading `-` sorts descending.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl ListParams {
    /// Parameters holding only a search expression.
    #[must_use]
    pub fn search(expression: impl Into<String>) -> Self {
        Self {
            search: Some(expression.into()),
            ..Self::default()
        }
    }

    /// Query pairs for the `search`/`sort`/`page`/`limit` style endpoints.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// Query pairs for SCIM endpoints (`filter`, `sortBy`, `sortOrder`,
    /// `startIndex`, `count`).
    #[must_use]
    pub fn scim_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("filter", search.clone()));
        }
        if let Some(sort) = &self.sort {
            match sort.strip_prefix('-') {
                Some(key) => {
                    pairs.push(("sortBy", key.to_string()));
                    pairs.push(("sortOrder", "descending".to_string()));
                }
                None => pairs.push(("sortBy", sort.trim_start_matches('+').to_string())),
            }
        }
        if let Some(page) = self.page {
            let count = self.limit.unwrap_or(DEFAULT_SCIM_COUNT);
            let start = u64::from(page.max(1) - 1) * u64::from(count) + 1;
            pairs.push(("startIndex", start.to_string()));
        }
        if self.page.is_some() || self.limit.is_some() {
            let count = self.limit.unwrap_or(DEFAULT_SCIM_COUNT);
            pairs.push(("count", count.to_string()));
        }
        pairs
    }
}

/// How a command addresses a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Look up by the resource's unique name (or label).
    Name(String),
    /// Address directly by identifier.
    Id(String),
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total matches on the server, when reported.
    pub total: Option<u64>,
}
