//! Query state of a list screen: page, search, filters and sort

use std::collections::BTreeMap;
use std::fmt;

use crate::models::Resource;
use crate::utils::errors::{AcademyError, Result};
use crate::utils::helpers::normalize_whitespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub filters: BTreeMap<String, String>,
    pub sort: Option<Sort>,
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
        }
    }

    /// Set or clear (empty value) one filter declared by `R`
    pub fn set_filter<R: Resource>(&mut self, key: &str, value: &str) -> Result<()> {
        let spec = R::filter_spec(key).ok_or_else(|| {
            AcademyError::InvalidInput(format!("filtro desconhecido para {}: {}", R::PLURAL, key))
        })?;

        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(key);
        } else if spec.accepts(value) {
            self.filters.insert(key.to_string(), value.to_string());
        } else {
            return Err(AcademyError::InvalidInput(format!(
                "valor inválido para {}: {} (use {})",
                spec.label,
                value,
                spec.allowed.join(", ")
            )));
        }

        self.page = 1;
        Ok(())
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = normalize_whitespace(text);
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: &str, order: SortOrder) {
        let field = field.trim();
        self.sort = if field.is_empty() {
            None
        } else {
            Some(Sort {
                field: field.to_string(),
                order,
            })
        };
        self.page = 1;
    }

    /// Drop search and filters and go back to the first page
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.page = 1;
    }

    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || !self.filters.is_empty()
    }

    /// Search and filter pairs only, for count/ids/export requests
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.search.is_empty() {
            pairs.push(("search".to_string(), self.search.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    /// Full query string pairs; empty values are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filter_pairs());
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy".to_string(), sort.field.clone()));
            pairs.push(("sortOrder".to_string(), sort.order.to_string()));
        }
        pairs
    }
}
