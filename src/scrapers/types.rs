use crate::models::ListingId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest page the immoweb search API will serve.
pub const MAX_SEARCH_PAGES: u32 = 333;

pub const IMMOWEB_BASE_URL: &str = "https://www.immoweb.be";

/// Property category segment of the search URL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    House,
    Apartment,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::House => "house",
            PropertyCategory::Apartment => "apartment",
        }
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search parameters for listing discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Scheme and host, no trailing slash
    pub base_url: String,
    /// Categories searched on every page
    pub categories: Vec<PropertyCategory>,
    /// Requested page count; see [`SearchParams::effective_pages`]
    pub pages: u32,
    /// `countries` filter
    pub country: String,
    /// `orderBy` value
    pub order_by: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            base_url: IMMOWEB_BASE_URL.to_string(),
            categories: vec![PropertyCategory::House, PropertyCategory::Apartment],
            pages: MAX_SEARCH_PAGES,
            country: "BE".to_string(),
            order_by: "newest".to_string(),
        }
    }
}

impl SearchParams {
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Page count actually walked. Anything above the API ceiling is capped.
    pub fn effective_pages(&self) -> u32 {
        self.pages.min(MAX_SEARCH_PAGES)
    }

    pub fn search_url(&self, category: PropertyCategory, page: u32) -> String {
        format!(
            "{}/en/search-results/{}/for-sale?countries={}&page={}&orderBy={}",
            self.base_url, category, self.country, page, self.order_by
        )
    }

    pub fn listing_url(&self, id: &ListingId) -> String {
        format!("{}/en/classified/{}", self.base_url, id)
    }

    /// Every (page, category) unit of the harvest, pages starting at 1.
    pub fn page_requests(&self) -> Vec<(u32, PropertyCategory)> {
        (1..=self.effective_pages())
            .flat_map(|page| self.categories.iter().map(move |&c| (page, c)))
            .collect()
    }
}
