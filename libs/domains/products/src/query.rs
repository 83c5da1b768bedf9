//! Search parameters into a filter and ordering that every backend can run.

use mongodb::bson::{Document, doc};

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, SearchParams, SortOrder};

/// Filter and ordering for a product search.
///
/// All constraints are optional; an empty query matches every product in
/// natural order. A price bound of exactly `0` counts as no bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    name: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: SortOrder,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the raw query string values.
    ///
    /// Empty values are treated as absent. A bound that is not a finite
    /// number is a [`ProductError::Validation`].
    pub fn from_params(params: &SearchParams) -> ProductResult<Self> {
        let mut query = Self::new().with_sort(SortOrder::from_param(params.sort.as_deref()));

        if let Some(name) = params.name.as_deref() {
            query = query.with_name(name);
        }
        if let Some(min) = parse_bound("minPrice", params.min_price.as_deref())? {
            query = query.with_min_price(min);
        }
        if let Some(max) = parse_bound("maxPrice", params.max_price.as_deref())? {
            query = query.with_max_price(max);
        }

        Ok(query)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_min_price(mut self, min: f64) -> Self {
        self.min_price = (min != 0.0).then_some(min);
        self
    }

    pub fn with_max_price(mut self, max: f64) -> Self {
        self.max_price = (max != 0.0).then_some(max);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// MongoDB filter document.
    ///
    /// The name term is regex-escaped so it matches literally.
    pub fn filter_document(&self) -> Document {
        let mut filter = doc! {};

        if let Some(ref name) = self.name {
            filter.insert(
                "name",
                doc! { "$regex": regex::escape(name), "$options": "i" },
            );
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = self.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = self.max_price {
                price.insert("$lte", max);
            }
            filter.insert("price", price);
        }

        filter
    }

    /// MongoDB sort document, `None` for natural order.
    pub fn sort_document(&self) -> Option<Document> {
        match self.sort {
            SortOrder::Asc => Some(doc! { "price": 1 }),
            SortOrder::Desc => Some(doc! { "price": -1 }),
            SortOrder::Natural => None,
        }
    }

    /// Whether `product` satisfies the filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref name) = self.name {
            if !product.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Sorts in place by price. Ties keep their relative order; natural
    /// order leaves the slice untouched.
    pub fn apply_order(&self, products: &mut [Product]) {
        match self.sort {
            SortOrder::Asc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::Desc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Natural => {}
        }
    }
}

fn parse_bound(key: &str, raw: Option<&str>) -> ProductResult<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ProductError::Validation(format!(
            "{key} must be a number, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductInput;

    fn product(name: &str, price: f64) -> Product {
        Product::new(ProductInput::new(name, "", price))
    }

    fn params(name: Option<&str>, min: Option<&str>, max: Option<&str>, sort: Option<&str>) -> SearchParams {
        SearchParams {
            name: name.map(String::from),
            min_price: min.map(String::from),
            max_price: max.map(String::from),
            sort: sort.map(String::from),
        }
    }

    #[test]
    fn test_empty_query_has_empty_filter() {
        let query = ProductQuery::new();
        assert!(query.filter_document().is_empty());
        assert!(query.sort_document().is_none());
    }

    #[test]
    fn test_name_filter_is_escaped_and_case_insensitive() {
        let filter = ProductQuery::new().with_name("a.b").filter_document();
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"a\.b");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_price_range_filter() {
        let filter = ProductQuery::new()
            .with_min_price(10.0)
            .with_max_price(20.0)
            .filter_document();
        let price = filter.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 10.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 20.0);
    }

    #[test]
    fn test_zero_bounds_are_absent() {
        let query = ProductQuery::new().with_min_price(0.0).with_max_price(0.0);
        assert_eq!(query.min_price(), None);
        assert_eq!(query.max_price(), None);
        assert!(!query.filter_document().contains_key("price"));
    }

    #[test]
    fn test_negative_bound_is_kept() {
        let query = ProductQuery::new().with_min_price(-5.0);
        assert_eq!(query.min_price(), Some(-5.0));
    }

    #[test]
    fn test_sort_documents() {
        let asc = ProductQuery::new().with_sort(SortOrder::Asc);
        let desc = ProductQuery::new().with_sort(SortOrder::Desc);
        assert_eq!(asc.sort_document(), Some(doc! { "price": 1 }));
        assert_eq!(desc.sort_document(), Some(doc! { "price": -1 }));
    }

    #[test]
    fn test_from_params_full() {
        let query =
            ProductQuery::from_params(&params(Some("Widget"), Some("10"), Some("20.5"), Some("desc")))
                .unwrap();
        assert_eq!(query.name(), Some("Widget"));
        assert_eq!(query.min_price(), Some(10.0));
        assert_eq!(query.max_price(), Some(20.5));
        assert_eq!(query.sort(), SortOrder::Desc);
    }

    #[test]
    fn test_from_params_empty_strings_are_absent() {
        let query = ProductQuery::from_params(&params(Some(""), Some(""), Some(" "), Some(""))).unwrap();
        assert_eq!(query, ProductQuery::new());
    }

    #[test]
    fn test_from_params_rejects_malformed_bounds() {
        for bad in ["abc", "NaN", "inf", "1e400"] {
            let result = ProductQuery::from_params(&params(None, Some(bad), None, None));
            assert!(
                matches!(result, Err(ProductError::Validation(_))),
                "{bad} should be rejected"
            );
        }
        let result = ProductQuery::from_params(&params(None, None, Some("ten"), None));
        assert!(matches!(result, Err(ProductError::Validation(ref m)) if m.contains("maxPrice")));
    }

    #[test]
    fn test_unknown_sort_is_natural() {
        let query = ProductQuery::from_params(&params(None, None, None, Some("sideways"))).unwrap();
        assert_eq!(query.sort(), SortOrder::Natural);
    }

    #[test]
    fn test_matches_name_substring_case_insensitive() {
        let query = ProductQuery::new().with_name("Widget");
        assert!(query.matches(&product("widget", 1.0)));
        assert!(query.matches(&product("WIDGET-2", 1.0)));
        assert!(!query.matches(&product("Gadget", 1.0)));
    }

    #[test]
    fn test_matches_name_literally() {
        let query = ProductQuery::new().with_name("a.b");
        assert!(query.matches(&product("xa.by", 1.0)));
        assert!(!query.matches(&product("axb", 1.0)));
    }

    #[test]
    fn test_matches_inclusive_price_range() {
        let query = ProductQuery::new().with_min_price(10.0).with_max_price(20.0);
        assert!(query.matches(&product("a", 10.0)));
        assert!(query.matches(&product("a", 20.0)));
        assert!(!query.matches(&product("a", 9.99)));
        assert!(!query.matches(&product("a", 20.01)));
    }

    #[test]
    fn test_apply_order() {
        let mut products = vec![product("a", 3.0), product("b", 1.0), product("c", 2.0)];

        ProductQuery::new().with_sort(SortOrder::Asc).apply_order(&mut products);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);

        ProductQuery::new().with_sort(SortOrder::Desc).apply_order(&mut products);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);

        ProductQuery::new().apply_order(&mut products);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    }
}
