//! Filter, sort and paginate the product list.
//!
//! Every function here is pure: the same products and criteria always give the
//! same page. Clamping an out-of-range page is left to the caller.

use crate::domain::{FilterCriteria, Pagination, Product, SortCriteria, SortDirection};

/// One page of matching products plus the metadata needed to render pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub visible: Vec<Product>,
    pub total_matched: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl CatalogPage {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based inclusive range of the visible rows, `(0, 0)` when nothing matched.
    pub fn display_range(&self) -> (usize, usize) {
        if self.visible.is_empty() {
            return (0, 0);
        }
        let start = (self.current_page - 1) * self.page_size + 1;
        (start, start + self.visible.len() - 1)
    }
}

/// Runs every stage and returns the requested page.
pub fn run(
    products: &[Product],
    filter: &FilterCriteria,
    sort: &SortCriteria,
    pagination: &Pagination,
) -> CatalogPage {
    let matched = filter_and_sort(products, filter, sort);
    paginate(&matched, pagination)
}

/// Filter stages followed by the sort stage.
pub fn filter_and_sort<'a>(
    products: &'a [Product],
    filter: &FilterCriteria,
    sort: &SortCriteria,
) -> Vec<&'a Product> {
    let mut matched = apply_filters(products, filter);
    apply_sort(&mut matched, sort);
    matched
}

pub fn apply_filters<'a>(products: &'a [Product], filter: &FilterCriteria) -> Vec<&'a Product> {
    let query = filter.effective_query().map(str::to_lowercase);

    products
        .iter()
        .filter(|product| match &query {
            Some(query) => {
                product.name.to_lowercase().contains(query.as_str())
                    || product.category.to_lowercase().contains(query.as_str())
            }
            None => true,
        })
        .filter(|product| filter.category.matches(&product.category))
        .filter(|product| filter.price.contains(product.price))
        .filter(|product| !filter.in_stock_only || product.in_stock())
        .collect()
}

/// Stable sort by the criteria key. Descending compares in reverse instead of
/// reversing the output so equal keys keep their relative order.
pub fn apply_sort(products: &mut [&Product], sort: &SortCriteria) {
    let Some(key) = sort.key else {
        return;
    };
    products.sort_by(|a, b| {
        let ordering = key.extract(a).natural_cmp(&key.extract(b));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

pub fn total_pages(total_matched: usize, page_size: usize) -> usize {
    total_matched.div_ceil(page_size.max(1)).max(1)
}

pub fn paginate(matched: &[&Product], pagination: &Pagination) -> CatalogPage {
    let page_size = pagination.page_size();
    let current_page = pagination.current_page();
    let start = (current_page - 1).saturating_mul(page_size);

    let visible = matched
        .iter()
        .skip(start)
        .take(page_size)
        .map(|product| (*product).clone())
        .collect();

    CatalogPage {
        visible,
        total_matched: matched.len(),
        total_pages: total_pages(matched.len(), page_size),
        current_page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryFilter, Field, PriceRange};

    fn scenario_products() -> Vec<Product> {
        vec![
            Product::new(1, "Mouse", "Periféricos", 50.0, 3),
            Product::new(2, "Teclado", "Periféricos", 150.0, 0),
            Product::new(3, "Monitor", "Telas", 900.0, 5),
        ]
    }

    fn names(page: &CatalogPage) -> Vec<&str> {
        page.visible.iter().map(|p| p.name.as_str()).collect()
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn test_price_ascending_first_page() {
        let page = run(
            &scenario_products(),
            &FilterCriteria::default(),
            &SortCriteria::by(Field::Price, SortDirection::Ascending),
            &Pagination::new(2, 1),
        );
        assert_eq!(names(&page), vec!["Mouse", "Teclado"]);
        assert_eq!(page.total_matched, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next());
        assert!(!page.has_prev());
        assert_eq!(page.display_range(), (1, 2));
    }

    #[test]
    fn test_in_stock_only_excludes_empty_stock() {
        let filter = FilterCriteria { in_stock_only: true, ..Default::default() };
        let page = run(
            &scenario_products(),
            &filter,
            &SortCriteria::by(Field::Price, SortDirection::Ascending),
            &Pagination::new(2, 1),
        );
        assert_eq!(page.total_matched, 2);
        assert!(!names(&page).contains(&"Teclado"));
    }

    #[test]
    fn test_query_matches_name_or_category_case_insensitively() {
        let products = scenario_products();
        let by_category = FilterCriteria { query: "  TELAS ".into(), ..Default::default() };
        assert_eq!(ids(&apply_filters(&products, &by_category)), vec![3]);

        let by_name = FilterCriteria { query: "mo".into(), ..Default::default() };
        assert_eq!(ids(&apply_filters(&products, &by_name)), vec![1, 3]);

        let blank = FilterCriteria { query: "   ".into(), ..Default::default() };
        assert_eq!(apply_filters(&products, &blank).len(), 3);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let products = scenario_products();
        let filter = FilterCriteria {
            category: CategoryFilter::from_label("Periféricos"),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&products, &filter)), vec![1, 2]);

        let partial = FilterCriteria {
            category: CategoryFilter::from_label("Perif"),
            ..Default::default()
        };
        assert!(apply_filters(&products, &partial).is_empty());
    }

    #[test]
    fn test_price_bounds() {
        let products = scenario_products();
        let exact = FilterCriteria { price: PriceRange::new(150.0, 150.0), ..Default::default() };
        assert_eq!(ids(&apply_filters(&products, &exact)), vec![2]);

        let inverted = FilterCriteria { price: PriceRange::new(900.0, 50.0), ..Default::default() };
        assert!(apply_filters(&products, &inverted).is_empty());
    }

    #[test]
    fn test_pagination_boundaries() {
        let none: Vec<&Product> = Vec::new();
        let page = paginate(&none, &Pagination::new(3, 1));
        assert_eq!(page.total_pages, 1);
        assert!(page.visible.is_empty());
        assert_eq!(page.display_range(), (0, 0));

        let products = scenario_products();
        let all: Vec<&Product> = products.iter().collect();
        assert_eq!(paginate(&all, &Pagination::new(3, 1)).total_pages, 1);

        let page_two = paginate(&all, &Pagination::new(2, 2));
        assert_eq!(page_two.total_pages, 2);
        assert_eq!(names(&page_two), vec!["Monitor"]);
        assert_eq!(page_two.display_range(), (3, 3));
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let products = vec![
            Product::new(1, "A", "X", 10.0, 1),
            Product::new(2, "B", "X", 20.0, 1),
            Product::new(3, "C", "X", 10.0, 1),
            Product::new(4, "D", "X", 20.0, 1),
        ];
        let filter = FilterCriteria::default();

        let asc = filter_and_sort(&products, &filter, &SortCriteria::by(Field::Price, SortDirection::Ascending));
        assert_eq!(ids(&asc), vec![1, 3, 2, 4]);

        let desc = filter_and_sort(&products, &filter, &SortCriteria::by(Field::Price, SortDirection::Descending));
        assert_eq!(ids(&desc), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_no_sort_key_keeps_filter_order() {
        let products = scenario_products();
        let matched = filter_and_sort(&products, &FilterCriteria::default(), &SortCriteria::default());
        assert_eq!(ids(&matched), vec![1, 2, 3]);
    }

    #[test]
    fn test_text_sort_is_lexicographic() {
        let products = scenario_products();
        let matched = filter_and_sort(
            &products,
            &FilterCriteria::default(),
            &SortCriteria::by(Field::Name, SortDirection::Descending),
        );
        assert_eq!(ids(&matched), vec![2, 1, 3]);
    }

    #[test]
    fn test_run_is_deterministic() {
        let products = scenario_products();
        let filter = FilterCriteria { query: "o".into(), ..Default::default() };
        let sort = SortCriteria::by(Field::Stock, SortDirection::Descending);
        let pagination = Pagination::new(2, 1);
        assert_eq!(
            run(&products, &filter, &sort, &pagination),
            run(&products, &filter, &sort, &pagination)
        );
    }
}
