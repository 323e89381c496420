//! Resource query engine.
//!
//! Listing endpoints accept a fixed set of string parameters. This module
//! validates them and resolves them into a [`FetchPlan`] that the data store
//! executes. Parsing happens in a fixed order:
//!
//! 1. `page` and `limit` (defaults `1` and `10`, both must be integers `>= 1`,
//!    `limit` is clamped to [`MAX_LIMIT`])
//! 2. `sort_by` and `order` (defaults `id` and `asc`, must be supplied together)
//! 3. `id`, `search_mode`, the lookup parameter and the include parameter
//!
//! Mode selection is strict precedence, first match wins:
//!
//! | Condition                                  | Mode                 |
//! |--------------------------------------------|----------------------|
//! | `id` present                               | [`FetchMode::ById`]   |
//! | `search_mode=true` and non-empty lookup    | [`FetchMode::Search`] |
//! | lookup present                             | [`FetchMode::ByName`] |
//! | otherwise                                  | [`FetchMode::List`]   |
//!
//! # Example
//!
//! ```ignore
//! use dashboard_core::query::plan;
//!
//! // GET /v1/services?search_mode=true&name=api&sort_by=service_name&order=desc
//! let fetch = plan::<Service>(&params)?;
//! ```

use std::collections::HashMap;
use std::fmt::Debug;

use thiserror::Error;

use crate::errors::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";
const SORT_BY_PARAM: &str = "sort_by";
const ORDER_PARAM: &str = "order";
const SEARCH_MODE_PARAM: &str = "search_mode";
const ID_PARAM: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid {0} parameter")]
    InvalidParameter(&'static str),

    #[error("Both sort_by and order parameters must be provided together")]
    UnpairedSort,
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::bad_request(err)
    }
}

/// A column a listing may be ordered by. Implementors are closed enums.
pub trait SortField: Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Parses the public parameter value (e.g. `service_name`).
    fn parse(value: &str) -> Option<Self>;

    /// The storage column backing this field.
    fn column(&self) -> &'static str;
}

/// Describes how a resource is addressed by the listing parameters.
pub trait Listable {
    type SortField: SortField;

    /// Parameter carrying both the exact-name lookup and the search term.
    const LOOKUP_PARAM: &'static str;

    /// Boolean parameter requesting the related sub-records.
    const INCLUDE_PARAM: &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub order: SortOrder,
}

/// A page-based slice of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: i64,
    pub limit: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Window {
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Validated listing parameters. Built per request, dropped once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub window: Window,
    pub sort: Sort<F>,
    pub search_mode: bool,
    pub search_term: Option<String>,
    pub exact_id: Option<i64>,
    pub exact_name: Option<String>,
    pub include_sub_resources: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode<F> {
    ById(i64),
    ByName(String),
    Search {
        term: String,
        sort: Sort<F>,
        window: Window,
    },
    List {
        sort: Sort<F>,
        window: Window,
    },
}

impl<F> FetchMode<F> {
    /// Whether the mode resolves to a single record rather than a page.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::ById(_) | Self::ByName(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan<F> {
    pub mode: FetchMode<F>,
    pub include_sub_resources: bool,
}

/// Parses raw listing parameters for `R` and resolves the fetch plan.
pub fn plan<R: Listable>(
    params: &HashMap<String, String>,
) -> Result<FetchPlan<R::SortField>, QueryError> {
    Ok(ListQuery::parse::<R>(params)?.into_plan())
}

impl<F: SortField> ListQuery<F> {
    pub fn parse<R>(params: &HashMap<String, String>) -> Result<Self, QueryError>
    where
        R: Listable<SortField = F>,
    {
        let page = positive_int(params, PAGE_PARAM)?.unwrap_or(DEFAULT_PAGE);
        let limit = positive_int(params, LIMIT_PARAM)?
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let sort_by = value(params, SORT_BY_PARAM);
        let order = value(params, ORDER_PARAM);

        let field = match sort_by {
            Some(raw) => F::parse(raw).ok_or(QueryError::InvalidParameter(SORT_BY_PARAM))?,
            None => F::default(),
        };
        let order_value = match order {
            Some(raw) => {
                SortOrder::parse(raw).ok_or(QueryError::InvalidParameter(ORDER_PARAM))?
            }
            None => SortOrder::default(),
        };
        if sort_by.is_some() != order.is_some() {
            return Err(QueryError::UnpairedSort);
        }

        let exact_id = positive_int(params, ID_PARAM)?;
        let search_mode = boolean(params, SEARCH_MODE_PARAM)?;
        let include_sub_resources = boolean(params, R::INCLUDE_PARAM)?;
        let lookup = value(params, R::LOOKUP_PARAM).map(str::to_owned);

        Ok(Self {
            window: Window { page, limit },
            sort: Sort {
                field,
                order: order_value,
            },
            search_mode,
            search_term: if search_mode { lookup.clone() } else { None },
            exact_id,
            exact_name: lookup,
            include_sub_resources,
        })
    }

    pub fn into_plan(self) -> FetchPlan<F> {
        let mode = if let Some(id) = self.exact_id {
            FetchMode::ById(id)
        } else if let Some(term) = self.search_term.filter(|_| self.search_mode) {
            FetchMode::Search {
                term,
                sort: self.sort,
                window: self.window,
            }
        } else if let Some(name) = self.exact_name {
            FetchMode::ByName(name)
        } else {
            FetchMode::List {
                sort: self.sort,
                window: self.window,
            }
        };

        FetchPlan {
            mode,
            include_sub_resources: self.include_sub_resources,
        }
    }
}

/// Parses a record id given outside a listing, e.g. `DELETE ?id=`.
pub fn parse_id(raw: &str) -> Result<i64, QueryError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(QueryError::InvalidParameter(ID_PARAM)),
    }
}

/// Empty values are treated as absent.
fn value<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

fn positive_int(
    params: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<i64>, QueryError> {
    match value(params, key) {
        None => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(QueryError::InvalidParameter(key)),
        },
    }
}

fn boolean(params: &HashMap<String, String>, key: &'static str) -> Result<bool, QueryError> {
    match value(params, key) {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(_) => Err(QueryError::InvalidParameter(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    enum ThingSort {
        #[default]
        Id,
        Name,
        CreatedAt,
    }

    impl SortField for ThingSort {
        fn parse(value: &str) -> Option<Self> {
            match value {
                "id" => Some(Self::Id),
                "name" => Some(Self::Name),
                "created_at" => Some(Self::CreatedAt),
                _ => None,
            }
        }

        fn column(&self) -> &'static str {
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::CreatedAt => "created_at",
            }
        }
    }

    struct Thing;

    impl Listable for Thing {
        type SortField = ThingSort;
        const LOOKUP_PARAM: &'static str = "name";
        const INCLUDE_PARAM: &'static str = "load_parts";
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn plan_for(pairs: &[(&str, &str)]) -> Result<FetchPlan<ThingSort>, QueryError> {
        plan::<Thing>(&params(pairs))
    }

    #[test]
    fn test_defaults_produce_first_page_list() {
        let fetch = plan_for(&[]).unwrap();
        assert_eq!(
            fetch.mode,
            FetchMode::List {
                sort: Sort {
                    field: ThingSort::Id,
                    order: SortOrder::Asc
                },
                window: Window { page: 1, limit: 10 },
            }
        );
        assert!(!fetch.include_sub_resources);
    }

    #[test]
    fn test_window_offset() {
        assert_eq!(Window { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Window { page: 2, limit: 1 }.offset(), 1);
        assert_eq!(Window { page: 4, limit: 25 }.offset(), 75);
    }

    #[test]
    fn test_limit_is_clamped() {
        let fetch = plan_for(&[("limit", "500")]).unwrap();
        match fetch.mode {
            FetchMode::List { window, .. } => assert_eq!(window.limit, MAX_LIMIT),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_page_and_limit_rejected() {
        assert_eq!(
            plan_for(&[("page", "abc")]).unwrap_err(),
            QueryError::InvalidParameter("page")
        );
        assert_eq!(
            plan_for(&[("limit", "ten")]).unwrap_err(),
            QueryError::InvalidParameter("limit")
        );
    }

    #[test]
    fn test_zero_and_negative_page_and_limit_rejected() {
        assert!(plan_for(&[("page", "0")]).is_err());
        assert!(plan_for(&[("page", "-1")]).is_err());
        assert!(plan_for(&[("limit", "0")]).is_err());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let fetch = plan_for(&[("page", ""), ("limit", ""), ("name", ""), ("id", "")]).unwrap();
        assert!(matches!(fetch.mode, FetchMode::List { .. }));
    }

    #[test]
    fn test_sort_by_without_order_rejected_for_every_field() {
        for field in ["id", "name", "created_at"] {
            assert_eq!(
                plan_for(&[("sort_by", field)]).unwrap_err(),
                QueryError::UnpairedSort,
                "sort_by={field}"
            );
        }
    }

    #[test]
    fn test_order_without_sort_by_rejected_for_every_order() {
        for order in ["asc", "desc"] {
            assert_eq!(
                plan_for(&[("order", order)]).unwrap_err(),
                QueryError::UnpairedSort,
                "order={order}"
            );
        }
    }

    #[test]
    fn test_invalid_sort_values_rejected() {
        assert_eq!(
            plan_for(&[("sort_by", "password"), ("order", "asc")]).unwrap_err(),
            QueryError::InvalidParameter("sort_by")
        );
        assert_eq!(
            plan_for(&[("sort_by", "id"), ("order", "sideways")]).unwrap_err(),
            QueryError::InvalidParameter("order")
        );
    }

    #[test]
    fn test_paired_sort_applied() {
        let fetch = plan_for(&[("sort_by", "created_at"), ("order", "desc")]).unwrap();
        match fetch.mode {
            FetchMode::List { sort, .. } => {
                assert_eq!(sort.field, ThingSort::CreatedAt);
                assert_eq!(sort.order, SortOrder::Desc);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_id_takes_precedence_over_everything() {
        let fetch = plan_for(&[
            ("id", "7"),
            ("search_mode", "true"),
            ("name", "api"),
            ("page", "3"),
        ])
        .unwrap();
        assert_eq!(fetch.mode, FetchMode::ById(7));
    }

    #[test]
    fn test_search_takes_precedence_over_exact_name() {
        let fetch = plan_for(&[("search_mode", "true"), ("name", "api"), ("page", "2")]).unwrap();
        assert_eq!(
            fetch.mode,
            FetchMode::Search {
                term: "api".to_string(),
                sort: Sort::default(),
                window: Window { page: 2, limit: 10 },
            }
        );
    }

    #[test]
    fn test_name_without_search_mode_is_exact_lookup() {
        let fetch = plan_for(&[("name", "Service 1")]).unwrap();
        assert_eq!(fetch.mode, FetchMode::ByName("Service 1".to_string()));

        let fetch = plan_for(&[("search_mode", "false"), ("name", "Service 1")]).unwrap();
        assert_eq!(fetch.mode, FetchMode::ByName("Service 1".to_string()));
    }

    #[test]
    fn test_search_mode_without_term_is_default_listing() {
        let fetch = plan_for(&[("search_mode", "true")]).unwrap();
        assert!(matches!(fetch.mode, FetchMode::List { .. }));
    }

    #[test]
    fn test_invalid_id_rejected() {
        assert_eq!(
            plan_for(&[("id", "abc")]).unwrap_err(),
            QueryError::InvalidParameter("id")
        );
        assert!(plan_for(&[("id", "0")]).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id("0"), Err(QueryError::InvalidParameter("id")));
        assert_eq!(parse_id("x1"), Err(QueryError::InvalidParameter("id")));
    }

    #[test]
    fn test_invalid_booleans_rejected() {
        assert_eq!(
            plan_for(&[("search_mode", "yes")]).unwrap_err(),
            QueryError::InvalidParameter("search_mode")
        );
        assert_eq!(
            plan_for(&[("load_parts", "1")]).unwrap_err(),
            QueryError::InvalidParameter("load_parts")
        );
    }

    #[test]
    fn test_include_composes_with_every_mode() {
        for pairs in [
            vec![("id", "1")],
            vec![("name", "x")],
            vec![("search_mode", "true"), ("name", "x")],
            vec![],
        ] {
            let mut pairs = pairs;
            pairs.push(("load_parts", "true"));
            assert!(plan_for(&pairs).unwrap().include_sub_resources);
        }
    }

    #[test]
    fn test_single_modes() {
        assert!(FetchMode::<ThingSort>::ById(1).is_single());
        assert!(FetchMode::<ThingSort>::ByName("a".into()).is_single());
        assert!(
            !FetchMode::<ThingSort>::List {
                sort: Sort::default(),
                window: Window::default()
            }
            .is_single()
        );
    }

    #[test]
    fn test_query_error_maps_to_bad_request() {
        let err: AppError = QueryError::UnpairedSort.into();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "Both sort_by and order parameters must be provided together"
        );
    }
}
