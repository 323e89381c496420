//! Execution of a fetch plan against a store.

use serde::Serialize;
use tracing::debug;

use dashboard_core::{FetchMode, FetchPlan, Listable, Page, Sort, Window};

use crate::error::StoreResult;
use crate::store::{Filter, ResourceStore};

/// A single record or a page of records.
///
/// Single-record modes fail with `NotFound` on a miss; page modes return an
/// empty page instead.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Fetched<R> {
    One(R),
    Many(Page<R>),
}

pub async fn execute<R, S>(store: &S, plan: FetchPlan<R::SortField>) -> StoreResult<Fetched<R>>
where
    R: Listable + Send + Sync + 'static,
    S: ResourceStore<R> + ?Sized,
{
    let preload = plan.include_sub_resources;
    debug!(mode = ?plan.mode, preload, "Executing fetch plan");

    match plan.mode {
        FetchMode::ById(id) => store.find_by_id(id, preload).await.map(Fetched::One),
        FetchMode::ByName(name) => store
            .find_by_unique_field(&name, preload)
            .await
            .map(Fetched::One),
        FetchMode::Search { term, sort, window } => {
            fetch_page(store, Filter::NameContains(term), sort, window, preload).await
        }
        FetchMode::List { sort, window } => {
            fetch_page(store, Filter::All, sort, window, preload).await
        }
    }
}

async fn fetch_page<R, S>(
    store: &S,
    filter: Filter,
    sort: Sort<R::SortField>,
    window: Window,
    preload: bool,
) -> StoreResult<Fetched<R>>
where
    R: Listable + Send + Sync + 'static,
    S: ResourceStore<R> + ?Sized,
{
    let data = store.find_many(&filter, sort, window, preload).await?;
    let total = store.count(&filter).await?;
    Ok(Fetched::Many(Page::new(data, total, window)))
}
