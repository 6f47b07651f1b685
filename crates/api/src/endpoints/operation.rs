//! Master data: operations, machines, products, tasks and routing.
//!
//! All five resources share one endpoint shape (list, batch upsert, Excel
//! import under `{route}`, `{route}/upsert` and `{route}/xls`), so they are
//! served by the generic functions below through [`MasterResource`].

use std::path::Path;

use domain::models::{ImportPreview, Machine, Normalize, Operation, Product, RoutingStep, Task};
use serde::Serialize;

use super::{fetch_list, import_file, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

/// A master-data record served under a common route.
pub trait MasterResource: Normalize + Serialize {
    const ROUTE: &'static str;
}

impl MasterResource for Operation {
    const ROUTE: &'static str = "/api/operation";
}

impl MasterResource for Machine {
    const ROUTE: &'static str = "/api/operation/machine";
}

impl MasterResource for Product {
    const ROUTE: &'static str = "/api/operation/product";
}

impl MasterResource for Task {
    const ROUTE: &'static str = "/api/operation/task";
}

impl MasterResource for RoutingStep {
    const ROUTE: &'static str = "/api/operation/product/routing";
}

pub async fn list<R: MasterResource>(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<R>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(R::ROUTE))).await
}

/// Creates or replaces `records`, returning what the backend echoes back.
pub async fn upsert<R: MasterResource>(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[R],
) -> Result<Vec<R>, ApiError> {
    let request = ApiRequest::post(format!("{}/upsert", R::ROUTE)).json(records)?;
    fetch_list(client, options.apply(request)).await
}

pub async fn import_xls<R: MasterResource>(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_file(client, options, &format!("{}/xls", R::ROUTE), path).await
}

pub async fn list_operations(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Operation>, ApiError> {
    list(client, options).await
}

pub async fn upsert_operations(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[Operation],
) -> Result<Vec<Operation>, ApiError> {
    upsert(client, options, records).await
}

pub async fn import_operations_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_xls::<Operation>(client, options, path).await
}

pub async fn list_machines(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Machine>, ApiError> {
    list(client, options).await
}

pub async fn upsert_machines(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[Machine],
) -> Result<Vec<Machine>, ApiError> {
    upsert(client, options, records).await
}

pub async fn import_machines_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_xls::<Machine>(client, options, path).await
}

pub async fn list_products(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Product>, ApiError> {
    list(client, options).await
}

pub async fn upsert_products(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[Product],
) -> Result<Vec<Product>, ApiError> {
    upsert(client, options, records).await
}

pub async fn import_products_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_xls::<Product>(client, options, path).await
}

pub async fn list_tasks(client: &ApiClient, options: &RequestOptions) -> Result<Vec<Task>, ApiError> {
    list(client, options).await
}

pub async fn upsert_tasks(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[Task],
) -> Result<Vec<Task>, ApiError> {
    upsert(client, options, records).await
}

pub async fn import_tasks_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_xls::<Task>(client, options, path).await
}

pub async fn list_routing(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<RoutingStep>, ApiError> {
    list(client, options).await
}

pub async fn upsert_routing(
    client: &ApiClient,
    options: &RequestOptions,
    records: &[RoutingStep],
) -> Result<Vec<RoutingStep>, ApiError> {
    upsert(client, options, records).await
}

pub async fn import_routing_xls(
    client: &ApiClient,
    options: &RequestOptions,
    path: &Path,
) -> Result<ImportPreview, ApiError> {
    import_xls::<RoutingStep>(client, options, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_share_the_operation_prefix() {
        for route in [
            Operation::ROUTE,
            Machine::ROUTE,
            Product::ROUTE,
            Task::ROUTE,
            RoutingStep::ROUTE,
        ] {
            assert!(route.starts_with("/api/operation"));
        }
        assert!(RoutingStep::ROUTE.starts_with(Product::ROUTE));
    }
}
