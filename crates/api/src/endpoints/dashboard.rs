//! Dashboard keyword search.

use domain::models::{normalize_record, SearchResults};

use super::RequestOptions;
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const SEARCH: &str = "/api/dashboard/search";

/// Searches every resource for `options.keyword`.
///
/// A blank keyword returns no hits without calling the backend.
pub async fn search(client: &ApiClient, options: &RequestOptions) -> Result<SearchResults, ApiError> {
    if options.keyword().map_or(true, |k| k.trim().is_empty()) {
        return Ok(SearchResults::default());
    }

    let body = client
        .send(options.apply_search(ApiRequest::get(SEARCH)))
        .await?;
    Ok(normalize_record(body.as_ref()).unwrap_or_default())
}
