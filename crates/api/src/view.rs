//! Page loaders and the cancellation scope tying requests to a view.
//!
//! A loader reads the token, fires the page's requests concurrently,
//! normalizes the bodies and hands back typed data ready for rendering.
//! Every request goes through the scope's client, so dropping the scope
//! aborts whatever is still in flight.

use domain::models::{
    Account, Notice, Post, Product, Scenario, ScheduleEntry, SearchResults, SimulationSummary,
};
use domain::services::{
    board_ranking, displayable_groups, filter_by_keyword, group_by_machine,
    group_by_product_operation, machine_donut, BoardRow, DonutChart, MachineGroup, ProductGroup,
    TimeWindow,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::ApiClient;
use crate::endpoints::{community, dashboard, notice, operation, scenario, simulation};
use crate::endpoints::RequestOptions;
use crate::error::ApiError;

/// Owns the in-flight requests of one view.
///
/// Cancelled explicitly through [`ViewScope::cancel`] or implicitly on
/// drop; pending calls then resolve to [`ApiError::Cancelled`].
#[derive(Debug)]
pub struct ViewScope {
    token: CancellationToken,
    client: ApiClient,
}

impl ViewScope {
    pub fn new(client: &ApiClient) -> Self {
        Self::with_token(client, CancellationToken::new())
    }

    fn with_token(client: &ApiClient, token: CancellationToken) -> Self {
        Self {
            client: client.with_cancellation(token.clone()),
            token,
        }
    }

    /// A nested scope, cancelled together with this one.
    pub fn child(&self) -> Self {
        Self::with_token(&self.client, self.token.child_token())
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Handle for cancelling the scope from another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("View scope dropped; cancelling its requests");
            self.token.cancel();
        }
    }
}

/// Everything the landing dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub account: Option<Account>,
    /// Pinned first, then newest.
    pub notices: Vec<Notice>,
    pub posts: Vec<Post>,
    pub products: Vec<Product>,
    pub scenarios: Vec<Scenario>,
}

pub async fn load_dashboard(
    scope: &ViewScope,
    options: &RequestOptions,
    account: Option<Account>,
) -> Result<DashboardData, ApiError> {
    let client = scope.client();
    let (mut notices, posts, products, scenarios) = tokio::try_join!(
        notice::list_notices(client, options),
        community::list_posts(client, options),
        operation::list_products(client, options),
        scenario::list_scenarios(client, options),
    )?;
    Notice::sort_for_display(&mut notices);

    Ok(DashboardData {
        account,
        notices,
        posts,
        products,
        scenarios,
    })
}

/// A simulation's schedule plus its KPI summary.
#[derive(Debug, Clone, Default)]
pub struct ScheduleView {
    pub simulation_id: String,
    pub entries: Vec<ScheduleEntry>,
    pub summary: Option<SimulationSummary>,
}

impl ScheduleView {
    /// Product → operation tree restricted to drawable tasks.
    pub fn product_groups(&self, min_span_ms: i64) -> Vec<ProductGroup<'_>> {
        displayable_groups(&group_by_product_operation(&self.entries), min_span_ms)
    }

    /// Machine tree restricted to drawable tasks.
    pub fn machine_groups(&self, min_span_ms: i64) -> Vec<MachineGroup<'_>> {
        displayable_groups(&group_by_machine(&self.entries), min_span_ms)
    }

    /// Board ranking over every task, drawable or not.
    pub fn board(&self, min_span_ms: i64) -> Vec<BoardRow<'_>> {
        board_ranking(&group_by_product_operation(&self.entries), min_span_ms)
    }

    pub fn donut(&self, min_span_ms: i64, top_n: usize) -> DonutChart {
        machine_donut(&self.machine_groups(min_span_ms), top_n)
    }

    /// Range the Gantt bars are scaled against.
    pub fn window(&self, min_span_ms: i64) -> Option<TimeWindow> {
        let groups = self.product_groups(min_span_ms);
        TimeWindow::covering(groups.iter().flat_map(|group| group.tasks()))
    }
}

/// Loads schedule rows and summary concurrently.
///
/// `options.keyword` narrows the rows client-side before grouping.
pub async fn load_schedule(
    scope: &ViewScope,
    options: &RequestOptions,
    simulation_id: &str,
) -> Result<ScheduleView, ApiError> {
    let client = scope.client();
    let (entries, summary) = tokio::try_join!(
        simulation::schedule(client, options, simulation_id),
        simulation::summary(client, options, simulation_id),
    )?;

    let total = entries.len();
    let entries: Vec<ScheduleEntry> = filter_by_keyword(&entries, options.keyword())
        .into_iter()
        .cloned()
        .collect();
    debug!(simulation = %simulation_id, total, kept = entries.len(), "Schedule loaded");

    Ok(ScheduleView {
        simulation_id: simulation_id.to_string(),
        entries,
        summary,
    })
}

pub async fn load_search(scope: &ViewScope, options: &RequestOptions) -> Result<SearchResults, ApiError> {
    dashboard::search(scope.client(), options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = crate::config::Config::load_for_test(&[]).unwrap();
        ApiClient::new(&config.api).unwrap()
    }

    #[test]
    fn test_drop_cancels_scope() {
        let scope = ViewScope::new(&client());
        let token = scope.cancellation_token();
        assert!(!token.is_cancelled());

        drop(scope);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = ViewScope::new(&client());
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();
        assert!(!parent.is_cancelled());
        assert!(!sibling.is_cancelled());

        parent.cancel();
        assert!(sibling.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_scope_fails_loaders() {
        let scope = ViewScope::new(&client());
        scope.cancel();

        let result = load_dashboard(&scope, &RequestOptions::authorized("t"), None).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[test]
    fn test_schedule_view_projections() {
        let entry = |product: &str, machine: &str, start: &str, end: &str| ScheduleEntry {
            product_name: Some(product.into()),
            operation_id: Some("OP10".into()),
            machine_id: Some(machine.into()),
            start_at: Some(start.into()),
            end_at: Some(end.into()),
            ..Default::default()
        };
        let view = ScheduleView {
            simulation_id: "s1".into(),
            entries: vec![
                entry("Gear", "M1", "2024-01-01T08:00:00", "2024-01-01T09:00:00"),
                entry("Gear", "M2", "2024-01-01T09:00:00", "2024-01-01T09:00:30"),
                entry("Shaft", "M2", "2024-01-01T10:00:00", "2024-01-01T11:00:00"),
            ],
            summary: None,
        };

        assert_eq!(view.product_groups(60_000).len(), 2);
        assert_eq!(view.machine_groups(60_000).len(), 2);
        assert_eq!(view.board(60_000)[0].task_count, 2);

        let window = view.window(60_000).unwrap();
        assert_eq!(window.span_ms(), 3 * 3_600_000);

        let donut = view.donut(60_000, 4);
        assert_eq!(donut.total_minutes, 120.0);
        assert_eq!(donut.total_hours, 2);
    }
}
