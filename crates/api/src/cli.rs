//! `mfg-dash` command line: argument types and command execution.
//!
//! Commands return their rendered output; the binary prints it.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use domain::models::{ImportPreview, Machine, Notice, Post, Product, Role, Scenario};
use domain::services::{filter_by_keyword, sort_by_column, Searchable, SortOrder};
use persistence::AppState;
use shared::format::{format_datetime, format_percent, MISSING};
use tracing::warn;

use crate::client::ApiClient;
use crate::config::Config;
use crate::endpoints::{community, member, notice, operation, scenario, RequestOptions};
use crate::error::ApiError;
use crate::render;
use crate::session::Session;
use crate::view::{load_dashboard, load_schedule, load_search, DashboardData, ViewScope};

/// Rows shown per section on the dashboard.
const DASHBOARD_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "mfg-dash")]
#[command(about = "Terminal client for the manufacturing operations dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and cache the bearer token
    Login {
        email: String,
        #[arg(long, env = "MFG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the cached token and account
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Notices, posts, products and scenarios at a glance
    Dashboard,
    Notices(TableArgs),
    Posts(TableArgs),
    Products(TableArgs),
    Machines(TableArgs),
    Scenarios(TableArgs),
    /// Trigger a simulation run for a scenario
    Simulate { scenario_id: String },
    /// Gantt view of a simulation's schedule
    Schedule {
        simulation_id: String,
        #[arg(long, value_enum, default_value_t = GroupBy::Product)]
        by: GroupBy,
        #[arg(long)]
        keyword: Option<String>,
        /// Gantt track width in characters
        #[arg(long, default_value_t = 48)]
        width: usize,
    },
    /// Product/operation volume ranking and machine load
    Board {
        simulation_id: String,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Search every resource
    Search { keyword: String },
    /// Upload a workbook for bulk import
    Import { kind: ImportKind, file: PathBuf },
}

/// Keyword filter and column sort shared by the table commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    #[arg(long)]
    pub keyword: Option<String>,
    /// Column header to sort by
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub desc: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Product,
    Machine,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Members,
    Notices,
    Operations,
    Machines,
    Products,
    Tasks,
    Routing,
}

/// Everything a command needs: configuration and the signed-in session.
pub struct Context {
    pub config: Config,
    pub session: Session,
}

impl Context {
    pub fn open(config: Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.api)?;
        let state = AppState::open_dir(&config.store.dir)?;
        Ok(Self {
            session: Session::new(client, state),
            config,
        })
    }
}

pub async fn run(ctx: &Context, scope: &ViewScope, command: Command) -> Result<String, ApiError> {
    let session = &ctx.session;
    let dashboard = &ctx.config.dashboard;

    match command {
        Command::Login { email, password } => {
            let account = session.login(&email, &password).await?;
            Ok(format!("{} ({}) 로그인되었습니다.", account.name, account.role))
        }
        Command::Logout => {
            session.logout()?;
            Ok("로그아웃되었습니다.".to_string())
        }
        Command::Whoami => Ok(match session.whoami() {
            Some(account) => format!("{}  {}  {}", account.id, account.name, account.role),
            None => ApiError::NotAuthenticated.user_message(),
        }),
        Command::Dashboard => {
            let options = session.options()?;
            let data = load_dashboard(scope, &options, session.whoami()).await?;
            Ok(render_dashboard(&data))
        }
        Command::Notices(args) => {
            let notices = notice::list_notices(scope.client(), &table_options(session, &args)?).await?;
            Ok(notices_table(&notices, &args))
        }
        Command::Posts(args) => {
            let posts = community::list_posts(scope.client(), &table_options(session, &args)?).await?;
            Ok(posts_table(&posts, &args))
        }
        Command::Products(args) => {
            let products =
                operation::list_products(scope.client(), &table_options(session, &args)?).await?;
            Ok(products_table(&products, &args))
        }
        Command::Machines(args) => {
            let machines =
                operation::list_machines(scope.client(), &table_options(session, &args)?).await?;
            Ok(machines_table(&machines, &args))
        }
        Command::Scenarios(args) => {
            let scenarios =
                scenario::list_scenarios(scope.client(), &table_options(session, &args)?).await?;
            Ok(scenarios_table(&scenarios, &args))
        }
        Command::Simulate { scenario_id } => {
            let simulation =
                scenario::simulate_scenario(scope.client(), &session.options()?, &scenario_id).await?;
            Ok(match simulation {
                Some(simulation) => format!("시뮬레이션 {} ({})", simulation.id, simulation.status),
                None => "시뮬레이션이 요청되었습니다.".to_string(),
            })
        }
        Command::Schedule {
            simulation_id,
            by,
            keyword,
            width,
        } => {
            let options = session.options()?.with_keyword(keyword.as_deref());
            let view = load_schedule(scope, &options, &simulation_id).await?;
            let min_span = dashboard.min_bar_ms();

            let gantt = match by {
                GroupBy::Product => render::gantt_by_product(
                    &view.product_groups(min_span),
                    view.window(min_span),
                    width,
                ),
                GroupBy::Machine => render::gantt_by_machine(&view.machine_groups(min_span), width),
            };
            Ok(match &view.summary {
                Some(summary) => format!("{}\n\n{}", render::summary(summary), gantt),
                None => gantt,
            })
        }
        Command::Board {
            simulation_id,
            top_n,
        } => {
            let view = load_schedule(scope, &session.options()?, &simulation_id).await?;
            let min_span = dashboard.min_bar_ms();
            Ok(format!(
                "{}\n\n{}",
                render::board(&view.board(min_span), top_n, 24),
                render::donut(&view.donut(min_span, dashboard.donut_top_n))
            ))
        }
        Command::Search { keyword } => {
            let options = session.options()?.with_keyword(Some(&keyword));
            let results = load_search(scope, &options).await?;
            Ok(render::search_results(&results))
        }
        Command::Import { kind, file } => {
            let options = session.options()?;
            if let Some(account) = session.whoami() {
                if !may_import(&account.role, kind) {
                    warn!(role = %account.role, ?kind, "Role is not expected to import this data");
                }
            }
            let preview = import(scope.client(), &options, kind, &file).await?;
            Ok(render_preview(&preview))
        }
    }
}

fn may_import(role: &Role, kind: ImportKind) -> bool {
    match kind {
        ImportKind::Members => role.can_manage_members(),
        ImportKind::Notices => role.can_manage_notices(),
        _ => role.can_manage_master_data(),
    }
}

async fn import(
    client: &ApiClient,
    options: &RequestOptions,
    kind: ImportKind,
    file: &Path,
) -> Result<ImportPreview, ApiError> {
    match kind {
        ImportKind::Members => member::parse_members_xls(client, options, file).await,
        ImportKind::Notices => notice::parse_notices_xls(client, options, file).await,
        ImportKind::Operations => operation::import_operations_xls(client, options, file).await,
        ImportKind::Machines => operation::import_machines_xls(client, options, file).await,
        ImportKind::Products => operation::import_products_xls(client, options, file).await,
        ImportKind::Tasks => operation::import_tasks_xls(client, options, file).await,
        ImportKind::Routing => operation::import_routing_xls(client, options, file).await,
    }
}

fn table_options(session: &Session, args: &TableArgs) -> Result<RequestOptions, ApiError> {
    Ok(session.options()?.with_keyword(args.keyword.as_deref()))
}

/// Filters by keyword, builds the cells, then sorts by the requested column.
fn sorted_table<T: Searchable>(
    records: &[T],
    args: &TableArgs,
    headers: &[&str],
    cells: impl Fn(&T) -> Vec<String>,
) -> String {
    let mut rows: Vec<Vec<String>> = filter_by_keyword(records, args.keyword.as_deref())
        .into_iter()
        .map(cells)
        .collect();

    if let Some(column) = &args.sort {
        match headers.iter().position(|h| h.eq_ignore_ascii_case(column)) {
            Some(index) => {
                let order = if args.desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                };
                sort_by_column(&mut rows, |row| row[index].clone(), order);
            }
            None => warn!(column = %column, "Unknown sort column; keeping backend order"),
        }
    }

    render::table(headers, &rows)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

fn notices_table(notices: &[Notice], args: &TableArgs) -> String {
    let mut notices = notices.to_vec();
    Notice::sort_for_display(&mut notices);
    sorted_table(&notices, args, &["ID", "제목", "작성자", "작성일", "첨부"], |n| {
        vec![
            if n.pinned {
                format!("*{}", n.id)
            } else {
                n.id.clone()
            },
            n.title.clone(),
            text(&n.author),
            format_datetime(n.created_at),
            n.attachments.len().to_string(),
        ]
    })
}

fn posts_table(posts: &[Post], args: &TableArgs) -> String {
    sorted_table(posts, args, &["ID", "제목", "작성자", "작성일", "조회", "댓글"], |p| {
        vec![
            p.id.clone(),
            p.title.clone(),
            text(&p.author),
            format_datetime(p.created_at),
            p.view_count.to_string(),
            p.comment_count.to_string(),
        ]
    })
}

fn products_table(products: &[Product], args: &TableArgs) -> String {
    sorted_table(products, args, &["ID", "이름", "분류", "수량"], |p| {
        vec![
            p.id.clone(),
            p.name.clone(),
            text(&p.category),
            p.quantity.to_string(),
        ]
    })
}

fn machines_table(machines: &[Machine], args: &TableArgs) -> String {
    sorted_table(machines, args, &["ID", "이름", "유형", "상태"], |m| {
        vec![
            m.id.clone(),
            m.name.clone(),
            text(&m.machine_type),
            text(&m.status),
        ]
    })
}

fn scenarios_table(scenarios: &[Scenario], args: &TableArgs) -> String {
    sorted_table(scenarios, args, &["ID", "이름", "시작", "제품", "생성일"], |s| {
        vec![
            s.id.clone(),
            s.name.clone(),
            format_datetime(s.start_at),
            s.product_ids.len().to_string(),
            format_datetime(s.created_at),
        ]
    })
}

fn render_dashboard(data: &DashboardData) -> String {
    let header = match &data.account {
        Some(account) => format!("{} ({})", account.name, account.role),
        None => MISSING.to_string(),
    };
    let top = TableArgs::default();

    [
        header,
        format!("\n[공지사항] {}", data.notices.len()),
        notices_table(&data.notices[..DASHBOARD_ROWS.min(data.notices.len())], &top),
        format!("\n[커뮤니티] {}", data.posts.len()),
        posts_table(&data.posts[..DASHBOARD_ROWS.min(data.posts.len())], &top),
        format!("\n[제품] {}", data.products.len()),
        format!("\n[시나리오] {}", data.scenarios.len()),
        scenarios_table(&data.scenarios[..DASHBOARD_ROWS.min(data.scenarios.len())], &top),
    ]
    .join("\n")
}

fn render_preview(preview: &ImportPreview) -> String {
    let mut lines = vec![format!(
        "전체 {}건, 정상 {}건, 오류 {}건 ({})",
        preview.total,
        preview.accepted(),
        preview.errors.len(),
        format_percent(if preview.total > 0 {
            preview.accepted() as f64 / preview.total as f64
        } else {
            1.0
        })
    )];
    lines.extend(preview.errors.iter().map(|error| {
        format!(
            "  {}행: {}",
            error
                .row
                .map(|row| row.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            error.message
        )
    }));
    lines.join("\n")
}
