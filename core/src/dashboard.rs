//! Request dispatch: one explicit handler per user interaction.
//!
//! Every request recomputes its view from the (memoized) generated rows
//! and the caller's session context, then returns a plain view model for
//! whatever rendering layer sits on top.
//!
//! ERROR POLICY:
//!   - Missing configuration for a page is an `Err` (the page cannot render).
//!   - A generator window beyond `MAX_DAY_COUNT` is an `InvalidInput` `Err`.
//!   - External API failures become messages inside the view model.
//!   - An empty filter result is `ViewModel::NoData`, not an error.

use crate::{
    advisor::{self, AdvisorReply, GeminiClient, TextCompletion},
    aggregate::{
        category_sales, customer_summary, high_value_customers, recent_orders, sku_ranking, top_n,
        CategorySales, CustomerSpend, HighValueCustomers, SkuSales, TransactionSummary,
    },
    auth::{validate_credentials, AuthProvider, SupabaseAuth},
    cache::GeneratorCache,
    config::{Credentials, DashConfig, GOOGLE_API_KEY, SUPABASE_URL},
    context::SessionContext,
    error::{DashError, DashResult},
    event::{OrderRecord, SessionRecord},
    filter::FilterCriteria,
    generator::GeneratorParams,
    insights::{recommended_actions, Recommendation},
    inventory::{InventoryItem, InventoryMetrics, InventoryQuery, NewProduct},
    report::{ReportFormat, ReportRange, SalesReport},
    traffic::{
        daily_series, revenue_by_category, sessions_by_source, top_products, CategoryRevenue,
        DailyPoint, ProductPerformance, SourceSessions, TrendDeltas, TrendFilter, TrendSummary,
    },
    types::Day,
};
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;

pub const NO_TRANSACTIONS: &str =
    "No transactions for the selected filters. Try adjusting the date range or filters.";
pub const NO_TRAFFIC: &str =
    "No data for the selected filters. Try expanding the date range or adjusting sources/categories.";

#[derive(Debug, Clone)]
pub enum DashboardRequest {
    /// `None` applies the page defaults.
    Transactions { criteria: Option<FilterCriteria> },
    Trends { filter: Option<TrendFilter> },
    Inventory { query: InventoryQuery },
    AddProduct(NewProduct),
    Report { range: ReportRange, format: ReportFormat },
    Ask { question: String },
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    OAuthSignIn,
    SignOut,
}

impl DashboardRequest {
    fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::SignIn { .. } | Self::SignUp { .. } | Self::OAuthSignIn | Self::SignOut
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionsView {
    pub criteria: FilterCriteria,
    pub summary: TransactionSummary,
    pub recent: Vec<OrderRecord>,
    pub top_customers: Vec<CustomerSpend>,
    pub top_skus: Vec<SkuSales>,
    pub categories: Vec<CategorySales>,
    pub high_value: HighValueCustomers,
    pub actions: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsView {
    pub date_range: Option<(Day, Day)>,
    pub summary: TrendSummary,
    pub previous: Option<TrendSummary>,
    pub deltas: Option<TrendDeltas>,
    pub daily: Vec<DailyPoint>,
    pub by_category: Vec<CategoryRevenue>,
    pub by_source: Vec<SourceSessions>,
    pub top_products: Vec<ProductPerformance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub rows: Vec<InventoryItem>,
    pub alerts: Vec<InventoryItem>,
    pub metrics: InventoryMetrics,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub report: SalesReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthView {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    Transactions(Box<TransactionsView>),
    Trends(Box<TrendsView>),
    Inventory(InventoryView),
    ProductAdded(InventoryItem),
    Report(Box<ReportArtifact>),
    Advisor(AdvisorReply),
    Auth(AuthView),
    NoData { message: String },
    /// Form input failed validation; nothing changed.
    Rejected { message: String },
    SignInRequired,
}

pub struct Dashboard {
    config: DashConfig,
    today: Day,
    cache: GeneratorCache,
    completion: Option<Box<dyn TextCompletion>>,
    auth: Option<Box<dyn AuthProvider>>,
}

impl Dashboard {
    /// A dashboard with no external backends; advisor and sign-in
    /// requests fail with `MissingConfig` until one is attached.
    pub fn new(config: DashConfig, today: Day) -> Self {
        Self {
            config,
            today,
            cache: GeneratorCache::new(),
            completion: None,
            auth: None,
        }
    }

    /// Attach whichever backends the credentials allow.
    pub fn from_credentials(config: DashConfig, today: Day, creds: &Credentials) -> DashResult<Self> {
        let mut dashboard = Self::new(config, today);
        if let Ok(key) = creds.google_api_key() {
            dashboard.completion = Some(Box::new(GeminiClient::new(key, &dashboard.config.advisor)?));
        }
        if creds.supabase_url().is_ok() && creds.supabase_anon_key().is_ok() {
            dashboard.auth = Some(Box::new(SupabaseAuth::from_credentials(
                creds,
                &dashboard.config.auth,
            )?));
        }
        Ok(dashboard)
    }

    pub fn with_completion(mut self, client: Box<dyn TextCompletion>) -> Self {
        self.completion = Some(client);
        self
    }

    pub fn with_auth(mut self, provider: Box<dyn AuthProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn today(&self) -> Day {
        self.today
    }

    pub fn cache(&self) -> &GeneratorCache {
        &self.cache
    }

    pub fn order_params(&self) -> GeneratorParams {
        let g = &self.config.generator;
        GeneratorParams::new(g.default_day_count, g.default_seed, self.today)
    }

    pub fn traffic_params(&self) -> GeneratorParams {
        let t = &self.config.traffic;
        GeneratorParams::new(t.default_day_count, t.default_seed, self.today)
    }

    /// Generated orders for the configured window. An out-of-range
    /// window is `InvalidInput`.
    pub fn orders(&mut self) -> DashResult<Arc<Vec<OrderRecord>>> {
        let params = self.order_params();
        params.validate()?;
        Ok(self.cache.orders(&self.config.generator, params))
    }

    pub fn sessions(&mut self) -> DashResult<Arc<Vec<SessionRecord>>> {
        let params = self.traffic_params();
        params.validate()?;
        Ok(self.cache.sessions(&self.config.traffic, params))
    }

    pub fn handle(&mut self, ctx: &mut SessionContext, request: DashboardRequest) -> DashResult<ViewModel> {
        if self.config.auth.require_login && !ctx.is_logged_in() && !request.is_auth() {
            return Ok(ViewModel::SignInRequired);
        }
        match request {
            DashboardRequest::Transactions { criteria } => self.transactions(criteria),
            DashboardRequest::Trends { filter } => self.trends(filter),
            DashboardRequest::Inventory { query } => Ok(inventory_view(ctx, &query)),
            DashboardRequest::AddProduct(input) => match ctx.inventory.add_product(input) {
                Ok(item) => Ok(ViewModel::ProductAdded(item.clone())),
                Err(DashError::InvalidInput(message)) => Ok(ViewModel::Rejected { message }),
                Err(e) => Err(e),
            },
            DashboardRequest::Report { range, format } => self.report(range, format),
            DashboardRequest::Ask { question } => self.ask(ctx, &question),
            DashboardRequest::SignIn { email, password } => self.sign_in(ctx, &email, &password),
            DashboardRequest::SignUp { email, password } => self.sign_up(&email, &password),
            DashboardRequest::OAuthSignIn => self.oauth(),
            DashboardRequest::SignOut => {
                ctx.clear_session();
                Ok(ViewModel::Auth(AuthView {
                    ok: true,
                    message: "Signed out.".into(),
                }))
            }
        }
    }

    fn transactions(&mut self, criteria: Option<FilterCriteria>) -> DashResult<ViewModel> {
        let orders = self.orders()?;
        let criteria = criteria.unwrap_or_else(|| FilterCriteria::page_default(&orders));
        let filtered = criteria.apply(&orders);
        if filtered.is_empty() {
            return Ok(ViewModel::NoData {
                message: NO_TRANSACTIONS.into(),
            });
        }

        let top = self.config.top_n;
        let summary = TransactionSummary::compute(&filtered);
        let customers = customer_summary(&filtered);
        let high_value = high_value_customers(&customers);
        let actions = recommended_actions(&summary, &high_value);

        Ok(ViewModel::Transactions(Box::new(TransactionsView {
            recent: recent_orders(&filtered, self.config.recent_rows),
            top_customers: top_n(&customers, top),
            top_skus: top_n(&sku_ranking(&filtered), top),
            categories: category_sales(&filtered),
            criteria,
            summary,
            high_value,
            actions,
        })))
    }

    fn trends(&mut self, filter: Option<TrendFilter>) -> DashResult<ViewModel> {
        let rows = self.sessions()?;
        let filter = filter.unwrap_or_else(|| default_trend_filter(&rows));
        let filtered = filter.apply(&rows);
        if filtered.is_empty() {
            return Ok(ViewModel::NoData {
                message: NO_TRAFFIC.into(),
            });
        }

        let summary = TrendSummary::compute(&filtered);
        let previous = filter
            .previous_period()
            .map(|prev| TrendSummary::compute(&prev.apply(&rows)));
        let deltas = previous.as_ref().map(|p| TrendDeltas::between(&summary, p));

        Ok(ViewModel::Trends(Box::new(TrendsView {
            date_range: filter.date_range,
            daily: daily_series(&filtered),
            by_category: revenue_by_category(&filtered),
            by_source: sessions_by_source(&filtered),
            top_products: top_products(&filtered, self.config.top_n),
            summary,
            previous,
            deltas,
        })))
    }

    fn report(&mut self, range: ReportRange, format: ReportFormat) -> DashResult<ViewModel> {
        let orders = self.orders()?;
        let report = SalesReport::build(&orders, range, self.today, self.config.top_n)?;
        let bytes = report.render(format)?;
        Ok(ViewModel::Report(Box::new(ReportArtifact {
            file_name: format!("Combined_Report.{}", format.extension()),
            mime_type: format.mime_type(),
            bytes,
            report,
        })))
    }

    fn ask(&mut self, ctx: &mut SessionContext, question: &str) -> DashResult<ViewModel> {
        let client = self.completion.as_deref().ok_or_else(|| DashError::MissingConfig {
            key: GOOGLE_API_KEY.into(),
        })?;
        let question = question.trim();
        if question.is_empty() {
            return Ok(ViewModel::Rejected {
                message: "Ask GURU anything about your business.".into(),
            });
        }
        Ok(ViewModel::Advisor(advisor::ask(client, &mut ctx.conversation, question)))
    }

    fn auth_provider(&self) -> DashResult<&dyn AuthProvider> {
        self.auth.as_deref().ok_or_else(|| DashError::MissingConfig {
            key: SUPABASE_URL.into(),
        })
    }

    fn sign_in(&self, ctx: &mut SessionContext, email: &str, password: &str) -> DashResult<ViewModel> {
        let provider = self.auth_provider()?;
        let view = match validate_credentials(email, password)
            .and_then(|_| provider.sign_in_with_password(email, password))
        {
            Ok(session) => {
                ctx.set_session(session);
                AuthView {
                    ok: true,
                    message: "Signed in successfully.".into(),
                }
            }
            Err(DashError::InvalidInput(message)) => AuthView { ok: false, message },
            Err(e) => {
                log::warn!("sign-in failed: {e}");
                AuthView {
                    ok: false,
                    message: format!("Sign-in error: {e}"),
                }
            }
        };
        Ok(ViewModel::Auth(view))
    }

    fn sign_up(&self, email: &str, password: &str) -> DashResult<ViewModel> {
        let provider = self.auth_provider()?;
        let view = match validate_credentials(email, password)
            .and_then(|_| provider.sign_up(email, password))
        {
            Ok(_) => AuthView {
                ok: true,
                message: "Account created. Check your email for confirmation (if enabled), \
                          then sign in."
                    .into(),
            },
            Err(DashError::InvalidInput(message)) => AuthView { ok: false, message },
            Err(e) => {
                log::warn!("sign-up failed: {e}");
                AuthView {
                    ok: false,
                    message: format!("Sign-up error: {e}"),
                }
            }
        };
        Ok(ViewModel::Auth(view))
    }

    fn oauth(&self) -> DashResult<ViewModel> {
        let provider = self.auth_provider()?;
        let view = match provider.oauth_url(&self.config.auth.oauth_provider) {
            Ok(url) => AuthView {
                ok: true,
                message: format!("Open this link to continue sign-in: {url}"),
            },
            Err(e) => AuthView {
                ok: false,
                message: format!("OAuth error: {e}"),
            },
        };
        Ok(ViewModel::Auth(view))
    }
}

/// Last 30 days ending at the newest row, every source and category.
pub fn default_trend_filter(rows: &[SessionRecord]) -> TrendFilter {
    let Some(max_date) = rows.iter().map(|r| r.date).max() else {
        return TrendFilter::default();
    };
    let min_date = rows.iter().map(|r| r.date).min().unwrap_or(max_date);
    TrendFilter {
        date_range: Some(((max_date - Duration::days(29)).max(min_date), max_date)),
        ..TrendFilter::default()
    }
}

fn inventory_view(ctx: &SessionContext, query: &InventoryQuery) -> ViewModel {
    let inventory = &ctx.inventory;
    ViewModel::Inventory(InventoryView {
        rows: inventory.query(query).into_iter().cloned().collect(),
        alerts: inventory.alerts(query).into_iter().cloned().collect(),
        metrics: inventory.metrics(query),
        categories: inventory.categories().into_iter().map(String::from).collect(),
    })
}
