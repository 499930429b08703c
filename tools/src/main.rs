//! dash-runner: headless runner for the soda dashboard.
//!
//! Usage:
//!   dash-runner --page transactions --seed 123 --days 90 --end 2025-11-25
//!   dash-runner --page report --range 30d --format pdf --out Combined_Report.pdf
//!   dash-runner --page ask --question "What should I restock first?"
//!   dash-runner --ipc-mode < requests.jsonl

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use soda_dash_core::{
    config::{Credentials, DashConfig},
    context::SessionContext,
    dashboard::{
        Dashboard, DashboardRequest, InventoryView, ReportArtifact, TransactionsView, TrendsView,
        ViewModel,
    },
    filter::FilterCriteria,
    inventory::{InventoryQuery, NewProduct},
    report::{ReportFormat, ReportRange},
    traffic::TrendFilter,
    types::format_usd,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Transactions {
        #[serde(default)]
        criteria: Option<FilterCriteria>,
    },
    Trends {
        #[serde(default)]
        filter: Option<TrendFilter>,
    },
    Inventory {
        #[serde(default)]
        query: InventoryQuery,
    },
    AddProduct {
        product: NewProduct,
    },
    Report {
        range: ReportRange,
        format: ReportFormat,
    },
    Ask {
        question: String,
    },
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
    },
    Oauth,
    SignOut,
    Quit,
}

impl IpcCommand {
    fn into_request(self) -> Option<DashboardRequest> {
        Some(match self {
            Self::Transactions { criteria } => DashboardRequest::Transactions { criteria },
            Self::Trends { filter } => DashboardRequest::Trends { filter },
            Self::Inventory { query } => DashboardRequest::Inventory { query },
            Self::AddProduct { product } => DashboardRequest::AddProduct(product),
            Self::Report { range, format } => DashboardRequest::Report { range, format },
            Self::Ask { question } => DashboardRequest::Ask { question },
            Self::SignIn { email, password } => DashboardRequest::SignIn { email, password },
            Self::SignUp { email, password } => DashboardRequest::SignUp { email, password },
            Self::Oauth => DashboardRequest::OAuthSignIn,
            Self::SignOut => DashboardRequest::SignOut,
            Self::Quit => return None,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");
    let page = flag_value(&args, "--page").unwrap_or("transactions");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DashConfig::load(path)?,
        None => DashConfig::default_test(),
    };
    config.generator.default_seed = parse_arg(&args, "--seed", config.generator.default_seed);
    config.generator.default_day_count = parse_arg(&args, "--days", config.generator.default_day_count);
    config.traffic.default_seed = parse_arg(&args, "--traffic-seed", config.traffic.default_seed);
    config.validate()?;

    let end = match flag_value(&args, "--end") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--end expects YYYY-MM-DD, got {raw}"))?,
        None => chrono::Local::now().date_naive(),
    };

    let creds = Credentials::from_env();
    let mut dashboard = Dashboard::from_credentials(config, end, &creds)?;
    let mut ctx = SessionContext::new();

    if ipc_mode {
        return run_ipc_loop(&mut dashboard, &mut ctx);
    }

    if !json {
        println!("Soda dashboard: dash-runner");
        println!("  page:      {page}");
        println!("  seed:      {}", dashboard.config().generator.default_seed);
        println!("  days:      {}", dashboard.config().generator.default_day_count);
        println!("  end:       {end}");
        println!();
    }

    let request = build_request(&args, page)?;
    let view = dashboard.handle(&mut ctx, request)?;

    if let ViewModel::Report(artifact) = &view {
        let out = flag_value(&args, "--out").unwrap_or(&artifact.file_name);
        std::fs::write(out, &artifact.bytes).with_context(|| format!("Cannot write {out}"))?;
        log::info!("wrote {} bytes to {out}", artifact.bytes.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn build_request(args: &[String], page: &str) -> Result<DashboardRequest> {
    let request = match page {
        "transactions" => DashboardRequest::Transactions { criteria: None },
        "trends" => DashboardRequest::Trends { filter: None },
        "inventory" => DashboardRequest::Inventory {
            query: InventoryQuery {
                search: flag_value(args, "--search").map(String::from),
                ..InventoryQuery::default()
            },
        },
        "report" => {
            let range = match flag_value(args, "--range") {
                Some(name) => ReportRange::from_preset(name)
                    .with_context(|| format!("Unknown --range preset: {name}"))?,
                None => ReportRange::Last30Days,
            };
            let format = match flag_value(args, "--format").unwrap_or("pdf") {
                "pdf" => ReportFormat::Pdf,
                "csv" => ReportFormat::Csv,
                other => bail!("Unknown --format: {other} (expected pdf or csv)"),
            };
            DashboardRequest::Report { range, format }
        }
        "ask" => DashboardRequest::Ask {
            question: flag_value(args, "--question")
                .context("--page ask needs --question")?
                .to_string(),
        },
        other => bail!("Unknown --page: {other}"),
    };
    Ok(request)
}

fn run_ipc_loop(dashboard: &mut Dashboard, ctx: &mut SessionContext) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };
        let Some(request) = cmd.into_request() else {
            break;
        };

        match dashboard.handle(ctx, request) {
            Ok(view) => writeln!(stdout, "{}", serde_json::to_string(&view)?)?,
            Err(e) => {
                log::warn!("request failed: {e}");
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_view(view: &ViewModel) {
    match view {
        ViewModel::Transactions(v) => print_transactions(v),
        ViewModel::Trends(v) => print_trends(v),
        ViewModel::Inventory(v) => print_inventory(v),
        ViewModel::Report(a) => print_report(a),
        ViewModel::Advisor(reply) => {
            println!("=== GURU ===");
            println!("{}", reply.text);
        }
        ViewModel::ProductAdded(item) => println!("Added {} ({})", item.product, item.id),
        ViewModel::Auth(v) => println!("{}", v.message),
        ViewModel::NoData { message } | ViewModel::Rejected { message } => println!("{message}"),
        ViewModel::SignInRequired => println!("Please sign in to access the dashboard."),
    }
}

fn print_transactions(v: &TransactionsView) {
    let s = &v.summary;
    println!("=== TRANSACTIONS ===");
    if let Some((start, end)) = v.criteria.date_range {
        println!("  window:         {start} to {end}");
    }
    println!("  net revenue:    {}", format_usd(s.net_revenue));
    println!("  gross revenue:  {}", format_usd(s.gross_revenue));
    println!("  refunds:        {}", format_usd(s.refund_amount));
    println!("  orders:         {} ({} completed)", s.total_orders, s.completed_orders);
    println!("  avg order:      ${:.2}", s.avg_order_value);
    println!("  refund rate:    {:.1}%", s.refund_rate * 100.0);
    println!("  late rate:      {:.1}%", s.late_rate * 100.0);
    println!("  new customers:  {:.1}%", s.new_customer_share);
    println!("  units sold:     {}", s.units_sold);

    println!();
    println!("=== TOP SKUS ===");
    for sku in &v.top_skus {
        println!(
            "  {:<12} {:>7} units | {}",
            sku.sku,
            sku.units_sold,
            format_usd(sku.revenue)
        );
    }

    println!();
    println!("=== RECOMMENDED ACTIONS ===");
    for action in &v.actions {
        println!("  - {}", action.text);
    }
}

fn print_trends(v: &TrendsView) {
    let s = &v.summary;
    println!("=== TRENDS ===");
    if let Some((start, end)) = v.date_range {
        println!("  window:      {start} to {end}");
    }
    println!("  revenue:     {}", format_usd(s.revenue));
    println!("  orders:      {}", s.orders);
    println!("  sessions:    {}", s.sessions);
    println!("  conversion:  {:.2}%", s.conversion_rate * 100.0);
    println!("  aov:         ${:.2}", s.aov);
    if let Some(d) = &v.deltas {
        println!(
            "  vs previous: revenue {:+.1}% | orders {:+.1}% | cr {:+.1}% | aov {:+.1}%",
            d.revenue_pct, d.orders_pct, d.conversion_rate_pct, d.aov_pct
        );
    }

    println!();
    println!("=== TOP PRODUCTS ===");
    for p in &v.top_products {
        println!(
            "  {:<42} {} | {:.2}% cr",
            p.product_name,
            format_usd(p.revenue),
            p.conversion_rate * 100.0
        );
    }
}

fn print_inventory(v: &InventoryView) {
    println!("=== INVENTORY ===");
    println!("  {}", v.metrics.summary_line());
    for item in &v.rows {
        println!(
            "  {:<5} {:<40} {:>4} / {:<4} {:?}",
            item.id, item.product, item.stock, item.min_stock, item.status
        );
    }
    if !v.alerts.is_empty() {
        println!();
        println!("=== ALERTS ===");
        for item in &v.alerts {
            println!("  {} is {:?} ({} in stock)", item.product, item.status, item.stock);
        }
    }
}

fn print_report(a: &ReportArtifact) {
    println!("=== {} ===", a.report.title.to_uppercase());
    for line in a.report.lines() {
        println!("  {line}");
    }
    println!();
    println!("  {} ({}, {} bytes)", a.file_name, a.mime_type, a.bytes.len());
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
