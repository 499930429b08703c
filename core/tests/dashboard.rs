//! Request dispatch end to end, with in-process auth and completion backends.

use chrono::NaiveDate;
use soda_dash_core::{
    advisor::TextCompletion,
    auth::{AuthProvider, AuthSession, AuthUser, SignUpOutcome},
    catalog::OrderStatus,
    config::{Credentials, DashConfig, GOOGLE_API_KEY, SUPABASE_URL},
    context::SessionContext,
    dashboard::{Dashboard, DashboardRequest, ViewModel, NO_TRANSACTIONS},
    error::{DashError, DashResult},
    filter::FilterCriteria,
    generator::MAX_DAY_COUNT,
    inventory::{InventoryQuery, NewProduct},
    report::{ReportFormat, ReportRange},
};

const PASSWORD: &str = "fizzy-pop";

struct FakeAuth;

impl AuthProvider for FakeAuth {
    fn sign_in_with_password(&self, email: &str, password: &str) -> DashResult<AuthSession> {
        if password != PASSWORD {
            return Err(DashError::Auth("Invalid login credentials".into()));
        }
        Ok(AuthSession {
            user: AuthUser {
                id: "user-1".into(),
                email: Some(email.to_string()),
            },
            access_token: "token".into(),
        })
    }

    fn sign_up(&self, _email: &str, _password: &str) -> DashResult<SignUpOutcome> {
        Ok(SignUpOutcome {
            user: None,
            session: None,
        })
    }

    fn oauth_url(&self, provider: &str) -> DashResult<String> {
        Ok(format!("https://auth.example/authorize?provider={provider}"))
    }
}

struct Echo;

impl TextCompletion for Echo {
    fn complete(&self, prompt: &str) -> DashResult<String> {
        Ok(format!("{} chars received", prompt.len()))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
}

fn dashboard() -> Dashboard {
    Dashboard::new(DashConfig::default_test(), today())
}

#[test]
fn transactions_page_defaults() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();

    let view = dash
        .handle(&mut ctx, DashboardRequest::Transactions { criteria: None })
        .unwrap();
    let ViewModel::Transactions(view) = view else {
        panic!("expected transactions view, got {view:?}");
    };
    let start = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
    assert_eq!(view.criteria.date_range, Some((start, today())));
    assert!(view.summary.total_orders > 0);
    assert!(view.recent.len() <= 300);
    assert!(view.top_customers.len() <= 10);
    assert!(view.recent.iter().all(|r| r.date >= start));
    assert!(!view.actions.is_empty());
}

#[test]
fn empty_filter_result_is_no_data_not_an_error() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();
    let criteria = FilterCriteria::all().with_statuses(Vec::<OrderStatus>::new());

    let view = dash
        .handle(&mut ctx, DashboardRequest::Transactions { criteria: Some(criteria) })
        .unwrap();
    assert!(matches!(view, ViewModel::NoData { ref message } if message == NO_TRANSACTIONS));
}

#[test]
fn repeated_requests_reuse_generated_rows() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();
    dash.handle(&mut ctx, DashboardRequest::Transactions { criteria: None })
        .unwrap();
    dash.handle(
        &mut ctx,
        DashboardRequest::Report {
            range: ReportRange::Last7Days,
            format: ReportFormat::Csv,
        },
    )
    .unwrap();
    assert_eq!(dash.cache().len(), 1);

    dash.handle(&mut ctx, DashboardRequest::Trends { filter: None })
        .unwrap();
    assert_eq!(dash.cache().len(), 2);
}

#[test]
fn trends_page_compares_with_previous_period() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();
    let view = dash
        .handle(&mut ctx, DashboardRequest::Trends { filter: None })
        .unwrap();
    let ViewModel::Trends(view) = view else {
        panic!("expected trends view");
    };
    assert!(view.previous.is_some());
    assert!(view.deltas.is_some());
    assert_eq!(view.daily.len(), 30);
    assert_eq!(view.by_source.len(), 5);
}

#[test]
fn trends_filter_arrives_as_json() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();
    let filter = serde_json::from_str(
        r#"{"date_range":["2025-11-16","2025-11-25"],"sources":["Email"]}"#,
    )
    .unwrap();
    let view = dash
        .handle(&mut ctx, DashboardRequest::Trends { filter: Some(filter) })
        .unwrap();
    let ViewModel::Trends(view) = view else {
        panic!("expected trends view");
    };
    assert_eq!(view.daily.len(), 10);
    assert_eq!(view.by_source.len(), 1);
    assert!(view.deltas.is_some());
}

#[test]
fn oversized_generator_window_is_invalid_input() {
    let mut config = DashConfig::default_test();
    config.generator.default_day_count = MAX_DAY_COUNT + 1;
    let mut dash = Dashboard::new(config, today());
    let mut ctx = SessionContext::new();

    let err = dash
        .handle(&mut ctx, DashboardRequest::Transactions { criteria: None })
        .unwrap_err();
    assert!(matches!(err, DashError::InvalidInput(_)), "got {err:?}");
    assert!(dash.cache().is_empty(), "rejected window was generated");
}

#[test]
fn report_artifact_is_named_and_typed() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();
    let view = dash
        .handle(
            &mut ctx,
            DashboardRequest::Report {
                range: ReportRange::Last30Days,
                format: ReportFormat::Pdf,
            },
        )
        .unwrap();
    let ViewModel::Report(artifact) = view else {
        panic!("expected report");
    };
    assert_eq!(artifact.file_name, "Combined_Report.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
    assert!(artifact.report.summary.total_orders > 0);
}

#[test]
fn inventory_edits_live_in_the_session_context() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();

    let rejected = dash
        .handle(&mut ctx, DashboardRequest::AddProduct(NewProduct::default()))
        .unwrap();
    assert!(matches!(rejected, ViewModel::Rejected { .. }));

    let added = dash
        .handle(
            &mut ctx,
            DashboardRequest::AddProduct(NewProduct {
                name: "Cream Soda".into(),
                ..NewProduct::default()
            }),
        )
        .unwrap();
    assert!(matches!(added, ViewModel::ProductAdded(ref item) if item.id == "NEW1"));

    let view = dash
        .handle(&mut ctx, DashboardRequest::Inventory { query: InventoryQuery::default() })
        .unwrap();
    let ViewModel::Inventory(view) = view else {
        panic!("expected inventory view");
    };
    assert_eq!(view.rows.len(), 7);

    let mut other = SessionContext::new();
    let view = dash
        .handle(&mut other, DashboardRequest::Inventory { query: InventoryQuery::default() })
        .unwrap();
    let ViewModel::Inventory(view) = view else {
        panic!("expected inventory view");
    };
    assert_eq!(view.rows.len(), 6, "edits leaked across sessions");
}

#[test]
fn missing_backends_are_configuration_errors() {
    let mut dash = dashboard();
    let mut ctx = SessionContext::new();

    let err = dash
        .handle(&mut ctx, DashboardRequest::Ask { question: "Hi".into() })
        .unwrap_err();
    assert!(matches!(err, DashError::MissingConfig { ref key } if key == GOOGLE_API_KEY));

    let err = dash
        .handle(
            &mut ctx,
            DashboardRequest::SignIn {
                email: "a@b.c".into(),
                password: PASSWORD.into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, DashError::MissingConfig { ref key } if key == SUPABASE_URL));
}

#[test]
fn credentials_without_keys_attach_no_backends() {
    let creds = Credentials::from_lookup(|_| None);
    let mut dash = Dashboard::from_credentials(DashConfig::default_test(), today(), &creds).unwrap();
    let mut ctx = SessionContext::new();
    assert!(dash
        .handle(&mut ctx, DashboardRequest::OAuthSignIn)
        .is_err());
}

#[test]
fn advisor_requests_go_through_the_session_conversation() {
    let mut dash = dashboard().with_completion(Box::new(Echo));
    let mut ctx = SessionContext::new();

    let blank = dash
        .handle(&mut ctx, DashboardRequest::Ask { question: "   ".into() })
        .unwrap();
    assert!(matches!(blank, ViewModel::Rejected { .. }));
    assert_eq!(ctx.conversation.turns().len(), 1);

    let view = dash
        .handle(&mut ctx, DashboardRequest::Ask { question: "Price of Sprite?".into() })
        .unwrap();
    assert!(matches!(view, ViewModel::Advisor(ref r) if r.ok && r.text.ends_with("chars received")));
    assert_eq!(ctx.conversation.turns().len(), 3);
}

#[test]
fn login_gate_and_session_lifecycle() {
    let mut config = DashConfig::default_test();
    config.auth.require_login = true;
    let mut dash = Dashboard::new(config, today()).with_auth(Box::new(FakeAuth));
    let mut ctx = SessionContext::new();

    let gated = dash
        .handle(&mut ctx, DashboardRequest::Transactions { criteria: None })
        .unwrap();
    assert!(matches!(gated, ViewModel::SignInRequired));

    let blank = dash
        .handle(
            &mut ctx,
            DashboardRequest::SignIn {
                email: "".into(),
                password: "".into(),
            },
        )
        .unwrap();
    assert!(matches!(
        blank,
        ViewModel::Auth(ref v) if !v.ok && v.message == "Please enter both email and password."
    ));

    let wrong = dash
        .handle(
            &mut ctx,
            DashboardRequest::SignIn {
                email: "owner@soda.shop".into(),
                password: "nope".into(),
            },
        )
        .unwrap();
    assert!(matches!(wrong, ViewModel::Auth(ref v) if !v.ok && v.message.starts_with("Sign-in error:")));
    assert!(!ctx.is_logged_in());

    let ok = dash
        .handle(
            &mut ctx,
            DashboardRequest::SignIn {
                email: "owner@soda.shop".into(),
                password: PASSWORD.into(),
            },
        )
        .unwrap();
    assert!(matches!(ok, ViewModel::Auth(ref v) if v.ok));
    assert_eq!(ctx.user_email(), Some("owner@soda.shop"));

    let page = dash
        .handle(&mut ctx, DashboardRequest::Transactions { criteria: None })
        .unwrap();
    assert!(matches!(page, ViewModel::Transactions(_)));

    let oauth = dash.handle(&mut ctx, DashboardRequest::OAuthSignIn).unwrap();
    assert!(matches!(oauth, ViewModel::Auth(ref v) if v.message.contains("provider=google")));

    dash.handle(&mut ctx, DashboardRequest::SignOut).unwrap();
    assert!(!ctx.is_logged_in());
    let gated = dash
        .handle(&mut ctx, DashboardRequest::Inventory { query: InventoryQuery::default() })
        .unwrap();
    assert!(matches!(gated, ViewModel::SignInRequired));
}

#[test]
fn shipped_config_file_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/dashboard.json");
    let config = DashConfig::load(path).unwrap();
    assert_eq!(config.generator.default_seed, 123);
    assert_eq!(config.generator.late_threshold_days, 3);
    assert!(!config.auth.require_login);
}
