//! Report generation: date-range presets, the sales summary report and
//! its PDF / CSV encodings.

use crate::{
    aggregate::{sku_ranking, top_n, SkuSales, TransactionSummary},
    error::{DashError, DashResult},
    event::OrderRecord,
    filter::FilterCriteria,
    types::{format_usd, group_thousands, to_dollars, Cents, Day},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum ReportRange {
    Last7Days,
    Last30Days,
    Last90Days,
    Today,
    Yesterday,
    Custom { start: Day, end: Day },
}

impl ReportRange {
    /// Inclusive window relative to `today`.
    pub fn resolve(&self, today: Day) -> DashResult<(Day, Day)> {
        let window = |days: i64| (today - Duration::days(days - 1), today);
        let (start, end) = match *self {
            Self::Last7Days => window(7),
            Self::Last30Days => window(30),
            Self::Last90Days => window(90),
            Self::Today => (today, today),
            Self::Yesterday => {
                let y = today - Duration::days(1);
                (y, y)
            }
            Self::Custom { start, end } => (start, end),
        };
        if start > end {
            return Err(DashError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok((start, end))
    }

    pub fn label(&self) -> String {
        match self {
            Self::Last7Days => "Last 7 Days".into(),
            Self::Last30Days => "Last 30 Days".into(),
            Self::Last90Days => "Last 90 Days".into(),
            Self::Today => "Today".into(),
            Self::Yesterday => "Yesterday".into(),
            Self::Custom { start, end } => format!("{start} to {end}"),
        }
    }

    /// Parse a preset name (`7d`, `30d`, `90d`, `today`, `yesterday`).
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "7d" | "last7days" | "last 7 days" => Some(Self::Last7Days),
            "30d" | "last30days" | "last 30 days" => Some(Self::Last30Days),
            "90d" | "last90days" | "last 90 days" => Some(Self::Last90Days),
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }
}

/// Sales summary over one resolved window, built from the real aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub title: String,
    pub range_label: String,
    pub start: Day,
    pub end: Day,
    pub generated_on: Day,
    pub summary: TransactionSummary,
    pub top_skus: Vec<SkuSales>,
    #[serde(skip)]
    pub rows: Vec<OrderRecord>,
}

impl SalesReport {
    pub fn build(
        records: &[OrderRecord],
        range: ReportRange,
        today: Day,
        top: usize,
    ) -> DashResult<Self> {
        let (start, end) = range.resolve(today)?;
        let rows = FilterCriteria::all().with_date_range(start, end)?.apply(records);
        let summary = TransactionSummary::compute(&rows);
        let top_skus = top_n(&sku_ranking(&rows), top);
        log::info!(
            "report: {} orders between {start} and {end}",
            summary.total_orders
        );
        Ok(Self {
            title: "Sales Summary Report".into(),
            range_label: range.label(),
            start,
            end,
            generated_on: today,
            summary,
            top_skus,
            rows,
        })
    }

    /// The text lines printed on the PDF page.
    pub fn lines(&self) -> Vec<String> {
        let s = &self.summary;
        let mut lines = vec![
            format!("{} ({})", self.range_label, format_period(self.start, self.end)),
            format!("Generated on {}", self.generated_on),
            String::new(),
            format!("Net revenue: {}", format_usd(s.net_revenue)),
            format!("Gross revenue (completed): {}", format_usd(s.gross_revenue)),
            format!("Refunds and chargebacks: {}", format_usd(s.refund_amount)),
            format!("Total orders: {}", group_thousands(s.total_orders as u64)),
            format!("Average order value: ${:.2}", s.avg_order_value),
            format!("Refund rate: {:.1}%", s.refund_rate * 100.0),
            format!("Late shipments: {:.1}%", s.late_rate * 100.0),
            format!("Units sold: {}", group_thousands(s.units_sold)),
        ];
        if self.top_skus.is_empty() {
            lines.push(String::new());
            lines.push("No completed orders in this period.".into());
        } else {
            lines.push(String::new());
            lines.push("Top SKUs by units sold:".into());
            for (i, sku) in self.top_skus.iter().enumerate() {
                lines.push(format!(
                    "{}. {} - {} units, {}",
                    i + 1,
                    sku.product_name,
                    group_thousands(sku.units_sold),
                    format_usd(sku.revenue)
                ));
            }
        }
        lines
    }

    pub fn render(&self, format: ReportFormat) -> DashResult<Vec<u8>> {
        match format {
            ReportFormat::Pdf => Ok(render_pdf(&self.title, &self.lines())),
            ReportFormat::Csv => render_csv(&self.rows),
        }
    }
}

fn format_period(start: Day, end: Day) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start} to {end}")
    }
}

/// One CSV line per order, in the given order.
pub fn render_csv(rows: &[OrderRecord]) -> DashResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "order_id",
        "date",
        "customer_name",
        "status",
        "channel",
        "payment_method",
        "sku",
        "category",
        "packs",
        "items_count",
        "subtotal",
        "discount",
        "shipping",
        "tax",
        "total",
        "fulfillment_status",
        "fulfillment_days",
        "customer_type",
        "shipping_method",
    ])?;
    for r in rows {
        writer.write_record([
            r.order_id.clone(),
            r.date.to_string(),
            r.customer_name.clone(),
            r.status.to_string(),
            r.channel.to_string(),
            r.payment_method.to_string(),
            r.product.sku.to_string(),
            r.category().to_string(),
            r.packs.to_string(),
            r.items_count.to_string(),
            dollars(r.subtotal),
            dollars(r.discount),
            dollars(r.shipping),
            dollars(r.tax),
            dollars(r.total),
            r.fulfillment_status.to_string(),
            r.fulfillment_days.to_string(),
            r.customer_type.to_string(),
            r.shipping_method.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| DashError::Other(anyhow::anyhow!("CSV flush failed: {e}")))
}

fn dollars(cents: Cents) -> String {
    format!("{:.2}", to_dollars(cents))
}

// ── PDF ──────────────────────────────────────────────────────────────────────

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 56;
const TITLE_SIZE: u32 = 16;
const BODY_SIZE: u32 = 11;
const LEADING: u32 = 16;

/// Escape a text line for a PDF literal string. Characters outside
/// Latin-1 are replaced with `?` since the page uses a standard font.
fn pdf_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c if (c as u32) < 0x20 => out.push(' '),
            c if (c as u32) < 0x7f => out.push(c),
            c if (0xa0..=0xff).contains(&(c as u32)) => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Render a single-page PDF: a centred-left title and body lines in
/// Helvetica. Lines that do not fit on the page are dropped.
pub fn render_pdf(title: &str, lines: &[String]) -> Vec<u8> {
    let mut content = String::new();
    let top = PAGE_HEIGHT - MARGIN;
    content.push_str(&format!(
        "BT /F1 {TITLE_SIZE} Tf {MARGIN} {top} Td ({}) Tj ET\n",
        pdf_escape(title)
    ));
    let max_lines = ((top - MARGIN) / LEADING).saturating_sub(2) as usize;
    let body_top = top - 2 * LEADING;
    content.push_str(&format!("BT /F1 {BODY_SIZE} Tf {LEADING} TL {MARGIN} {body_top} Td\n"));
    for (i, line) in lines.iter().take(max_lines).enumerate() {
        if i > 0 {
            content.push_str("T*\n");
        }
        content.push_str(&format!("({}) Tj\n", pdf_escape(line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
    ];

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_delimiters_and_unicode() {
        assert_eq!(pdf_escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(pdf_escape("caf\u{e9}"), "caf\\351");
        assert_eq!(pdf_escape("snow\u{2603}"), "snow?");
    }
}
