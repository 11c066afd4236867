//! Server-side HTML for the dashboard page.

use std::fmt::Write as _;

use crate::application::dashboard::{Snapshot, COLUMNS};
use crate::domain::money::format_currency;
use crate::domain::summary::Summary;
use crate::infrastructure::config::server::DashboardConfig;

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,sans-serif;margin:2rem;color:#262730}\
.main-header{font-size:2.5rem;font-weight:bold;color:#1f77b4;margin-bottom:0.5rem}\
.last-updated{color:#666;font-size:0.9rem;margin-bottom:1rem}\
.toolbar{display:flex;justify-content:space-between;align-items:center;margin-bottom:1rem}\
.button{background:#ff4b4b;color:#fff;padding:0.4rem 0.9rem;border-radius:0.5rem;text-decoration:none}\
.metrics{display:flex;gap:1rem;margin-bottom:1rem}\
.metric-card{flex:1;background-color:#f0f2f6;padding:1rem;border-radius:0.5rem}\
.metric-label{color:#666;font-size:0.9rem}.metric-value{font-size:1.8rem}\
.info{background:#e8f1fb;padding:1rem;border-radius:0.5rem}\
table{border-collapse:collapse;width:100%}th,td{padding:0.5rem;border-bottom:1px solid #ddd;text-align:left}\
pre{background:#f6f8fa;padding:0.75rem;border-radius:0.3rem}";

const INSTRUCTIONS: &str = r#"{
  "symbol": "{{ticker}}",
  "price": {{close}},
  "atr": {{plot("ATR")}}
}"#;

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the full dashboard page for `snapshot`.
#[must_use]
pub fn dashboard_page(config: &DashboardConfig, snapshot: &Snapshot) -> String {
    let title = escape_html(&config.title);
    let mut html = String::with_capacity(4096);

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n"
    );
    if config.refresh_secs > 0 {
        let _ = writeln!(
            html,
            "<meta http-equiv=\"refresh\" content=\"{}\">",
            config.refresh_secs
        );
    }
    let _ = write!(
        html,
        "<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"main-header\">{title}</div>\n\
         <div class=\"last-updated\">TradingView Webhook Data</div>\n\
         <div class=\"toolbar\"><a class=\"button\" href=\"/\">&#128260; Refresh Data</a>"
    );
    if !snapshot.is_empty() {
        let _ = write!(
            html,
            "<span><strong>Last Update:</strong> {}</span>",
            snapshot.generated_at.format("%H:%M:%S")
        );
    }
    html.push_str("</div>\n");

    match &snapshot.summary {
        Some(summary) if !snapshot.is_empty() => render_data(&mut html, snapshot, summary),
        _ => render_empty(&mut html),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_empty(html: &mut String) {
    let _ = write!(
        html,
        "<div class=\"info\">&#128202; No data available yet. Waiting for TradingView webhooks...</div>\n\
         <h3>How to send data:</h3>\n<ol>\n\
         <li>Configure your TradingView alert with webhook URL</li>\n\
         <li>Use this JSON format:<pre>{}</pre></li>\n\
         <li>Data will appear here after the first webhook is received</li>\n</ol>\n",
        escape_html(INSTRUCTIONS)
    );
}

fn render_data(html: &mut String, snapshot: &Snapshot, summary: &Summary) {
    html.push_str("<div class=\"metrics\">\n");
    metric(html, "Total Symbols", &summary.total_symbols.to_string());
    metric(html, "Avg Price", &format_currency(summary.avg_price));
    metric(html, "Avg ATR", &format_currency(summary.avg_atr));
    html.push_str("</div>\n<h3>Investment Data</h3>\n<table>\n<thead><tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for quote in &snapshot.quotes {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(quote.symbol.as_str()),
            format_currency(quote.price),
            format_currency(quote.atr),
            format_currency(quote.exit_price()),
            quote.display_timestamp()
        );
    }

    html.push_str(
        "</tbody>\n</table>\n\
         <p><a class=\"button\" href=\"/download.csv\">&#128229; Download CSV</a></p>\n\
         <details>\n<summary>&#8505;&#65039; About Exit Price Calculation</summary>\n\
         <p><strong>Exit Price</strong> is calculated as:</p>\n<pre>Exit Price = Price - ATR</pre>\n\
         <p>This represents a potential stop-loss level based on the Average True Range (ATR), \
         which measures market volatility. The exit price is one ATR below the current price.</p>\n\
         </details>\n",
    );
}

fn metric(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        html,
        "<div class=\"metric-card\"><div class=\"metric-label\">{label}</div>\
         <div class=\"metric-value\">{}</div></div>",
        escape_html(value)
    );
}
