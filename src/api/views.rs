use std::fmt::Write;

use crate::services::format::{format_change, format_compact, format_depth, format_floor, trim_trailing_zeros, with_thousands};
use crate::services::refresh::DashboardState;
use crate::services::sort::sort_records;
use crate::types::models::{SortKey, SortOrder};

const STYLE: &str = r#"
body { background: #000; color: #22c55e; font-family: ui-monospace, monospace; margin: 0; padding: 24px; }
.cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-bottom: 24px; }
.card { border: 1px solid rgba(34,197,94,.5); border-radius: 8px; padding: 12px 16px; }
.card h3 { color: #86efac; font-size: 13px; margin: 0 0 8px; border-bottom: 1px solid rgba(34,197,94,.2); padding-bottom: 8px; }
.card .value { font-size: 24px; font-weight: bold; }
.card .sub { font-size: 12px; color: #15803d; }
.controls { display: flex; justify-content: space-between; margin-bottom: 16px; }
.controls a, .controls button { color: #22c55e; background: rgba(34,197,94,.1); border: 1px solid #22c55e; border-radius: 4px; padding: 6px 10px; text-decoration: none; font-family: inherit; }
.controls input { background: #000; border: 1px solid #22c55e; color: #22c55e; width: 300px; padding: 6px; }
table { width: 100%; border-collapse: collapse; border: 1px solid rgba(34,197,94,.2); }
th { color: #86efac; background: #001200; text-align: right; padding: 8px; }
td { padding: 8px; text-align: right; border-bottom: 1px solid rgba(34,197,94,.2); }
td.glyph { text-align: center; font-size: 20px; }
td.name, th.name { text-align: left; }
.up { color: #10b981; } .down { color: #ef4444; }
.console { border: 1px solid #22c55e; border-radius: 8px; padding: 24px; width: 75%; margin: 5vh auto; max-height: 80vh; overflow-y: auto; }
.console .prompt { color: #86efac; margin-right: 8px; }
.pulse { text-align: center; margin-top: 16px; animation: pulse 2s infinite; }
@keyframes pulse { 50% { opacity: .5; } }
.error { display: flex; justify-content: center; align-items: center; height: 90vh; color: #ef4444; }
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Runes Dashboard</title>\n{}<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>",
        head_extra, STYLE, body
    )
}

/// Live console shown while a run is in flight. Reloads itself every second.
pub fn render_loading(messages: &[String]) -> String {
    let mut body = String::from("<div class=\"console\">\n");
    if messages.is_empty() {
        body.push_str("<div>Initializing...</div>\n");
    }
    for message in messages {
        let _ = writeln!(
            body,
            "<div><span class=\"prompt\">&gt;</span>{}</div>",
            escape_html(message)
        );
    }
    body.push_str("<div id=\"end\"></div>\n<div class=\"pulse\">Processing...</div>\n</div>");
    body.push_str("<script>document.getElementById('end').scrollIntoView();</script>");
    page("<meta http-equiv=\"refresh\" content=\"1\">\n", &body)
}

pub fn render_error(message: &str) -> String {
    page(
        "",
        &format!(
            "<div class=\"error\"><div>{}<form method=\"post\" action=\"/refresh\"><button type=\"submit\">Retry</button></form></div></div>",
            escape_html(message)
        ),
    )
}

fn card(title: &str, value: &str, sub: Option<&str>) -> String {
    let sub = sub
        .map(|s| format!("<div class=\"sub\">{}</div>", escape_html(s)))
        .unwrap_or_default();
    format!(
        "<div class=\"card\"><h3>{}</h3><div class=\"value\">{}</div>{}</div>",
        title,
        escape_html(value),
        sub
    )
}

pub fn render_dashboard(state: &DashboardState, depth_cap: f64) -> String {
    let mut body = String::new();

    body.push_str("<div class=\"cards\">");
    body.push_str(&card(
        "Total Market Cap",
        &format!("${}", format_compact(state.stats.total_market_cap)),
        Some("0%"),
    ));
    body.push_str(&card(
        "24h Volume",
        &format!("${}", format_compact(state.stats.total_volume_24h)),
        None,
    ));
    body.push_str(&card("Active Runes", &state.stats.runes_count.to_string(), None));
    body.push_str(&card("24h Change", "0%", None));
    body.push_str("</div>\n");

    let arrow = match state.sort.order {
        SortOrder::Asc => "&#9650;",
        SortOrder::Desc => "&#9660;",
    };
    body.push_str("<div class=\"controls\"><div>Sort by: ");
    for key in SortKey::MENU {
        let marker = if key == state.sort.key { arrow } else { "" };
        let _ = write!(
            body,
            "<a href=\"/sort/{}\">{} {}</a> ",
            key.as_str(),
            key.label(),
            marker
        );
    }
    body.push_str("<form method=\"post\" action=\"/refresh\" style=\"display:inline\"><button type=\"submit\">Refresh</button></form>");
    body.push_str("</div>");
    // Search is presentational only; it does not filter the table.
    body.push_str("<div><input type=\"search\" placeholder=\"Search runes...\"> <button type=\"button\">&#128269;</button></div>");
    body.push_str("</div>\n");

    body.push_str(
        "<table>\n<thead><tr><th></th><th class=\"name\">Name</th><th>Price</th><th>24h %</th>\
         <th>Market Cap</th><th>Volume (24h)</th><th>Floor Price</th><th>2x</th><th>5x</th><th>10x</th></tr></thead>\n<tbody>\n",
    );

    for rune in sort_records(&state.records, state.sort.key, state.sort.order) {
        let depth = rune.depth.as_ref();
        let change_class = if rune.price_change_24h > 0.0 { "up" } else { "down" };
        let _ = writeln!(
            body,
            "<tr><td class=\"glyph\">{}</td><td class=\"name\">{}</td><td>${}</td><td class=\"{}\">{}</td>\
             <td>${}</td><td>${}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&rune.symbol),
            escape_html(&rune.name),
            trim_trailing_zeros(rune.price),
            change_class,
            format_change(rune.price_change_24h),
            with_thousands(rune.market_cap),
            with_thousands(rune.volume_24h),
            format_floor(depth.map(|d| d.floor_price)),
            format_depth(depth.map(|d| d.available_2x), depth_cap),
            format_depth(depth.map(|d| d.available_5x), depth_cap),
            format_depth(depth.map(|d| d.available_10x), depth_cap),
        );
    }
    body.push_str("</tbody>\n</table>");

    page("", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::{DepthMetrics, MarketStats, RuneRecord, SortState};

    fn rune(id: u64, name: &str, market_cap: f64, change: f64, depth: Option<DepthMetrics>) -> RuneRecord {
        RuneRecord {
            id,
            name: name.to_string(),
            symbol: "*".to_string(),
            price: 120.0,
            price_change_24h: change,
            market_cap,
            volume_24h: 200.0,
            holders: 500,
            total_txns: 0,
            txn_count: 0,
            supply: "0".to_string(),
            depth,
        }
    }

    fn state(records: Vec<RuneRecord>) -> DashboardState {
        DashboardState {
            stats: MarketStats::from_records(&records),
            records,
            ..DashboardState::default()
        }
    }

    #[test]
    fn loading_console_lists_messages_escaped() {
        let html = render_loading(&["Analyzing <PUPS>...".to_string()]);
        assert!(html.contains("Analyzing &lt;PUPS&gt;..."));
        assert!(html.contains("Processing..."));
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(render_loading(&[]).contains("Initializing..."));
    }

    #[test]
    fn error_view_has_no_table() {
        let html = render_error("HTTP error! status: 500");
        assert!(html.contains("HTTP error! status: 500"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn table_rows_follow_sort_state() {
        let mut s = state(vec![
            rune(1, "SMALL", 10.0, 1.0, None),
            rune(2, "LARGE", 1_000_000.0, -1.0, None),
        ]);
        let html = render_dashboard(&s, 100000.0);
        assert!(html.find("LARGE").unwrap() < html.find("SMALL").unwrap());

        s.sort = SortState {
            key: SortKey::MarketCap,
            order: SortOrder::Asc,
        };
        let html = render_dashboard(&s, 100000.0);
        assert!(html.find("SMALL").unwrap() < html.find("LARGE").unwrap());
    }

    #[test]
    fn cells_render_depth_change_and_placeholders() {
        let depth = DepthMetrics {
            floor_price: 10.0,
            available_2x: 25.0,
            available_5x: 55.0,
            available_10x: 100000.0,
        };
        let html = render_dashboard(
            &state(vec![rune(7, "PUPS", 70_000_000.0, -4.5, Some(depth)), rune(8, "BARE", 1.0, 2.0, None)]),
            100000.0,
        );
        assert!(html.contains("$70.00M"));
        assert!(html.contains("$70,000,000"));
        assert!(html.contains("<td class=\"down\">-4.50%</td>"));
        assert!(html.contains("<td class=\"up\">+2.00%</td>"));
        assert!(html.contains("<td>10 sats</td><td>25</td><td>55</td><td>high</td>"));
        assert!(html.contains("<td>-</td><td>-</td><td>-</td><td>-</td>"));
        assert!(html.contains("placeholder=\"Search runes...\""));
    }
}
