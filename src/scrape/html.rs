//! Extraction of the front-month row from a futures price page.
//!
//! Two shapes are understood: the rendered quotes table, where columns are
//! located by header text, and the `data-symbol` attribute that carries the
//! same quote as HTML-encoded JSON.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid html pattern")
}

static TABLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<table\b[^>]*>(.*?)</table>"));
static THEAD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<thead\b[^>]*>(.*?)</thead>"));
static TBODY: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<tbody\b[^>]*>(.*?)</tbody>"));
static ROW: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<tr\b[^>]*>(.*?)</tr>"));
static HEADER_CELL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<th\b[^>]*>(.*?)</th>"));
static DATA_CELL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<td\b[^>]*>(.*?)</td>"));
static TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)<[^>]*>"));
static DATA_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"data-symbol=(?:'([^']+)'|"([^"]+)")"#));

/// Raw text of the contract, last, change and percent cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRow {
    pub contract: String,
    pub last: String,
    pub change: String,
    pub percent: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedQuote {
    symbol: Option<Value>,
    contract_name: Option<Value>,
    last_price: Option<Value>,
    price_change: Option<Value>,
    percent_change: Option<Value>,
}

pub fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn cell_text(inner: &str) -> String {
    let stripped = TAG.replace_all(inner, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn cells(re: &Regex, html: &str) -> Vec<String> {
    re.captures_iter(html).map(|c| cell_text(&c[1])).collect()
}

fn find_column(headers: &[String], accept: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|h| accept(h.as_str()))
}

fn is_percent_header(header: &str) -> bool {
    header.contains('%') || header.contains("percent")
}

/// Reads the second body row of the first table that has one. The first
/// body row is the nearby/cash line; the second is the front month.
pub fn parse_quote_table(html: &str) -> Option<ContractRow> {
    TABLE.captures_iter(html).find_map(|table| {
        let table = &table[1];
        let head = THEAD
            .captures(table)
            .and_then(|c| c.get(1))
            .map_or(table, |m| m.as_str());
        let headers: Vec<String> = cells(&HEADER_CELL, head)
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect();

        let body = TBODY.captures(table).and_then(|c| c.get(1))?.as_str();
        let row = ROW.captures_iter(body).nth(1)?;
        let values = cells(&DATA_CELL, &row[1]);
        if values.is_empty() {
            return None;
        }

        let contract_idx = find_column(&headers, |h| h.contains("contract") || h.contains("symbol"));
        let last_idx = find_column(&headers, |h| h.contains("last"));
        let change_idx = find_column(&headers, |h| {
            (h.contains("change") || h.contains("chg")) && !is_percent_header(h)
        });
        let percent_idx = find_column(&headers, is_percent_header);

        let at = |idx: Option<usize>| {
            idx.and_then(|i| values.get(i))
                .cloned()
                .unwrap_or_default()
        };

        Some(ContractRow {
            contract: values.get(contract_idx.unwrap_or(0)).cloned().unwrap_or_default(),
            last: at(last_idx),
            change: at(change_idx),
            percent: at(percent_idx),
        })
    })
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => decode_entities(s.trim()),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Reads the quote embedded in the page's `data-symbol` attribute.
pub fn parse_data_symbol(html: &str) -> Option<ContractRow> {
    let caps = DATA_SYMBOL.captures(html)?;
    let encoded = caps.get(1).or_else(|| caps.get(2))?.as_str();

    let payload: EmbeddedQuote = serde_json::from_str(encoded)
        .or_else(|_| serde_json::from_str(&decode_entities(encoded)))
        .ok()?;

    let contract = format!(
        "{} ({})",
        value_text(payload.contract_name.as_ref()),
        value_text(payload.symbol.as_ref())
    )
    .trim()
    .to_string();

    Some(ContractRow {
        contract,
        last: value_text(payload.last_price.as_ref()),
        change: value_text(payload.price_change.as_ref()),
        percent: value_text(payload.percent_change.as_ref()),
    })
}

/// Table first, then the embedded attribute.
pub fn extract_contract_row(html: &str) -> Option<ContractRow> {
    parse_quote_table(html).or_else(|| parse_data_symbol(html))
}
