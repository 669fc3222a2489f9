use crate::core::Locale;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Marker shown for unavailable values.
pub const UNAVAILABLE: &str = "—";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Static copy for the live widgets.
pub struct Labels {
    pub fx_title: &'static str,
    pub fx_source: &'static str,
    pub fixed_conversion: &'static str,
    pub rates_unavailable: &'static str,
    pub futures_title: &'static str,
    pub futures_unavailable: &'static str,
    pub updated_daily: &'static str,
    pub live: &'static str,
    pub snapshot: &'static str,
    pub commodity: &'static str,
    pub contract: &'static str,
    pub last: &'static str,
    pub change: &'static str,
}

const EN_LABELS: Labels = Labels {
    fx_title: "FX reference rates",
    fx_source: "Updated daily (ECB)",
    fixed_conversion: "Fixed conversion: 1 EUR = 1.95583 BGN",
    rates_unavailable: "Rates unavailable",
    futures_title: "Grain futures",
    futures_unavailable: "Futures data unavailable",
    updated_daily: "Updated daily",
    live: "live",
    snapshot: "snapshot",
    commodity: "Commodity",
    contract: "Contract",
    last: "Last",
    change: "Change",
};

const BG_LABELS: Labels = Labels {
    fx_title: "Референтни FX курсове",
    fx_source: "Обновява се ежедневно (ECB)",
    fixed_conversion: "Фиксирана конверсия: 1 EUR = 1.95583 BGN",
    rates_unavailable: "Курсовете са недостъпни",
    futures_title: "Зърнени фючърси",
    futures_unavailable: "Данните за фючърси са недостъпни",
    updated_daily: "Обновява се ежедневно",
    live: "на живо",
    snapshot: "архивни",
    commodity: "Стока",
    contract: "Контракт",
    last: "Последна",
    change: "Промяна",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::En => &EN_LABELS,
            Locale::Bg => &BG_LABELS,
        }
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned numeric cell; `None` is shown dimmed as unavailable.
pub fn number_cell(value: Option<f64>, format_fn: impl Fn(f64) -> String) -> Cell {
    value.map_or(
        Cell::new(UNAVAILABLE)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Change cell colored by the sign of `tone`.
pub fn change_cell(text: String, tone: Option<f64>) -> Cell {
    let cell = Cell::new(text).set_alignment(CellAlignment::Right);
    match tone {
        Some(v) if v > 0.0 => cell.fg(Color::Green),
        Some(v) if v < 0.0 => cell.fg(Color::Red),
        _ => cell.fg(Color::DarkGrey),
    }
}

/// Price with thousands separators and two decimals.
pub fn format_price(value: Option<f64>) -> String {
    let Some(value) = value else {
        return UNAVAILABLE.to_string();
    };
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Signed change with two decimals; positive values get a `+`.
pub fn format_change(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{v:.2}"),
        Some(v) => format!("{v:.2}"),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(_) => format!("{}%", format_change(value)),
        None => UNAVAILABLE.to_string(),
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(progress_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}
