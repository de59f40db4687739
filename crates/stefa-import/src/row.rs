//! Row parser: raw spreadsheet/CSV rows to [`BookRecord`] candidates.
//!
//! Header matching is case-insensitive against a fixed alias list per field
//! (Ukrainian/Russian/English spellings). Missing required text fields fall
//! back to placeholders embedding the row ordinal; malformed rows are
//! defaulted, not rejected.

use stefa_core::{placeholder_title, BookRecord, UNKNOWN_AUTHOR};

const TITLE_ALIASES: &[&str] = &["назва", "название", "title", "книга"];
const AUTHOR_ALIASES: &[&str] = &["автор", "авторы", "автори", "author"];
const ISBN_ALIASES: &[&str] = &["isbn", "ісбн"];
const DESCRIPTION_ALIASES: &[&str] = &["опис", "описание", "description"];
const COVER_ALIASES: &[&str] = &["обкладинка", "обложка", "cover", "cover_url", "фото"];
const CATEGORY_ALIASES: &[&str] = &["категорія", "категория", "category", "жанр"];
const AVAILABLE_ALIASES: &[&str] = &["доступна", "чи доступна", "available", "наличие"];
const QTY_TOTAL_ALIASES: &[&str] = &["кількість", "количество", "quantity", "qty_total"];
const QTY_AVAILABLE_ALIASES: &[&str] = &["доступно", "в наявності", "qty_available"];
const PRICE_ALIASES: &[&str] = &["ціна", "цена", "price", "price_uah", "вартість"];

/// Cell values accepted as "available". Anything else, including an absent
/// column, is false.
const TRUTHY: &[&str] = &["так", "да", "yes", "true", "1", "+"];

/// Parse a whole table into records. Output length always equals
/// `table rows` length (defaulting, never rejection).
#[must_use]
pub fn parse_table(headers: &[String], rows: &[Vec<String>]) -> Vec<BookRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_row(headers, row, index))
        .collect()
}

/// Parse one value row against the header row into a [`BookRecord`] candidate.
///
/// `row_index` is 0-based; placeholders embed the 1-based ordinal. The
/// returned record has an empty `code` and an unresolved `category_id`;
/// those are assigned by later pipeline stages.
#[must_use]
pub fn parse_row(headers: &[String], row: &[String], row_index: usize) -> BookRecord {
    let field = |aliases: &[&str]| -> Option<String> {
        find_column(headers, aliases)
            .and_then(|idx| row.get(idx))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
    };

    let ordinal = row_index + 1;
    let title = field(TITLE_ALIASES).unwrap_or_else(|| placeholder_title(ordinal));
    let author = field(AUTHOR_ALIASES).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let qty_total = field(QTY_TOTAL_ALIASES)
        .as_deref()
        .map_or(1, |raw| parse_integer(raw, 1));
    let qty_available = field(QTY_AVAILABLE_ALIASES)
        .as_deref()
        .map_or(1, |raw| parse_integer(raw, 1));
    let price_uah = field(PRICE_ALIASES)
        .as_deref()
        .map_or(0.0, |raw| parse_price(raw, 0.0));

    BookRecord {
        title,
        author,
        isbn: field(ISBN_ALIASES),
        description: field(DESCRIPTION_ALIASES),
        cover_url: field(COVER_ALIASES),
        category_raw: field(CATEGORY_ALIASES).unwrap_or_default(),
        category_id: None,
        available: field(AVAILABLE_ALIASES)
            .as_deref()
            .is_some_and(parse_available),
        code: String::new(),
        qty_total,
        qty_available,
        price_uah,
    }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_lowercase();
        aliases.contains(&normalized.as_str())
    })
}

/// Tolerant integer parse: accepts plain integers and floats (truncated).
/// Falls back to `default` on any failure; no sign validation.
fn parse_integer(raw: &str, default: i32) -> i32 {
    let cleaned = raw.trim().replace(',', ".");
    cleaned
        .parse::<i32>()
        .ok()
        .or_else(|| cleaned.parse::<f64>().ok().map(|v| v as i32))
        .unwrap_or(default)
}

/// Tolerant price parse: accepts a decimal comma ("120,50") as well as a
/// decimal point. Falls back to `default` on failure.
fn parse_price(raw: &str, default: f64) -> f64 {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .unwrap_or(default)
}

fn parse_available(raw: &str) -> bool {
    TRUTHY.contains(&raw.trim().to_lowercase().as_str())
}
