//! Row normalization for spreadsheet imports.
//!
//! Every function here is best-effort: a row that lacks its required field
//! is dropped (`None`), never reported as an error.

use uuid::Uuid;

use super::country::resolve_country;
use super::spreadsheet::{first_filled, Cell, SheetRow};
use crate::types::{ClientStatus, NewClient, NewInstagramAccount};

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 50;
pub const COMPANY_MAX: usize = 255;
pub const USERNAME_MAX: usize = 255;
pub const USER_LINK_MAX: usize = 500;
pub const FULL_NAME_MAX: usize = 500;
pub const COUNTRY_MAX: usize = 255;

// Source columns, highest priority first
const NAME_COLUMNS: &[&str] = &["name", "name_for_emails", "query"];
const PHONE_COLUMNS: &[&str] = &["phone"];
const COMPANY_COLUMNS: &[&str] = &["name", "city", "address"];
const EMAIL_COLUMNS: &[&str] = &["email", "website"];
const COUNTRY_COLUMNS: &[&str] = &["country", "country_code"];
const USERNAME_COLUMNS: &[&str] = &["username", "Username"];
const USER_LINK_COLUMNS: &[&str] = &["user_link", "link"];
const FULL_NAME_COLUMNS: &[&str] = &["full_name", "name"];

/// Hint returned when a client spreadsheet yields nothing
pub const CLIENT_COLUMNS_HINT: &str =
    "В файле нет подходящих записей. Ожидаются колонки: name, phone, address, city, website.";

/// Hint returned when a lead account spreadsheet yields nothing
pub const ACCOUNT_COLUMNS_HINT: &str =
    "Нет записей. Ожидаются колонки: username, user_link, full_name, is_private, is_verified.";

/// A client row that passed normalization, with the country of its opening deal
#[derive(Debug, Clone, PartialEq)]
pub struct ClientImportItem {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub country: String,
}

impl ClientImportItem {
    /// Client record with a fresh id, ready for insertion
    pub fn to_new_client(&self) -> NewClient {
        NewClient {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            status: ClientStatus::Active,
        }
    }
}

/// Normalize a client row. Rows whose name is missing, non-textual or blank
/// after trimming are skipped. A row without a country gets `default_country`.
pub fn normalize_client_row(row: &SheetRow, default_country: &str) -> Option<ClientImportItem> {
    let name = first_filled(row, NAME_COLUMNS)?.as_text()?.trim();
    if name.is_empty() {
        return None;
    }

    Some(ClientImportItem {
        name: truncate(name, NAME_MAX),
        email: optional_text(row, EMAIL_COLUMNS, EMAIL_MAX),
        phone: optional_text(row, PHONE_COLUMNS, PHONE_MAX),
        company: optional_text(row, COMPANY_COLUMNS, COMPANY_MAX),
        country: row_country(row).unwrap_or_else(|| default_country.to_string()),
    })
}

/// Country of a client row, resolved through the country table.
/// Unmapped values pass through, cut to `COUNTRY_MAX` characters.
pub fn row_country(row: &SheetRow) -> Option<String> {
    let raw = first_filled(row, COUNTRY_COLUMNS)?.to_text();
    resolve_country(&raw).map(|country| truncate(&country, COUNTRY_MAX))
}

/// Normalize a lead account row. Rows without a textual username are skipped.
pub fn normalize_account_row(row: &SheetRow) -> Option<NewInstagramAccount> {
    let username = first_filled(row, USERNAME_COLUMNS)?.as_text()?.trim();
    if username.is_empty() {
        return None;
    }

    Some(NewInstagramAccount {
        username: truncate(username, USERNAME_MAX),
        user_link: optional_text(row, USER_LINK_COLUMNS, USER_LINK_MAX),
        full_name: optional_text(row, FULL_NAME_COLUMNS, FULL_NAME_MAX),
        is_private: row.get("is_private").is_some_and(parse_flag),
        is_verified: row.get("is_verified").is_some_and(parse_flag),
    })
}

/// Boolean-like spreadsheet value: `true`, `1`, `да`, `yes`, `истина`
/// in any case count as true, everything else as false.
pub fn parse_flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Number(n) => *n == 1.0,
        Cell::Text(s) => is_truthy_word(s),
        Cell::Empty => false,
    }
}

fn is_truthy_word(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "1" | "да" | "yes" | "истина"
    )
}

fn optional_text(row: &SheetRow, columns: &[&str], max: usize) -> Option<String> {
    let text = first_filled(row, columns)?.to_text();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(truncate(text, max))
    }
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
