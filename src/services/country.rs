//! Country resolution for imported leads.
//!
//! Spreadsheets exported from lead scrapers carry either an English country
//! name or a two-letter code. Deals are grouped by the CRM's own country names.

/// Map a lowercased name or code to the CRM display name
pub fn canonical_country(key: &str) -> Option<&'static str> {
    let name = match key {
        "russian federation" | "russia" | "ru" => "Россия",
        "kazakhstan" | "kz" => "Казахстан",
        "belarus" | "belarussian" | "by" => "Беларусь",
        "uzbekistan" | "uz" => "Узбекистан",
        "ukraine" | "ua" => "Украина",
        "armenia" | "am" => "Армения",
        "georgia" | "ge" => "Грузия",
        "azerbaijan" | "az" => "Азербайджан",
        "kyrgyzstan" | "kyrgyz" | "kg" => "Киргизия",
        "tajikistan" | "tj" => "Таджикистан",
        "turkmenistan" | "tm" => "Туркменистан",
        _ => return None,
    };
    Some(name)
}

/// Resolve free-text country input.
///
/// Returns the canonical name when known, the lowercased input otherwise,
/// and `None` for blank input.
pub fn resolve_country(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    Some(canonical_country(&key).map(str::to_string).unwrap_or(key))
}
