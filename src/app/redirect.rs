//! Voice navigation: decide whether a query should take the visitor to another page

/// Lowercase substring to page path, checked in order
pub const KEYWORD_REDIRECTS: &[(&str, &str)] = &[
    ("mba", "/mba"),
    ("mca", "/mca"),
    ("btech", "/btech"),
    ("b.tech", "/btech"),
    ("bba", "/bba"),
    ("bca", "/bca"),
    ("scholarship", "/scholarship"),
    ("admission", "/admission"),
    ("placement", "/placement"),
    ("hostel", "/hostel"),
    ("fee", "/fees"),
    ("contact", "/contact"),
];

/// First table entry whose keyword occurs in `text`
pub fn keyword_match(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    KEYWORD_REDIRECTS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, path)| *path)
}

/// Server hint first, then the keyword table; nothing at all while voice navigation is off
pub fn resolve_redirect(
    server_hint: Option<&str>,
    text: &str,
    voice_nav_enabled: bool,
) -> Option<String> {
    if !voice_nav_enabled {
        return None;
    }

    match server_hint.map(str::trim).filter(|hint| !hint.is_empty()) {
        Some(hint) => Some(hint.to_string()),
        None => keyword_match(text).map(str::to_string),
    }
}
