/// App names whose notifications carry a leading source-link paragraph
pub const CHROMIUM_BROWSERS: &[&str] = &[
    "brave",
    "chrome",
    "chromium",
    "vivaldi",
    "opera",
    "microsoft edge",
];

const PARAGRAPH_BREAK: &str = "\n\n";

/// Strip the `<a href=...>` source paragraph Chromium-based browsers put in
/// front of web notifications. Other bodies come back unchanged, line breaks
/// included.
pub fn clean_notification_body(body: Option<&str>, app_name: Option<&str>) -> String {
    let body = match body {
        Some(body) if !body.is_empty() => body,
        _ => return String::new(),
    };

    if app_name.is_some_and(is_chromium_browser) {
        let paragraphs: Vec<&str> = body.split(PARAGRAPH_BREAK).collect();
        if paragraphs.len() > 1 && paragraphs[0].starts_with("<a") {
            return paragraphs[1..].join(PARAGRAPH_BREAK);
        }
    }

    body.to_string()
}

fn is_chromium_browser(app_name: &str) -> bool {
    let app = app_name.to_lowercase();
    CHROMIUM_BROWSERS.iter().any(|name| app.contains(name))
}
