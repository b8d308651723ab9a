// HTML page
// Full document rendered on every request from the table and the criteria

use crate::filter::Criteria;
use crate::record::{Table, ALL};
use crate::render::{render, Card, Rendered, NO_RESULTS};

const STYLE: &str = include_str!("../web/style.css");

/// Render the finder page for the given criteria.
pub fn render_page(table: &Table, criteria: &Criteria) -> String {
    let mut html = String::with_capacity(8192);

    open_document(&mut html);

    html.push_str("<form class=\"filters\" method=\"get\" action=\"/\">\n");
    push_select(
        &mut html,
        "country",
        "🌎 Choose Country",
        &table.country_options(),
        criteria.country.as_deref(),
    );
    push_select(
        &mut html,
        "field",
        "📘 Choose Field",
        &table.field_options(),
        criteria.field.as_deref(),
    );

    html.push_str("<div class=\"wide\">\n<label for=\"search\">🔎 Search by University Name or City</label>\n");
    html.push_str("<input type=\"text\" id=\"search\" name=\"search\" value=\"");
    html.push_str(&escape_html(criteria.search.as_deref().unwrap_or("")));
    html.push_str("\">\n</div>\n</form>\n");

    html.push_str("<h2>📚 Available Universities</h2>\n");

    match render(table, criteria) {
        Rendered::Cards(cards) => {
            for card in &cards {
                push_card(&mut html, card);
            }
        }
        Rendered::NoResults => push_notice(&mut html, "warning", NO_RESULTS),
    }

    close_document(&mut html);
    html
}

/// Page shell carrying only the load error; no data is rendered.
pub fn render_error_page(message: &str) -> String {
    let mut html = String::with_capacity(4096);

    open_document(&mut html);
    push_notice(&mut html, "error", message);
    close_document(&mut html);

    html
}

fn open_document(html: &mut String) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Education Finder</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str("<div class=\"title\">🎓 Education Finder</div>\n");
    html.push_str("<div class=\"subtitle\">Discover top universities worldwide based on your interests 🌍</div>\n");
}

fn close_document(html: &mut String) {
    html.push_str("<footer>Made with ❤️ in Rust</footer>\n");
    html.push_str("</body>\n</html>\n");
}

fn push_select(html: &mut String, name: &str, label: &str, options: &[String], selected: Option<&str>) {
    let selected = selected.filter(|s| !s.is_empty()).unwrap_or(ALL);

    html.push_str("<div>\n<label for=\"");
    html.push_str(name);
    html.push_str("\">");
    html.push_str(label);
    html.push_str("</label>\n<select id=\"");
    html.push_str(name);
    html.push_str("\" name=\"");
    html.push_str(name);
    html.push_str("\" onchange=\"this.form.submit()\">\n");

    // Case-insensitive like the country filter; only the first hit is marked
    let mut marked = false;

    for option in options {
        let value = escape_html(option);
        html.push_str("<option value=\"");
        html.push_str(&value);
        html.push('"');
        if !marked && option.to_lowercase() == selected.to_lowercase() {
            html.push_str(" selected");
            marked = true;
        }
        html.push('>');
        html.push_str(&value);
        html.push_str("</option>\n");
    }

    html.push_str("</select>\n</div>\n");
}

fn push_card(html: &mut String, card: &Card) {
    html.push_str("<div class=\"card\">\n<h3>");
    html.push_str(&escape_html(&card.name));
    html.push_str("</h3>\n");

    html.push_str("<p><b>📍 Location:</b> <a href=\"/?country=");
    html.push_str(&escape_html(&urlencoding::encode(&card.country)));
    html.push_str("\">");
    html.push_str(&escape_html(&card.location));
    html.push_str("</a></p>\n");

    html.push_str("<p><b>📘 Fields:</b> ");
    html.push_str(&escape_html(&card.fields));
    html.push_str("</p>\n");

    html.push_str("<p><a href=\"");
    html.push_str(&escape_html(&card.website));
    html.push_str("\" target=\"_blank\" rel=\"noopener\">🌐 Visit Website</a></p>\n</div>\n");
}

fn push_notice(html: &mut String, kind: &str, message: &str) {
    html.push_str("<div class=\"notice ");
    html.push_str(kind);
    html.push_str("\">");
    html.push_str(&escape_html(message));
    html.push_str("</div>\n");
}

/// Minimal HTML escaping for text and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UniversityRecord;

    fn sample() -> Table {
        Table::new(vec![
            UniversityRecord::new("MIT", "USA", "Cambridge", "https://mit.edu", "Computer Science|Physics"),
            UniversityRecord::new("Oxford", "United Kingdom", "Oxford", "https://ox.ac.uk", "Law"),
        ])
    }

    #[test]
    fn test_page_lists_cards() {
        let html = render_page(&sample(), &Criteria::new());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("<div class=\"card\">").count(), 2);
        assert!(html.contains("<h3>MIT</h3>"));
        assert!(html.contains("Cambridge, USA"));
        assert!(html.contains("href=\"https://mit.edu\" target=\"_blank\""));
        assert!(!html.contains(NO_RESULTS));
    }

    #[test]
    fn test_page_shows_notice_when_empty() {
        let html = render_page(&sample(), &Criteria::new().with_search("sorbonne"));

        assert!(html.contains(NO_RESULTS));
        assert!(!html.contains("<div class=\"card\">"));
    }

    #[test]
    fn test_dropdowns_seeded_and_preselected() {
        let html = render_page(&sample(), &Criteria::new().with_country("USA"));

        assert!(html.contains("<option value=\"All\">All</option>"));
        assert!(html.contains("<option value=\"USA\" selected>USA</option>"));
        assert!(html.contains("<option value=\"Physics\">Physics</option>"));
        assert!(html.contains("<option value=\"All\" selected>All</option>"));
    }

    #[test]
    fn test_preselection_ignores_case() {
        let html = render_page(&sample(), &Criteria::new().with_country("united kingdom"));

        assert_eq!(html.matches("<div class=\"card\">").count(), 1);
        assert!(html.contains("<option value=\"United Kingdom\" selected>United Kingdom</option>"));
        assert_eq!(html.matches(" selected>").count(), 2);
        assert!(html.contains("<option value=\"All\">All</option>"));
    }

    #[test]
    fn test_location_links_to_country_filter() {
        let html = render_page(&sample(), &Criteria::new());
        assert!(html.contains("href=\"/?country=United%20Kingdom\""));
    }

    #[test]
    fn test_values_are_escaped() {
        let table = Table::new(vec![UniversityRecord::new(
            "<script>alert(1)</script>",
            "X",
            "Y",
            "\" onmouseover=\"x",
            "",
        )]);
        let html = render_page(&table, &Criteria::new().with_search("<script>"));

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("href=\"&quot; onmouseover=&quot;x\""));
        assert!(html.contains("value=\"&lt;script&gt;\""));
    }

    #[test]
    fn test_error_page_has_no_data() {
        let html = render_error_page("⚠️ Error parsing CSV: CSV is empty");

        assert!(html.contains("notice error"));
        assert!(html.contains("CSV is empty"));
        assert!(!html.contains("<form"));
    }
}
