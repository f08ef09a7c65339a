use crate::catalog::BookDetails;

const MISSING: &str = "N/A";

fn or_missing(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string())
}

fn join_or_missing(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

/// Format the detail block printed after a selection.
pub fn render_details(details: &BookDetails) -> String {
    let lines = [
        String::new(),
        "--- Book Details ---".to_string(),
        format!("Title: {}", details.title),
        format!("Authors: {}", join_or_missing(&details.authors)),
        format!("Publisher: {}", or_missing(details.publisher.as_deref())),
        format!("Published Date: {}", or_missing(details.published_date.as_deref())),
        format!("Page Count: {}", or_missing(details.page_count)),
        format!("Categories: {}", join_or_missing(&details.categories)),
        format!("Language: {}", or_missing(details.language.as_deref())),
        format!("Preview Link: {}", or_missing(details.preview_link.as_deref())),
        format!("Description: {}", or_missing(details.description.as_deref())),
        "--------------------".to_string(),
        String::new(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_render_full_record() {
        let details = fixtures::google_book("A1", "Dune", "Frank Herbert");
        let text = render_details(&details);

        assert!(text.starts_with("\n--- Book Details ---\nTitle: Dune\n"));
        assert!(text.contains("Authors: Frank Herbert\n"));
        assert!(text.contains("Page Count: 412\n"));
        assert!(text.contains("Categories: Fiction\n"));
        assert!(text.ends_with("--------------------\n"));
    }

    #[test]
    fn test_render_missing_fields_as_na() {
        let mut details = fixtures::openlibrary_book("OL1W", "Dune", "Frank Herbert");
        details.description = None;
        details.categories.clear();

        let text = render_details(&details);
        assert!(text.contains("Publisher: N/A\n"));
        assert!(text.contains("Page Count: N/A\n"));
        assert!(text.contains("Categories: N/A\n"));
        assert!(text.contains("Description: N/A\n"));
    }
}
