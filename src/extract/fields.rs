use scraper::{ElementRef, Selector};

/// Trimmed text of the first match of `selector` under `parent`
pub fn text_of(parent: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = parent.select(selector).next()?;
    normalize_text(&element.text().collect::<String>())
}

/// Collapse runs of whitespace; `None` for blank text
pub fn normalize_text(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// A rating badge value: only a plain run of digits counts
pub fn parse_rating_text(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Member id from a profile link such as `/player/12345678`
pub fn member_id_from_href(href: &str) -> Option<String> {
    let (_, tail) = href.rsplit_once("/player/")?;
    let id = tail
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_digit_runs_convert() {
        for value in [0u32, 7, 100, 1850, 2799] {
            assert_eq!(parse_rating_text(&value.to_string()), Some(value));
        }
        assert_eq!(parse_rating_text(" 1432 "), Some(1432));
        assert_eq!(parse_rating_text("0099"), Some(99));
    }

    #[test]
    fn test_non_digits_are_absent() {
        for text in ["", "  ", "Unr.", "1500P", "1,850", "-5", "12.5", "１２"] {
            assert_eq!(parse_rating_text(text), None, "{text:?}");
        }
        assert_eq!(parse_rating_text("99999999999999"), None);
    }

    #[test]
    fn test_member_id_from_links() {
        assert_eq!(member_id_from_href("/player/12345678").as_deref(), Some("12345678"));
        assert_eq!(
            member_id_from_href("https://beta-ratings.uschess.org/player/30012345/").as_deref(),
            Some("30012345")
        );
        assert_eq!(member_id_from_href("/player/123?tab=games").as_deref(), Some("123"));
        assert_eq!(member_id_from_href("/player/"), None);
        assert_eq!(member_id_from_href("/events/1"), None);
    }

    #[test]
    fn test_text_of_missing_and_present() {
        let html = Html::parse_fragment(r#"<div class="card"><span class="name">  Jane
            Doe </span><span class="empty"> </span></div>"#);
        let root = html.root_element();

        let name = Selector::parse(".name").unwrap();
        let empty = Selector::parse(".empty").unwrap();
        let missing = Selector::parse(".missing").unwrap();

        assert_eq!(text_of(root, &name).as_deref(), Some("Jane Doe"));
        assert_eq!(text_of(root, &empty), None);
        assert_eq!(text_of(root, &missing), None);
    }
}
