use super::fields::normalize_text;

/// Rating value on the ratings-site profile page
pub const RATING_XPATH: &str = concat!(
    r#"//div[contains(@class, "relative flex flex-col gap-0.5 overflow-clip")]"#,
    r#"//div[contains(@class, "text-lg font-semibold leading-none")]"#
);

/// Bolded value next to the "Expiration Dt." label on the membership page
pub const EXPIRATION_XPATH: &str = r#"//tr[td[contains(text(), "Expiration Dt.")]]/td/b"#;

/// Node text as shown (a rating keeps its separator, e.g. `2,104`); blank means absent
pub fn node_text(text: Option<String>) -> Option<String> {
    normalize_text(&text?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_text() {
        assert_eq!(node_text(Some(" 2,104\n".into())).as_deref(), Some("2,104"));
        assert_eq!(node_text(Some("2026-05-31 ".into())).as_deref(), Some("2026-05-31"));
        assert_eq!(node_text(Some("   ".into())), None);
        assert_eq!(node_text(None), None);
    }
}
