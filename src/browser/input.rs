use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::element::Element;
use chromiumoxide::keys::get_key_definition;

use crate::errors::ScrapeError;

/// How text reaches a focused input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingMode {
    /// One key event per character, like a user typing
    KeyPresses,
    /// A single text insertion; for characters with no key on the keyboard layout
    InsertText,
}

pub fn typing_mode(text: &str) -> TypingMode {
    if text.chars().all(|c| get_key_definition(c.to_string()).is_some()) {
        TypingMode::KeyPresses
    } else {
        TypingMode::InsertText
    }
}

/// Focus `element` and enter `text` into it.
///
/// Key events go to whatever has focus, so the element is focused first.
pub async fn fill_input(page: &Page, element: &Element, text: &str) -> Result<(), ScrapeError> {
    element
        .focus()
        .await
        .map_err(|e| ScrapeError::browser("focusing input", e))?;

    match typing_mode(text) {
        TypingMode::KeyPresses => {
            element
                .type_str(text)
                .await
                .map_err(|e| ScrapeError::browser("typing text", e))?;
        }
        TypingMode::InsertText => {
            page.execute(InsertTextParams::new(text))
                .await
                .map_err(|e| ScrapeError::browser("inserting text", e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_typed_key_by_key() {
        assert_eq!(typing_mode("Chugh"), TypingMode::KeyPresses);
        assert_eq!(typing_mode("Van Der Berg-Smith"), TypingMode::KeyPresses);
        assert_eq!(typing_mode(""), TypingMode::KeyPresses);
    }

    #[test]
    fn test_accented_names_are_inserted() {
        assert_eq!(typing_mode("José Martínez"), TypingMode::InsertText);
        assert_eq!(typing_mode("Müller"), TypingMode::InsertText);
    }
}
