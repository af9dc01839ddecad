use anyhow::{Result, anyhow};
use log::{info, warn};
use scraper::{ElementRef, Html, Node, Selector};

use super::fields::{member_id_from_href, normalize_text, parse_rating_text, text_of};
use crate::domain::{PlayerRecord, RatingCategory, Ratings};

pub const CARD_SELECTOR: &str = ".search-card-player";
const EXPIRATION_LABEL: &str = "Exp:";

/// Reads player records out of fuzzy-search result cards
pub struct CardParser {
    card: Selector,
    name: Selector,
    link: Selector,
    state: Selector,
    badge: Selector,
    badge_code: Selector,
    badge_value: Selector,
    span: Selector,
}

impl CardParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            card: selector(CARD_SELECTOR)?,
            name: selector(".font-names span")?,
            link: selector("a[href*='/player/']")?,
            state: selector(".font-sans")?,
            badge: selector(".w-13")?,
            badge_code: selector(".font-condensed")?,
            badge_value: selector(".font-mono")?,
            span: selector("span")?,
        })
    }

    /// Parse up to `max_results` cards from a page snapshot.
    ///
    /// Cards without a name or profile link are skipped.
    pub fn parse(&self, html: &str, max_results: usize) -> Vec<PlayerRecord> {
        let document = Html::parse_document(html);
        let cards: Vec<_> = document.select(&self.card).collect();
        info!("Found {} search result cards", cards.len());

        cards
            .into_iter()
            .take(max_results)
            .enumerate()
            .filter_map(|(idx, card)| match self.parse_card(card) {
                Some(record) => {
                    info!(
                        "Parsed player: {} (ID: {}, Rating: {:?})",
                        record.name,
                        record.member_id,
                        record.ratings.primary()
                    );
                    Some(record)
                }
                None => {
                    warn!("Skipping card {}: missing name or profile link", idx + 1);
                    None
                }
            })
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<PlayerRecord> {
        let name = text_of(card, &self.name)?;
        let member_id = card
            .select(&self.link)
            .filter_map(|link| link.value().attr("href"))
            .find_map(member_id_from_href)?;

        Some(PlayerRecord {
            name,
            member_id,
            ratings: self.ratings(card),
            state: text_of(card, &self.state),
            expiration_date: self.expiration(card),
        })
    }

    fn ratings(&self, card: ElementRef<'_>) -> Ratings {
        let mut ratings = Ratings::default();

        for badge in card.select(&self.badge) {
            let Some(code) = text_of(badge, &self.badge_code) else {
                warn!("Rating badge without a type code");
                continue;
            };
            let Some(category) = RatingCategory::from_code(&code) else {
                warn!("Unknown rating badge type '{}'", code);
                continue;
            };
            let value = text_of(badge, &self.badge_value)
                .as_deref()
                .and_then(parse_rating_text);
            ratings.set(category, value);
        }

        ratings
    }

    fn expiration(&self, card: ElementRef<'_>) -> Option<String> {
        let span = card.select(&self.span).find(|span| own_text(*span).contains(EXPIRATION_LABEL))?;
        let text = span.text().collect::<String>();
        normalize_text(&text.replace(EXPIRATION_LABEL, ""))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector {}: {}", css, e))
}

/// Text of direct child text nodes only
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(t) => Some(&**t),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, id: &str, state: Option<&str>, badges: &[(&str, &str)], exp: Option<&str>) -> String {
        let state = state
            .map(|s| format!(r#"<span class="font-sans text-sm">{s}</span>"#))
            .unwrap_or_default();
        let badges: String = badges
            .iter()
            .map(|(code, value)| {
                format!(
                    r#"<div class="w-13 flex"><span class="font-condensed">{code}</span><span class="font-mono">{value}</span></div>"#
                )
            })
            .collect();
        let exp = exp
            .map(|e| format!(r#"<span class="text-xs">Exp: {e}</span>"#))
            .unwrap_or_default();

        format!(
            r#"<div class="search-card-player rounded">
                 <a href="/player/{id}"><div class="font-names"><span>{name}</span></div></a>
                 {state}<div class="badges">{badges}</div>{exp}
               </div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", cards.concat())
    }

    #[test]
    fn test_full_card() {
        let parser = CardParser::new().unwrap();
        let html = page(&[card(
            "John Smith",
            "12345678",
            Some("NY"),
            &[("R", "1850"), ("Q", "1790"), ("OB", "1602"), ("B", "Unr.")],
            Some("2026-03-31"),
        )]);

        let players = parser.parse(&html, 10);
        assert_eq!(players.len(), 1);

        let player = &players[0];
        assert_eq!(player.name, "John Smith");
        assert_eq!(player.member_id, "12345678");
        assert_eq!(player.state.as_deref(), Some("NY"));
        assert_eq!(player.expiration_date.as_deref(), Some("2026-03-31"));
        assert_eq!(player.ratings.regular, Some(1850));
        assert_eq!(player.ratings.quick, Some(1790));
        assert_eq!(player.ratings.blitz, None);
        assert_eq!(player.ratings.online_blitz, Some(1602));
        assert_eq!(player.ratings.primary(), Some(1850));
    }

    #[test]
    fn test_optional_fields_absent() {
        let parser = CardParser::new().unwrap();
        let html = page(&[card("Ann Smith", "30000001", None, &[("Q", "1201")], None)]);

        let player = &parser.parse(&html, 10)[0];
        assert_eq!(player.state, None);
        assert_eq!(player.expiration_date, None);
        assert_eq!(player.ratings.primary(), Some(1201));
    }

    #[test]
    fn test_max_results_caps_output() {
        let parser = CardParser::new().unwrap();
        let cards: Vec<String> = (0..15)
            .map(|i| card(&format!("Smith {i}"), &format!("1000{i:04}"), Some("TX"), &[("R", "1500")], None))
            .collect();

        let players = parser.parse(&page(&cards), 10);
        assert_eq!(players.len(), 10);
        assert_eq!(players[9].name, "Smith 9");

        assert!(parser.parse(&page(&cards), 0).is_empty());
    }

    #[test]
    fn test_card_without_link_is_skipped() {
        let parser = CardParser::new().unwrap();
        let broken = r#"<div class="search-card-player"><div class="font-names"><span>No Link</span></div></div>"#;
        let html = page(&[broken.to_string(), card("Kept", "42", None, &[], None)]);

        let players = parser.parse(&html, 10);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Kept");
        assert_eq!(players[0].ratings, Ratings::default());
    }

    #[test]
    fn test_no_cards() {
        let parser = CardParser::new().unwrap();
        assert!(parser.parse("<html><body><p>No players found</p></body></html>", 10).is_empty());
    }
}
