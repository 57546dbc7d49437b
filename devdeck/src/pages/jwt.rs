//! `/jwt`: token analysis and HMAC signature verification.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use hmac::{Hmac, Mac};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use serde_json::Value;
use sha2::{Sha256, Sha384, Sha512};
use viewdeck::{Action, Cleanup, Component, Event, Store};

use crate::field::TextField;
use crate::pages::{persist, PageCx, ISO_UTC};
use crate::ui;

const KEY_TOKEN: &str = "/jwt/token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Validity {
    Valid,
    Expired,
    NoExpiration,
}

impl Validity {
    fn text(self) -> &'static str {
        match self {
            Validity::Valid => "Valid",
            Validity::Expired => "Expired",
            Validity::NoExpiration => "No expiration",
        }
    }

    fn color(self) -> Color {
        match self {
            Validity::Expired => Color::Red,
            _ => Color::Green,
        }
    }
}

#[derive(Debug)]
struct Decoded {
    header: String,
    payload: String,
    alg: String,
    expiration: String,
    validity: Validity,
    hmac_signed: bool,
}

pub struct JwtPage {
    store: Store,
    focus: usize,
    token: TextField,
    /// The verification secret is deliberately never persisted.
    secret: TextField,
    decoded: Option<Decoded>,
    invalid: bool,
    verified: Option<bool>,
}

pub fn mount(cx: &PageCx) -> (Box<dyn Component>, Option<Cleanup>) {
    let mut page = JwtPage {
        store: cx.store.clone(),
        focus: 0,
        token: TextField::textarea("Paste JWT token")
            .with_value(cx.store.get(KEY_TOKEN).unwrap_or_default()),
        secret: TextField::new("Enter secret key"),
        decoded: None,
        invalid: false,
        verified: None,
    };
    page.recompute();
    (Box::new(page), None)
}

impl JwtPage {
    fn recompute(&mut self) {
        let token = self.token.value().trim();
        if token.is_empty() {
            self.decoded = None;
            self.invalid = false;
        } else {
            match decode(token, Utc::now().timestamp()) {
                Some(decoded) => {
                    self.decoded = Some(decoded);
                    self.invalid = false;
                }
                None => {
                    self.decoded = None;
                    self.invalid = true;
                }
            }
        }
        self.recompute_verification();
    }

    fn recompute_verification(&mut self) {
        let token = self.token.value().trim();
        let secret = self.secret.value();
        self.verified = if token.is_empty() || secret.is_empty() {
            None
        } else {
            Some(verify(token, secret))
        };
    }

    fn shows_verification(&self) -> bool {
        self.decoded.as_ref().is_some_and(|d| d.hmac_signed)
    }
}

fn decode_part(part: &str) -> Option<Value> {
    let bytes = URL_SAFE_NO_PAD.decode(part.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn decode(token: &str, now: i64) -> Option<Decoded> {
    let mut parts = token.split('.');
    let header = decode_part(parts.next()?)?;
    let payload = decode_part(parts.next()?)?;

    let alg = header.get("alg").and_then(Value::as_str)?.to_string();
    let exp = payload.get("exp").and_then(Value::as_i64);
    let expiration = exp
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map(|instant| instant.format(ISO_UTC).to_string())
        .unwrap_or_else(|| "Not set".to_string());
    let validity = match exp {
        Some(seconds) if seconds < now => Validity::Expired,
        Some(_) => Validity::Valid,
        None => Validity::NoExpiration,
    };

    Some(Decoded {
        header: serde_json::to_string_pretty(&header).ok()?,
        payload: serde_json::to_string_pretty(&payload).ok()?,
        hmac_signed: alg.starts_with("HS"),
        alg,
        expiration,
        validity,
    })
}

fn hmac_signature(alg: &str, secret: &[u8], message: &[u8]) -> Option<String> {
    let bytes = match alg {
        "HS256" => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        "HS384" => {
            let mut mac =
                Hmac::<Sha384>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        "HS512" => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(secret).expect("hmac accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        _ => return None,
    };
    Some(URL_SAFE_NO_PAD.encode(bytes))
}

/// Recompute the signature over `header.payload` and compare. Only HMAC
/// algorithms are supported; anything else fails verification.
fn verify(token: &str, secret: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return false;
    }
    let Some(header) = decode_part(parts[0]) else {
        return false;
    };
    let Some(alg) = header.get("alg").and_then(Value::as_str) else {
        return false;
    };
    let message = format!("{}.{}", parts[0], parts[1]);
    match hmac_signature(alg, secret.as_bytes(), message.as_bytes()) {
        Some(signature) => signature == parts[2],
        None => false,
    }
}

impl JwtPage {
    fn render_signature_info(&self, frame: &mut Frame<'_>, area: Rect, decoded: &Decoded) {
        let label = |text: &str| {
            Span::styled(
                format!("{text:<12}"),
                Style::default().fg(Color::DarkGray),
            )
        };
        let alg = if decoded.alg.is_empty() {
            "Unknown"
        } else {
            &decoded.alg
        };
        let lines = vec![
            Line::from(vec![
                label("Algorithm:"),
                Span::styled(alg.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                label("Expiration:"),
                Span::styled(
                    decoded.expiration.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                label("Valid:"),
                Span::styled(
                    decoded.validity.text(),
                    Style::default()
                        .fg(decoded.validity.color())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_verification(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        self.secret.render(frame, rows[0], self.focus == 1);

        if let Some(valid) = self.verified {
            let (text, color) = if valid {
                ("Valid signature", Color::Green)
            } else {
                ("Invalid signature", Color::Red)
            };
            let line = Line::from(vec![
                Span::styled(format!("{:<12}", "Status:"), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), rows[1]);
        }
    }
}

impl Component for JwtPage {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let verify_visible = self.shows_verification();
        let mut constraints = vec![
            Constraint::Length(5),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Length(5),
        ];
        if verify_visible {
            constraints.push(Constraint::Length(6));
        }
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let body = ui::card_body(frame, "JWT Token Analysis", chunks[0]);
        self.token.render(frame, body, self.focus == 0);

        if self.invalid {
            let body = ui::card_body(frame, "Signature Info", chunks[1]);
            frame.render_widget(ui::muted("Invalid JWT token"), body);
            return;
        }
        let Some(decoded) = &self.decoded else {
            return;
        };

        let body = ui::card_body(frame, "Header", chunks[1]);
        frame.render_widget(Paragraph::new(decoded.header.as_str()), body);

        let body = ui::card_body(frame, "Payload", chunks[2]);
        frame.render_widget(Paragraph::new(decoded.payload.as_str()), body);

        let body = ui::card_body(frame, "Signature Info", chunks[3]);
        self.render_signature_info(frame, body, decoded);

        if verify_visible {
            let body = ui::card_body(frame, "Verify Signature", chunks[4]);
            self.render_verification(frame, body);
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        let fields = if self.shows_verification() { 2 } else { 1 };
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    self.focus = (self.focus + 1) % fields;
                    None
                }
                _ => {
                    if self.focus == 0 {
                        if self.token.handle_key(key) {
                            persist(&self.store, KEY_TOKEN, self.token.value());
                            self.recompute();
                        }
                    } else if self.secret.handle_key(key) {
                        self.recompute_verification();
                    }
                    None
                }
            },
            Event::Paste(text) => {
                if self.focus == 0 {
                    self.token.insert_str(&text);
                    persist(&self.store, KEY_TOKEN, self.token.value());
                    self.recompute();
                } else {
                    self.secret.insert_str(&text);
                    self.recompute_verification();
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // HS256, payload {"sub":"1234567890","name":"John Doe","iat":1516239022},
    // signed with "secret".
    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        XbPfbIHMI6arZ3Y922BhjWgQzWXcXNrz0ogtVhfEd2o";

    // HS512, payload {"sub":"42","exp":1000000000}, signed with "topsecret".
    const EXPIRED: &str = "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiI0MiIsImV4cCI6MTAwMDAwMDAwMH0.\
        oLSYcNObOS6rhxU5U-av0vKClDWttwtUT9Ppt1Em-_kJlKLlfwroqqh4P6RPt7hum359FGlU7XeB3eXcf35EVg";

    #[test]
    fn decodes_header_and_payload() {
        let decoded = decode(TOKEN, 1_700_000_000).unwrap();
        assert_eq!(decoded.alg, "HS256");
        assert!(decoded.hmac_signed);
        assert!(decoded.header.contains("\"typ\": \"JWT\""));
        assert!(decoded.payload.contains("\"name\": \"John Doe\""));
        assert_eq!(decoded.expiration, "Not set");
        assert_eq!(decoded.validity, Validity::NoExpiration);
    }

    #[test]
    fn expiry_is_checked_against_now() {
        let decoded = decode(EXPIRED, 2_000_000_000).unwrap();
        assert_eq!(decoded.expiration, "2001-09-09T01:46:40.000Z");
        assert_eq!(decoded.validity, Validity::Expired);

        let decoded = decode(EXPIRED, 999_999_999).unwrap();
        assert_eq!(decoded.validity, Validity::Valid);
    }

    #[test]
    fn malformed_tokens_fail_to_decode() {
        assert!(decode("garbage", 0).is_none());
        assert!(decode("a.b", 0).is_none());
        // Header without an alg claim is treated as malformed.
        let headerless = format!(
            "{}.e30.x",
            URL_SAFE_NO_PAD.encode(b"{\"typ\":\"JWT\"}")
        );
        assert!(decode(&headerless, 0).is_none());
    }

    #[test]
    fn verifies_hs256_signatures() {
        assert!(verify(TOKEN, "secret"));
        assert!(!verify(TOKEN, "wrong"));
    }

    #[test]
    fn verifies_hs512_signatures() {
        assert!(verify(EXPIRED, "topsecret"));
        assert!(!verify(EXPIRED, "secret"));
    }

    #[test]
    fn non_hmac_algorithms_fail_verification() {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"RS256\"}");
        let token = format!("{header}.e30.sig");
        assert!(!verify(&token, "secret"));
    }
}
