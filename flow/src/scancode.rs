//! Scannable token payload.
//!
//! The issued token is rendered as a verify link embedded in a QR code at
//! error-correction level H (30% redundancy), leaving room for the small
//! centered brand mark that is punched out of the modules.

use crate::FlowError;
use attest_store::TokenSecret;
use attest_types::RegistrationId;
use qrcode::{Color, EcLevel, QrCode};
use std::fmt;

/// Build the verify link the organizer-side scanner consumes:
/// `<origin>/verify/<registration_id>?token=<token>`.
pub fn verify_url(origin: &str, registration_id: &RegistrationId, token: &TokenSecret) -> String {
    format!(
        "{}/verify/{}?token={}",
        origin.trim_end_matches('/'),
        registration_id,
        token.as_str()
    )
}

/// What a renderer should draw at one module position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanModule {
    Dark,
    Light,
    /// Part of the centered brand-mark punch. The code's level-H error
    /// correction absorbs this occlusion.
    BrandMark,
}

/// A rendered scan code: the verify link plus its module matrix.
pub struct ScanCode {
    url: String,
    width: usize,
    dark: Vec<bool>,
    punch_origin: usize,
    punch_side: usize,
}

// The verify link embeds the bearer token, so Debug skips it, matching
// the redaction on the token itself.
impl fmt::Debug for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanCode")
            .field("width", &self.width)
            .field("punch_side", &self.punch_side)
            .finish_non_exhaustive()
    }
}

impl ScanCode {
    /// Fraction of the code's side length the brand-mark punch may span.
    /// A quarter of the side is ~6% of the modules, well inside the 30%
    /// damage budget of level H.
    const PUNCH_FRACTION: usize = 4;

    pub fn render(
        origin: &str,
        registration_id: &RegistrationId,
        token: &TokenSecret,
    ) -> Result<Self, FlowError> {
        let url = verify_url(origin, registration_id, token);
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
            .map_err(|e| FlowError::ScanCode(e.to_string()))?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        let punch_side = (width / Self::PUNCH_FRACTION).max(1);
        let punch_origin = (width - punch_side) / 2;

        Ok(Self {
            url,
            width,
            dark,
            punch_origin,
            punch_side,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Side length of the module matrix.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Side length of the centered brand-mark punch, in modules.
    pub fn punch_side(&self) -> usize {
        self.punch_side
    }

    fn is_punched(&self, x: usize, y: usize) -> bool {
        let range = self.punch_origin..self.punch_origin + self.punch_side;
        range.contains(&x) && range.contains(&y)
    }

    /// The module at `(x, y)`, with the brand-mark punch applied.
    pub fn module(&self, x: usize, y: usize) -> ScanModule {
        if self.is_punched(x, y) {
            ScanModule::BrandMark
        } else if self.dark[y * self.width + x] {
            ScanModule::Dark
        } else {
            ScanModule::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> TokenSecret {
        TokenSecret::from_hex(&"ab".repeat(16)).unwrap()
    }

    #[test]
    fn verify_url_shape() {
        let url = verify_url(
            "https://attest.example.org/",
            &RegistrationId::new("r42"),
            &token(),
        );
        assert_eq!(
            url,
            format!("https://attest.example.org/verify/r42?token={}", "ab".repeat(16))
        );
    }

    #[test]
    fn render_produces_a_square_matrix() {
        let code = ScanCode::render(
            "https://attest.example.org",
            &RegistrationId::new("r1"),
            &token(),
        )
        .unwrap();
        assert!(code.width() > 0);
        assert!(code.url().starts_with("https://attest.example.org/verify/r1?token="));
    }

    #[test]
    fn punch_is_centered_and_bounded() {
        let code = ScanCode::render(
            "https://attest.example.org",
            &RegistrationId::new("r1"),
            &token(),
        )
        .unwrap();
        let width = code.width();
        let side = code.punch_side();
        assert!(side >= 1);
        assert!(side <= width / 4 + 1, "punch must stay inside the EC budget");

        // Center module is punched, corners are not (finder patterns
        // must stay intact).
        let mid = width / 2;
        assert_eq!(code.module(mid, mid), ScanModule::BrandMark);
        assert_ne!(code.module(0, 0), ScanModule::BrandMark);
        assert_ne!(code.module(width - 1, width - 1), ScanModule::BrandMark);
    }

    #[test]
    fn debug_output_does_not_leak_the_token() {
        let code = ScanCode::render(
            "https://attest.example.org",
            &RegistrationId::new("r1"),
            &token(),
        )
        .unwrap();
        let debug = format!("{code:?}");
        assert!(!debug.contains(&"ab".repeat(16)));
        assert!(!debug.contains("verify"));
    }

    #[test]
    fn punched_area_stays_within_the_damage_budget() {
        let code = ScanCode::render(
            "https://attest.example.org",
            &RegistrationId::new("r1"),
            &token(),
        )
        .unwrap();
        let total = code.width() * code.width();
        let punched = code.punch_side() * code.punch_side();
        // Level H tolerates ~30% damage; stay an order of magnitude under.
        assert!(punched * 10 < total * 3, "{punched} of {total} modules punched");
    }
}
