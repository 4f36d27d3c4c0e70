//! Input validation and normalization for lead submissions.
//!
//! Contact numbers are judged and reformatted against a single local market:
//! ten-digit mobile numbers starting with 6–9 get the `+91` country code.
//! Anything else with 10–15 digits is accepted as an international number.

use crate::error::ValidationError;
use crate::types::SubmissionInput;

/// Country calling code applied to local numbers.
pub const LOCAL_COUNTRY_CODE: &str = "91";

/// Length of a local mobile number without country code.
const LOCAL_NUMBER_LEN: usize = 10;

/// Accepted digit counts for international numbers.
const INTERNATIONAL_LEN: std::ops::RangeInclusive<usize> = 10..=15;

/// Minimum pain point length, in characters, after trimming.
pub const PAIN_POINT_MIN_CHARS: usize = 20;

/// Maximum pain point length, in characters, after trimming.
pub const PAIN_POINT_MAX_CHARS: usize = 300;

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn is_local_mobile(digits: &str) -> bool {
    digits.len() == LOCAL_NUMBER_LEN && matches!(digits.as_bytes().first(), Some(b'6'..=b'9'))
}

/// Check whether `raw` looks like a reachable contact number.
///
/// Non-digits are ignored. Exactly ten digits must form a local mobile number;
/// other lengths pass when they fall within 10–15 digits.
#[must_use]
pub fn validate_contact_number(raw: &str) -> bool {
    let digits = digits_only(raw);
    if digits.len() == LOCAL_NUMBER_LEN {
        return is_local_mobile(&digits);
    }
    INTERNATIONAL_LEN.contains(&digits.len())
}

/// Reformat a contact number into international `+<digits>` form.
///
/// Rules, first match wins:
/// 1. local mobile number → `+91` prefix
/// 2. twelve digits already starting with `91` → `+` prefix
/// 3. input already starts with `+` → returned unchanged
/// 4. anything else → `+91` prefix on the bare digits
///
/// Rule 4 assumes the local market even for foreign numbers typed without a
/// leading `+`.
#[must_use]
pub fn format_contact_number(raw: &str) -> String {
    let digits = digits_only(raw);

    if is_local_mobile(&digits) {
        return format!("+{LOCAL_COUNTRY_CODE}{digits}");
    }

    if digits.len() == LOCAL_NUMBER_LEN + LOCAL_COUNTRY_CODE.len()
        && digits.starts_with(LOCAL_COUNTRY_CODE)
    {
        return format!("+{digits}");
    }

    if raw.starts_with('+') {
        return raw.to_owned();
    }

    format!("+{LOCAL_COUNTRY_CODE}{digits}")
}

/// Trim surrounding whitespace and drop every `<` and `>`.
///
/// This only removes the characters needed to open a tag; it is not an HTML
/// sanitizer.
#[must_use]
pub fn sanitize_text(s: &str) -> String {
    s.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

impl SubmissionInput {
    /// Apply the form rules that must hold before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking contact number,
    /// domain, pain point and consent in that order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.contact_number.trim().is_empty() {
            return Err(ValidationError::MissingContactNumber);
        }
        if !validate_contact_number(&self.contact_number) {
            return Err(ValidationError::InvalidContactNumber);
        }

        if sanitize_text(&self.domain).is_empty() {
            return Err(ValidationError::MissingDomain);
        }

        let len = self.pain_point.trim().chars().count();
        if len == 0 {
            return Err(ValidationError::MissingPainPoint);
        }
        if len < PAIN_POINT_MIN_CHARS {
            return Err(ValidationError::PainPointTooShort {
                len,
                min: PAIN_POINT_MIN_CHARS,
            });
        }
        if len > PAIN_POINT_MAX_CHARS {
            return Err(ValidationError::PainPointTooLong {
                len,
                max: PAIN_POINT_MAX_CHARS,
            });
        }

        if !self.marketing_consent {
            return Err(ValidationError::ConsentRequired);
        }

        Ok(())
    }
}
