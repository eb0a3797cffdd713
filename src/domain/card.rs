use crate::error::{PaymentError, Result};

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 16;

/// Card details as typed on the payment form, validated and normalized.
#[derive(Clone, PartialEq)]
pub struct CardDetails {
    cardholder: String,
    number: String,
    expiry: String,
    cvv: String,
}

impl CardDetails {
    pub fn new(cardholder: &str, number: &str, expiry: &str, cvv: &str) -> Result<Self> {
        let cardholder = cardholder.trim();
        let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
        let expiry = expiry.trim();
        let cvv = cvv.trim();

        if cardholder.is_empty() || number.is_empty() || expiry.is_empty() || cvv.is_empty() {
            return Err(PaymentError::InvalidCard(
                "Please fill in all fields".to_string(),
            ));
        }

        if !number.chars().all(|c| c.is_ascii_digit())
            || !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&number.len())
        {
            return Err(PaymentError::InvalidCard(format!(
                "Card number must be {MIN_CARD_DIGITS} to {MAX_CARD_DIGITS} digits"
            )));
        }

        let expiry = normalize_expiry(expiry).ok_or_else(|| {
            PaymentError::InvalidCard("Expiry must be a valid MM/YY date".to_string())
        })?;

        if !cvv.chars().all(|c| c.is_ascii_digit()) || !(3..=4).contains(&cvv.len()) {
            return Err(PaymentError::InvalidCard(
                "CVV must be 3 or 4 digits".to_string(),
            ));
        }

        Ok(Self {
            cardholder: cardholder.to_string(),
            number,
            expiry,
            cvv: cvv.to_string(),
        })
    }

    /// Card number with whitespace stripped.
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn last_four(&self) -> &str {
        &self.number[self.number.len() - 4..]
    }

    /// Card number with every digit but the last four hidden, grouped by four.
    pub fn masked(&self) -> String {
        let hidden = self.number.len() - 4;
        let digits: String = self
            .number
            .chars()
            .enumerate()
            .map(|(i, c)| if i < hidden { '*' } else { c })
            .collect();
        format_card_number(&digits)
    }
}

// Keep the number and CVV out of logs and panics.
impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("cardholder", &self.cardholder)
            .field("number", &self.masked())
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Groups the non-whitespace characters of `raw` in blocks of four.
pub fn format_card_number(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    chars
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_expiry(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| *c != '/').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = digits[..2].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{}/{}", &digits[..2], &digits[2..]))
}
