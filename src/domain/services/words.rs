//! English numeral expansion for invoice totals.

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "zero", "ten", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// Index 0 is 1000^1.
const SCALES: [&str; 6] = [
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spells an amount as `"{rupees} Rupees"` or
/// `"{rupees} Rupees and {paisa} paisa"`.
///
/// The amount is rounded to whole paisa first, so `F` is always in `0..100`.
/// Callers keep amounts within `MonetaryAmount::parse` limits; beyond them
/// the paise no longer convert exactly.
pub fn amount_to_words(amount: f64) -> String {
    if amount < 0.0 {
        return format!("negative {}", amount_to_words(amount.abs()));
    }

    let total_paisa = (amount * 100.0).round() as u64;
    let rupees = total_paisa / 100;
    let paisa = total_paisa % 100;

    if paisa > 0 {
        format!("{} Rupees and {} paisa", number_to_words(rupees), number_to_words(paisa))
    } else {
        format!("{} Rupees", number_to_words(rupees))
    }
}

/// `0` is `"zero"`; every other value is spelled without a trailing zero
/// part, so `1000` is `"one thousand"`.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    spell(n)
}

fn spell(n: u64) -> String {
    let words = match n {
        0 => String::new(),
        1..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{}-{}", tens, ONES[ones as usize]),
            }
        }
        100..=999 => format!("{} hundred {}", spell(n / 100), spell(n % 100)),
        _ => {
            let (power, scale) = scale_of(n);
            format!("{} {} {}", spell(n / scale), SCALES[power - 1], spell(n % scale))
        }
    };
    collapse_spaces(&words)
}

/// Largest `1000^k <= n` together with `k`.
fn scale_of(n: u64) -> (usize, u64) {
    let mut power = 0;
    let mut scale = 1u64;
    while let Some(next) = scale.checked_mul(1000) {
        if next > n {
            break;
        }
        scale = next;
        power += 1;
    }
    (power, scale)
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts() {
        assert_eq!(amount_to_words(0.0), "zero Rupees");
        assert_eq!(amount_to_words(1.0), "one Rupees");
        assert_eq!(amount_to_words(15.0), "fifteen Rupees");
        assert_eq!(amount_to_words(21.0), "twenty-one Rupees");
        assert_eq!(amount_to_words(40.0), "forty Rupees");
        assert_eq!(amount_to_words(100.0), "one hundred Rupees");
    }

    #[test]
    fn test_amount_with_paisa() {
        assert_eq!(
            amount_to_words(1234.50),
            "one thousand two hundred thirty-four Rupees and fifty paisa"
        );
        assert_eq!(amount_to_words(0.05), "zero Rupees and five paisa");
        assert_eq!(amount_to_words(10.999), "eleven Rupees");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(amount_to_words(-21.0), "negative twenty-one Rupees");
    }

    #[test]
    fn test_round_scales_have_no_trailing_parts() {
        assert_eq!(number_to_words(1000), "one thousand");
        assert_eq!(number_to_words(1_000_000), "one million");
        assert_eq!(number_to_words(2_000_001), "two million one");
        assert_eq!(number_to_words(110), "one hundred ten");
    }

    #[test]
    fn test_large_numbers() {
        assert_eq!(
            number_to_words(123_456_789),
            "one hundred twenty-three million four hundred fifty-six thousand seven hundred eighty-nine"
        );
        assert_eq!(number_to_words(1_000_000_000_000_000), "one quadrillion");
        assert!(number_to_words(u64::MAX).starts_with("eighteen quintillion"));
    }
}
