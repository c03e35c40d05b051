//! Money type for currency amounts
//!
//! Amounts are stored as whole cents in an i64, which keeps ledger folds
//! exact; there is no floating point anywhere in the balance math.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole dollars
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// A zero amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount from a string
    ///
    /// Accepts "125.00", "-125.00", "$125.00", "125" (dollars), "125.5".
    /// Fractions beyond two digits are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let cents = match s.split_once('.') {
            Some((dollars, frac)) => {
                let dollars: i64 = dollars.parse().map_err(|_| invalid())?;
                // A sign inside the fraction would parse but mean nonsense
                if !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let frac_cents: i64 = match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => frac
                        .get(..2)
                        .ok_or_else(invalid)?
                        .parse()
                        .map_err(|_| invalid())?,
                };
                dollars * 100 + frac_cents
            }
            None => s.parse::<i64>().map_err(|_| invalid())? * 100,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a custom currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let cents = self.0.abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, cents / 100, cents % 100)
    }

    /// The amount spelled out for a check face, e.g. "one hundred twenty-five and 00/100"
    pub fn to_written_words(&self) -> String {
        let cents = self.0.abs();
        let dollars = cents / 100;
        format!("{} and {:02}/100", spell_number(dollars), cents % 100)
    }
}

/// Spell a non-negative integer in English words (check-face convention)
fn spell_number(n: i64) -> String {
    const ONES: [&str; 20] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen",
    ];
    const TENS: [&str; 10] = [
        "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];

    fn under_thousand(n: i64, out: &mut Vec<String>) {
        if n >= 100 {
            out.push(format!("{} hundred", ONES[(n / 100) as usize]));
        }
        let rem = n % 100;
        if rem >= 20 {
            let tens = TENS[(rem / 10) as usize];
            if rem % 10 != 0 {
                out.push(format!("{}-{}", tens, ONES[(rem % 10) as usize]));
            } else {
                out.push(tens.to_string());
            }
        } else if rem > 0 {
            out.push(ONES[rem as usize].to_string());
        }
    }

    if n == 0 {
        return "zero".to_string();
    }

    let mut parts = Vec::new();
    let groups = [(1_000_000_000, "billion"), (1_000_000, "million"), (1_000, "thousand")];
    let mut n = n;
    for (scale, label) in groups {
        if n >= scale {
            let mut group = Vec::new();
            under_thousand(n / scale, &mut group);
            parts.push(format!("{} {}", group.join(" "), label));
            n %= scale;
        }
    }
    under_thousand(n, &mut parts);
    parts.join(" ")
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_dollars() {
        assert_eq!(Money::from_cents(1050).cents(), 1050);
        assert_eq!(Money::from_dollars(10).cents(), 1000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);

        let mut c = a;
        c -= b;
        assert_eq!(c.cents(), 500);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("125.00").unwrap().cents(), 12500);
        assert_eq!(Money::parse("$125.00").unwrap().cents(), 12500);
        assert_eq!(Money::parse("-125.00").unwrap().cents(), -12500);
        assert_eq!(Money::parse("125").unwrap().cents(), 12500);
        assert_eq!(Money::parse("125.5").unwrap().cents(), 12550);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert!(Money::parse("abc").is_err());
    }

    #[test]
    fn test_parse_rejects_signed_fraction() {
        assert!(Money::parse("1.-5").is_err());
        assert!(Money::parse("1.+5").is_err());
        assert!(Money::parse("1.5-").is_err());
        assert!(Money::parse("1.-50").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].iter().map(|&c| Money::from_cents(c)).sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_written_words() {
        assert_eq!(
            Money::from_cents(12500).to_written_words(),
            "one hundred twenty-five and 00/100"
        );
        assert_eq!(Money::from_cents(50).to_written_words(), "zero and 50/100");
        assert_eq!(
            Money::from_cents(200107).to_written_words(),
            "two thousand one and 07/100"
        );
    }
}
