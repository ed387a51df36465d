use serde::{de, Deserialize, Deserializer, Serialize};

use super::Row;

/// One configured prize.
///
/// A prize with `stock == 0` still shows up as a wheel segment but is never
/// drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRecord {
    pub name: String,
    /// Relative selection likelihood.
    #[serde(default = "default_weight", alias = "chance", deserialize_with = "count")]
    pub weight: u32,
    /// Units remaining.
    #[serde(default, deserialize_with = "count")]
    pub stock: u32,
}

fn default_weight() -> u32 {
    1
}

/// Sheet cells often hold numbers as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u32),
    Text(String),
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("not a count: {:?}", text))),
    }
}

impl PrizeRecord {
    pub fn new(name: impl Into<String>, weight: u32, stock: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            stock,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Take one unit. Returns `false` and leaves the record untouched when
    /// the stock is already zero.
    pub fn take_one(&mut self) -> bool {
        match self.stock.checked_sub(1) {
            Some(remaining) => {
                self.stock = remaining;
                true
            }
            None => false,
        }
    }

    /// Return a unit taken by [`take_one`](Self::take_one) for a redemption
    /// that did not commit.
    pub fn put_back(&mut self) {
        self.stock = self.stock.saturating_add(1);
    }
}

impl Row for PrizeRecord {
    const TABLE: &'static str = "prizes";

    fn key(&self) -> &str {
        &self.name
    }
}
