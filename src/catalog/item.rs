//! Item records, filters and partial updates.

use serde::{Deserialize, Serialize};

/// Longest name accepted by an update.
pub const MAX_NAME_LEN: usize = 8;

/// Category an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tools,
    Consumables,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tools => "tools",
            Category::Consumables => "consumables",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tools" => Ok(Category::Tools),
            "consumables" => Ok(Category::Consumables),
            other => Err(format!(
                "unknown category '{}', expected one of: tools, consumables",
                other
            )),
        }
    }
}

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Name of the item.
    pub name: String,

    /// Price of the item in Euro.
    pub price: f64,

    /// Amount of instances of this item in stock.
    pub count: i64,

    /// Unique integer that identifies this item.
    pub id: i64,

    /// Category this item belongs to.
    pub category: Category,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, price: f64, count: i64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            count,
            id,
            category,
        }
    }
}

/// Equality filter over item fields.
///
/// Absent fields match everything, so the default query selects every item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemQuery {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub count: Option<i64>,
    pub category: Option<Category>,
}

impl ItemQuery {
    /// Returns true if every present field equals the item's field.
    pub fn matches(&self, item: &Item) -> bool {
        self.name.as_ref().map_or(true, |name| *name == item.name)
            && self.price.map_or(true, |price| price == item.price)
            && self.count.map_or(true, |count| count == item.count)
            && self.category.map_or(true, |category| category == item.category)
    }
}

/// Partial update applied to a stored item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub count: Option<i64>,
}

/// A field that failed a constraint check.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.count.is_none()
    }

    /// Check field constraints, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(name) = &self.name {
            let len = name.chars().count();
            if len == 0 {
                errors.push(FieldError::new("name", "must contain at least 1 character"));
            } else if len > MAX_NAME_LEN {
                errors.push(FieldError::new(
                    "name",
                    format!("must contain at most {} characters", MAX_NAME_LEN),
                ));
            }
        }

        if let Some(price) = self.price {
            // Non-finite prices would serialize as null
            if !(price.is_finite() && price > 0.0) {
                errors.push(FieldError::new("price", "must be a finite number greater than 0"));
            }
        }

        if let Some(count) = self.count {
            if count < 0 {
                errors.push(FieldError::new("count", "must be greater than or equal to 0"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Overwrite every field present in the patch.
    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(count) = self.count {
            item.count = count;
        }
    }
}
