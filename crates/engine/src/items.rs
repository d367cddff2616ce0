//! Shared shopping checklist: categories, item status cycle and grouping.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ParticipantId, ResultEngine,
    util::{normalize_display, normalize_key},
};

/// Checklist category. The declaration order is the display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Carne,
    Bebidas,
    Salsas,
    Desechables,
    Hielos,
    #[serde(rename = "Carbón")]
    Carbon,
    Extras,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Carne,
        Category::Bebidas,
        Category::Salsas,
        Category::Desechables,
        Category::Hielos,
        Category::Carbon,
        Category::Extras,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Carne => "Carne",
            Category::Bebidas => "Bebidas",
            Category::Salsas => "Salsas",
            Category::Desechables => "Desechables",
            Category::Hielos => "Hielos",
            Category::Carbon => "Carbón",
            Category::Extras => "Extras",
        }
    }

    /// Lenient parse for rows coming from the store: unknown or blank
    /// categories land in `Extras` instead of being dropped.
    #[must_use]
    pub fn from_store(value: &str) -> Self {
        value.parse().unwrap_or(Category::Extras)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    /// Accent and case insensitive: `"carbon"` parses as [`Category::Carbon`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s)
            .ok_or_else(|| EngineError::InvalidName("empty category".to_string()))?;
        Category::ALL
            .into_iter()
            .find(|category| normalize_key(category.label()).as_deref() == Some(key.as_str()))
            .ok_or_else(|| EngineError::InvalidName(format!("unknown category: {}", s.trim())))
    }
}

/// Purchase state of a checklist item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Bought,
    Delivered,
}

impl ItemStatus {
    /// Next state when the item is toggled; `Delivered` wraps to `Pending`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            ItemStatus::Pending => ItemStatus::Bought,
            ItemStatus::Bought => ItemStatus::Delivered,
            ItemStatus::Delivered => ItemStatus::Pending,
        }
    }

    /// Canonical status string used by the backing store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Bought => "bought",
            ItemStatus::Delivered => "delivered",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pendiente",
            ItemStatus::Bought => "Comprado",
            ItemStatus::Delivered => "Listo",
        }
    }
}

impl TryFrom<&str> for ItemStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "bought" => Ok(ItemStatus::Bought),
            "delivered" => Ok(ItemStatus::Delivered),
            other => Err(EngineError::InvalidName(format!(
                "unknown item status: {other}"
            ))),
        }
    }
}

/// Validated input for a new checklist entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub qty: Option<f64>,
    pub unit: Option<String>,
}

impl NewItem {
    pub fn new(
        name: &str,
        category: Category,
        qty: Option<f64>,
        unit: Option<&str>,
    ) -> ResultEngine<Self> {
        let name = normalize_display(name)
            .ok_or_else(|| EngineError::InvalidName("item name must not be empty".to_string()))?;
        if let Some(qty) = qty
            && !(qty.is_finite() && qty > 0.0)
        {
            return Err(EngineError::InvalidAmount(format!(
                "quantity for '{name}' must be > 0"
            )));
        }
        Ok(Self {
            name,
            category,
            qty,
            unit: unit.and_then(normalize_display),
        })
    }

    /// Turns the input into a stored item, always starting as pending.
    pub fn into_item(self, id: Uuid, created_by: ParticipantId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            qty: self.qty,
            unit: self.unit,
            assigned_to: None,
            status: ItemStatus::Pending,
            created_by,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub assigned_to: Option<ParticipantId>,
    pub status: ItemStatus,
    pub created_by: ParticipantId,
}

impl Item {
    pub fn toggle(&mut self) {
        self.status = self.status.next();
    }
}

/// Groups items by category in display order, skipping empty categories.
/// Items keep their relative order inside a group.
pub fn group_by_category(items: &[Item]) -> Vec<(Category, Vec<&Item>)> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let group: Vec<&Item> = items.iter().filter(|it| it.category == category).collect();
            (!group.is_empty()).then_some((category, group))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: Category) -> Item {
        NewItem::new(name, category, None, None)
            .unwrap()
            .into_item(Uuid::new_v4(), "owner".into())
    }

    #[test]
    fn status_cycles_back_to_pending() {
        let mut it = item("Tortillas", Category::Extras);
        assert_eq!(it.status, ItemStatus::Pending);
        it.toggle();
        assert_eq!(it.status, ItemStatus::Bought);
        it.toggle();
        assert_eq!(it.status, ItemStatus::Delivered);
        assert_eq!(it.status.label(), "Listo");
        it.toggle();
        assert_eq!(it.status, ItemStatus::Pending);
    }

    #[test]
    fn category_parse_ignores_accents() {
        assert_eq!("carbon".parse::<Category>().unwrap(), Category::Carbon);
        assert_eq!(" CARBÓN ".parse::<Category>().unwrap(), Category::Carbon);
        assert_eq!("hielos".parse::<Category>().unwrap(), Category::Hielos);
        assert!("postres".parse::<Category>().is_err());
        assert_eq!(Category::from_store("postres"), Category::Extras);
    }

    #[test]
    fn new_item_validates_input() {
        assert!(NewItem::new("   ", Category::Carne, None, None).is_err());
        assert!(NewItem::new("Arrachera", Category::Carne, Some(0.0), None).is_err());
        assert!(NewItem::new("Arrachera", Category::Carne, Some(f64::NAN), None).is_err());
        let new = NewItem::new("  Arrachera  ", Category::Carne, Some(2.5), Some(" kg ")).unwrap();
        assert_eq!(new.name, "Arrachera");
        assert_eq!(new.unit.as_deref(), Some("kg"));
    }

    #[test]
    fn groups_follow_category_order() {
        let items = vec![
            item("Hielo", Category::Hielos),
            item("Arrachera", Category::Carne),
            item("Bolsa", Category::Hielos),
        ];
        let groups = group_by_category(&items);
        let order: Vec<Category> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, [Category::Carne, Category::Hielos]);
        let names: Vec<&str> = groups[1].1.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, ["Hielo", "Bolsa"]);
    }

    #[test]
    fn status_round_trips_store_strings() {
        for status in [ItemStatus::Pending, ItemStatus::Bought, ItemStatus::Delivered] {
            assert_eq!(ItemStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(ItemStatus::try_from("lost").is_err());
    }
}
