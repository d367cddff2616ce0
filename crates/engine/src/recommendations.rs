//! Suggested purchase quantities for an event, scaled by head count.

use serde::{Deserialize, Serialize};

use crate::round_to_cents;

/// Consumption weight of a minor relative to an adult.
pub const MINOR_WEIGHT: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecUnit {
    Kg,
    Pz,
    L,
}

impl RecUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecUnit::Kg => "kg",
            RecUnit::Pz => "pz",
            RecUnit::L => "l",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: RecUnit,
    /// Recommended quantity, rounded to two decimals.
    pub target: f64,
}

impl Recommendation {
    pub fn formatted_target(&self) -> String {
        format_amount(self.target, self.unit)
    }
}

struct PerPerson {
    key: &'static str,
    label: &'static str,
    unit: RecUnit,
    per_person: f64,
}

const TABLE: [PerPerson; 8] = [
    PerPerson { key: "carne", label: "Carne", unit: RecUnit::Kg, per_person: 0.35 },
    PerPerson { key: "tortillas", label: "Tortillas", unit: RecUnit::Pz, per_person: 4.0 },
    PerPerson { key: "salsa", label: "Salsa", unit: RecUnit::L, per_person: 0.06 },
    PerPerson { key: "frijoles", label: "Frijoles", unit: RecUnit::Kg, per_person: 0.12 },
    PerPerson { key: "carbon", label: "Carbón", unit: RecUnit::Kg, per_person: 0.18 },
    PerPerson { key: "platos", label: "Platos", unit: RecUnit::Pz, per_person: 1.2 },
    PerPerson { key: "vasos", label: "Vasos", unit: RecUnit::Pz, per_person: 2.0 },
    PerPerson { key: "hielo", label: "Hielo", unit: RecUnit::Kg, per_person: 0.25 },
];

/// Number of adult-equivalent people: each minor counts as [`MINOR_WEIGHT`].
#[must_use]
pub fn equivalent_people(adults: u32, minors: u32) -> f64 {
    f64::from(adults) + f64::from(minors) * MINOR_WEIGHT
}

/// One recommendation per table entry, in table order.
pub fn build_recommendations(adults: u32, minors: u32) -> Vec<Recommendation> {
    let people = equivalent_people(adults, minors);
    TABLE
        .iter()
        .map(|row| Recommendation {
            key: row.key,
            label: row.label,
            unit: row.unit,
            target: round_to_cents(people * row.per_person),
        })
        .collect()
}

/// Pieces are shown as whole numbers, everything else with two decimals.
pub fn format_amount(value: f64, unit: RecUnit) -> String {
    match unit {
        RecUnit::Pz => format!("{}", value.round()),
        RecUnit::Kg | RecUnit::L => format!("{value:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(recs: &[Recommendation], key: &str) -> f64 {
        recs.iter()
            .find(|r| r.key == key)
            .map(|r| r.target)
            .unwrap()
    }

    #[test]
    fn scales_with_adults_and_minors() {
        let recs = build_recommendations(10, 5);
        assert_eq!(recs.len(), 8);
        // 10 + 5 * 0.6 = 13 people
        assert_eq!(target(&recs, "carne"), 4.55);
        assert_eq!(target(&recs, "tortillas"), 52.0);
        assert_eq!(target(&recs, "salsa"), 0.78);
        assert_eq!(target(&recs, "platos"), 15.6);
    }

    #[test]
    fn no_people_means_nothing_to_buy() {
        assert!(build_recommendations(0, 0).iter().all(|r| r.target == 0.0));
    }

    #[test]
    fn pieces_are_whole_numbers() {
        assert_eq!(format_amount(15.6, RecUnit::Pz), "16");
        assert_eq!(format_amount(4.55, RecUnit::Kg), "4.55");
        assert_eq!(format_amount(0.7, RecUnit::L), "0.70");
    }
}
