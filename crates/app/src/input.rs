//! Loading store rows from local files.
//!
//! Expenses come as CSV (`paid_by,amount[,note]`, decimal amounts) or as a
//! JSON array of store rows. Profiles, items and events are JSON.

use std::{fs::File, io::Read, path::Path};

use api_types::{event::EventRow, expense::ExpenseRow, item::ItemRow, profile::ProfileRow};
use engine::{Category, Item, ItemStatus, MoneyCents, ParticipantId, ProfileDirectory};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// One expense read from disk, before it reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub event_id: Option<Uuid>,
    pub payer: String,
    pub amount: MoneyCents,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpenseLine {
    paid_by: String,
    amount: String,
    #[serde(default)]
    note: Option<String>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_expenses(path: &Path) -> Result<Vec<ExpenseInput>> {
    let file = File::open(path)?;
    if is_json(path) {
        parse_expenses_json(file)
    } else {
        parse_expenses_csv(file)
    }
}

pub fn parse_expenses_csv<R: Read>(reader: R) -> Result<Vec<ExpenseInput>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for (idx, line) in reader.deserialize::<ExpenseLine>().enumerate() {
        let line = line?;
        let amount = line
            .amount
            .parse::<MoneyCents>()
            .map_err(|err| AppError::Input(format!("line {}: {err}", idx + 2)))?;
        expenses.push(ExpenseInput {
            event_id: None,
            payer: line.paid_by,
            amount,
            note: line.note,
        });
    }
    Ok(expenses)
}

pub fn parse_expenses_json<R: Read>(reader: R) -> Result<Vec<ExpenseInput>> {
    let rows: Vec<ExpenseRow> = serde_json::from_reader(reader)?;
    rows.into_iter().map(expense_from_row).collect()
}

fn expense_from_row(row: ExpenseRow) -> Result<ExpenseInput> {
    Ok(ExpenseInput {
        event_id: row.event_id,
        payer: row.paid_by,
        amount: MoneyCents::from_major(row.amount)?,
        note: row.note,
    })
}

pub fn load_profiles(path: &Path) -> Result<ProfileDirectory> {
    let rows: Vec<ProfileRow> = serde_json::from_reader(File::open(path)?)?;
    Ok(profiles_from_rows(&rows))
}

pub fn profiles_from_rows(rows: &[ProfileRow]) -> ProfileDirectory {
    rows.iter()
        .map(|row| (ParticipantId::from(row.id.as_str()), row.display_name.as_deref()))
        .collect()
}

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let rows: Vec<ItemRow> = serde_json::from_reader(File::open(path)?)?;
    rows.into_iter().map(item_from_row).collect()
}

pub fn item_from_row(row: ItemRow) -> Result<Item> {
    Ok(Item {
        id: row.id,
        name: row.name,
        category: Category::from_store(&row.category),
        qty: row.qty,
        unit: row.unit,
        assigned_to: row.assigned_to.map(ParticipantId::from),
        status: ItemStatus::try_from(row.status.as_str())?,
        created_by: ParticipantId::from(row.created_by),
    })
}

pub fn load_event(path: &Path) -> Result<EventRow> {
    Ok(serde_json::from_reader(File::open(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_with_optional_note() {
        let data = "paid_by,amount,note\nana,300,Carne\nbeto, 100.5 \ncarla,\"1,25\",Hielo\n";
        let expenses = parse_expenses_csv(data.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].amount, MoneyCents::new(300_00));
        assert_eq!(expenses[0].note.as_deref(), Some("Carne"));
        assert_eq!(expenses[1].amount, MoneyCents::new(100_50));
        assert_eq!(expenses[1].note, None);
        assert_eq!(expenses[2].amount, MoneyCents::new(1_25));
    }

    #[test]
    fn csv_reports_bad_line() {
        let data = "paid_by,amount\nana,12.345\n";
        let err = parse_expenses_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn reads_store_rows_as_json() {
        let data = r#"[
            {"event_id":"7d5e3c1a-52b8-4a63-9d0e-2f7d8c1b9a10","paid_by":"u1","amount":166.666},
            {"paid_by":"u2","amount":0.1}
        ]"#;
        let expenses = parse_expenses_json(data.as_bytes()).unwrap();
        assert_eq!(expenses[0].amount, MoneyCents::new(166_67));
        assert!(expenses[0].event_id.is_some());
        assert_eq!(expenses[1].amount, MoneyCents::new(10));
        assert!(expenses[1].event_id.is_none());
    }

    #[test]
    fn item_rows_map_unknown_categories_to_extras() {
        let row = ItemRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Pastel".to_string(),
            category: "Postres".to_string(),
            qty: None,
            unit: None,
            assigned_to: None,
            status: "bought".to_string(),
            created_by: "u1".to_string(),
            created_at: chrono::Utc::now(),
        };
        let item = item_from_row(row).unwrap();
        assert_eq!(item.category, Category::Extras);
        assert_eq!(item.status, ItemStatus::Bought);
    }
}
