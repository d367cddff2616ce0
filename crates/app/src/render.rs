//! Presentation of engine results: wire views and plain-text output.

use api_types::{
    invite::InviteRow,
    settlement::{BalanceView, SettlementView, TransferView},
};
use engine::{
    Invite, Item, MoneyCents, ParticipantId, ProfileDirectory, Recommendation, SettlementPlan,
    group_by_category,
};
use uuid::Uuid;

pub fn settlement_view(plan: &SettlementPlan, directory: &ProfileDirectory) -> SettlementView {
    SettlementView {
        total_minor: plan.total.cents(),
        balances: plan
            .balances
            .iter()
            .map(|b| BalanceView {
                participant: b.participant.to_string(),
                label: directory.label(&b.participant),
                paid_minor: b.paid.cents(),
                share_minor: b.share.cents(),
                diff_minor: b.diff.cents(),
            })
            .collect(),
        transfers: plan
            .transfers
            .iter()
            .map(|t| TransferView {
                from: t.from.to_string(),
                from_label: directory.label(&t.from),
                to: t.to.to_string(),
                to_label: directory.label(&t.to),
                amount_minor: t.amount.cents(),
            })
            .collect(),
    }
}

fn signed(cents: i64) -> String {
    let money = MoneyCents::new(cents);
    if money.is_positive() {
        format!("+{money}")
    } else {
        money.to_string()
    }
}

/// Joins lines with a trailing newline after each one.
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn settlement_text(
    view: &SettlementView,
    contributions: &[(ParticipantId, MoneyCents)],
    directory: &ProfileDirectory,
) -> String {
    let mut lines = vec![format!("Total: {}", MoneyCents::new(view.total_minor))];

    if contributions.is_empty() {
        lines.push("Aún no hay gastos registrados.".to_string());
        return block(lines);
    }

    lines.push("\n¿Quién ha puesto cuánto?".to_string());
    lines.extend(contributions.iter().map(|(id, amount)| {
        format!("  {:<24} {:>12}", directory.label(id), amount.to_string())
    }));

    lines.push("\nBalances:".to_string());
    lines.extend(view.balances.iter().map(|b| {
        format!(
            "  {:<24} pagó {:>12}  le toca {:>12}  {:>13}",
            b.label,
            MoneyCents::new(b.paid_minor).to_string(),
            MoneyCents::new(b.share_minor).to_string(),
            signed(b.diff_minor),
        )
    }));

    lines.push("\nTransferencias:".to_string());
    if view.transfers.is_empty() {
        lines.push("  Todo saldado.".to_string());
    }
    lines.extend(view.transfers.iter().map(|t| {
        format!(
            "  {} -> {}: {}",
            t.from_label,
            t.to_label,
            MoneyCents::new(t.amount_minor)
        )
    }));
    block(lines)
}

pub fn checklist_text(items: &[Item]) -> String {
    if items.is_empty() {
        return block(vec!["Aún no hay cosas en la lista.".to_string()]);
    }
    let mut lines = Vec::new();
    for (category, group) in group_by_category(items) {
        lines.push(category.to_string());
        lines.extend(group.into_iter().map(|item| {
            let qty = match (item.qty, item.unit.as_deref()) {
                (Some(qty), Some(unit)) => format!(" ({qty} {unit})"),
                (Some(qty), None) => format!(" ({qty})"),
                _ => String::new(),
            };
            format!("  [{}] {}{qty}", item.status.label(), item.name)
        }));
    }
    block(lines)
}

pub fn recommendations_text(title: Option<&str>, recommendations: &[Recommendation]) -> String {
    let mut lines: Vec<String> = title.map(str::to_string).into_iter().collect();
    lines.extend(recommendations.iter().map(|rec| {
        format!(
            "  {:<12} {:>8} {}",
            rec.label,
            rec.formatted_target(),
            rec.unit.as_str()
        )
    }));
    block(lines)
}

pub fn invite_row(invite: &Invite) -> InviteRow {
    InviteRow {
        id: Uuid::new_v4(),
        event_id: invite.event_id,
        code: invite.code.to_string(),
        expires_at: invite.expires_at,
        created_at: invite.created_at,
    }
}

#[cfg(test)]
mod tests {
    use engine::{
        Category, ExpenseRecord, NewItem, SettlementEngine, build_recommendations, contributions,
    };

    use super::*;

    #[test]
    fn view_keeps_raw_ids_and_labels() {
        let expenses = [
            ExpenseRecord::new("4f1c2a9e-1111", MoneyCents::new(300_00)),
            ExpenseRecord::new("9b7d33c0-2222", MoneyCents::new(100_00)),
        ];
        let plan = SettlementEngine::default().settle(&expenses);
        let directory: ProfileDirectory = [(ParticipantId::from("4f1c2a9e-1111"), Some("Lupe"))]
            .into_iter()
            .collect();

        let view = settlement_view(&plan, &directory);
        assert_eq!(view.total_minor, 400_00);
        assert_eq!(view.transfers.len(), 1);
        let transfer = &view.transfers[0];
        assert_eq!(transfer.from, "9b7d33c0-2222");
        assert_eq!(transfer.from_label, "Usuario 9b7d33");
        assert_eq!(transfer.to_label, "Lupe");
        assert_eq!(transfer.amount_minor, 100_00);

        let text = settlement_text(&view, &contributions(&expenses), &directory);
        assert!(text.contains("Total: $400.00"));
        assert!(text.contains("Usuario 9b7d33 -> Lupe: $100.00"));
        assert!(text.contains("+$100.00"));
    }

    #[test]
    fn checklist_groups_by_category_with_status() {
        let carbon = NewItem::new("Carbón", Category::Carbon, Some(3.0), Some("kg"))
            .unwrap()
            .into_item(Uuid::new_v4(), "ana".into());
        let mut carne = NewItem::new("Arrachera", Category::Carne, None, None)
            .unwrap()
            .into_item(Uuid::new_v4(), "ana".into());
        carne.toggle();

        let text = checklist_text(&[carbon, carne]);
        assert_eq!(
            text,
            "Carne\n  [Comprado] Arrachera\nCarbón\n  [Pendiente] Carbón (3 kg)\n"
        );
        assert_eq!(checklist_text(&[]), "Aún no hay cosas en la lista.\n");
    }

    #[test]
    fn recommendations_list_one_line_each() {
        let text = recommendations_text(Some("Asado"), &build_recommendations(2, 0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Asado");
        assert!(lines[1].contains("Carne") && lines[1].contains("0.70"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_settlement_says_so() {
        let plan = SettlementEngine::default().settle(&[]);
        let view = settlement_view(&plan, &ProfileDirectory::new());
        let text = settlement_text(&view, &[], &ProfileDirectory::new());
        assert!(text.contains("Aún no hay gastos registrados."));
    }
}
