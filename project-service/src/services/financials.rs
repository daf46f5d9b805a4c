//! Project financial summary calculations.
//!
//! Everything here is a pure function of its arguments: no I/O, no shared
//! state, no failure modes. Callers record metrics and do any formatting.

use crate::models::{
    AcUnitCount, AcUnitInventory, LineBreakdown, LineItem, LineItemKind, MaterialSummary,
    PortfolioFinancials, Project, ProjectFinancials, ProjectFinancialsEntry,
};
use rust_decimal::Decimal;

/// Total quoted cost, total actual cost and profit/loss across all three
/// line-item collections.
pub fn calculate_project_summary(
    materials: &[LineItem],
    services: &[LineItem],
    ac_units: &[LineItem],
) -> ProjectFinancials {
    let (total_quotation, total_real) = sum_lines(materials.iter().chain(services).chain(ac_units));
    summary_from_totals(total_quotation, total_real)
}

/// Build a summary from already-aggregated totals.
pub fn summary_from_totals(total_quotation: Decimal, total_real: Decimal) -> ProjectFinancials {
    let profit_loss = total_quotation.saturating_sub(total_real);
    ProjectFinancials {
        total_quotation,
        total_real,
        profit_loss,
        is_profitable: profit_loss >= Decimal::ZERO,
    }
}

/// Summary for a stored project.
pub fn project_summary(project: &Project) -> ProjectFinancials {
    calculate_project_summary(&project.materials.0, &project.services.0, &project.ac_units.0)
}

fn sum_lines<'a>(items: impl Iterator<Item = &'a LineItem>) -> (Decimal, Decimal) {
    items.fold((Decimal::ZERO, Decimal::ZERO), |(quotation, real), item| {
        (
            quotation.saturating_add(item.line_quotation()),
            real.saturating_add(item.line_real()),
        )
    })
}

/// Percent by which `real` deviates from `quotation`, to two decimal places.
///
/// Positive is over budget. Zero when there is no positive quotation to
/// compare against.
pub fn deviation_percent(quotation: Decimal, real: Decimal) -> Decimal {
    if quotation <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    real.checked_sub(quotation)
        .and_then(|diff| diff.checked_div(quotation))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Materials and services only; AC units are tracked separately.
pub fn calculate_material_summary(materials: &[LineItem], services: &[LineItem]) -> MaterialSummary {
    let (total_quotation, total_real) = sum_lines(materials.iter().chain(services));
    MaterialSummary {
        total_quotation,
        total_real,
        total_deviation: deviation_percent(total_quotation, total_real),
        difference: total_real.saturating_sub(total_quotation),
    }
}

/// Per-line comparison rows for tables and the deviation chart.
pub fn item_breakdown(
    materials: &[LineItem],
    services: &[LineItem],
    ac_units: &[LineItem],
) -> Vec<LineBreakdown> {
    let tagged = materials
        .iter()
        .map(|item| (LineItemKind::Material, item))
        .chain(services.iter().map(|item| (LineItemKind::Service, item)))
        .chain(ac_units.iter().map(|item| (LineItemKind::AcUnit, item)));

    tagged
        .map(|(kind, item)| {
            let quotation_total = item.line_quotation();
            let real_total = item.line_real();
            let profit_loss = quotation_total.saturating_sub(real_total);
            LineBreakdown {
                kind,
                label: item.label().to_string(),
                quotation_total,
                real_total,
                profit_loss,
                deviation_percent: deviation_percent(quotation_total, real_total),
                is_profitable: profit_loss >= Decimal::ZERO,
            }
        })
        .collect()
}

/// Installed AC units by type, counted from quoted quantities.
pub fn installed_ac_units(ac_units: &[LineItem]) -> AcUnitInventory {
    let mut by_type: Vec<AcUnitCount> = Vec::new();
    let mut total_units = Decimal::ZERO;

    for unit in ac_units {
        total_units = total_units.saturating_add(unit.quotation_qty);
        let label = unit.label();
        match by_type.iter_mut().find(|c| c.ac_type == label) {
            Some(count) => count.quantity = count.quantity.saturating_add(unit.quotation_qty),
            None => by_type.push(AcUnitCount {
                ac_type: label.to_string(),
                quantity: unit.quotation_qty,
            }),
        }
    }

    AcUnitInventory {
        total_units,
        by_type,
    }
}

/// Aggregate profit/loss over a set of projects.
pub fn portfolio_financials<'a>(projects: impl IntoIterator<Item = &'a Project>) -> PortfolioFinancials {
    let mut entries = Vec::new();
    let mut total_quotation = Decimal::ZERO;
    let mut total_real = Decimal::ZERO;

    for project in projects {
        let financials = project_summary(project);
        total_quotation = total_quotation.saturating_add(financials.total_quotation);
        total_real = total_real.saturating_add(financials.total_real);
        entries.push(ProjectFinancialsEntry {
            project_id: project.project_id,
            project_name: project.project_name.clone(),
            financials,
        });
    }

    let profitable_projects = entries
        .iter()
        .filter(|e| e.financials.is_profitable)
        .count();

    PortfolioFinancials {
        totals: summary_from_totals(total_quotation, total_real),
        project_count: entries.len(),
        profitable_projects,
        loss_projects: entries.len() - profitable_projects,
        projects: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;
    use crate::services::dashboard::tests::project;
    use serde_json::json;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn line(q_qty: i64, q_price: i64, r_qty: i64, r_price: i64) -> LineItem {
        LineItem::named("item", "pcs")
            .with_quotation(d(q_qty), d(q_price))
            .with_real(d(r_qty), d(r_price))
    }

    fn items(value: serde_json::Value) -> Vec<LineItem> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_input_is_break_even() {
        let summary = calculate_project_summary(&[], &[], &[]);
        assert_eq!(summary, ProjectFinancials::default());
        assert_eq!(summary.total_quotation, Decimal::ZERO);
        assert_eq!(summary.total_real, Decimal::ZERO);
        assert_eq!(summary.profit_loss, Decimal::ZERO);
        assert!(summary.is_profitable);
    }

    #[test]
    fn over_budget_material_is_a_loss() {
        let materials = items(json!([
            { "quotationQty": 2, "quotationPrice": 100, "realQty": 2, "realPrice": 120 }
        ]));
        let summary = calculate_project_summary(&materials, &[], &[]);
        assert_eq!(summary.total_quotation, d(200));
        assert_eq!(summary.total_real, d(240));
        assert_eq!(summary.profit_loss, d(-40));
        assert!(!summary.is_profitable);
    }

    #[test]
    fn missing_real_fields_count_as_zero() {
        let materials = items(json!([{ "quotationQty": 5, "quotationPrice": 10 }]));
        let summary = calculate_project_summary(&materials, &[], &[]);
        assert_eq!(summary.total_quotation, d(50));
        assert_eq!(summary.total_real, Decimal::ZERO);
        assert_eq!(summary.profit_loss, d(50));
        assert!(summary.is_profitable);
    }

    #[test]
    fn item_without_numbers_contributes_nothing() {
        let materials = items(json!([{ "name": "X" }]));
        let summary = calculate_project_summary(&materials, &materials, &materials);
        assert_eq!(summary, ProjectFinancials::default());
    }

    #[test]
    fn break_even_ac_unit_is_profitable() {
        let ac_units = items(json!([{
            "acType": "1PK",
            "quotationQty": 1,
            "quotationPrice": 3000000,
            "realQty": 1,
            "realPrice": 3000000
        }]));
        let summary = calculate_project_summary(&[], &[], &ac_units);
        assert_eq!(summary.profit_loss, Decimal::ZERO);
        assert!(summary.is_profitable);
    }

    #[test]
    fn mixed_collections_sum_across_kinds() {
        let materials = vec![line(1, 600_000, 1, 500_000), line(2, 200_000, 1, 400_000)];
        let services = vec![line(1, 500_000, 2, 300_000)];
        let ac_units = vec![line(2, 1_500_000, 2, 1_500_000)];

        let summary = calculate_project_summary(&materials, &services, &ac_units);
        assert_eq!(summary.total_quotation, d(4_500_000));
        assert_eq!(summary.total_real, d(4_500_000));
        assert_eq!(summary.profit_loss, Decimal::ZERO);
        assert!(summary.is_profitable);
    }

    #[test]
    fn fractional_amounts_are_exact() {
        let materials = items(json!([
            { "quotationQty": 0.1, "quotationPrice": 3, "realQty": 0.2, "realPrice": 1 }
        ]));
        let summary = calculate_project_summary(&materials, &[], &[]);
        assert_eq!(summary.total_quotation, Decimal::new(3, 1));
        assert_eq!(summary.total_real, Decimal::new(2, 1));
        assert_eq!(summary.profit_loss, Decimal::new(1, 1));
    }

    #[test]
    fn result_is_independent_of_order_and_grouping() {
        let a = line(3, 10, 2, 20);
        let b = line(1, 999, 1, 500);
        let c = line(7, 3, 8, 4);

        let original = calculate_project_summary(&[a.clone(), b.clone()], &[c.clone()], &[]);
        let shuffled = calculate_project_summary(&[], &[b.clone()], &[c.clone(), a.clone()]);
        let reversed = calculate_project_summary(&[c, b, a], &[], &[]);

        assert_eq!(original, shuffled);
        assert_eq!(original, reversed);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let materials = vec![line(2, 50, 3, 40)];
        let first = calculate_project_summary(&materials, &[], &[]);
        let second = calculate_project_summary(&materials, &[], &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn negative_values_flow_through_the_arithmetic() {
        let materials = vec![line(-1, 100, 1, 50)];
        let summary = calculate_project_summary(&materials, &[], &[]);
        assert_eq!(summary.total_quotation, d(-100));
        assert_eq!(summary.profit_loss, d(-150));
        assert!(!summary.is_profitable);
    }

    #[test]
    fn deviation_is_relative_to_quotation() {
        assert_eq!(deviation_percent(d(200), d(240)), d(20));
        assert_eq!(deviation_percent(d(200), d(150)), d(-25));
        assert_eq!(deviation_percent(d(3), d(4)), Decimal::new(3333, 2));
    }

    #[test]
    fn deviation_without_quotation_is_zero() {
        assert_eq!(deviation_percent(Decimal::ZERO, d(500)), Decimal::ZERO);
        assert_eq!(deviation_percent(d(-10), d(500)), Decimal::ZERO);
    }

    #[test]
    fn material_summary_ignores_ac_units() {
        let materials = vec![line(1, 1000, 1, 1100)];
        let services = vec![line(1, 1000, 1, 1000)];
        let summary = calculate_material_summary(&materials, &services);
        assert_eq!(summary.total_quotation, d(2000));
        assert_eq!(summary.total_real, d(2100));
        assert_eq!(summary.difference, d(100));
        assert_eq!(summary.total_deviation, d(5));
    }

    #[test]
    fn breakdown_keeps_input_order_and_kinds() {
        let materials = vec![LineItem::named("Pipa", "m").with_quotation(d(2), d(10))];
        let services = vec![LineItem::named("Instalasi", "unit").with_real(d(1), d(5))];
        let ac_units = vec![LineItem::ac_unit("1PK").with_quotation(d(1), d(100))];

        let rows = item_breakdown(&materials, &services, &ac_units);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, LineItemKind::Material);
        assert_eq!(rows[0].label, "Pipa");
        assert_eq!(rows[0].profit_loss, d(20));
        assert_eq!(rows[1].kind, LineItemKind::Service);
        assert!(!rows[1].is_profitable);
        assert_eq!(rows[1].deviation_percent, Decimal::ZERO);
        assert_eq!(rows[2].label, "1PK");
    }

    #[test]
    fn installed_units_group_by_type() {
        let ac_units = vec![
            LineItem::ac_unit("1PK").with_quotation(d(2), d(1)),
            LineItem::ac_unit("2PK").with_quotation(d(1), d(1)),
            LineItem::ac_unit("1PK").with_quotation(d(3), d(1)),
        ];
        let inventory = installed_ac_units(&ac_units);
        assert_eq!(inventory.total_units, d(6));
        assert_eq!(inventory.by_type.len(), 2);
        assert_eq!(inventory.by_type[0].ac_type, "1PK");
        assert_eq!(inventory.by_type[0].quantity, d(5));
        assert_eq!(inventory.by_type[1].quantity, d(1));
    }

    #[test]
    fn project_summary_reads_stored_collections() {
        let mut stored = project("Kantor", "PT Maju", "Makassar", ProjectStatus::Prospek);
        stored.materials.0 = vec![line(2, 100, 2, 120)];
        stored.ac_units.0 = vec![LineItem::ac_unit("1PK").with_quotation(d(1), d(500))];

        let summary = project_summary(&stored);
        assert_eq!(summary.total_quotation, d(700));
        assert_eq!(summary.total_real, d(240));
        assert_eq!(summary.profit_loss, d(460));
    }

    #[test]
    fn portfolio_counts_profitable_and_loss_projects() {
        let mut winning = project("Kantor", "PT Maju", "Makassar", ProjectStatus::Pengerjaan);
        winning.services.0 = vec![line(1, 1_000, 1, 800)];
        let mut losing = project("Gudang", "CV Sejahtera", "Gowa", ProjectStatus::Survey);
        losing.materials.0 = vec![line(1, 100, 1, 300)];
        let empty = project("Ruko", "PT Maju", "Maros", ProjectStatus::Prospek);

        let portfolio = portfolio_financials([&winning, &losing, &empty]);

        assert_eq!(portfolio.project_count, 3);
        assert_eq!(portfolio.profitable_projects, 2);
        assert_eq!(portfolio.loss_projects, 1);
        assert_eq!(portfolio.totals.total_quotation, d(1_100));
        assert_eq!(portfolio.totals.total_real, d(1_100));
        assert!(portfolio.totals.is_profitable);
        assert_eq!(portfolio.projects[1].project_name, "Gudang");
        assert_eq!(portfolio.projects[1].financials.profit_loss, d(-200));
    }

    #[test]
    fn empty_portfolio_is_break_even() {
        let portfolio = portfolio_financials(std::iter::empty());
        assert_eq!(portfolio.project_count, 0);
        assert_eq!(portfolio.totals, ProjectFinancials::default());
    }
}
