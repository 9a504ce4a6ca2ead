use std::collections::{HashMap, HashSet};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierLineItem {
    pub invoice_id: String,
    pub supplier_name: Option<String>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalSupplier {
    pub invoice_id: String,
    pub supplier_count: i64,
    pub budget_sum: Option<f64>,
    pub budget_mean: Option<f64>,
    pub principal_supplier: Option<String>,
}

/// The principal supplier sits on the highest-budget item when any budget is
/// present, otherwise it is the most frequent name (first seen on ties).
pub fn aggregate(invoice_id: &str, items: &[SupplierLineItem]) -> PrincipalSupplier {
    let named = items
        .iter()
        .filter_map(|item| {
            item.supplier_name
                .as_deref()
                .map(|name| (name, item.budget.filter(|value| value.is_finite())))
        })
        .collect::<Vec<(&str, Option<f64>)>>();

    let supplier_count = named
        .iter()
        .map(|(name, _)| *name)
        .collect::<HashSet<&str>>()
        .len() as i64;

    let budgets = named
        .iter()
        .filter_map(|(_, budget)| *budget)
        .collect::<Vec<f64>>();
    let (budget_sum, budget_mean) = if budgets.is_empty() {
        (None, None)
    } else {
        let sum = budgets.iter().sum::<f64>();
        (Some(sum), Some(sum / budgets.len() as f64))
    };

    let principal_supplier = if budgets.is_empty() {
        most_frequent(&named)
    } else {
        highest_budget(&named)
    }
    .map(str::to_string);

    PrincipalSupplier {
        invoice_id: invoice_id.to_string(),
        supplier_count,
        budget_sum,
        budget_mean,
        principal_supplier,
    }
}

fn highest_budget<'a>(named: &[(&'a str, Option<f64>)]) -> Option<&'a str> {
    let mut best: Option<(&'a str, f64)> = None;
    for &(name, budget) in named {
        let value = budget.unwrap_or(0.0);
        let replace = best.map(|(_, current)| value > current).unwrap_or(true);
        if replace {
            best = Some((name, value));
        }
    }
    best.map(|(name, _)| name)
}

fn most_frequent<'a>(named: &[(&'a str, Option<f64>)]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&'a str> = Vec::new();
    for &(name, _) in named {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for name in order {
        let count = counts.get(name).copied().unwrap_or(0);
        if best.map(|(_, current)| count > current).unwrap_or(true) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name)
}

pub fn aggregate_by_invoice(items: &[SupplierLineItem]) -> Vec<PrincipalSupplier> {
    let mut groups: Vec<(&str, Vec<SupplierLineItem>)> = Vec::new();
    let mut position_by_invoice: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let position = *position_by_invoice
            .entry(item.invoice_id.as_str())
            .or_insert_with(|| {
                groups.push((item.invoice_id.as_str(), Vec::new()));
                groups.len() - 1
            });
        groups[position].1.push(item.clone());
    }

    groups
        .iter()
        .map(|(invoice_id, group)| aggregate(invoice_id, group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{SupplierLineItem, aggregate, aggregate_by_invoice};

    fn item(invoice: &str, name: Option<&str>, budget: Option<f64>) -> SupplierLineItem {
        SupplierLineItem {
            invoice_id: invoice.to_string(),
            supplier_name: name.map(str::to_string),
            budget,
        }
    }

    #[test]
    fn highest_budget_item_names_the_principal() {
        let items = vec![
            item("F1", Some("A"), Some(100.0)),
            item("F1", Some("A"), None),
            item("F1", Some("B"), Some(300.0)),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("B"));
        assert_eq!(result.supplier_count, 2);
        assert_eq!(result.budget_sum, Some(400.0));
        assert_eq!(result.budget_mean, Some(200.0));
    }

    #[test]
    fn without_budgets_the_most_frequent_name_wins() {
        let items = vec![
            item("F1", Some("A"), None),
            item("F1", Some("A"), None),
            item("F1", Some("B"), None),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("A"));
        assert_eq!(result.budget_sum, None);
        assert_eq!(result.budget_mean, None);
    }

    #[test]
    fn frequency_ties_go_to_the_first_seen_name() {
        let items = vec![
            item("F1", Some("Zeta Tours"), None),
            item("F1", Some("Avianca"), None),
            item("F1", Some("Avianca"), None),
            item("F1", Some("Zeta Tours"), None),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("Zeta Tours"));
    }

    #[test]
    fn budget_ties_go_to_the_first_item() {
        let items = vec![
            item("F1", Some("A"), Some(50.0)),
            item("F1", Some("B"), Some(50.0)),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("A"));
    }

    #[test]
    fn negative_budgets_lose_to_missing_ones_counted_as_zero() {
        let items = vec![
            item("F1", Some("Refund"), Some(-20.0)),
            item("F1", Some("Hotel"), None),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("Hotel"));
        assert_eq!(result.budget_sum, Some(-20.0));
    }

    #[test]
    fn unnamed_items_are_ignored_entirely() {
        let items = vec![
            item("F1", None, Some(999.0)),
            item("F1", Some("A"), Some(10.0)),
        ];
        let result = aggregate("F1", &items);
        assert_eq!(result.principal_supplier.as_deref(), Some("A"));
        assert_eq!(result.budget_sum, Some(10.0));

        let nameless = aggregate("F2", &[item("F2", None, Some(5.0))]);
        assert_eq!(nameless.supplier_count, 0);
        assert_eq!(nameless.principal_supplier, None);
        assert_eq!(nameless.budget_sum, None);
    }

    #[test]
    fn grouping_keeps_first_seen_invoice_order() {
        let items = vec![
            item("F2", Some("A"), Some(1.0)),
            item("F1", Some("B"), Some(2.0)),
            item("F2", Some("C"), Some(3.0)),
        ];
        let results = aggregate_by_invoice(&items);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].invoice_id, "F2");
        assert_eq!(results[0].principal_supplier.as_deref(), Some("C"));
        assert_eq!(results[0].supplier_count, 2);
        assert_eq!(results[1].invoice_id, "F1");
    }
}
