//! Spending, nutrition and per-person debt aggregation

use std::collections::HashMap;

use crate::error::CoreResult;
use crate::models::{Analytics, ItemType, LedgerEntry, PersonAnalytics};

/// Fold ledger entries into an `Analytics` summary
///
/// `MyPurchase` and `FromPersonPurchase` count towards spend and nutrition.
/// `FromPersonPurchase` adds the cost to the person's debt and
/// `ToPersonPurchase` subtracts it. An entry with an unknown item type
/// fails the whole call.
pub fn aggregate(entries: &[LedgerEntry]) -> CoreResult<Analytics> {
    let mut analytics = Analytics::default();
    let mut person_index: HashMap<u64, usize> = HashMap::new();

    for entry in entries {
        let item_type = ItemType::try_from(entry.item_type)?;
        let cost = entry.total_cost();

        match item_type {
            ItemType::MyPurchase => add_totals(&mut analytics, entry, cost),
            ItemType::FromPersonPurchase => {
                add_totals(&mut analytics, entry, cost);
                add_debt(&mut analytics, &mut person_index, entry, cost);
            }
            ItemType::ToPersonPurchase => {
                add_debt(&mut analytics, &mut person_index, entry, -cost);
            }
        }
    }

    Ok(analytics)
}

fn add_totals(analytics: &mut Analytics, entry: &LedgerEntry, cost: f64) {
    analytics.total_spent += cost;
    analytics.total_calories += entry.product_calories * entry.item_amount;
    analytics.total_fats += entry.product_fats * entry.item_amount;
    analytics.total_carbs += entry.product_carbs * entry.item_amount;
    analytics.total_proteins += entry.product_proteins * entry.item_amount;
}

fn add_debt(
    analytics: &mut Analytics,
    person_index: &mut HashMap<u64, usize>,
    entry: &LedgerEntry,
    delta: f64,
) {
    match person_index.get(&entry.person_id) {
        Some(&idx) => analytics.persons[idx].total_debt += delta,
        None => {
            person_index.insert(entry.person_id, analytics.persons.len());
            analytics.persons.push(PersonAnalytics {
                person_id: entry.person_id,
                user_id: entry.user_id,
                person_name: entry.person_name.clone(),
                total_debt: delta,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::NaiveDate;

    fn entry(item_type: u8, cost: f64, amount: f64, person_id: u64) -> LedgerEntry {
        LedgerEntry {
            item_id: 1,
            user_id: 1,
            product_id: 1,
            item_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            item_cost: cost,
            item_amount: amount,
            item_type,
            person_id,
            person_name: if person_id == 0 { String::new() } else { format!("p{}", person_id) },
            product_title: "Oatmeal".to_string(),
            product_calories: 0.0,
            product_fats: 0.0,
            product_carbs: 0.0,
            product_proteins: 0.0,
        }
    }

    #[test]
    fn test_empty_input() {
        let analytics = aggregate(&[]).unwrap();
        assert_eq!(analytics, Analytics::default());
        assert!(analytics.persons.is_empty());
    }

    #[test]
    fn test_my_purchase_scales_by_amount() {
        let mut e = entry(1, 2.5, 2.0, 0);
        e.product_calories = 100.0;
        e.product_proteins = 3.0;

        let analytics = aggregate(&[e]).unwrap();
        assert_eq!(analytics.total_spent, 5.0);
        assert_eq!(analytics.total_calories, 200.0);
        assert_eq!(analytics.total_proteins, 6.0);
        assert!(analytics.persons.is_empty());
    }

    #[test]
    fn test_from_person_accumulates_debt() {
        let entries = [entry(2, 3.0, 1.0, 7), entry(2, 4.0, 1.0, 7)];
        let analytics = aggregate(&entries).unwrap();

        assert_eq!(analytics.total_spent, 7.0);
        assert_eq!(analytics.persons.len(), 1);
        assert_eq!(analytics.persons[0].person_id, 7);
        assert_eq!(analytics.persons[0].person_name, "p7");
        assert_eq!(analytics.persons[0].total_debt, 7.0);
    }

    #[test]
    fn test_to_person_only_touches_debt() {
        let mut e = entry(3, 10.0, 1.0, 9);
        e.product_calories = 500.0;

        let analytics = aggregate(&[e]).unwrap();
        assert_eq!(analytics.total_spent, 0.0);
        assert_eq!(analytics.total_calories, 0.0);
        assert_eq!(analytics.persons.len(), 1);
        assert_eq!(analytics.persons[0].person_id, 9);
        assert_eq!(analytics.persons[0].total_debt, -10.0);
    }

    #[test]
    fn test_mixed_directions_net_out() {
        let entries = [entry(2, 5.0, 1.0, 3), entry(3, 2.0, 1.0, 3)];
        let analytics = aggregate(&entries).unwrap();

        assert_eq!(analytics.persons.len(), 1);
        assert_eq!(analytics.persons[0].total_debt, 3.0);
        assert_eq!(analytics.total_spent, 5.0);
    }

    #[test]
    fn test_persons_in_first_appearance_order() {
        let entries = [
            entry(3, 1.0, 1.0, 5),
            entry(2, 1.0, 1.0, 2),
            entry(1, 1.0, 1.0, 0),
            entry(2, 1.0, 1.0, 5),
            entry(3, 1.0, 1.0, 8),
        ];
        let analytics = aggregate(&entries).unwrap();

        let ids: Vec<u64> = analytics.persons.iter().map(|p| p.person_id).collect();
        assert_eq!(ids, vec![5, 2, 8]);
        assert_eq!(analytics.persons[0].total_debt, 0.0);
    }

    #[test]
    fn test_invalid_item_type_fails_without_partial_result() {
        for bad in [0u8, 4] {
            let entries = [entry(1, 2.0, 1.0, 0), entry(bad, 1.0, 1.0, 0)];
            let result = aggregate(&entries);
            assert!(matches!(result, Err(CoreError::DataIntegrity { .. })));
        }
    }

    #[test]
    fn test_totals_reconstruct_signed_costs() {
        let entries = [
            entry(1, 1.5, 2.0, 0),
            entry(2, 4.0, 0.5, 1),
            entry(3, 3.0, 3.0, 1),
            entry(2, 2.0, 1.0, 2),
        ];
        let analytics = aggregate(&entries).unwrap();

        let spent: f64 = entries
            .iter()
            .filter(|e| e.item_type != 3)
            .map(LedgerEntry::total_cost)
            .sum();
        assert_eq!(analytics.total_spent, spent);

        let debt_sum: f64 = analytics.persons.iter().map(|p| p.total_debt).sum();
        assert_eq!(debt_sum, 2.0 - 9.0 + 2.0);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let entries = [entry(1, 1.0, 1.0, 0), entry(2, 2.0, 2.0, 4), entry(3, 1.0, 1.0, 4)];
        assert_eq!(aggregate(&entries).unwrap(), aggregate(&entries).unwrap());
    }
}
