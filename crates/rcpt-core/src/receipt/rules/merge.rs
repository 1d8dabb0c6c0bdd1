//! Folding of repeated unit scans into single line items.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::amounts::{format_amount, round2};
use super::patterns::WHITESPACE;
use crate::models::receipt::ResolvedItem;

/// Item code when present, otherwise normalized name plus unit price.
pub fn merge_key(item: &ResolvedItem) -> String {
    match &item.item_number {
        Some(code) => code.clone(),
        None => {
            let name = WHITESPACE.replace_all(item.name.trim(), " ").to_lowercase();
            format!("{}{}", name, format_amount(item.unit_price))
        }
    }
}

/// Merge items sharing a key. Output is ordered by first occurrence.
pub fn merge_duplicates(items: Vec<ResolvedItem>) -> Vec<ResolvedItem> {
    let mut merged: Vec<ResolvedItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        if item.unit_price <= Decimal::ZERO {
            debug!("Skipping '{}' with non-positive unit price {}", item.name, item.unit_price);
            continue;
        }

        let key = merge_key(&item);
        match index.get(&key) {
            Some(&pos) => fold(&mut merged[pos], item),
            None => {
                index.insert(key, merged.len());
                merged.push(item);
            }
        }
    }

    merged.sort_by_key(|item| item.order);
    merged
}

fn fold(acc: &mut ResolvedItem, item: ResolvedItem) {
    acc.quantity += item.quantity;
    acc.total_price = round2(acc.total_price + item.total_price);
    acc.discount += item.discount;
    acc.order = acc.order.min(item.order);

    // Unit price rounds up to the cent; the remainder is carried as discount
    // so total == unit * quantity - discount stays exact.
    let quantity = Decimal::from(acc.quantity);
    acc.unit_price = ((acc.total_price + acc.discount) / quantity)
        .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    acc.discount = acc.unit_price * quantity - acc.total_price;
}
