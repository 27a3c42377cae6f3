use rust_decimal::Decimal;

use super::money::{parse_price, parse_quantity};
use super::{ParseError, PRODUCT_LINE_MARKER};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<String>,
}

impl LineItem {
    /// price × quantity; a missing quantity counts as one. An unreadable
    /// price, or a product too large for `Decimal`, contributes nothing.
    pub fn subtotal(&self) -> Option<Decimal> {
        let price = parse_price(self.price.as_deref()?)?;
        let quantity = self.quantity.as_deref().map_or(Some(1), parse_quantity)?;
        price.checked_mul(Decimal::from(quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    pub items: Vec<LineItem>,
    pub total: Decimal,
}

/// Parse a shopping list reply.
///
/// Every line containing `• Product:` opens an item; the `Key: Value` lines
/// that follow fill it in until the next product line.
pub fn parse_shopping_list(text: &str) -> Result<ShoppingList, ParseError> {
    let mut items: Vec<LineItem> = Vec::new();

    for line in text.lines() {
        if let Some(pos) = line.find(PRODUCT_LINE_MARKER) {
            items.push(LineItem {
                name: line[pos + PRODUCT_LINE_MARKER.len()..].trim().to_string(),
                ..LineItem::default()
            });
            continue;
        }

        let Some(item) = items.last_mut() else {
            continue;
        };
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim().to_lowercase(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let field = match key.as_str() {
            "brand" => &mut item.brand,
            "price" => &mut item.price,
            "category" => &mut item.category,
            "size" => &mut item.size,
            "color" => &mut item.color,
            "quantity" => &mut item.quantity,
            _ => continue,
        };
        *field = Some(value.to_string());
    }

    let mut total = Decimal::ZERO;
    for item in &items {
        match item.subtotal().and_then(|subtotal| total.checked_add(subtotal)) {
            Some(sum) => total = sum,
            None => tracing::warn!(
                item = %item.name,
                price = ?item.price,
                quantity = ?item.quantity,
                "shopping list item left out of the total"
            ),
        }
    }

    Ok(ShoppingList { items, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::money::format_eur;
    use pretty_assertions::assert_eq;

    const LIST: &str = "Here is your shopping list:\n\
                        • Product: Trail Runner\n\
                        Brand: Stride\n\
                        Price: €10.00\n\
                        Category: Running\n\
                        Size: 42\n\
                        Color: Red\n\
                        Quantity: 2\n\
                        \n\
                        • Product: Water Bottle\n\
                        Price: €5.50\n\
                        Quantity: 1\n\
                        Note: gift: wrap it\n";

    #[test]
    fn total_is_price_times_quantity() {
        let list = parse_shopping_list(LIST).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(format_eur(list.total), "€25.50");
    }

    #[test]
    fn fields_are_keyed_case_insensitively() {
        let list = parse_shopping_list("shopping list:\n• Product: Cap\nBRAND: Peak\ncolor :  Blue").unwrap();
        assert_eq!(
            list.items,
            vec![LineItem {
                name: "Cap".into(),
                brand: Some("Peak".into()),
                color: Some("Blue".into()),
                ..LineItem::default()
            }]
        );
    }

    #[test]
    fn first_item_fields_are_complete() {
        let list = parse_shopping_list(LIST).unwrap();
        assert_eq!(
            list.items[0],
            LineItem {
                name: "Trail Runner".into(),
                brand: Some("Stride".into()),
                price: Some("€10.00".into()),
                category: Some("Running".into()),
                size: Some("42".into()),
                color: Some("Red".into()),
                quantity: Some("2".into()),
            }
        );
    }

    #[test]
    fn unreadable_price_is_left_out_of_total() {
        let text = "shopping list:\n• Product: A\nPrice: ask in store\nQuantity: 3\n• Product: B\nPrice: €4.00";
        let list = parse_shopping_list(text).unwrap();
        assert_eq!(list.total, Decimal::new(400, 2));
    }

    #[test]
    fn overflowing_amounts_are_left_out_of_total() {
        let text = "shopping list:\n\
                    • Product: Paddle\n\
                    Price: €4.00\n\
                    • Product: Yacht\n\
                    Price: €79228162514264337593543950335\n\
                    Quantity: 2\n\
                    • Product: Dinghy\n\
                    Price: €79228162514264337593543950335";
        let list = parse_shopping_list(text).unwrap();

        assert_eq!(list.items.len(), 3);
        // Yacht overflows on its own, Dinghy only once added to the running total
        assert_eq!(list.items[1].subtotal(), None);
        assert_eq!(list.items[2].subtotal(), Some(Decimal::MAX));
        assert_eq!(format_eur(list.total), "€4.00");
    }

    #[test]
    fn empty_list_totals_zero() {
        let list = parse_shopping_list("Your shopping list: is empty").unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.total, Decimal::ZERO);
    }
}
