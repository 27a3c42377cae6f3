use super::money::EURO;
use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub description: String,
    pub price: Option<String>,
}

impl OrderItem {
    /// Split an item line at the last euro sign: `Tent x1 €120.00`
    fn from_line(line: &str) -> Self {
        match line.rfind(EURO) {
            Some(pos) => Self {
                description: line[..pos].trim().to_string(),
                price: Some(line[pos..].trim().to_string()),
            },
            None => Self {
                description: line.trim().to_string(),
                price: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Missing when the reply has no `• Order:` line
    pub order_number: Option<String>,
    pub store: Option<String>,
    pub total_amount: Option<String>,
    pub status: Option<String>,
    pub shipping_address: Option<String>,
    pub items: Vec<OrderItem>,
    pub delivery_method: Option<String>,
    pub delivery_cost: Option<String>,
}

impl OrderSummary {
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("pending"))
    }
}

/// Parse an order confirmation. Every field is optional; missing ones are
/// simply left out of the card.
pub fn parse_order_summary(text: &str) -> Result<OrderSummary, ParseError> {
    let mut order_number = None;
    let mut store = None;
    let mut total_amount = None;
    let mut status = None;
    let mut shipping_address = None;
    let mut items = Vec::new();
    let mut delivery_method = None;
    let mut delivery_cost = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line == "Delivery Method:" {
            continue;
        }

        let value = |prefix: &str| line.strip_prefix(prefix).map(|v| v.trim().to_string());

        if let Some(v) = value("• Order:") {
            order_number = Some(v);
        } else if let Some(v) = value("Store:") {
            store = Some(v);
        } else if let Some(v) = value("Total Amount:") {
            total_amount = Some(v);
        } else if let Some(v) = value("Status:") {
            status = Some(v);
        } else if let Some(v) = value("Shipping Address:") {
            shipping_address = Some(v);
        } else if let Some(rest) = line.strip_prefix('-') {
            let rest = rest.trim();
            if rest.contains("Delivery") {
                match rest.split_once(EURO) {
                    Some((method, cost)) => {
                        delivery_method = Some(method.trim().to_string());
                        let cost = cost.trim();
                        delivery_cost = Some(format!("{EURO}{cost}"));
                    }
                    None => delivery_method = Some(rest.to_string()),
                }
            } else {
                items.push(OrderItem::from_line(rest));
            }
        }
    }

    Ok(OrderSummary {
        order_number,
        store,
        total_amount,
        status,
        shipping_address,
        items,
        delivery_method,
        delivery_cost,
    })
}
