//! Assistant reply classification
//!
//! The backend answers in plain text, with line-prefix conventions that mark
//! structured content (product lists, shopping lists, orders, store maps...).
//! [`classify`] picks the first detector in [`DETECTORS`] whose predicate
//! matches and hands the text to that detector's parser. Views are cheap to
//! rebuild and are never cached; callers classify again whenever the message
//! content changes.

pub mod delivery;
pub mod error;
pub mod money;
pub mod normalize;
pub mod order;
pub mod products;
pub mod shopping;
pub mod stores;

pub use delivery::DeliveryOption;
pub use error::ParseError;
pub use money::format_eur;
pub use normalize::{normalize_for_display, normalize_product_list};
pub use order::{OrderItem, OrderSummary};
pub use products::{ProductDetail, ProductSummary};
pub use shopping::{LineItem, ShoppingList};
pub use stores::{GeoPoint, StoreLocation, StoreLocations, UserMarker};

pub const PRODUCT_LIST_HEADER: &str = "Here are some products:";
pub const PRODUCT_LINE_MARKER: &str = "• Product:";
pub const SHOPPING_LIST_MARKER: &str = "shopping list:";
pub const PRODUCT_DETAIL_MARKER: &str = "• Product Name:";
pub const ORDER_MARKER: &str = "Order:";
pub const USER_LOCATION_MARKER: &str = "USER|";

/// Shown in place of a reply whose parser failed
pub const ERROR_DISPLAY_REASON: &str = "Error displaying message";

/// Structural category of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    PlainText,
    ProductList,
    ProductDetail,
    ShoppingList,
    DeliveryOptions,
    OrderSummary,
    StoreLocations,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedView {
    PlainText(Vec<String>),
    ProductList(Vec<ProductSummary>),
    ProductDetail(ProductDetail),
    ShoppingList(ShoppingList),
    DeliveryOptions(Vec<DeliveryOption>),
    OrderSummary(OrderSummary),
    StoreLocations(StoreLocations),
    Error(String),
}

impl ClassifiedView {
    /// `None` for [`ClassifiedView::Error`]
    pub fn shape(&self) -> Option<Shape> {
        Some(match self {
            ClassifiedView::PlainText(_) => Shape::PlainText,
            ClassifiedView::ProductList(_) => Shape::ProductList,
            ClassifiedView::ProductDetail(_) => Shape::ProductDetail,
            ClassifiedView::ShoppingList(_) => Shape::ShoppingList,
            ClassifiedView::DeliveryOptions(_) => Shape::DeliveryOptions,
            ClassifiedView::OrderSummary(_) => Shape::OrderSummary,
            ClassifiedView::StoreLocations(_) => Shape::StoreLocations,
            ClassifiedView::Error(_) => return None,
        })
    }

    /// Product names whose images the view shows, in display order
    pub fn image_keys(&self) -> Vec<&str> {
        match self {
            ClassifiedView::ProductList(products) => {
                products.iter().map(|p| p.image_key.as_str()).collect()
            }
            ClassifiedView::ProductDetail(detail) => detail.name.as_deref().into_iter().collect(),
            ClassifiedView::ShoppingList(list) => {
                list.items.iter().map(|i| i.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A predicate recognising one shape, paired with the parser for it
pub struct Detector {
    pub name: &'static str,
    pub shape: Shape,
    pub matches: fn(&str) -> bool,
    pub parse: fn(&str) -> Result<ClassifiedView, ParseError>,
}

/// Structured detectors in priority order. Anything none of them claims is
/// [`PLAIN_TEXT`]. The pipe/comma store check is the loosest predicate and
/// must stay last.
pub static DETECTORS: [Detector; 7] = [
    Detector {
        name: "product-list",
        shape: Shape::ProductList,
        matches: is_product_list,
        parse: parse_product_list,
    },
    Detector {
        name: "store-locations",
        shape: Shape::StoreLocations,
        matches: is_user_store_map,
        parse: parse_user_store_map,
    },
    Detector {
        name: "shopping-list",
        shape: Shape::ShoppingList,
        matches: is_shopping_list,
        parse: parse_shopping_list,
    },
    Detector {
        name: "product-detail",
        shape: Shape::ProductDetail,
        matches: is_product_detail,
        parse: parse_product_detail,
    },
    Detector {
        name: "delivery-options",
        shape: Shape::DeliveryOptions,
        matches: is_delivery_options,
        parse: parse_delivery_options,
    },
    Detector {
        name: "order-summary",
        shape: Shape::OrderSummary,
        matches: is_order_summary,
        parse: parse_order_summary,
    },
    Detector {
        name: "store-locations-loose",
        shape: Shape::StoreLocations,
        matches: is_loose_store_map,
        parse: parse_loose_store_map,
    },
];

pub static PLAIN_TEXT: Detector = Detector {
    name: "plain-text",
    shape: Shape::PlainText,
    matches: always,
    parse: parse_plain_text,
};

fn always(_: &str) -> bool {
    true
}

fn is_product_list(text: &str) -> bool {
    text.contains(PRODUCT_LIST_HEADER)
}

fn is_user_store_map(text: &str) -> bool {
    text.contains(USER_LOCATION_MARKER)
}

fn is_shopping_list(text: &str) -> bool {
    text.contains(SHOPPING_LIST_MARKER)
}

fn is_product_detail(text: &str) -> bool {
    text.contains(PRODUCT_DETAIL_MARKER)
}

fn is_delivery_options(text: &str) -> bool {
    text.contains('•') && text.contains("Description:") && text.contains("Cost:")
}

fn is_order_summary(text: &str) -> bool {
    text.contains(ORDER_MARKER)
}

fn is_loose_store_map(text: &str) -> bool {
    text.contains('|') && text.contains(',')
}

fn parse_product_list(text: &str) -> Result<ClassifiedView, ParseError> {
    products::parse_product_list(text).map(ClassifiedView::ProductList)
}

fn parse_user_store_map(text: &str) -> Result<ClassifiedView, ParseError> {
    stores::parse_store_locations(text, UserMarker::Exact).map(ClassifiedView::StoreLocations)
}

fn parse_shopping_list(text: &str) -> Result<ClassifiedView, ParseError> {
    shopping::parse_shopping_list(text).map(ClassifiedView::ShoppingList)
}

fn parse_product_detail(text: &str) -> Result<ClassifiedView, ParseError> {
    products::parse_product_detail(text).map(ClassifiedView::ProductDetail)
}

fn parse_delivery_options(text: &str) -> Result<ClassifiedView, ParseError> {
    delivery::parse_delivery_options(text).map(ClassifiedView::DeliveryOptions)
}

fn parse_order_summary(text: &str) -> Result<ClassifiedView, ParseError> {
    order::parse_order_summary(text).map(ClassifiedView::OrderSummary)
}

fn parse_loose_store_map(text: &str) -> Result<ClassifiedView, ParseError> {
    stores::parse_store_locations(text, UserMarker::Prefix).map(ClassifiedView::StoreLocations)
}

fn parse_plain_text(text: &str) -> Result<ClassifiedView, ParseError> {
    Ok(ClassifiedView::PlainText(text.lines().map(str::to_string).collect()))
}

/// First detector whose predicate accepts `text`
pub fn detector_for(text: &str) -> &'static Detector {
    DETECTORS
        .iter()
        .find(|detector| (detector.matches)(text))
        .unwrap_or(&PLAIN_TEXT)
}

/// Shape `text` would be classified as, after normalization
pub fn detect(text: &str) -> Shape {
    detector_for(&normalize_for_display(text)).shape
}

/// Turn an assistant reply into its display view.
///
/// Never fails: a parser error becomes [`ClassifiedView::Error`] and the
/// cause is logged together with the offending content.
pub fn classify(text: &str) -> ClassifiedView {
    let text = normalize_for_display(text);
    let detector = detector_for(&text);

    match (detector.parse)(&text) {
        Ok(view) => view,
        Err(err) => {
            tracing::error!(
                detector = detector.name,
                error = %err,
                content = %text,
                "failed to parse assistant reply"
            );
            ClassifiedView::Error(ERROR_DISPLAY_REASON.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_shape_is_reachable() {
        let cases = [
            ("Here are some products:\n• Product: Tent", Shape::ProductList),
            ("USER|0,2.15,41.38", Shape::StoreLocations),
            ("Your shopping list:\n• Product: Tent\nPrice: €1", Shape::ShoppingList),
            ("• Product Name: Tent\n• Price: €100", Shape::ProductDetail),
            ("• Standard\nDescription: d\nCost: €1\nEstimated Delivery Time: 2 days", Shape::DeliveryOptions),
            ("• Order: 12\nStatus: Shipped", Shape::OrderSummary),
            ("Shop|100,2.1,41.3", Shape::StoreLocations),
            ("Hello!\nHow can I help?", Shape::PlainText),
        ];

        for (text, shape) in cases {
            assert_eq!(detect(text), shape, "{text:?}");
        }
    }

    #[test]
    fn order_beats_loose_store_map() {
        let text = "• Order: 55\nStore: Gracia|200,2.15,41.40\nStatus: Ready";
        assert_eq!(detect(text), Shape::OrderSummary);
        assert!(matches!(classify(text), ClassifiedView::OrderSummary(_)));
    }

    #[test]
    fn user_store_map_beats_shopping_list() {
        let text = "Stores near your shopping list:\nUSER|0,2.15,41.38\nA|10,2.16,41.39";
        assert_eq!(detect(text), Shape::StoreLocations);
    }

    #[test]
    fn loose_bullets_are_normalized_into_a_product_list() {
        let view = classify("We have:\n* Summit 2P: Light tent\n* Basecamp 4: Big tent");
        let ClassifiedView::ProductList(products) = view else {
            panic!("expected a product list, got {view:?}");
        };
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Summit 2P", "Basecamp 4"]);
        assert_eq!(products[0].description.as_deref(), Some("Light tent"));
    }

    #[test]
    fn shopping_list_is_not_rewritten_as_product_list() {
        let text = "Here is your shopping list:\n• Product: Tent\nPrice: €10.00\nQuantity: 2\n\
                    • Product: Pegs\nPrice: €5.50\nQuantity: 1";
        let ClassifiedView::ShoppingList(list) = classify(text) else {
            panic!("expected a shopping list");
        };
        assert_eq!(format_eur(list.total), "€25.50");
    }

    #[test]
    fn parser_failure_becomes_error_view() {
        let view = classify("• Standard\nDescription: Regular shipping\nCost: €4.99");
        assert_eq!(view, ClassifiedView::Error(ERROR_DISPLAY_REASON.to_string()));
        assert_eq!(view.shape(), None);
    }

    #[test]
    fn order_without_number_still_renders_as_order() {
        let view = classify(
            "Order: 10042\nStore: Sportify Diagonal\nStatus: Pending\n- Tent €120.00\nTotal Amount: €120.00",
        );
        let ClassifiedView::OrderSummary(order) = view else {
            panic!("expected an order summary, got {view:?}");
        };
        assert_eq!(order.order_number, None);
        assert_eq!(order.store.as_deref(), Some("Sportify Diagonal"));
        assert_eq!(order.total_amount.as_deref(), Some("€120.00"));
    }

    #[test]
    fn delivery_options_beat_order_summary() {
        let text = "• Standard\n\
                    Description: Ships with the rest of your Order: no extra box\n\
                    Cost: €4.99\n\
                    Estimated Delivery Time: 3-5 days";
        assert_eq!(detect(text), Shape::DeliveryOptions);
        let ClassifiedView::DeliveryOptions(options) = classify(text) else {
            panic!("expected delivery options");
        };
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Standard");
    }

    #[test]
    fn overflowing_shopping_total_does_not_panic() {
        let text = "Your shopping list:\n• Product: Yacht\nPrice: €79228162514264337593543950335\nQuantity: 2";
        let ClassifiedView::ShoppingList(list) = classify(text) else {
            panic!("expected a shopping list");
        };
        assert_eq!(list.items.len(), 1);
        assert_eq!(format_eur(list.total), "€0.00");
    }

    #[test]
    fn plain_text_keeps_line_structure() {
        assert_eq!(
            classify("Hi there\n\nWelcome back"),
            ClassifiedView::PlainText(vec!["Hi there".into(), "".into(), "Welcome back".into()])
        );
    }

    #[test]
    fn image_keys_follow_product_order() {
        let view = classify("Here are some products:\n• Product: Tent\nImage: tent-green\n• Product: Mat");
        assert_eq!(view.image_keys(), vec!["tent-green", "Mat"]);
    }

    #[test]
    fn streaming_prefixes_never_panic() {
        let full = "Here is your shopping list:\n• Product: Tent\nPrice: €10.00\nQuantity: 2\n\n\
                    • Order: 9\n- Express Delivery €9.99\nUSER|0,2.15,41.38";
        let mut end = 0;
        while end < full.len() {
            end += full[end..].chars().next().map_or(1, char::len_utf8);
            let _ = classify(&full[..end]);
        }
    }
}
