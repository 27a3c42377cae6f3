use super::{ParseError, PRODUCT_LINE_MARKER};

/// One entry of a product list reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub name: String,
    /// Name used to look up the product image
    pub image_key: String,
    pub description: Option<String>,
}

/// Single product detail card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetail {
    pub name: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub description: Option<String>,
}

/// Parse a canonical product list.
///
/// Each `• Product:` line starts an entry. An optional `Image:` line right
/// after it overrides the image key, and the next line, unless it starts a
/// new `• ` bullet, is the description. Lines before the first product are ignored.
pub fn parse_product_list(text: &str) -> Result<Vec<ProductSummary>, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut products = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(name) = line.strip_prefix(PRODUCT_LINE_MARKER) else {
            continue;
        };
        let name = name.trim().to_string();

        let mut next = index + 1;
        let image_key = match lines.get(next).and_then(|l| l.strip_prefix("Image:")) {
            Some(key) => {
                next += 1;
                key.trim().to_string()
            }
            None => name.clone(),
        };

        let description = lines
            .get(next)
            .filter(|l| !l.starts_with("• "))
            .map(|l| l.to_string());

        products.push(ProductSummary {
            name,
            image_key,
            description,
        });
    }

    Ok(products)
}

/// Parse a `• Key: Value` product detail card. Unknown keys are ignored and
/// missing ones stay `None`.
pub fn parse_product_detail(text: &str) -> Result<ProductDetail, ParseError> {
    let mut detail = ProductDetail::default();

    for line in text.lines() {
        let Some(rest) = line.trim_start().strip_prefix('•') else {
            continue;
        };
        let Some((key, value)) = rest.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        match key {
            "Product Name" => detail.name = Some(value.to_string()),
            "Price" => detail.price = Some(value.to_string()),
            "Brand" => detail.brand = Some(value.to_string()),
            "Category" => detail.category = Some(value.to_string()),
            "Sizes" => detail.sizes = split_set(value),
            "Colors" => detail.colors = split_set(value),
            "Description" => detail.description = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(detail)
}

/// Comma-separated tokens, trimmed, first occurrence kept
fn split_set(value: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_names_images_and_descriptions() {
        let text = "Here are some products:\n\
                    • Product: Summit 2P\n\
                    Image: summit-2p-green\n\
                    Lightweight two-person tent\n\
                    \n\
                    • Product: Basecamp 4\n\
                    Roomy family tent\n\
                    • Product: Stakes\n";

        let products = parse_product_list(text).unwrap();

        assert_eq!(
            products,
            vec![
                ProductSummary {
                    name: "Summit 2P".into(),
                    image_key: "summit-2p-green".into(),
                    description: Some("Lightweight two-person tent".into()),
                },
                ProductSummary {
                    name: "Basecamp 4".into(),
                    image_key: "Basecamp 4".into(),
                    description: Some("Roomy family tent".into()),
                },
                ProductSummary {
                    name: "Stakes".into(),
                    image_key: "Stakes".into(),
                    description: None,
                },
            ]
        );
    }

    #[test]
    fn item_count_matches_product_markers() {
        let text = "Here are some products:\n• Product: A\nfirst\n• Product: B\n• Product: C\nthird";
        let expected = text.matches(PRODUCT_LINE_MARKER).count();
        assert_eq!(parse_product_list(text).unwrap().len(), expected);
    }

    #[test]
    fn bullet_glued_to_text_is_still_a_description() {
        let products = parse_product_list("Here are some products:\n• Product: Shell\n•Waterproof shell").unwrap();
        assert_eq!(products[0].description.as_deref(), Some("•Waterproof shell"));
    }

    #[test]
    fn stray_lines_before_first_product_are_ignored() {
        let text = "Here are some products:\nsomething odd\nImage: nope";
        assert!(parse_product_list(text).unwrap().is_empty());
    }

    #[test]
    fn parses_detail_card() {
        let text = "• Product Name: Trail Runner\n\
                    • Price: €89.99\n\
                    • Brand: Stride\n\
                    • Category: Running\n\
                    • Sizes: 40, 41 ,42, 41\n\
                    • Colors: Red, Blue\n\
                    • Description: Grippy: great on mud";

        let detail = parse_product_detail(text).unwrap();

        assert_eq!(
            detail,
            ProductDetail {
                name: Some("Trail Runner".into()),
                price: Some("€89.99".into()),
                brand: Some("Stride".into()),
                category: Some("Running".into()),
                sizes: vec!["40".into(), "41".into(), "42".into()],
                colors: vec!["Red".into(), "Blue".into()],
                description: Some("Grippy: great on mud".into()),
            }
        );
    }

    #[test]
    fn missing_detail_fields_stay_empty() {
        let detail = parse_product_detail("• Product Name: Cap\n• Sizes:").unwrap();
        assert_eq!(detail.name.as_deref(), Some("Cap"));
        assert!(detail.sizes.is_empty());
        assert_eq!(detail.colors, Vec::<String>::new());
        assert_eq!(detail.price, None);
    }
}
