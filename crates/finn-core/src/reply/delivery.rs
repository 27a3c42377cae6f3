use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOption {
    pub name: String,
    pub description: String,
    pub cost: String,
    pub estimated_time: String,
}

const DESCRIPTION_LABEL: &str = "Description:";
const COST_LABEL: &str = "Cost:";
const ESTIMATED_TIME_LABEL: &str = "Estimated Delivery Time:";

/// Parse blank-line separated delivery blocks.
///
/// A malformed block is logged and skipped; the reply only fails when no
/// block at all is usable.
pub fn parse_delivery_options(text: &str) -> Result<Vec<DeliveryOption>, ParseError> {
    let blocks: Vec<&str> = split_blocks(text);
    let mut options = Vec::with_capacity(blocks.len());

    for (index, block) in blocks.iter().enumerate() {
        match parse_block(index, block) {
            Ok(option) => options.push(option),
            Err(err) => tracing::warn!(error = %err, "skipping delivery block"),
        }
    }

    if options.is_empty() {
        return Err(ParseError::NoDeliveryOptions {
            blocks: blocks.len(),
        });
    }

    Ok(options)
}

fn split_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                blocks.push(&text[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.trim_end().len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        blocks.push(&text[s..end]);
    }

    blocks
}

fn parse_block(index: usize, block: &str) -> Result<DeliveryOption, ParseError> {
    let malformed = |reason: String| ParseError::MalformedBlock { index, reason };

    let lines: Vec<&str> = block.lines().map(str::trim).collect();
    if lines.len() < 4 {
        return Err(malformed(format!("expected 4 lines, found {}", lines.len())));
    }

    let field = |line: &str, label: &str| -> Result<String, ParseError> {
        line.split_once(label)
            .map(|(_, value)| value.trim().to_string())
            .ok_or_else(|| malformed(format!("missing `{label}`")))
    };

    let name = lines[0]
        .trim_start_matches(['•', '-', '*'])
        .trim()
        .to_string();

    Ok(DeliveryOption {
        name,
        description: field(lines[1], DESCRIPTION_LABEL)?,
        cost: field(lines[2], COST_LABEL)?,
        estimated_time: field(lines[3], ESTIMATED_TIME_LABEL)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_block() {
        let text = "• Standard Delivery\n\
                    Description: Delivered to your door\n\
                    Cost: €4.99\n\
                    Estimated Delivery Time: 3-5 days\n\
                    \n\
                    • Express Delivery\n\
                    Description: Next business day\n\
                    Cost: €9.99\n\
                    Estimated Delivery Time: 1 day";

        let options = parse_delivery_options(text).unwrap();

        assert_eq!(
            options,
            vec![
                DeliveryOption {
                    name: "Standard Delivery".into(),
                    description: "Delivered to your door".into(),
                    cost: "€4.99".into(),
                    estimated_time: "3-5 days".into(),
                },
                DeliveryOption {
                    name: "Express Delivery".into(),
                    description: "Next business day".into(),
                    cost: "€9.99".into(),
                    estimated_time: "1 day".into(),
                },
            ]
        );
    }

    #[test]
    fn short_block_does_not_sink_its_siblings() {
        let text = "Here are the delivery methods:\n\n\n\
                    • Pickup in store\n\
                    Description: Collect at the counter\n\
                    Cost: €0.00\n\
                    Estimated Delivery Time: Same day\n\
                    \n\
                    • Courier\n\
                    Cost: €15.00";

        let options = parse_delivery_options(text).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Pickup in store");
    }

    #[test]
    fn block_with_wrong_labels_is_skipped() {
        let text = "• A\nDescription: x\nCost: €1\nEstimated Delivery Time: 1 day\n\n\
                    • B\nCost: €2\nDescription: y\nEstimated Delivery Time: 2 days";

        let options = parse_delivery_options(text).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "A");
    }

    #[test]
    fn no_usable_block_is_an_error() {
        let err = parse_delivery_options("• Only\nDescription: d\nCost: €1").unwrap_err();
        assert_eq!(err, ParseError::NoDeliveryOptions { blocks: 1 });
    }
}
