use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap,
    },
};
use finn_core::reply::{
    format_eur, DeliveryOption, OrderSummary, ProductDetail, ProductSummary, ShoppingList,
    StoreLocations,
};
use finn_core::{image_url, ChatRole, ClassifiedView};

use crate::app::{App, InputMode, CATEGORIES};

const BRAND: Color = Color::Rgb(59, 130, 246);

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(bold_text, Style::default().add_modifier(Modifier::BOLD)));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{text}: "), Style::default().fg(Color::DarkGray))
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(BRAND).add_modifier(Modifier::BOLD),
    ))
}

fn field_line(name: &str, value: Option<&str>) -> Option<Line<'static>> {
    value.map(|v| Line::from(vec![label(name), Span::raw(v.to_string())]))
}

fn product_list_lines(products: &[ProductSummary], base_url: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for product in products {
        lines.push(Line::from(vec![
            Span::styled("▪ ", Style::default().fg(BRAND)),
            Span::styled(product.name.clone(), Style::default().bold()),
        ]));
        if let Some(description) = &product.description {
            lines.push(Line::from(format!("  {description}")));
        }
        lines.push(Line::from(Span::styled(
            format!("  {}", image_url(base_url, &product.image_key)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::UNDERLINED),
        )));
    }
    lines
}

fn product_detail_lines(detail: &ProductDetail) -> Vec<Line<'static>> {
    let mut lines = vec![heading(detail.name.clone().unwrap_or_else(|| "Product".into()))];

    if let Some(price) = &detail.price {
        lines.push(Line::from(Span::styled(
            price.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }
    lines.extend(field_line("Brand", detail.brand.as_deref()));
    lines.extend(field_line("Category", detail.category.as_deref()));
    if !detail.sizes.is_empty() {
        lines.push(Line::from(vec![label("Sizes"), Span::raw(detail.sizes.join(", "))]));
    }
    if !detail.colors.is_empty() {
        lines.push(Line::from(vec![label("Colors"), Span::raw(detail.colors.join(", "))]));
    }
    if let Some(description) = &detail.description {
        lines.push(Line::default());
        lines.push(Line::from(description.clone()));
    }
    lines
}

fn shopping_list_lines(list: &ShoppingList) -> Vec<Line<'static>> {
    let count = list.items.len();
    let mut lines = vec![
        heading("Shopping List"),
        Line::from(Span::styled(
            format!("{count} {} in your list", if count == 1 { "item" } else { "items" }),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    for item in &list.items {
        let mut title = vec![Span::styled(item.name.clone(), Style::default().bold())];
        if let Some(brand) = &item.brand {
            title.push(Span::styled(format!(" ({brand})"), Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(title));

        let details: Vec<String> = [
            item.category.as_deref(),
            item.size.as_deref().map(|s| format!("Size {s}")).as_deref(),
            item.color.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
        if !details.is_empty() {
            lines.push(Line::from(format!("  {}", details.join(" • "))));
        }

        let quantity = item.quantity.as_deref().unwrap_or("1");
        let mut price = vec![Span::raw(format!("  Qty {quantity}"))];
        if let Some(unit) = &item.price {
            price.push(Span::raw(format!(" × {unit}")));
        }
        if let Some(subtotal) = item.subtotal() {
            price.push(Span::styled(
                format!(" = {}", format_eur(subtotal)),
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(Line::from(price));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("Total: {}", format_eur(list.total)),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    lines
}

fn delivery_lines(options: &[DeliveryOption]) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Available Delivery Methods")];
    for option in options {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(option.name.clone(), Style::default().bold()),
            Span::raw("  "),
            Span::styled(option.cost.clone(), Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(format!("  {}", option.description)));
        lines.push(Line::from(Span::styled(
            format!("  Estimated: {}", option.estimated_time),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn order_lines(order: &OrderSummary) -> Vec<Line<'static>> {
    let title = match &order.order_number {
        Some(number) => format!("Order #{number}"),
        None => "Order".to_string(),
    };
    let mut lines = vec![heading(title)];

    if let Some(status) = &order.status {
        let color = if order.is_pending() { Color::Yellow } else { Color::Green };
        lines.push(Line::from(vec![
            label("Status"),
            Span::styled(status.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]));
    }
    lines.extend(field_line("Store", order.store.as_deref()));
    lines.extend(field_line("Shipping Address", order.shipping_address.as_deref()));

    if !order.items.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Items", Style::default().bold())));
        for item in &order.items {
            let mut spans = vec![Span::raw(format!("  {}", item.description))];
            if let Some(price) = &item.price {
                spans.push(Span::styled(format!("  {price}"), Style::default().fg(Color::Green)));
            }
            lines.push(Line::from(spans));
        }
    }

    if order.delivery_method.is_some() || order.delivery_cost.is_some() {
        lines.push(Line::default());
        lines.extend(field_line("Delivery", order.delivery_method.as_deref()));
        lines.extend(field_line("Delivery Cost", order.delivery_cost.as_deref()));
    }
    if let Some(total) = &order.total_amount {
        lines.push(Line::from(Span::styled(
            format!("Total: {total}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

fn store_lines(locations: &StoreLocations) -> Vec<Line<'static>> {
    if locations.stores.is_empty() {
        return vec![Line::from(Span::styled(
            "No stores found",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))];
    }

    let mut lines = vec![heading("Nearby Stores")];
    for store in &locations.stores {
        let mut spans = vec![
            Span::styled("● ", Style::default().fg(Color::Red)),
            Span::styled(store.name.clone(), Style::default().bold()),
        ];
        if let Some(distance) = store.distance_label() {
            spans.push(Span::styled(format!("  {distance}"), Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Lines for one assistant reply, by the shape its content was classified as
fn view_lines(view: &ClassifiedView, base_url: &str) -> Vec<Line<'static>> {
    match view {
        ClassifiedView::PlainText(text) => text.iter().map(|l| parse_markdown_line(l)).collect(),
        ClassifiedView::ProductList(products) => product_list_lines(products, base_url),
        ClassifiedView::ProductDetail(detail) => product_detail_lines(detail),
        ClassifiedView::ShoppingList(list) => shopping_list_lines(list),
        ClassifiedView::DeliveryOptions(options) => delivery_lines(options),
        ClassifiedView::OrderSummary(order) => order_lines(order),
        ClassifiedView::StoreLocations(locations) => store_lines(locations),
        ClassifiedView::Error(reason) => vec![Line::from(Span::styled(
            reason.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        ))],
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_hero(frame, body_area);

    if app.session.is_chat_open() {
        render_chat(app, frame, body_area);
    } else {
        app.chat_area = None;
    }

    render_footer(app, frame, footer_area);

    // Render popups (in order of priority)
    if app.alert.is_some() {
        render_alert(app, frame, area);
    } else if app.show_token_input {
        render_token_input(app, frame, area);
    } else if app.session.selected_image().is_some() {
        render_image_modal(app, frame, area);
    } else if app.show_image_picker {
        render_image_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" SPORTIFY ", Style::default().fg(Color::White).bg(BRAND).bold()),
        Span::raw("  "),
    ];
    for (i, category) in CATEGORIES.iter().enumerate() {
        let style = if i == app.selected_category {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {category} "), style));
    }

    let account = if app.session.is_signed_in() {
        Span::styled(" ● Signed in ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" Sign in with Google (S) ", Style::default().fg(Color::Yellow))
    };

    let [left, right] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(account.width() as u16),
    ])
    .areas(area);

    let style = Style::default().bg(Color::DarkGray);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), left);
    frame.render_widget(Paragraph::new(Line::from(account)).style(style), right);
}

fn render_hero(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            " AI Shopping Assistant ",
            Style::default().fg(BRAND).add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Your Personal Sports Shopping Assistant",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Chat with Finn, our AI assistant, to find the perfect sports gear.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Get personalized recommendations, product details, and more.",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Start Shopping (Enter)  ",
            Style::default().fg(Color::Black).bg(Color::White).bold(),
        )),
    ];

    let hero_height = lines.len() as u16;
    let [_, hero_area, _, badge_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(hero_height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        hero_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Powered by AlloyDB & AI",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        badge_area,
    );
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Chat overlay floats above the landing page
    let popup_width = (area.width * 9 / 10).max(area.width.min(40));
    let popup_height = area.height.saturating_sub(2).max(area.height.min(10));
    let popup_area = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BRAND))
        .title(Span::styled(" Finn - AI Shopping Assistant ", Style::default().bold()));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let [status_area, body_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(
                "Online • Ready to help you find the perfect gear",
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        status_area,
    );

    // Map pane beside the conversation when the latest reply lists stores
    let stores = match app.latest_view() {
        Some(ClassifiedView::StoreLocations(locations)) if !locations.stores.is_empty() => {
            Some(locations)
        }
        _ => None,
    };
    let messages_area = match &stores {
        Some(locations) if body_area.width >= 60 => {
            let [messages_area, map_area] = Layout::horizontal([
                Constraint::Percentage(60),
                Constraint::Percentage(40),
            ])
            .areas(body_area);
            render_store_map(locations, frame, map_area);
            messages_area
        }
        _ => body_area,
    };

    render_messages(app, frame, messages_area);
    render_chat_input(app, frame, input_area);
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing
    app.chat_area = Some(area);

    let base_url = app.client.base_url().to_string();
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.session.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(msg.content.clone()));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Finn:",
                    Style::default().fg(BRAND).add_modifier(Modifier::BOLD),
                )));
                lines.extend(view_lines(&finn_core::classify(&msg.content), &base_url));
            }
        }
        lines.push(Line::default());
    }

    // Typing indicator until the first chunk of the reply arrives
    let reply_started = app
        .session
        .messages()
        .last()
        .is_some_and(|m| m.role == ChatRole::Assistant);
    if app.session.is_busy() && !reply_started {
        lines.push(Line::from(Span::styled(
            "Finn:",
            Style::default().fg(BRAND).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });

    // Rows as the paragraph will actually lay them out
    let total = chat.line_count(area.width);
    app.chat_height = area.height;
    app.chat_total_lines = total.min(u16::MAX as usize) as u16;

    let max_scroll = app.chat_total_lines.saturating_sub(app.chat_height);
    app.chat_scroll = if app.follow_tail {
        max_scroll
    } else {
        app.chat_scroll.min(max_scroll)
    };

    let chat = chat.scroll((app.chat_scroll, 0));
    frame.render_widget(chat, area);
}

fn render_chat_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let (border_color, title) = if app.session.is_busy() {
        (Color::DarkGray, " Finn is typing... ")
    } else if editing {
        (Color::Yellow, " Message (Enter to send, Esc to stop typing) ")
    } else {
        (Color::DarkGray, " Message (i to type) ")
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.chat_input.is_empty() && !editing {
        Paragraph::new(Span::styled(
            "Type your message...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible_text: String = app
            .chat_input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(input.block(input_block), area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_store_map(locations: &StoreLocations, frame: &mut Frame, area: Rect) {
    let center = locations.center();

    // Fit every marker, with a little margin around the outermost ones
    let points = locations
        .stores
        .iter()
        .map(|s| s.position)
        .chain(locations.user_location)
        .chain(std::iter::once(center));
    let (mut min_lon, mut max_lon, mut min_lat, mut max_lat) =
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for p in points {
        min_lon = min_lon.min(p.longitude);
        max_lon = max_lon.max(p.longitude);
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
    }
    let pad_lon = ((max_lon - min_lon) * 0.2).max(0.005);
    let pad_lat = ((max_lat - min_lat) * 0.2).max(0.005);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Store Map ");

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([min_lon - pad_lon, max_lon + pad_lon])
        .y_bounds([min_lat - pad_lat, max_lat + pad_lat])
        .paint(|ctx| {
            for store in &locations.stores {
                let (x, y) = (store.position.longitude, store.position.latitude);
                ctx.draw(&Points { coords: &[(x, y)], color: Color::Red });
                ctx.print(x, y, Span::styled(store.name.clone(), Style::default().fg(Color::Red)));
            }
            if let Some(user) = locations.user_location {
                let (x, y) = (user.longitude, user.latitude);
                ctx.draw(&Points { coords: &[(x, y)], color: Color::Cyan });
                ctx.print(x, y, Span::styled("You", Style::default().fg(Color::Cyan).bold()));
            }
        });

    frame.render_widget(canvas, area);
}

/// Centered popup rectangle, clamped to the frame
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        (area.width.saturating_sub(width)) / 2,
        (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn render_alert(app: &App, frame: &mut Frame, area: Rect) {
    let message = app.alert.as_deref().unwrap_or_default();
    let popup_area = popup_rect(area, 50, 6);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Alert ");

    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().bold())),
        Line::default(),
        Line::from(Span::styled("Press any key to continue", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn render_token_input(app: &App, frame: &mut Frame, area: Rect) {
    let popup_area = popup_rect(area, 64, 7);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Sign in with Google ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let instructions = Paragraph::new("Paste your Google ID token. Enter to sign in, Esc to cancel.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(instructions, Rect::new(inner.x, inner.y, inner.width, 1));

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);

    // Mask the token, keeping the last 4 chars visible
    let len = app.token_input.chars().count();
    let display_text = if len <= 4 {
        "*".repeat(len)
    } else {
        let masked_len = len - 4;
        let last_four: String = app.token_input.chars().skip(masked_len).collect();
        format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
    };
    frame.render_widget(
        Paragraph::new(display_text).style(Style::default().fg(Color::Cyan)),
        input_area,
    );

    let cursor_x = app.token_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let status = Paragraph::new(format!("{len} characters"))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, Rect::new(inner.x, inner.y + 4, inner.width, 1));
}

fn render_image_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let images = app.latest_images();
    let popup_area = popup_rect(area, 50, images.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Product Images (Enter to view, Esc to cancel) ");

    let items: Vec<ListItem> = images
        .iter()
        .map(|image| ListItem::new(format!(" {} ", image.name)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.image_picker_state);
}

fn render_image_modal(app: &App, frame: &mut Frame, area: Rect) {
    let url = app.session.selected_image().unwrap_or_default();
    let popup_area = popup_rect(area, 80, 7);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BRAND))
        .title(" Product Image ");

    let text = vec![
        Line::from(Span::styled(
            url.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        )),
        Line::default(),
        Line::from(Span::styled("Esc to close", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = if app.session.is_chat_open() { " CHAT " } else { " HOME " };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: &[(&str, &str)] = if app.show_token_input {
        &[("Enter", "sign in"), ("Esc", "cancel")]
    } else if app.session.selected_image().is_some() || app.show_image_picker {
        &[("j/k", "nav"), ("Enter", "open"), ("Esc", "close")]
    } else if !app.session.is_chat_open() {
        &[("←/→", "category"), ("Enter", "start shopping"), ("S/O", "sign in/out"), ("q", "quit")]
    } else if app.input_mode == InputMode::Editing {
        &[("Enter", "send"), ("Esc", "stop typing")]
    } else {
        &[
            ("i", "type"),
            ("j/k", "scroll"),
            ("g/G", "top/bottom"),
            ("p", "images"),
            ("x", "close chat"),
            ("q", "quit"),
        ]
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, text) in pairs {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!(" {text} "), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
