use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use finn_core::{classify, image_url, ChatClient, ChatSession, ClassifiedView, Config};

use crate::tui::ReplyEvent;

/// Header navigation categories. Every one of them routes to the landing page.
pub const CATEGORIES: [&str; 6] = ["Hike & Camp", "Cycling", "Running", "Women", "Men", "Kids"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// A product image the shopper can open in the image modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub name: String,
    pub url: String,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: ChatSession,
    pub client: ChatClient,

    // Header
    pub selected_category: usize,

    // Chat input and scrolling
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat area, updated during render
    pub chat_total_lines: u16,
    pub follow_tail: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Sign-in popup
    pub show_token_input: bool,
    pub token_input: String,
    pub token_cursor: usize,

    // Blocking alert (dismissed with any key)
    pub alert: Option<String>,

    // Image picker state
    pub show_image_picker: bool,
    pub image_picker_state: ListState,

    // Panel area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config, backend_override: Option<&str>) -> Self {
        let backend_url = backend_override
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| config.resolved_backend_url());

        tracing::info!(backend = %backend_url, "starting session");

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            session: ChatSession::new(config.resolved_id_token()),
            client: ChatClient::new(&backend_url),

            selected_category: 0,

            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_total_lines: 0,
            follow_tail: true,

            animation_frame: 0,

            show_token_input: false,
            token_input: String::new(),
            token_cursor: 0,

            alert: None,

            show_image_picker: false,
            image_picker_state: ListState::default(),

            chat_area: None,
        }
    }

    pub fn open_chat(&mut self) {
        self.session.open_chat();
        self.input_mode = InputMode::Editing;
        self.follow_tail = true;
    }

    pub fn close_chat(&mut self) {
        self.session.close_chat();
        self.show_image_picker = false;
        self.input_mode = InputMode::Normal;
    }

    pub fn next_category(&mut self) {
        self.selected_category = (self.selected_category + 1) % CATEGORIES.len();
    }

    pub fn prev_category(&mut self) {
        self.selected_category = (self.selected_category + CATEGORIES.len() - 1) % CATEGORIES.len();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn apply_reply_event(&mut self, event: ReplyEvent) {
        match event {
            ReplyEvent::Chunk(chunk) => self.session.append_reply_chunk(&chunk),
            ReplyEvent::Done => {
                tracing::info!("reply finished");
                self.session.finish_reply();
            }
            ReplyEvent::Failed(error) => {
                tracing::error!(%error, "chat request failed");
                self.session.fail_reply();
            }
        }
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        let max = self.chat_total_lines.saturating_sub(self.chat_height);
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
        self.follow_tail = self.chat_scroll >= max;
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    pub fn scroll_chat_to_top(&mut self) {
        self.chat_scroll = 0;
        self.follow_tail = false;
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.follow_tail = true;
    }

    /// View of the newest assistant reply, if it has one
    pub fn latest_view(&self) -> Option<ClassifiedView> {
        self.session.last_reply().map(|m| classify(&m.content))
    }

    /// Product images shown in the newest reply
    pub fn latest_images(&self) -> Vec<ImageLink> {
        let Some(view) = self.latest_view() else {
            return Vec::new();
        };
        let images = view
            .image_keys()
            .into_iter()
            .map(|name| ImageLink {
                name: name.to_string(),
                url: image_url(self.client.base_url(), name),
            })
            .collect();
        images
    }

    pub fn open_image_picker(&mut self) {
        if self.latest_images().is_empty() {
            return;
        }
        self.show_image_picker = true;
        self.image_picker_state.select(Some(0));
    }

    pub fn image_picker_nav_down(&mut self) {
        let len = self.latest_images().len();
        if len > 0 {
            let i = self.image_picker_state.selected().unwrap_or(0);
            self.image_picker_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn image_picker_nav_up(&mut self) {
        let i = self.image_picker_state.selected().unwrap_or(0);
        self.image_picker_state.select(Some(i.saturating_sub(1)));
    }

    /// Open the image modal for the highlighted picker entry
    pub fn select_image(&mut self) {
        let images = self.latest_images();
        if let Some(image) = self
            .image_picker_state
            .selected()
            .and_then(|i| images.get(i))
        {
            self.session.select_image(image.url.clone());
        }
        self.show_image_picker = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let config = Config {
            backend_url: Some("http://shop.test".into()),
            id_token: Some("tok".into()),
        };
        App::new(&config, Some("http://shop.test/"))
    }

    #[test]
    fn categories_wrap_around() {
        let mut app = app();
        app.prev_category();
        assert_eq!(CATEGORIES[app.selected_category], "Kids");
        app.next_category();
        assert_eq!(CATEGORIES[app.selected_category], "Hike & Camp");
    }

    #[test]
    fn streamed_reply_images_are_listed() {
        let mut app = app();
        app.open_chat();
        app.session.begin_send("tents").unwrap();
        app.apply_reply_event(ReplyEvent::Chunk("Here are some products:\n• Product: Summit".into()));
        app.apply_reply_event(ReplyEvent::Chunk(" 2P\nLight tent".into()));
        app.apply_reply_event(ReplyEvent::Done);

        assert_eq!(
            app.latest_images(),
            vec![ImageLink {
                name: "Summit 2P".into(),
                url: "http://shop.test/images/Summit%202P.png".into(),
            }]
        );

        app.open_image_picker();
        app.select_image();
        assert_eq!(app.session.selected_image(), Some("http://shop.test/images/Summit%202P.png"));
        assert!(!app.show_image_picker);
    }

    #[test]
    fn failed_reply_leaves_chat_usable() {
        let mut app = app();
        app.open_chat();
        app.session.begin_send("hi").unwrap();
        app.apply_reply_event(ReplyEvent::Failed("connection refused".into()));

        assert!(!app.session.is_busy());
        assert_eq!(
            app.latest_view(),
            Some(ClassifiedView::PlainText(vec![
                finn_core::state::APOLOGY_MESSAGE.to_string()
            ]))
        );
    }

    #[test]
    fn scrolling_up_stops_following() {
        let mut app = app();
        app.chat_total_lines = 50;
        app.chat_height = 10;
        app.chat_scroll = 40;

        app.scroll_chat_up(5);
        assert!(!app.follow_tail);
        app.scroll_chat_down(100);
        assert_eq!(app.chat_scroll, 40);
        assert!(app.follow_tail);
    }
}
