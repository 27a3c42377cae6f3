use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use finn_core::{ChatClient, Config, OutgoingMessage, SendError};

use crate::app::{App, InputMode};
use crate::tui::{AppEvent, ReplyEvent};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text editing shared by the chat input and the sign-in popup.
/// Returns false when the key is not an editing key.
fn edit_line(input: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(input.chars().count()),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = input.chars().count(),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(input, *cursor);
            input.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => return false,
    }
    true
}

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply(reply) => app.apply_reply_event(reply),
    }
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Popups take the keyboard, most recent first
    if app.alert.is_some() {
        app.alert = None;
        return;
    }
    if app.show_token_input {
        handle_token_input(app, key);
        return;
    }
    if app.session.selected_image().is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.session.close_image();
        }
        return;
    }
    if app.show_image_picker {
        handle_image_picker(app, key);
        return;
    }

    if !app.session.is_chat_open() {
        handle_home(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_chat_normal(app, key),
        InputMode::Editing => handle_chat_editing(app, key, tx),
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.prev_category(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_category(),

        // Start Shopping
        KeyCode::Enter | KeyCode::Char('c') => app.open_chat(),

        KeyCode::Char('S') => open_sign_in(app),
        KeyCode::Char('O') => sign_out(app),

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('x') => app.close_chat(),
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_down(app.chat_height / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_up(app.chat_height / 2);
        }
        KeyCode::PageDown => app.scroll_chat_down(app.chat_height),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_height),
        KeyCode::Char('g') => app.scroll_chat_to_top(),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        KeyCode::Char('p') => app.open_image_picker(),

        KeyCode::Char('S') => open_sign_in(app),
        KeyCode::Char('O') => sign_out(app),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => send_message(app, tx),
        KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Down => app.scroll_chat_down(1),
        _ => {
            edit_line(&mut app.chat_input, &mut app.chat_cursor, key);
        }
    }
}

fn handle_token_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.show_token_input = false;
            app.token_input.clear();
            app.token_cursor = 0;
        }
        KeyCode::Enter => {
            let token = app.token_input.trim().to_string();
            if !token.is_empty() {
                if let Err(e) = Config::save_id_token(&token) {
                    tracing::warn!(error = %e, "could not persist identity token");
                }
                app.session.sign_in(token);
                tracing::info!("signed in");
            }
            app.show_token_input = false;
            app.token_input.clear();
            app.token_cursor = 0;
        }
        _ => {
            edit_line(&mut app.token_input, &mut app.token_cursor, key);
        }
    }
}

fn handle_image_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('p') => app.show_image_picker = false,
        KeyCode::Char('j') | KeyCode::Down => app.image_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.image_picker_nav_up(),
        KeyCode::Enter => app.select_image(),
        _ => {}
    }
}

fn open_sign_in(app: &mut App) {
    app.show_token_input = true;
    app.token_input.clear();
    app.token_cursor = 0;
}

fn sign_out(app: &mut App) {
    if !app.session.is_signed_in() {
        return;
    }
    app.session.sign_out();
    if let Err(e) = Config::clear_id_token() {
        tracing::warn!(error = %e, "could not clear stored identity token");
    }
    tracing::info!("signed out");
}

fn send_message(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    match app.session.begin_send(&app.chat_input) {
        Ok(outgoing) => {
            app.chat_input.clear();
            app.chat_cursor = 0;
            app.follow_tail = true;

            // Spawn background task to stream the reply into the event loop
            let client = app.client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                stream_reply(client, outgoing, tx).await;
            });
        }
        Err(SendError::NotSignedIn) => {
            app.alert = Some(SendError::NotSignedIn.to_string());
        }
        // Sending is disabled while a reply streams, and blank input is ignored
        Err(SendError::Busy | SendError::Empty) => {}
    }
}

async fn stream_reply(client: ChatClient, outgoing: OutgoingMessage, tx: UnboundedSender<AppEvent>) {
    let last = match client.send(&outgoing).await {
        Ok(mut reply) => loop {
            match reply.next_chunk().await {
                Some(Ok(chunk)) => {
                    if tx.send(AppEvent::Reply(ReplyEvent::Chunk(chunk))).is_err() {
                        return;
                    }
                }
                Some(Err(e)) => break ReplyEvent::Failed(format!("{e:#}")),
                None => break ReplyEvent::Done,
            }
        },
        Err(e) => ReplyEvent::Failed(format!("{e:#}")),
    };

    let _ = tx.send(AppEvent::Reply(last));
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);

    if !in_chat || !app.session.is_chat_open() {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_chat_down(3),
        MouseEventKind::ScrollUp => app.scroll_chat_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use crate::app::CATEGORIES;
    use finn_core::Config;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn signed_out_app() -> App {
        App::new(&Config::default(), Some("http://127.0.0.1:9"))
    }

    #[test]
    fn utf8_editing_keeps_cursor_in_chars() {
        let mut input = String::new();
        let mut cursor = 0;
        for c in "café".chars() {
            edit_line(&mut input, &mut cursor, key(KeyCode::Char(c)));
        }
        edit_line(&mut input, &mut cursor, key(KeyCode::Left));
        edit_line(&mut input, &mut cursor, key(KeyCode::Backspace));

        assert_eq!(input, "caé");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn enter_on_home_opens_chat_in_editing_mode() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = signed_out_app();

        handle_key(&mut app, key(KeyCode::Right), &tx);
        handle_key(&mut app, key(KeyCode::Enter), &tx);

        assert_eq!(CATEGORIES[app.selected_category], "Cycling");
        assert!(app.session.is_chat_open());
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.session.messages().len(), 1);
    }

    #[test]
    fn sending_while_signed_out_raises_alert() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = signed_out_app();
        if app.session.is_signed_in() {
            // FINN_ID_TOKEN is set in this environment
            return;
        }
        app.open_chat();
        app.chat_input = "tents".into();

        handle_key(&mut app, key(KeyCode::Enter), &tx);

        assert_eq!(app.alert.as_deref(), Some("Please sign in with Google first!"));
        assert_eq!(app.session.messages().len(), 1);
        assert_eq!(app.chat_input, "tents");

        // Any key dismisses the alert without reaching the input
        handle_key(&mut app, key(KeyCode::Char('z')), &tx);
        assert_eq!(app.alert, None);
        assert_eq!(app.chat_input, "tents");
    }

    #[test]
    fn reply_events_flow_into_the_session() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = signed_out_app();
        app.session.sign_in("tok");
        app.open_chat();
        app.session.begin_send("hi").unwrap();

        handle_event(&mut app, AppEvent::Reply(ReplyEvent::Chunk("Hello".into())), &tx);
        handle_event(&mut app, AppEvent::Reply(ReplyEvent::Done), &tx);

        assert!(!app.session.is_busy());
        assert_eq!(app.session.last_reply().map(|m| m.content.as_str()), Some("Hello"));
    }

    #[tokio::test]
    async fn unreachable_backend_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outgoing = OutgoingMessage {
            token: "tok".into(),
            message: "hi".into(),
            history: Vec::new(),
        };

        stream_reply(ChatClient::new("http://127.0.0.1:9"), outgoing, tx).await;

        match rx.recv().await {
            Some(AppEvent::Reply(ReplyEvent::Failed(_))) => {}
            other => panic!("expected a failure event, got {other:?}"),
        }
    }
}
