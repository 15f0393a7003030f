//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search entry
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        // Tab navigation
        KeyCode::Char('1') => app.current_tab = Tab::Pokedex,
        KeyCode::Char('2') => app.current_tab = Tab::Overview,
        KeyCode::Char('3') => app.current_tab = Tab::Relations,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }

        // Actions
        KeyCode::Char('/') if app.current_tab == Tab::Pokedex => {
            app.state = AppState::Searching;
        }
        KeyCode::Char('u') => app.start_load(true),
        KeyCode::Char('s') if app.current_tab == Tab::Overview => {
            app.cycle_histogram_stat();
        }
        KeyCode::Esc if !app.search_query.is_empty() => {
            app.search_query.clear();
            app.clamp_selection();
        }

        // List navigation
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        _ => {}
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
            app.clamp_selection();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.clamp_selection();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.clamp_selection();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use dexcache_core::Config;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).expect("input")
    }

    fn test_app() -> App {
        App::new(Config::default(), Vec::new(), 0, "never".to_string())
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = test_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_tab_switching() {
        let mut app = test_app();
        assert_eq!(app.current_tab, Tab::Pokedex);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_tab, Tab::Overview);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_tab, Tab::Pokedex);
    }

    #[test]
    fn test_search_mode_captures_chars() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.search_query, "pi");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_query, "pi");

        // Esc from normal mode clears a lingering query
        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
    }

    #[test]
    fn test_s_cycles_histogram_only_on_overview() {
        let mut app = test_app();
        let initial = app.histogram_stat();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.histogram_stat(), initial);

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('s'));
        assert_ne!(app.histogram_stat(), initial);
    }
}
