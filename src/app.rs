//! Browser state machine.
//!
//! Owns selection, pane focus, scroll offsets and the transient notification.
//! Key handling is pure: terminal I/O and file writes happen in the caller,
//! driven by the [`Effect`] returned from [`App::handle`].

use std::time::{Duration, Instant};

use crate::export::render_export;
use crate::models::{FilterKind, FilterState, Job};
use crate::store::JobStore;

/// Rows shown in the list pane at once.
pub const LIST_HEIGHT: usize = 15;
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleFocus,
    Up,
    Down,
    Left,
    Right,
    ToggleFilter(FilterKind),
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Export { contents: String, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct App {
    store: JobStore,
    selected_index: usize,
    active_pane: Pane,
    list_scroll_offset: usize,
    detail_scroll_offset: u16,
    notification: Option<Notification>,
}

pub struct ListRow<'a> {
    pub job: &'a Job,
    pub is_selected: bool,
}

/// Everything the renderer needs for one frame.
pub struct BrowserView<'a> {
    pub total: usize,
    pub visible: usize,
    pub filters: FilterState,
    pub active_pane: Pane,
    pub rows: Vec<ListRow<'a>>,
    pub selected_job: Option<&'a Job>,
    pub detail_scroll: u16,
    pub notification: Option<&'a str>,
}

impl App {
    pub fn new(jobs: Vec<Job>, filters: FilterState) -> Self {
        Self {
            store: JobStore::new(jobs, filters),
            selected_index: 0,
            active_pane: Pane::List,
            list_scroll_offset: 0,
            detail_scroll_offset: 0,
            notification: None,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn handle(&mut self, action: Action) -> Option<Effect> {
        match (action, self.active_pane) {
            (Action::Quit, _) => return Some(Effect::Quit),
            (Action::ToggleFocus, pane) => {
                self.active_pane = match pane {
                    Pane::List => Pane::Detail,
                    Pane::Detail => Pane::List,
                };
            }
            (Action::Down, Pane::List) | (Action::Right, Pane::Detail) => self.move_selection(1),
            (Action::Up, Pane::List) | (Action::Left, Pane::Detail) => self.move_selection(-1),
            (Action::Down, Pane::Detail) => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
            }
            (Action::Up, Pane::Detail) => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
            }
            (Action::Left | Action::Right, Pane::List) => {}
            // Selection is clamped lazily in `view`.
            (Action::ToggleFilter(kind), _) => self.store.toggle(kind),
            (Action::Export, _) => {
                return Some(Effect::Export {
                    contents: render_export(self.store.visible_jobs()),
                    count: self.store.visible_len(),
                });
            }
        }
        None
    }

    /// Shows `text` until `now + NOTIFICATION_TTL`, replacing any pending notification.
    pub fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            text: text.into(),
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    /// Clears an expired notification. Returns true if the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.notification {
            Some(n) if n.expires_at <= now => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.notification.as_ref().map(|n| n.expires_at)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.visible_len();
        let target = if len == 0 {
            0
        } else {
            self.selected_index
                .saturating_add_signed(delta)
                .min(len - 1)
        };
        self.select(target);
    }

    fn select(&mut self, index: usize) {
        if index != self.selected_index {
            self.selected_index = index;
            self.detail_scroll_offset = 0;
        }
        self.list_scroll_offset = scroll_into_view(self.list_scroll_offset, self.selected_index);
    }

    pub fn view(&self) -> BrowserView<'_> {
        let visible = self.store.visible_len();
        let selected = self.selected_index.min(visible.saturating_sub(1));
        let offset = scroll_into_view(
            self.list_scroll_offset.min(visible.saturating_sub(LIST_HEIGHT)),
            selected,
        );
        let end = (offset + LIST_HEIGHT).min(visible);

        let rows = (offset..end)
            .filter_map(|i| {
                self.store.visible(i).map(|job| ListRow {
                    job,
                    is_selected: i == selected,
                })
            })
            .collect();

        BrowserView {
            total: self.store.total(),
            visible,
            filters: self.store.filters(),
            active_pane: self.active_pane,
            rows,
            selected_job: self.store.visible(selected),
            detail_scroll: self.detail_scroll_offset,
            notification: self.notification.as_ref().map(|n| n.text.as_str()),
        }
    }
}

/// Minimal-motion window: only moves when `selected` leaves `[offset, offset + LIST_HEIGHT)`.
pub fn scroll_into_view(offset: usize, selected: usize) -> usize {
    if selected < offset {
        selected
    } else if selected >= offset + LIST_HEIGHT {
        selected + 1 - LIST_HEIGHT
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: usize, us: bool, remote: bool, visa: bool) -> Job {
        Job {
            id: id.to_string(),
            user: "someone".to_string(),
            age: "1 hours ago".to_string(),
            header: format!("Company {} | Somewhere", id),
            company: format!("Company {}", id),
            location: "Unknown".to_string(),
            url: None,
            content: format!("body {}", id),
            is_us_only: us,
            is_remote: remote,
            is_visa: visa,
            source_line: 0,
        }
    }

    fn app_with(n: usize) -> App {
        App::new((0..n).map(|i| job(i, i % 2 == 0, i % 3 == 0, false)).collect(), FilterState::default())
    }

    #[test]
    fn test_quit_returns_effect() {
        let mut app = app_with(2);
        assert_eq!(app.handle(Action::Quit), Some(Effect::Quit));
    }

    #[test]
    fn test_focus_toggle_changes_only_pane() {
        let mut app = app_with(5);
        app.handle(Action::Down);
        app.handle(Action::Down);
        let before = (app.selected_index, app.list_scroll_offset, app.detail_scroll_offset);

        assert_eq!(app.handle(Action::ToggleFocus), None);
        assert_eq!(app.active_pane, Pane::Detail);
        assert_eq!(before, (app.selected_index, app.list_scroll_offset, app.detail_scroll_offset));

        app.handle(Action::ToggleFocus);
        assert_eq!(app.active_pane, Pane::List);
    }

    #[test]
    fn test_list_selection_clamps() {
        let mut app = app_with(3);
        app.handle(Action::Up);
        assert_eq!(app.selected_index, 0);

        app.handle(Action::Down);
        app.handle(Action::Down);
        assert_eq!(app.selected_index, 2);
        app.handle(Action::Down);
        assert_eq!(app.selected_index, 2);

        // Left/right do nothing in the list pane.
        app.handle(Action::Left);
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_empty_list_navigation() {
        let mut app = app_with(0);
        app.handle(Action::Down);
        app.handle(Action::Up);
        assert_eq!(app.selected_index, 0);
        let view = app.view();
        assert!(view.rows.is_empty());
        assert!(view.selected_job.is_none());
    }

    #[test]
    fn test_detail_pane_scrolls_and_navigates() {
        let mut app = app_with(3);
        app.handle(Action::ToggleFocus);

        app.handle(Action::Up);
        assert_eq!(app.detail_scroll_offset, 0);
        app.handle(Action::Down);
        app.handle(Action::Down);
        assert_eq!(app.detail_scroll_offset, 2);
        assert_eq!(app.selected_index, 0);

        app.handle(Action::Right);
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.detail_scroll_offset, 0);

        app.handle(Action::Down);
        app.handle(Action::Left);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.detail_scroll_offset, 0);

        // Clamped at the start: selection unchanged, scroll kept.
        app.handle(Action::Down);
        app.handle(Action::Left);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.detail_scroll_offset, 1);
    }

    #[test]
    fn test_filter_toggle_does_not_reclamp_selection() {
        // Evens are US-only: excluding them leaves ids 1 and 3.
        let mut app = app_with(5);
        for _ in 0..4 {
            app.handle(Action::Down);
        }
        assert_eq!(app.selected_index, 4);

        app.handle(Action::ToggleFilter(FilterKind::ExcludeUsOnly));
        assert_eq!(app.selected_index, 4);

        let view = app.view();
        assert_eq!(view.visible, 2);
        assert_eq!(view.selected_job.map(|j| j.id.as_str()), Some("3"));
        assert!(view.rows.iter().any(|r| r.is_selected && r.job.id == "3"));

        app.handle(Action::Up);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_filter_toggle_works_from_detail_pane() {
        let mut app = app_with(6);
        app.handle(Action::ToggleFocus);
        app.handle(Action::ToggleFilter(FilterKind::RemoteOnly));
        assert!(app.view().filters.remote_only);
        assert_eq!(app.view().visible, 2);
        app.handle(Action::ToggleFilter(FilterKind::RemoteOnly));
        assert_eq!(app.view().visible, 6);
    }

    #[test]
    fn test_list_window_follows_selection() {
        let mut app = app_with(40);
        for _ in 0..LIST_HEIGHT - 1 {
            app.handle(Action::Down);
        }
        assert_eq!(app.list_scroll_offset, 0);

        app.handle(Action::Down);
        assert_eq!(app.selected_index, LIST_HEIGHT);
        assert_eq!(app.list_scroll_offset, 1);

        for _ in 0..5 {
            app.handle(Action::Down);
        }
        assert_eq!(app.list_scroll_offset, 6);

        // Moving back inside the window does not scroll.
        for _ in 0..14 {
            app.handle(Action::Up);
        }
        assert_eq!(app.selected_index, 6);
        assert_eq!(app.list_scroll_offset, 6);

        app.handle(Action::Up);
        assert_eq!(app.selected_index, 5);
        assert_eq!(app.list_scroll_offset, 5);

        let view = app.view();
        assert_eq!(view.rows.len(), LIST_HEIGHT);
        assert_eq!(view.rows[0].job.id, "5");
        assert!(view.rows[0].is_selected);
    }

    #[test]
    fn test_scroll_into_view() {
        assert_eq!(scroll_into_view(0, 3), 0);
        assert_eq!(scroll_into_view(0, LIST_HEIGHT), 1);
        assert_eq!(scroll_into_view(10, 4), 4);
        assert_eq!(scroll_into_view(10, 10 + LIST_HEIGHT - 1), 10);
    }

    #[test]
    fn test_export_effect_uses_visible_jobs() {
        let mut app = app_with(4);
        app.handle(Action::ToggleFilter(FilterKind::ExcludeUsOnly));
        match app.handle(Action::Export) {
            Some(Effect::Export { contents, count }) => {
                assert_eq!(count, 2);
                assert_eq!(contents, "body 1\n\n---\n\nbody 3\n\n---\n\n");
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_notification_expires_and_replaces() {
        let mut app = app_with(1);
        let start = Instant::now();

        app.notify("Exported 1 jobs to jobs_filtered.md", start);
        assert_eq!(app.view().notification, Some("Exported 1 jobs to jobs_filtered.md"));
        assert!(!app.tick(start + Duration::from_secs(2)));

        // A newer notification pushes the deadline out.
        app.notify("again", start + Duration::from_secs(2));
        assert!(!app.tick(start + Duration::from_secs(4)));
        assert_eq!(app.next_deadline(), Some(start + Duration::from_secs(5)));

        assert!(app.tick(start + Duration::from_secs(5)));
        assert!(app.notification.is_none());
        assert!(!app.tick(start + Duration::from_secs(6)));
    }
}
