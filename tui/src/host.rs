//! In-memory challenge page driven by the terminal.

use tracing::debug;

use tessera_engine::{
    AlertSender, CandidateItem, ComputedStyle, Display, ItemId, ModalSurface, Page, Rect,
};

const TILE_SIZE: f64 = 100.0;

/// One grid cell as the terminal shows it.
#[derive(Debug, Clone)]
pub struct Tile {
    pub item: CandidateItem,
    pub selected: bool,
}

impl Tile {
    #[must_use]
    pub fn label(&self) -> &str {
        self.item.id.as_ref().map_or("?", ItemId::as_str)
    }
}

/// A grid challenge page plus the pieces the controller paints on it.
#[derive(Debug)]
pub struct HostPage {
    columns: usize,
    tiles: Vec<Tile>,
    cursor: usize,
    title: String,
    status: String,
    modal: Option<String>,
    indicator: bool,
    pulse: bool,
    actions_enabled: bool,
    submitted: Vec<String>,
    alerts: Option<AlertSender>,
}

impl HostPage {
    /// `columns` x `rows` tiles with ids `1..=n` in reading order. Indices in
    /// `hidden` are rendered with `display: none`.
    #[must_use]
    pub fn new(columns: usize, rows: usize, hidden: &[usize]) -> Self {
        let columns = columns.max(1);
        let tiles = (0..columns * rows.max(1))
            .map(|index| {
                let number = index + 1;
                let id = ItemId::new(number.to_string()).ok();
                let rect = Rect::new(
                    (index % columns) as f64 * TILE_SIZE,
                    (index / columns) as f64 * TILE_SIZE,
                    TILE_SIZE,
                    TILE_SIZE,
                );
                let style = ComputedStyle {
                    display: if hidden.contains(&index) {
                        Display::None
                    } else {
                        Display::Shown
                    },
                    background: format!("url(\"tile-{number}.png\")"),
                    ..ComputedStyle::default()
                };
                Tile {
                    item: CandidateItem::new(id, rect, style),
                    selected: false,
                }
            })
            .collect();
        Self {
            columns,
            tiles,
            cursor: 0,
            title: "Tessera challenge".to_string(),
            status: String::new(),
            modal: None,
            indicator: false,
            pulse: false,
            actions_enabled: false,
            submitted: Vec::new(),
            alerts: None,
        }
    }

    /// Route form submissions back as alerts, the way the challenge page reports results.
    pub fn attach_alerts(&mut self, alerts: AlertSender) {
        self.alerts = Some(alerts);
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor by whole cells, clamped to the grid.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        if self.tiles.is_empty() {
            return;
        }
        let columns = self.columns as isize;
        let len = self.tiles.len() as isize;
        let current = self.cursor as isize;
        let col = (current % columns + dx).clamp(0, columns - 1);
        let row = (current / columns + dy).max(0);
        let target = row * columns + col;
        if target < len {
            self.cursor = target as usize;
        }
    }

    /// Id under the cursor, if the tile has one.
    #[must_use]
    pub fn cursor_id(&self) -> Option<ItemId> {
        self.tiles.get(self.cursor).and_then(|tile| tile.item.id.clone())
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn modal(&self) -> Option<&str> {
        self.modal.as_deref()
    }

    #[must_use]
    pub fn indicator(&self) -> bool {
        self.indicator
    }

    #[must_use]
    pub fn pulse(&self) -> bool {
        self.pulse
    }

    #[must_use]
    pub fn actions_enabled(&self) -> bool {
        self.actions_enabled
    }

    #[must_use]
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }

    #[must_use]
    pub fn page_title(&self) -> &str {
        &self.title
    }
}

impl Page for HostPage {
    fn candidates(&self) -> Vec<CandidateItem> {
        self.tiles.iter().map(|tile| tile.item.clone()).collect()
    }

    fn has_selection_hooks(&self) -> bool {
        true
    }

    fn mark_selected(&mut self, id: &ItemId, selected: bool) {
        if let Some(tile) = self
            .tiles
            .iter_mut()
            .find(|tile| tile.item.id.as_ref() == Some(id))
        {
            tile.selected = selected;
        }
    }

    fn set_actions_enabled(&mut self, enabled: bool) {
        self.actions_enabled = enabled;
    }

    fn submit_form(&mut self, value: &str) {
        debug!(value, "Form submitted");
        self.submitted.push(value.to_string());
        if let Some(alerts) = &self.alerts {
            alerts.alert(format!("Submitted selection: {value}"));
        }
    }

    fn set_status_text(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_toggle_indicator(&mut self, enabled: bool) {
        self.indicator = enabled;
    }

    fn set_toggle_pulse(&mut self, active: bool) {
        self.pulse = active;
    }
}

impl ModalSurface for HostPage {
    fn show_modal(&mut self, message: &str) {
        self.modal = Some(message.to_string());
    }

    fn hide_modal(&mut self) {
        self.modal = None;
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}
