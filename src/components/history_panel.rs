use std::rc::Rc;
use std::time::{Duration, SystemTime};

use api_tester::{EntryId, History};
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{v_flex, ActiveTheme};

/// One line of the history list, precomputed from the session.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    pub id: EntryId,
    pub label: String,
    pub preview: String,
    pub age: String,
    pub succeeded: bool,
    pub selected: bool,
}

/// Rows newest first, the order the panel shows them in.
pub fn history_rows(
    history: &History,
    selected: Option<EntryId>,
    preview_chars: usize,
    now: SystemTime,
) -> Vec<HistoryRow> {
    history
        .recent_first()
        .map(|entry| HistoryRow {
            id: entry.id(),
            label: entry.display_label(),
            preview: entry.response().preview(preview_chars),
            // A clock that went backwards reads as "just now".
            age: age_label(now.duration_since(entry.created_at()).unwrap_or_default()),
            succeeded: entry.response().is_success(),
            selected: selected == Some(entry.id()),
        })
        .collect()
}

fn age_label(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..=4 => "just now".to_string(),
        5..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        _ => format!("{}h ago", secs / 3600),
    }
}

type SelectHandler = Rc<dyn Fn(&EntryId, &mut Window, &mut App)>;

#[derive(IntoElement)]
pub struct HistoryPanel {
    pending: Option<String>,
    rows: Vec<HistoryRow>,
    on_select: SelectHandler,
}

impl HistoryPanel {
    pub fn new(pending: Option<String>, rows: Vec<HistoryRow>, on_select: SelectHandler) -> Self {
        Self {
            pending,
            rows,
            on_select,
        }
    }

    fn render_row(
        row: HistoryRow,
        on_select: SelectHandler,
        selected_bg: Hsla,
        muted: Hsla,
    ) -> impl IntoElement {
        let id = row.id;
        let label_color = if row.succeeded {
            hsla(0.0, 0.0, 0.85, 1.0)
        } else {
            hsla(0.0, 0.8, 0.65, 1.0)
        };

        div()
            .id(ElementId::Name(format!("history-{}", id.0).into()))
            .flex()
            .flex_col()
            .gap_1()
            .px_2()
            .py_1()
            .rounded(px(4.0))
            .cursor_pointer()
            .when(row.selected, |this| this.bg(selected_bg))
            .hover(|s| s.bg(hsla(0.0, 0.0, 0.15, 1.0)))
            .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                on_select(&id, window, cx)
            })
            .child(
                div()
                    .text_sm()
                    .overflow_hidden()
                    .whitespace_nowrap()
                    .text_ellipsis()
                    .text_color(label_color)
                    .child(row.label),
            )
            .child(
                div()
                    .flex()
                    .gap_2()
                    .text_xs()
                    .text_color(muted)
                    .child(
                        div()
                            .flex_1()
                            .overflow_hidden()
                            .whitespace_nowrap()
                            .text_ellipsis()
                            .child(row.preview),
                    )
                    .child(div().flex_none().child(row.age)),
            )
    }
}

impl RenderOnce for HistoryPanel {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let is_empty = self.rows.is_empty() && self.pending.is_none();
        let on_select = self.on_select;
        let selected_bg = cx.theme().secondary;
        let muted = cx.theme().muted_foreground;

        div()
            .id("history-list")
            .flex_1()
            .overflow_y_scroll()
            .p_3()
            .child(
                div()
                    .mb_2()
                    .text_xs()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(hsla(0.0, 0.0, 0.6, 1.0))
                    .child("HISTORY"),
            )
            .child(
                v_flex()
                    .gap_1()
                    .when_some(self.pending, |this, label| {
                        this.child(
                            div()
                                .px_2()
                                .py_1()
                                .text_sm()
                                .text_color(hsla(0.12, 0.8, 0.6, 1.0))
                                .child(label),
                        )
                    })
                    .when(is_empty, |this| {
                        this.child(
                            div()
                                .p_2()
                                .text_xs()
                                .text_color(muted)
                                .child("No requests sent yet"),
                        )
                    })
                    .children(
                        self.rows
                            .into_iter()
                            .map(|row| Self::render_row(row, on_select.clone(), selected_bg, muted)),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::rust_2021::test;
    use api_tester::{HistoryEntry, HttpMethod, Request, Response};

    fn entry(id: u64, url: &str, response: Response, created_at: SystemTime) -> HistoryEntry {
        HistoryEntry::new(
            EntryId(id),
            Request::new(HttpMethod::Get, url, Vec::new(), None),
            response,
            created_at,
        )
    }

    #[test]
    fn test_history_rows_newest_first_with_selection() {
        let now = SystemTime::now();
        let mut history = History::new();
        history.append(entry(
            1,
            "https://a.test",
            Response::Failure {
                message: "Connection failed:\nrefused".to_string(),
                elapsed_ms: 3.0,
            },
            now - Duration::from_secs(125),
        ));
        history.append(entry(
            2,
            "https://b.test",
            Response::Success {
                status_code: 200,
                reason: Some("OK".to_string()),
                elapsed_ms: 12.0,
                headers: Vec::new(),
                body: "hello".to_string(),
                is_json: false,
                display_body: "hello".to_string(),
            },
            now,
        ));

        let rows = history_rows(&history, Some(EntryId(1)), 200, now);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, EntryId(2));
        assert_eq!(rows[0].label, "GET https://b.test (200, 12 ms)");
        assert!(rows[0].succeeded);
        assert!(!rows[0].selected);
        assert_eq!(rows[1].preview, "Connection failed: refused");
        assert!(!rows[1].succeeded);
        assert!(rows[1].selected);
        assert_eq!(rows[0].age, "just now");
        assert_eq!(rows[1].age, "2m ago");
    }

    #[test]
    fn test_age_label_units() {
        assert_eq!(age_label(Duration::from_secs(42)), "42s ago");
        assert_eq!(age_label(Duration::from_secs(2 * 3600 + 5)), "2h ago");
    }
}
