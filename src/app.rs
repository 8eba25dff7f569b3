use std::rc::Rc;
use std::time::SystemTime;

use api_tester::{
    AppConfig, Dispatcher, EntryId, HttpMethod, RequestForm, Response, SendOutcome, Session,
    ValidationError,
};
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::input::{Enter, Input, InputState};
use gpui_component::scroll::Scrollbar;
use gpui_component::*;

use crate::components::history_panel::{history_rows, HistoryPanel};

/// Ctrl+Enter (Cmd+Enter on macOS) in the body editor sends the request.
/// Plain Enter keeps inserting a newline.
fn submits_request(action: &Enter) -> bool {
    action.secondary
}

pub fn method_color(method: HttpMethod) -> Hsla {
    match method {
        HttpMethod::Get => hsla(0.35, 0.8, 0.45, 1.0),     // Green
        HttpMethod::Post => hsla(0.55, 0.8, 0.45, 1.0),    // Blue
        HttpMethod::Put => hsla(0.12, 0.8, 0.50, 1.0),     // Orange
        HttpMethod::Patch => hsla(0.75, 0.6, 0.55, 1.0),   // Purple
        HttpMethod::Delete => hsla(0.0, 0.8, 0.50, 1.0),   // Red
        HttpMethod::Head => hsla(0.48, 0.6, 0.45, 1.0),    // Teal
        HttpMethod::Options => hsla(0.0, 0.0, 0.60, 1.0),  // Grey
    }
}

pub struct Workbench {
    config: AppConfig,
    session: Session,
    method: HttpMethod,
    url_input: Entity<InputState>,
    headers_input: Entity<InputState>,
    body_input: Entity<InputState>,
    scroll_handle: ScrollHandle,
    validation_error: Option<ValidationError>,
    selected_entry: Option<EntryId>,
    confirm_clear: bool,
}

impl Workbench {
    pub fn new(
        config: AppConfig,
        dispatcher: Dispatcher,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let url_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx);
            state.set_placeholder("Enter request URL...", window, cx);
            state.set_value("https://httpbin.org/get", window, cx);
            state
        });

        let headers_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx).multi_line(true);
            state.set_placeholder("Content-Type: application/json", window, cx);
            state
        });

        let body_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx).multi_line(true);
            state.set_placeholder("Request body...", window, cx);
            state
        });

        Self {
            config,
            session: Session::new(dispatcher),
            method: HttpMethod::Get,
            url_input,
            headers_input,
            body_input,
            scroll_handle: ScrollHandle::new(),
            validation_error: None,
            selected_entry: None,
            confirm_clear: false,
        }
    }

    fn form(&self, cx: &Context<Self>) -> RequestForm {
        RequestForm {
            method: self.method,
            url: self.url_input.read(cx).value().to_string(),
            headers: self.headers_input.read(cx).value().to_string(),
            body: self.body_input.read(cx).value().to_string(),
        }
    }

    fn send_request(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        let form = self.form(cx);
        match self.session.send(&form) {
            Ok(SendOutcome::Started) => {
                self.validation_error = None;
                self.start_polling(cx);
            }
            Ok(SendOutcome::Recorded(id)) => {
                self.validation_error = None;
                self.selected_entry = Some(id);
            }
            Ok(SendOutcome::Ignored) => return,
            Err(err) => self.validation_error = Some(err),
        }
        cx.notify();
    }

    /// Runs before the editor sees the action, so the shortcut never inserts
    /// a newline into the body.
    fn on_body_enter(&mut self, action: &Enter, window: &mut Window, cx: &mut Context<Self>) {
        if submits_request(action) {
            cx.stop_propagation();
            self.send_request(window, cx);
        }
    }

    /// Drains the session on a timer until the in-flight request lands.
    fn start_polling(&mut self, cx: &mut Context<Self>) {
        let interval = self.config.poll_interval;
        cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(interval).await;
                let sending = this.update(cx, |app, cx| {
                    if app.session.poll().is_some() {
                        cx.notify();
                    }
                    app.session.is_sending()
                })?;
                if !sending {
                    break;
                }
            }
            Ok::<_, anyhow::Error>(())
        })
        .detach();
    }

    fn select_entry(&mut self, id: EntryId, window: &mut Window, cx: &mut Context<Self>) {
        self.selected_entry = Some(id);
        self.load_entry(id, window, cx);
    }

    fn load_entry(&mut self, id: EntryId, window: &mut Window, cx: &mut Context<Self>) {
        let Some(form) = self.session.reload(id) else {
            return;
        };
        self.method = form.method;
        self.url_input
            .update(cx, |state, cx| state.set_value(form.url, window, cx));
        self.headers_input
            .update(cx, |state, cx| state.set_value(form.headers, window, cx));
        self.body_input
            .update(cx, |state, cx| state.set_value(form.body, window, cx));
        self.validation_error = None;
        cx.notify();
    }

    fn load_selected(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(id) = self.selected_entry {
            self.load_entry(id, window, cx);
        }
    }

    fn delete_selected(&mut self, cx: &mut Context<Self>) {
        if let Some(id) = self.selected_entry.take() {
            self.session.remove(id);
            cx.notify();
        }
    }

    fn clear_history(&mut self, cx: &mut Context<Self>) {
        self.session.clear_history();
        self.selected_entry = None;
        self.confirm_clear = false;
        cx.notify();
    }

    fn render_title_bar(&self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        TitleBar::new().child(
            div().flex().items_center().gap_2().child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::BOLD)
                    .text_color(hsla(0.0, 0.0, 0.95, 1.0))
                    .child(format!("⚡ {}", self.config.window_title)),
            ),
        )
    }

    fn render_request_bar(&self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let sending = self.session.is_sending();

        div()
            .flex()
            .gap_3()
            .p_4()
            .bg(hsla(0.0, 0.0, 0.12, 1.0))
            .border_b_1()
            .border_color(hsla(0.0, 0.0, 0.2, 1.0))
            .child(
                div()
                    .id("method-selector")
                    .px_3()
                    .py_2()
                    .rounded(px(6.0))
                    .bg(hsla(0.0, 0.0, 0.18, 1.0))
                    .border_1()
                    .border_color(hsla(0.0, 0.0, 0.25, 1.0))
                    .cursor_pointer()
                    .hover(|s| s.bg(hsla(0.0, 0.0, 0.22, 1.0)))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |this, _, _, cx| {
                            this.method = this.method.next();
                            cx.notify();
                        }),
                    )
                    .child(
                        div()
                            .font_weight(FontWeight::BOLD)
                            .text_sm()
                            .text_color(method_color(self.method))
                            .child(self.method.as_str()),
                    ),
            )
            .child(div().flex_1().child(Input::new(&self.url_input)))
            .child(
                Button::new("send")
                    .primary()
                    .label("Send")
                    .loading(sending)
                    .disabled(sending)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.send_request(window, cx);
                    })),
            )
    }

    fn render_field_error(&self, field: &'static str) -> Option<impl IntoElement> {
        let err = self.validation_error.as_ref().filter(|e| e.field() == field)?;
        Some(
            div()
                .mt_1()
                .text_xs()
                .text_color(hsla(0.0, 0.8, 0.65, 1.0))
                .child(err.to_string()),
        )
    }

    fn render_editor(&self, label: &'static str, input: &Entity<InputState>) -> Div {
        div()
            .flex_1()
            .flex()
            .flex_col()
            .child(
                div()
                    .mb_2()
                    .text_xs()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(hsla(0.0, 0.0, 0.6, 1.0))
                    .child(label),
            )
            .child(
                div()
                    .flex_1()
                    .min_h(px(120.0))
                    .p_3()
                    .rounded(px(6.0))
                    .bg(hsla(0.0, 0.0, 0.06, 1.0))
                    .border_1()
                    .border_color(hsla(0.0, 0.0, 0.2, 1.0))
                    .child(Input::new(input).appearance(false)),
            )
    }

    fn render_request_panel(
        &self,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        div()
            .flex()
            .gap_4()
            .p_4()
            .bg(hsla(0.0, 0.0, 0.08, 1.0))
            .child(
                self.render_editor("HEADERS (Name: Value per line)", &self.headers_input)
                    .children(self.render_field_error("headers")),
            )
            .child(
                self.render_editor("BODY", &self.body_input)
                    .capture_action(cx.listener(Self::on_body_enter)),
            )
    }

    fn render_response_panel(
        &self,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let response = self.session.last_response();

        let status_badge = match response {
            Some(response) => {
                let (bg_color, text_color) = badge_colors(response);
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        div()
                            .px_2()
                            .py_1()
                            .rounded(px(4.0))
                            .bg(bg_color)
                            .text_xs()
                            .font_weight(FontWeight::BOLD)
                            .text_color(text_color)
                            .child(response.status_line()),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(hsla(0.0, 0.0, 0.6, 1.0))
                            .child(response.elapsed_label()),
                    )
                    .into_any_element()
            }
            None if self.session.is_sending() => div()
                .text_sm()
                .text_color(hsla(0.12, 0.8, 0.6, 1.0))
                .child("Pending...")
                .into_any_element(),
            None => div()
                .text_sm()
                .text_color(hsla(0.0, 0.0, 0.5, 1.0))
                .child("No response yet")
                .into_any_element(),
        };

        let headers_text = response.map(Response::headers_text).unwrap_or_default();
        let body_text = response.map(Response::display_body).unwrap_or_default();

        let header_lines = text_lines("response-header", &headers_text);
        let body_lines = text_lines("response-line", body_text);

        div()
            .flex_1()
            .flex()
            .flex_col()
            .min_h(px(200.0))
            .bg(hsla(0.0, 0.0, 0.06, 1.0))
            .border_t_1()
            .border_color(hsla(0.0, 0.0, 0.2, 1.0))
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .p_3()
                    .bg(hsla(0.0, 0.0, 0.10, 1.0))
                    .border_b_1()
                    .border_color(hsla(0.0, 0.0, 0.2, 1.0))
                    .child(
                        div()
                            .text_sm()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(hsla(0.0, 0.0, 0.8, 1.0))
                            .child("Response"),
                    )
                    .child(status_badge),
            )
            .child(
                div()
                    .id("response-scroll")
                    .flex_1()
                    .overflow_y_scroll()
                    .track_scroll(&self.scroll_handle)
                    .p_4()
                    .bg(hsla(0.0, 0.0, 0.04, 1.0))
                    .when(!header_lines.is_empty(), |this| {
                        this.child(
                            div()
                                .mb_3()
                                .pb_3()
                                .border_b_1()
                                .border_color(hsla(0.0, 0.0, 0.2, 1.0))
                                .children(header_lines),
                        )
                    })
                    .children(body_lines),
            )
            .child(Scrollbar::vertical(&self.scroll_handle))
    }

    fn render_history(&self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let on_select = cx.listener(|this, id: &EntryId, window, cx| {
            this.select_entry(*id, window, cx);
        });
        let rows = history_rows(
            self.session.history(),
            self.selected_entry,
            self.config.preview_chars,
            SystemTime::now(),
        );
        let pending = self.session.pending_request().map(api_tester::types::pending_label);

        let actions = if self.confirm_clear {
            h_flex()
                .gap_2()
                .child(
                    div()
                        .text_xs()
                        .text_color(hsla(0.0, 0.0, 0.7, 1.0))
                        .child("Remove all saved requests?"),
                )
                .child(
                    Button::new("confirm-clear")
                        .danger()
                        .small()
                        .label("Yes")
                        .on_click(cx.listener(|this, _, _, cx| this.clear_history(cx))),
                )
                .child(
                    Button::new("cancel-clear")
                        .small()
                        .label("No")
                        .on_click(cx.listener(|this, _, _, cx| {
                            this.confirm_clear = false;
                            cx.notify();
                        })),
                )
        } else {
            h_flex()
                .gap_2()
                .child(
                    Button::new("load")
                        .small()
                        .label("Load")
                        .disabled(self.selected_entry.is_none() || self.session.is_sending())
                        .on_click(cx.listener(|this, _, window, cx| this.load_selected(window, cx))),
                )
                .child(
                    Button::new("delete")
                        .small()
                        .label("Delete")
                        .disabled(self.selected_entry.is_none())
                        .on_click(cx.listener(|this, _, _, cx| this.delete_selected(cx))),
                )
                .child(
                    Button::new("clear")
                        .small()
                        .label("Clear")
                        .disabled(self.session.history().is_empty())
                        .on_click(cx.listener(|this, _, _, cx| {
                            this.confirm_clear = true;
                            cx.notify();
                        })),
                )
        };

        div()
            .w(px(300.0))
            .h_full()
            .flex()
            .flex_col()
            .bg(hsla(0.0, 0.0, 0.10, 1.0))
            .border_r_1()
            .border_color(hsla(0.0, 0.0, 0.2, 1.0))
            .child(HistoryPanel::new(pending, rows, Rc::new(on_select)))
            .child(
                div()
                    .p_3()
                    .border_t_1()
                    .border_color(hsla(0.0, 0.0, 0.2, 1.0))
                    .child(actions),
            )
    }

    fn render_tips(&self) -> impl IntoElement {
        div()
            .p_3()
            .text_xs()
            .text_color(hsla(0.0, 0.0, 0.55, 1.0))
            .bg(hsla(0.0, 0.0, 0.10, 1.0))
            .border_t_1()
            .border_color(hsla(0.0, 0.0, 0.2, 1.0))
            .child("• Use ⌘+Enter / Ctrl+Enter in the body field to send the request quickly.")
            .child("• Provide multiple headers as `Header: Value` per line.")
            .child("• When the response looks like JSON, it will be automatically formatted.")
    }
}

fn badge_colors(response: &Response) -> (Hsla, Hsla) {
    match response.status_code() {
        Some(code) if (200..300).contains(&code) => {
            (hsla(0.35, 0.6, 0.25, 1.0), hsla(0.35, 0.8, 0.65, 1.0))
        }
        Some(code) if code >= 400 => (hsla(0.0, 0.6, 0.25, 1.0), hsla(0.0, 0.8, 0.65, 1.0)),
        Some(_) => (hsla(0.0, 0.0, 0.2, 1.0), hsla(0.0, 0.0, 0.7, 1.0)),
        None => (hsla(0.0, 0.6, 0.25, 1.0), hsla(0.0, 0.8, 0.65, 1.0)),
    }
}

fn text_lines(prefix: &str, text: &str) -> Vec<Stateful<Div>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            let line_content: String = if line.is_empty() {
                " ".to_string()
            } else {
                line.to_string()
            };
            div()
                .id(ElementId::Name(format!("{}-{}", prefix, i).into()))
                .text_xs()
                .font_family("monospace")
                .text_color(hsla(0.0, 0.0, 0.85, 1.0))
                .child(line_content)
        })
        .collect()
}

impl Render for Workbench {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(hsla(0.0, 0.0, 0.08, 1.0))
            .text_color(hsla(0.0, 0.0, 0.9, 1.0))
            .font_family("Inter, SF Pro Display, system-ui, sans-serif")
            .child(self.render_title_bar(window, cx))
            .child(
                div()
                    .flex_1()
                    .flex()
                    .child(self.render_history(window, cx))
                    .child(
                        div()
                            .flex_1()
                            .flex()
                            .flex_col()
                            .child(self.render_request_bar(window, cx))
                            .children(self.render_field_error("url").map(|e| div().px_4().child(e)))
                            .child(self.render_request_panel(window, cx))
                            .child(self.render_response_panel(window, cx))
                            .child(self.render_tips()),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::rust_2021::test;

    #[test]
    fn test_secondary_enter_submits() {
        assert!(submits_request(&Enter { secondary: true }));
    }

    #[test]
    fn test_plain_enter_stays_in_editor() {
        assert!(!submits_request(&Enter { secondary: false }));
    }
}
