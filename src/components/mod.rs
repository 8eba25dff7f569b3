pub mod history_panel;
