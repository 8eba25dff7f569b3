use api_tester::{AppConfig, Dispatcher};
use gpui::*;
use gpui_component::*;

mod app;
mod components;
use app::Workbench;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Requests run on their own threads with the blocking client, so no
    // async runtime is needed here.
    let dispatcher = Dispatcher::with_config(&config)?;

    let application = Application::new().with_assets(gpui_component_assets::Assets);

    application.run(move |cx| {
        // This must be called before using any GPUI Component features.
        gpui_component::init(cx);

        let bounds = Bounds::centered(
            None,
            size(px(config.window_width), px(config.window_height)),
            cx,
        );

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    ..Default::default()
                },
                |window, cx| {
                    window.set_window_title(config.window_title);
                    let view = cx.new(|cx| Workbench::new(config, dispatcher, window, cx));
                    // This first level on the window, should be a Root.
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
