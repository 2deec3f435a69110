use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("PickPoints")
        .with_inner_size([1280.0, 860.0])
        .with_min_inner_size([720.0, 480.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "PickPoints",
        options,
        Box::new(|cc| Box::new(pickpoints::app::PickPointsApp::new(cc))),
    )
}
