#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> eframe::Result<()> {
    rt_app::logging::init_logging("info");
    rt_app::launch()
}
