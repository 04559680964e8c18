mod amount;
mod app;
mod bridge;
mod budget;
mod codec;
mod config;
mod error;
mod expense;
mod payload;
mod resolver;
mod views;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    app::launch();
}
