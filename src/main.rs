mod app;
mod entity;
mod handler;
mod persistence;
mod repository;
mod service;
#[cfg(test)]
mod test_util;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run())
}
