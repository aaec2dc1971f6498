//! A minimal on-call rota pack: one command, one result event.
//!
//! Point it at a server with `COURIER_API=http://host:8080 cargo run
//! --example rota`.

use std::sync::atomic::{AtomicUsize, Ordering};

use courier_client::Client;
use courier_pack::{Command, Event, EventDef, Pack, PackDef};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("COURIER_API").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let candidates = ["Isaac", "Jane", "Tom", "Lukas", "Emilie"];
    let next = AtomicUsize::new(0);
    let def = PackDef::new("page-of-duty-pack")
        .help_url("http://github.com/your-repo.git")
        .command(
            Command::new("Rota", move |_input: &str| {
                let i = next.fetch_add(1, Ordering::Relaxed) % candidates.len();
                tracing::info!(candidate = candidates[i], "rota request served");
                Event::new(EventDef::new("RotaRetrieved"), candidates[i])
            })
            .output_event(EventDef::new("RotaRetrieved"))
            .output_event(EventDef::new("Error")),
        );

    let client = Client::builder(base_url).build()?;
    let mut pack = Pack::new(def, client);
    pack.start().await?;
    Ok(())
}
