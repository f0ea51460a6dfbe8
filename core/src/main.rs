use std::io;

use list_client::{ClientConfig, ListClient, UreqTransport};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let client = ListClient::new(ClientConfig::default());
    let transport = UreqTransport::new(client.config().timeout);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = client.fetch_and_print(&transport, &mut out) {
        error!(%err, "fetching list failed");
        eprintln!("{err:#?}");
    }
}
