use nano_web::{Router, Server};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    Server::builder()
        .bind("127.0.0.1:8080")
        .router(Router::new())
        .max_connections(1024)
        .build()
        .unwrap()
        .start()
        .await;
}
