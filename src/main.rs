#[tokio::main]
async fn main() {
    santa_backend::run().await;
}
