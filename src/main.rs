#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    minuta_server::run().await
}
