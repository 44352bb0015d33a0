use auth_service::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    auth_service::app::run().await
}
