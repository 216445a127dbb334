use mock_sms::config::MockSmsConfig;
use mock_sms::routes;
use mock_sms::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = MockSmsConfig::from_env().expect("invalid mock sms config");
    let addr = config.bind_addr().expect("invalid bind address");

    let state = AppState::new(config.max_messages);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, max_messages = config.max_messages, "mock sms listening");
    axum::serve(listener, app).await.expect("server failed");
}
