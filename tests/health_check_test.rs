use crate::helpers::spawn_app;

mod helpers;

#[tokio::test]
async fn health_check_endpoint_returns_200() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/health", app.addr))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn the_landing_page_serves_the_waitlist_form() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("http://127.0.0.1:{}/", app.port))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    assert!(response.headers()["Content-Type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = response.text().await.unwrap();
    assert!(html.contains(r#"id="waitlist-form""#));
    assert!(html.contains("/api/waitlist"));
}
