use axum::Json;

pub async fn handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "Hello": "World" }))
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn should_greet() {
        let res = super::handler().await;
        assert_eq!(res.0["Hello"], "World");
    }
}
