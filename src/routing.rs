//! Application router configuration mapping endpoint URIs to route handlers.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    summary::get_summary_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_service_name))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root route reports the service name so that a deployment can be
/// checked with a plain GET.
async fn get_service_name() -> Response {
    Json(json!({ "message": "Finance Tracker API" })).into_response()
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource could not be found" })),
    )
        .into_response()
}


#[cfg(test)]
mod api_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, PaginationConfig, build_router, endpoints};

    fn create_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, PaginationConfig::default())
            .expect("Could not initialize database.");

        TestServer::new(build_router(state))
    }

    fn transaction_json(
        description: &str,
        amount: f64,
        kind: &str,
        category: &str,
    ) -> Value {
        json!({
            "description": description,
            "amount": amount,
            "type": kind,
            "category": category,
            "date": "2024-01-15T12:00:00Z",
        })
    }

    #[tokio::test]
    async fn create_then_get_returns_equal_record() {
        let server = create_test_server();

        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json("Salary", 5000.0, "income", "salary"))
            .await;
        created.assert_status(StatusCode::CREATED);
        let created_body: Value = created.json();
        assert_eq!(created_body["id"], 1);
        assert!(created_body["created_at"].is_string());

        let fetched = server.get("/transactions/1").await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Value>(), created_body);
    }

    #[tokio::test]
    async fn create_with_invalid_fields_lists_every_violation() {
        let server = create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "",
                "amount": -1.0,
                "type": "transfer",
                "category": "food",
                "date": "2024-01-15T12:00:00Z",
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        let violations = body["violations"]
            .as_array()
            .expect("response should list violations");
        assert_eq!(violations.len(), 3);
    }

    #[tokio::test]
    async fn listing_returns_all_inserted_records() {
        let server = create_test_server();
        for i in 1..=5 {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&transaction_json(
                    &format!("transaction #{i}"),
                    i as f64,
                    "expense",
                    "food",
                ))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("skip", 0)
            .add_query_param("limit", 100)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 5);
    }

    #[tokio::test]
    async fn negative_skip_responds_with_422() {
        let server = create_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("skip", -1)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        let violations = body["violations"]
            .as_array()
            .expect("response should list violations");
        assert_eq!(violations.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_transaction_responds_with_404() {
        let server = create_test_server();

        let response = server.get("/transactions/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_changes_only_the_given_field() {
        let server = create_test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json("Dinner", 30.0, "expense", "food"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .put("/transactions/1")
            .json(&json!({ "amount": 35.5 }))
            .await;

        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["amount"], 35.5);
        assert_eq!(updated["description"], "Dinner");
        assert_eq!(updated["type"], "expense");
        assert_eq!(updated["category"], "food");
    }

    #[tokio::test]
    async fn delete_then_get_responds_with_404() {
        let server = create_test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction_json("Gas", 50.0, "expense", "transport"))
            .await
            .assert_status(StatusCode::CREATED);

        let deleted = server.delete("/transactions/1").await;
        deleted.assert_status_ok();
        assert_eq!(
            deleted.json::<Value>()["message"],
            "Transaction deleted successfully"
        );

        let fetched = server.get("/transactions/1").await;
        fetched.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn summary_aggregates_totals_and_categories() {
        let server = create_test_server();
        let records = [
            ("Salary", 5000.0, "income", "salary"),
            ("Freelance", 1000.0, "income", "freelance"),
            ("Groceries", 100.0, "expense", "food"),
            ("Gas", 50.0, "expense", "transport"),
            ("Dinner", 30.0, "expense", "food"),
        ];
        for (description, amount, kind, category) in records {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&transaction_json(description, amount, kind, category))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::SUMMARY).await;

        response.assert_status_ok();
        let summary: Value = response.json();
        assert_eq!(summary["total_income"], 6000.0);
        assert_eq!(summary["total_expenses"], 180.0);
        assert_eq!(summary["balance"], 5820.0);
        assert_eq!(
            summary["by_category"],
            json!({
                "salary": 5000.0,
                "freelance": 1000.0,
                "food": 130.0,
                "transport": 50.0,
            })
        );
    }

    #[tokio::test]
    async fn summary_of_empty_store_is_all_zeros() {
        let server = create_test_server();

        let response = server.get(endpoints::SUMMARY).await;

        response.assert_status_ok();
        let summary: Value = response.json();
        assert_eq!(summary["total_income"], 0.0);
        assert_eq!(summary["total_expenses"], 0.0);
        assert_eq!(summary["balance"], 0.0);
        assert_eq!(summary["by_category"], json!({}));
    }

    #[tokio::test]
    async fn unknown_route_responds_with_json_404() {
        let server = create_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
