//! Bean registration and grind settings over HTTP.

#![allow(clippy::unwrap_used)]

use espresso_dialer_integration_tests::{BEAN_ID, TestContext, assert_see_other, equipped_state};

#[tokio::test]
async fn test_add_bean_grouped_by_roaster() {
    let ctx = TestContext::spawn().await;
    let response = ctx
        .post_form(
            "/beans",
            &[
                ("roaster", "Onyx"),
                ("origin", "Ethiopia"),
                ("process_type", "Natural"),
                ("roast_date", "2024-05-01"),
                ("roast_level", "Medium-Light"),
                ("notes", "Blueberry"),
            ],
        )
        .await;
    assert_see_other(&response, "/beans");

    let html = ctx.page("/beans").await;
    assert!(html.contains("roaster-heading\">Onyx</h2>"));
    assert!(html.contains("Onyx - Ethiopia"));
    assert!(html.contains("Medium-Light"));
    assert!(html.contains("Blueberry"));
    assert!(html.contains("Register a grinder to save a grind setting."));
}

#[tokio::test]
async fn test_invalid_roast_date_rejected() {
    let ctx = TestContext::spawn().await;
    let response = ctx
        .post_form(
            "/beans",
            &[
                ("roaster", "Onyx"),
                ("origin", "Ethiopia"),
                ("process_type", "Natural"),
                ("roast_date", "yesterday"),
                ("roast_level", "Light"),
            ],
        )
        .await;
    assert!(response.status().is_client_error());
    assert!(ctx.page("/beans").await.contains("No beans registered"));
}

#[tokio::test]
async fn test_update_grind_setting() {
    let ctx = TestContext::spawn_with(equipped_state()).await;
    assert!(ctx.page("/beans").await.contains("Saved: 12.5"));

    let response = ctx
        .post_form(
            &format!("/beans/{BEAN_ID}/grind"),
            &[("grind_setting", "14.2")],
        )
        .await;
    assert_see_other(&response, "/beans");

    let html = ctx.page("/beans").await;
    assert!(html.contains("Saved: 14.2"));
    assert!(html.contains("Niche Zero (1.0 - 50.0)"));
}

#[tokio::test]
async fn test_update_grind_clamped_to_grinder_range() {
    let ctx = TestContext::spawn_with(equipped_state()).await;
    let response = ctx
        .post_form(&format!("/beans/{BEAN_ID}/grind"), &[("grind_setting", "75")])
        .await;
    assert_see_other(&response, "/beans");
    assert!(ctx.page("/beans").await.contains("Saved: 50.0"));
}

#[tokio::test]
async fn test_update_grind_rejects_non_finite() {
    let ctx = TestContext::spawn_with(equipped_state()).await;
    for value in ["inf", "NaN"] {
        let response = ctx
            .post_form(&format!("/beans/{BEAN_ID}/grind"), &[("grind_setting", value)])
            .await;
        assert_eq!(response.status(), 400, "grind_setting={value}");
    }
    assert!(ctx.page("/beans").await.contains("Saved: 12.5"));
}

#[tokio::test]
async fn test_update_grind_for_missing_bean_is_404() {
    let ctx = TestContext::spawn_with(equipped_state()).await;
    let response = ctx
        .post_form("/beans/999/grind", &[("grind_setting", "14")])
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_bean() {
    let ctx = TestContext::spawn_with(equipped_state()).await;
    let response = ctx
        .post_form(&format!("/beans/{BEAN_ID}/delete"), &[])
        .await;
    assert_see_other(&response, "/beans");
    assert!(ctx.page("/beans").await.contains("No beans registered"));
}
