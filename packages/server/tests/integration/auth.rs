use serde_json::json;

use crate::common::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn seeded_admin_can_log_in() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], ADMIN_USERNAME);
        assert_eq!(res.body["is_admin"], true);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": "wrong-password"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "whatever"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn empty_username_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": " ", "password": "x"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": "admin"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn restarting_does_not_seed_a_second_admin() {
        let app = TestApp::spawn().await;

        hub_server::bootstrap::run(&app.db, app.store.clone(), &app.config)
            .await
            .unwrap();

        use sea_orm::{EntityTrait, PaginatorTrait};
        let users = hub_server::entity::user::Entity::find()
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_token_identity() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], ADMIN_USERNAME);
        assert_eq!(res.body["is_admin"], true);
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_a_forged_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod change_password {
    use super::*;

    #[tokio::test]
    async fn new_password_works_and_old_one_stops_working() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CHANGE_PASSWORD,
                &json!({"current_password": ADMIN_PASSWORD, "new_password": "brand-new-pass"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        app.login(ADMIN_USERNAME, "brand-new-pass").await;
        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(old.status, 401);
    }

    #[tokio::test]
    async fn wrong_current_password_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CHANGE_PASSWORD,
                &json!({"current_password": "nope", "new_password": "brand-new-pass"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn short_new_password_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CHANGE_PASSWORD,
                &json!({"current_password": ADMIN_PASSWORD, "new_password": "short"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
