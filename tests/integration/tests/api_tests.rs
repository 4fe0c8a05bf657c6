//! API Integration Tests
//!
//! Run against the in-memory store by default. The PostgreSQL smoke test at
//! the bottom needs DATABASE_URL and skips itself otherwise.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, fixtures::*, memory_config, postgres_config, session_cookie_value,
    Auth, TestServer, API,
};
use reqwest::{header, StatusCode};

async fn register_and_login(server: &TestServer) -> (RegisterRequest, AuthResponse) {
    let register = RegisterRequest::unique();
    let response = server
        .post(&format!("{API}/auth/register"), Auth::None, &register)
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post(
            &format!("{API}/auth/login"),
            Auth::None,
            &LoginRequest::from_register(&register),
        )
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    (register, auth)
}

async fn react(
    server: &TestServer,
    path: &str,
    token: &str,
    body: SetReactionRequest,
) -> ReactionResponse {
    let response = server.put(path, Auth::Bearer(token), &body).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn create_post(server: &TestServer, token: &str) -> PostResponse {
    let response = server
        .post(&format!("{API}/posts"), Auth::Bearer(token), &CreatePostRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health", Auth::None).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready", Auth::None).await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "in_memory");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server
        .post(&format!("{API}/auth/register"), Auth::None, &request)
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(user.username, request.username);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server
        .post(&format!("{API}/auth/register"), Auth::None, &request)
        .await
        .unwrap();

    let response = server
        .post(&format!("{API}/auth/register"), Auth::None, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest {
        password: "short".to_string(),
        ..RegisterRequest::unique()
    };

    let response = server
        .post(&format!("{API}/auth/register"), Auth::None, &request)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register = RegisterRequest::unique();
    server
        .post(&format!("{API}/auth/register"), Auth::None, &register)
        .await
        .unwrap();

    let response = server
        .post(
            &format!("{API}/auth/login"),
            Auth::None,
            &LoginRequest::from_register(&register),
        )
        .await
        .unwrap();
    let cookie = session_cookie_value(&response, &server.config.session.cookie_name)
        .expect("login sets the session cookie");
    let raw_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(cookie, auth.token);
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 3600);
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("Path=/"));
    assert!(raw_cookie.contains("Max-Age=3600"));

    // The cookie alone authenticates
    let response = server
        .get(&format!("{API}/users/@me"), Auth::Cookie(&cookie))
        .await
        .unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.email, register.email);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (register, _) = register_and_login(&server).await;

    let response = server
        .post(
            &format!("{API}/auth/login"),
            Auth::None,
            &LoginRequest {
                email: register.email,
                password: "WrongPassword1".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;

    let response = server
        .post(&format!("{API}/auth/logout"), Auth::Cookie(&auth.token), &())
        .await
        .unwrap();
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = server
        .get(&format!("{API}/users/@me"), Auth::Bearer(&auth.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Logging out again is harmless
    let response = server
        .post(&format!("{API}/auth/logout"), Auth::Cookie(&auth.token), &())
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_second_login_invalidates_first_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (register, first) = register_and_login(&server).await;

    let response = server
        .post(
            &format!("{API}/auth/login"),
            Auth::None,
            &LoginRequest::from_register(&register),
        )
        .await
        .unwrap();
    let second: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("{API}/users/@me"), Auth::Bearer(&first.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = server
        .get(&format!("{API}/users/@me"), Auth::Bearer(&second.token))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
    let config = memory_config(&[("SESSION_TTL_SECONDS", "1")]).unwrap();
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = server
        .get(&format!("{API}/users/@me"), Auth::Bearer(&auth.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// Access Guard Tests
// ============================================================================

#[tokio::test]
async fn test_action_endpoints_redirect_to_login() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(&format!("{API}/posts"), Auth::None, &CreatePostRequest::unique())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/user/login");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    let response = server
        .put(
            &format!("{API}/posts/1/reaction"),
            Auth::Bearer("unknown-token"),
            &SetReactionRequest::like(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_anonymous_can_browse() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;
    let post = create_post(&server, &auth.token).await;

    let response = server.get(&format!("{API}/posts"), Auth::None).await.unwrap();
    let posts: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(posts.iter().any(|p| p.id == post.id));
    assert!(posts.iter().all(|p| p.viewer_reaction.is_none()));

    let response = server
        .get(&format!("{API}/posts/{}", post.id), Auth::None)
        .await
        .unwrap();
    let detail: PostDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.post.title, post.title);
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_and_comment() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;

    let post = create_post(&server, &auth.token).await;
    assert_eq!(post.author_id, auth.user.id);
    assert_eq!(post.categories, vec!["testing".to_string()]);

    let response = server
        .post(
            &format!("{API}/posts/{}/comments", post.id),
            Auth::Bearer(&auth.token),
            &CreateCommentRequest {
                body: "First!".to_string(),
            },
        )
        .await
        .unwrap();
    let comment: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment.post_id, post.id);

    let response = server
        .get(&format!("{API}/posts/{}", post.id), Auth::None)
        .await
        .unwrap();
    let detail: PostDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].body, "First!");
}

#[tokio::test]
async fn test_create_post_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;

    let response = server
        .post(
            &format!("{API}/posts"),
            Auth::Bearer(&auth.token),
            &CreatePostRequest {
                title: "x".repeat(101),
                ..CreatePostRequest::unique()
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_unknown_and_malformed_post_ids() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get(&format!("{API}/posts/999999"), Auth::None)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get(&format!("{API}/posts/not-a-number"), Auth::None)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_post_reaction_scenario() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = register_and_login(&server).await;
    let (_, reader) = register_and_login(&server).await;
    let post = create_post(&server, &author.token).await;
    let path = format!("{API}/posts/{}/reaction", post.id);

    let r = react(&server, &path, &reader.token, SetReactionRequest::like()).await;
    assert_eq!((r.like_count, r.dislike_count, r.changed), (1, 0, true));

    let r = react(&server, &path, &reader.token, SetReactionRequest::like()).await;
    assert_eq!((r.like_count, r.dislike_count, r.changed), (1, 0, false));

    let r = react(&server, &path, &reader.token, SetReactionRequest::dislike()).await;
    assert_eq!((r.like_count, r.dislike_count), (0, 1));
    assert_eq!(r.reaction, "disliked");

    let r = react(&server, &path, &reader.token, SetReactionRequest::none()).await;
    assert_eq!((r.like_count, r.dislike_count), (0, 0));
    assert_eq!(r.reaction, "neutral");
}

#[tokio::test]
async fn test_viewer_reaction_and_liked_posts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = register_and_login(&server).await;
    let (_, reader) = register_and_login(&server).await;
    let post = create_post(&server, &author.token).await;

    let response = server
        .put(
            &format!("{API}/posts/{}/reaction", post.id),
            Auth::Cookie(&reader.token),
            &SetReactionRequest::like(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("{API}/posts/{}", post.id), Auth::Cookie(&reader.token))
        .await
        .unwrap();
    let detail: PostDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.post.viewer_reaction.as_deref(), Some("liked"));
    assert_eq!(detail.post.like_count, 1);

    let response = server
        .get(&format!("{API}/users/@me/liked"), Auth::Bearer(&reader.token))
        .await
        .unwrap();
    let liked: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, post.id);

    let response = server
        .get(&format!("{API}/users/@me/posts"), Auth::Bearer(&author.token))
        .await
        .unwrap();
    let mine: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn test_comment_reaction_checks_parent_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;
    let post = create_post(&server, &auth.token).await;
    let other = create_post(&server, &auth.token).await;

    let response = server
        .post(
            &format!("{API}/posts/{}/comments", post.id),
            Auth::Bearer(&auth.token),
            &CreateCommentRequest {
                body: "hello".to_string(),
            },
        )
        .await
        .unwrap();
    let comment: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .put(
            &format!("{API}/posts/{}/comments/{}/reaction", post.id, comment.id),
            Auth::Bearer(&auth.token),
            &SetReactionRequest::dislike(),
        )
        .await
        .unwrap();
    let reaction: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reaction.dislike_count, 1);

    let response = server
        .put(
            &format!("{API}/posts/{}/comments/{}/reaction", other.id, comment.id),
            Auth::Bearer(&auth.token),
            &SetReactionRequest::like(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_invalid_reaction_value() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register_and_login(&server).await;
    let post = create_post(&server, &auth.token).await;

    let response = server
        .put(
            &format!("{API}/posts/{}/reaction", post.id),
            Auth::Bearer(&auth.token),
            &serde_json::json!({ "reaction": "love" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// PostgreSQL smoke test
// ============================================================================

#[tokio::test]
async fn test_postgres_reaction_flow() {
    let Some(config) = postgres_config().unwrap() else {
        return;
    };
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let response = server.get("/health/ready", Auth::None).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let (_, author) = register_and_login(&server).await;
    let post = create_post(&server, &author.token).await;

    let response = server
        .put(
            &format!("{API}/posts/{}/reaction", post.id),
            Auth::Bearer(&author.token),
            &SetReactionRequest::like(),
        )
        .await
        .unwrap();
    let reaction: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reaction.like_count, 1);
}
