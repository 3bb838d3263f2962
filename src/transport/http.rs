//! REST transport: maps HTTP routes onto collection and resolver calls.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET|POST /users`, `GET|PATCH|DELETE /users/:id` (delete cascades)
//! - `POST /users/:id/subscribeTo`, `POST /users/:id/unsubscribeFrom`, body `{ "userId" }`
//! - `GET /users/:id/detail`, `/users/:id/followers`, `/users/:id/posts`
//! - `GET|POST /profiles`, `GET|PATCH|DELETE /profiles/:id`
//! - `GET|POST /posts`, `GET|PATCH|DELETE /posts/:id`
//! - `GET /member-types`, `GET|PATCH /member-types/:id`
//! - `POST /query/{users,profiles,posts,member-types}`, body = predicate
//! - `GET /views/users`, `/views/subscriptions`, `/views/followers`
//! - `GET /health`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use social_store::{Database, MemberType, SocialGraph};
//! use social_store::transport::http;
//!
//! let graph = Arc::new(SocialGraph::new(Database::seeded(MemberType::defaults())?));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! http::serve(graph, listener, std::future::pending()).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SocialError;
use crate::id::RecordId;
use crate::model::{
    ChangeMemberType, ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile,
    CreateUser, MemberType, Post, Profile, User,
};
use crate::predicate::Predicate;
use crate::record::Record;
use crate::resolver::{
    FollowerView, ProfiledSubscriptionView, SocialGraph, SubscriptionView, UserDetail,
    UserWithPosts,
};
use crate::storage::{Collection, Database, StorageError};

type Shared = State<Arc<SocialGraph>>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// A resolver error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(SocialError);

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Record kinds served through the generic read routes.
trait Served: Record + Serialize {
    fn collection(db: &Database) -> &Arc<dyn Collection<Self>>;
}

impl Served for User {
    fn collection(db: &Database) -> &Arc<dyn Collection<Self>> {
        &db.users
    }
}

impl Served for Profile {
    fn collection(db: &Database) -> &Arc<dyn Collection<Self>> {
        &db.profiles
    }
}

impl Served for Post {
    fn collection(db: &Database) -> &Arc<dyn Collection<Self>> {
        &db.posts
    }
}

impl Served for MemberType {
    fn collection(db: &Database) -> &Arc<dyn Collection<Self>> {
        &db.member_types
    }
}

/// Body of the subscribe/unsubscribe routes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeBody {
    user_id: RecordId,
}

/// Build an axum `Router` serving the given resolver.
pub fn router(graph: Arc<SocialGraph>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list::<User>).post(create_user))
        .route(
            "/users/:id",
            get(find::<User>).patch(change_user).delete(delete_user),
        )
        .route("/users/:id/subscribeTo", post(subscribe_to))
        .route("/users/:id/unsubscribeFrom", post(unsubscribe_from))
        .route("/users/:id/detail", get(user_detail))
        .route("/users/:id/followers", get(user_followers))
        .route("/users/:id/posts", get(user_posts))
        .route("/profiles", get(list::<Profile>).post(create_profile))
        .route(
            "/profiles/:id",
            get(find::<Profile>).patch(change_profile).delete(delete_profile),
        )
        .route("/posts", get(list::<Post>).post(create_post))
        .route(
            "/posts/:id",
            get(find::<Post>).patch(change_post).delete(delete_post),
        )
        .route("/member-types", get(list::<MemberType>))
        .route(
            "/member-types/:id",
            get(find::<MemberType>).patch(change_member_type),
        )
        .route("/query/users", post(query::<User>))
        .route("/query/profiles", post(query::<Profile>))
        .route("/query/posts", post(query::<Post>))
        .route("/query/member-types", post(query::<MemberType>))
        .route("/views/users", get(all_users_detail))
        .route("/views/subscriptions", get(subscriptions))
        .route("/views/followers", get(followers_view))
        .with_state(graph)
}

/// Serve the resolver on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    graph: Arc<SocialGraph>,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(graph))
        .with_graceful_shutdown(shutdown)
        .await
}

fn found<T>(value: Option<T>, kind: crate::record::RecordKind, id: RecordId) -> ApiResult<T> {
    value
        .map(Json)
        .ok_or_else(|| ApiError(StorageError::NotFound { kind, id }.into()))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn list<T: Served>(State(graph): Shared) -> ApiResult<Vec<T>> {
    Ok(Json(T::collection(graph.database()).find_many(None)?))
}

async fn find<T: Served>(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<T> {
    let record = T::collection(graph.database()).get(&id)?;
    found(record, T::KIND, id)
}

async fn query<T: Served>(
    State(graph): Shared,
    Json(predicate): Json<Predicate>,
) -> ApiResult<Vec<T>> {
    Ok(Json(T::collection(graph.database()).find_many(Some(&predicate))?))
}

async fn create_user(State(graph): Shared, Json(dto): Json<CreateUser>) -> ApiResult<User> {
    Ok(Json(graph.create_user(dto)?))
}

async fn change_user(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(patch): Json<ChangeUser>,
) -> ApiResult<User> {
    Ok(Json(graph.change_user(&id, patch)?))
}

async fn delete_user(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<User> {
    Ok(Json(graph.delete_user(&id)?.user))
}

/// `POST /users/:id/subscribeTo`: record `:id` in the body user's list.
async fn subscribe_to(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(body): Json<SubscribeBody>,
) -> ApiResult<User> {
    Ok(Json(graph.subscribe(&id, &body.user_id)?))
}

/// `POST /users/:id/unsubscribeFrom`: drop `:id` from the body user's list.
async fn unsubscribe_from(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(body): Json<SubscribeBody>,
) -> ApiResult<User> {
    Ok(Json(graph.unsubscribe(&id, &body.user_id)?))
}

async fn user_detail(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<UserDetail> {
    let detail = graph.user_detail(&id)?;
    found(detail, User::KIND, id)
}

async fn user_followers(
    State(graph): Shared,
    Path(id): Path<RecordId>,
) -> ApiResult<Vec<FollowerView>> {
    Ok(Json(graph.followers_with_profiles(&id)?))
}

async fn user_posts(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<UserWithPosts> {
    let view = graph.user_with_posts(&id)?;
    found(view, User::KIND, id)
}

async fn create_profile(
    State(graph): Shared,
    Json(dto): Json<CreateProfile>,
) -> ApiResult<Profile> {
    Ok(Json(graph.create_profile(dto)?))
}

async fn change_profile(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(patch): Json<ChangeProfile>,
) -> ApiResult<Profile> {
    Ok(Json(graph.change_profile(&id, patch)?))
}

async fn delete_profile(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<Profile> {
    Ok(Json(graph.delete_profile(&id)?))
}

async fn create_post(State(graph): Shared, Json(dto): Json<CreatePost>) -> ApiResult<Post> {
    Ok(Json(graph.create_post(dto)?))
}

async fn change_post(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(patch): Json<ChangePost>,
) -> ApiResult<Post> {
    Ok(Json(graph.change_post(&id, patch)?))
}

async fn delete_post(State(graph): Shared, Path(id): Path<RecordId>) -> ApiResult<Post> {
    Ok(Json(graph.delete_post(&id)?))
}

async fn change_member_type(
    State(graph): Shared,
    Path(id): Path<RecordId>,
    Json(patch): Json<ChangeMemberType>,
) -> ApiResult<MemberType> {
    Ok(Json(graph.change_member_type(&id, patch)?))
}

async fn all_users_detail(State(graph): Shared) -> ApiResult<Vec<UserDetail>> {
    Ok(Json(graph.all_users_detail()?))
}

async fn subscriptions(State(graph): Shared) -> ApiResult<Vec<SubscriptionView>> {
    Ok(Json(graph.followers_and_following()?))
}

async fn followers_view(State(graph): Shared) -> ApiResult<Vec<ProfiledSubscriptionView>> {
    Ok(Json(graph.users_with_followers_and_profiles()?))
}
