use std::sync::Arc;

use forum_core::clock::ManualClock;
use forum_core::entities::{NewComment, NewPost, NewUser};
use forum_core::value_objects::ActorId;
use forum_core::{Comment, Post};
use forum_db::MemoryStore;

use super::context::ServiceContext;

pub(crate) struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

pub(crate) fn harness() -> Harness {
    let clock = Arc::new(ManualClock::starting_now());
    let store = Arc::new(MemoryStore::new());
    let ctx = ServiceContext::builder()
        .memory(store.clone())
        .clock(clock.clone())
        .build()
        .unwrap();
    Harness { ctx, clock, store }
}

impl Harness {
    pub async fn user(&self, name: &str) -> ActorId {
        self.ctx
            .user_repo()
            .create(&NewUser::new(name, &format!("{name}@example.com"), "hash"))
            .await
            .unwrap()
            .id
    }

    pub async fn post(&self, author: ActorId, title: &str) -> Post {
        self.ctx
            .post_repo()
            .create(&NewPost {
                author_id: author,
                title: title.to_string(),
                content: "body".to_string(),
                categories: vec!["general".to_string()],
            })
            .await
            .unwrap()
    }

    pub async fn comment(&self, author: ActorId, post: &Post) -> Comment {
        self.ctx
            .comment_repo()
            .create(&NewComment {
                post_id: post.id,
                author_id: author,
                body: "nice".to_string(),
            })
            .await
            .unwrap()
    }
}
