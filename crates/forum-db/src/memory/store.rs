use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use forum_core::entities::{
    Comment, CounterAudit, Credentials, Membership, MembershipSet, NewComment, NewPost, NewUser,
    Polarity, Post, ReactionCounts, ReactionOutcome, ReactionTarget, Session, TargetKind, User,
};
use forum_core::error::DomainError;
use forum_core::traits::{
    CommentRepository, PostRepository, ReactionRepository, RepoResult, SessionRepository,
    UserRepository,
};
use forum_core::value_objects::{ActorId, CommentId, PostId};

/// Membership row key: (kind, raw target id, actor, relation)
type MembershipKey = (TargetKind, i64, ActorId, MembershipSet);

#[derive(Debug)]
struct UserRow {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    next_user_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
    users: BTreeMap<ActorId, UserRow>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    sessions: HashMap<String, Session>,
    session_by_actor: HashMap<ActorId, String>,
    memberships: HashSet<MembershipKey>,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn author_name(&self, id: ActorId) -> RepoResult<String> {
        self.users
            .get(&id)
            .map(|row| row.user.username.clone())
            .ok_or(DomainError::UserNotFound(id))
    }

    /// Counters of a target, checking the comment's parent post
    fn counts_mut(&mut self, target: ReactionTarget) -> RepoResult<&mut ReactionCounts> {
        let counts = match target {
            ReactionTarget::Post { id } => self.posts.get_mut(&id).map(|p| &mut p.counts),
            ReactionTarget::Comment { id, post_id } => self
                .comments
                .get_mut(&id)
                .filter(|c| c.post_id == post_id)
                .map(|c| &mut c.counts),
        };
        counts.ok_or_else(|| DomainError::target_not_found(target))
    }

    fn key(actor_id: ActorId, target: ReactionTarget, set: MembershipSet) -> MembershipKey {
        (target.kind(), target.raw_id(), actor_id, set)
    }

    fn membership(&self, actor_id: ActorId, target: ReactionTarget) -> Membership {
        Membership::new(
            self.memberships
                .contains(&Self::key(actor_id, target, MembershipSet::Likers)),
            self.memberships
                .contains(&Self::key(actor_id, target, MembershipSet::Dislikers)),
        )
    }

    fn cardinality(&self, target: ReactionTarget, set: MembershipSet) -> i64 {
        self.memberships
            .iter()
            .filter(|(kind, id, _, s)| {
                *kind == target.kind() && *id == target.raw_id() && *s == set
            })
            .count() as i64
    }

    fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Thread-safe in-memory implementation of all repository ports
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error (or recover)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a membership row without touching counters.
    ///
    /// Only for reproducing corrupted state in tests.
    pub fn force_membership(&self, actor_id: ActorId, target: ReactionTarget, set: MembershipSet) {
        self.tables
            .lock()
            .memberships
            .insert(Tables::key(actor_id, target, set));
    }

    /// Overwrite a target's stored counters. Only for reproducing drift in tests.
    pub fn force_counts(&self, target: ReactionTarget, counts: ReactionCounts) -> RepoResult<()> {
        *self.tables.lock().counts_mut(target)? = counts;
        Ok(())
    }

    /// Number of stored sessions
    pub fn session_count(&self) -> usize {
        self.tables.lock().sessions.len()
    }

    fn check(&self, operation: &'static str) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::storage(operation, "store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: ActorId) -> RepoResult<Option<User>> {
        self.check("user.find_by_id")?;
        Ok(self.tables.lock().users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<Credentials>> {
        self.check("user.find_credentials")?;
        let tables = self.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|row| row.user.email == email)
            .map(|row| Credentials {
                actor_id: row.user.id,
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        self.check("user.create")?;
        let mut tables = self.tables.lock();
        if tables.users.values().any(|row| row.user.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if tables
            .users
            .values()
            .any(|row| row.user.username == user.username)
        {
            return Err(DomainError::UsernameAlreadyExists);
        }

        let id = ActorId::new(Tables::next_id(&mut tables.next_user_id));
        let created = User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(
            id,
            UserRow {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.check("post.find_by_id")?;
        Ok(self.tables.lock().posts.get(&id).cloned())
    }

    async fn latest(&self, limit: i64) -> RepoResult<Vec<Post>> {
        self.check("post.latest")?;
        let limit = limit.clamp(1, 100) as usize;
        let posts = self.tables.lock().posts.values().cloned().collect();
        let mut posts = Tables::newest_first(posts);
        posts.truncate(limit);
        Ok(posts)
    }

    async fn find_by_author(&self, author_id: ActorId) -> RepoResult<Vec<Post>> {
        self.check("post.find_by_author")?;
        let posts = self
            .tables
            .lock()
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Tables::newest_first(posts))
    }

    async fn find_liked_by(&self, actor_id: ActorId) -> RepoResult<Vec<Post>> {
        self.check("post.find_liked_by")?;
        let tables = self.tables.lock();
        let posts = tables
            .posts
            .values()
            .filter(|p| {
                tables
                    .memberships
                    .contains(&Tables::key(actor_id, p.target(), MembershipSet::Likers))
            })
            .cloned()
            .collect();
        Ok(Tables::newest_first(posts))
    }

    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        self.check("post.create")?;
        let mut tables = self.tables.lock();
        let author_name = tables.author_name(post.author_id)?;

        let mut categories = post.categories.clone();
        categories.sort();
        categories.dedup();

        let id = PostId::new(Tables::next_id(&mut tables.next_post_id));
        let created = Post {
            id,
            author_id: post.author_id,
            author_name,
            title: post.title.clone(),
            content: post.content.clone(),
            categories,
            counts: ReactionCounts::default(),
            created_at: Utc::now(),
        };
        tables.posts.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        self.check("comment.find_by_id")?;
        Ok(self.tables.lock().comments.get(&id).cloned())
    }

    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>> {
        self.check("comment.find_by_post")?;
        Ok(self
            .tables
            .lock()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> RepoResult<Comment> {
        self.check("comment.create")?;
        let mut tables = self.tables.lock();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        let author_name = tables.author_name(comment.author_id)?;

        let id = CommentId::new(Tables::next_id(&mut tables.next_comment_id));
        let created = Comment {
            id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name,
            body: comment.body.clone(),
            counts: ReactionCounts::default(),
            created_at: Utc::now(),
        };
        tables.comments.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn upsert(&self, session: &Session) -> RepoResult<()> {
        self.check("session.issue")?;
        let mut tables = self.tables.lock();
        if let Some(previous) = tables
            .session_by_actor
            .insert(session.actor_id, session.token.clone())
        {
            tables.sessions.remove(&previous);
        }
        tables.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_actor(&self, token: &str) -> RepoResult<Option<ActorId>> {
        self.check("session.resolve")?;
        Ok(self.tables.lock().sessions.get(token).map(|s| s.actor_id))
    }

    async fn find_expiry(&self, token: &str) -> RepoResult<Option<DateTime<Utc>>> {
        self.check("session.is_expired")?;
        Ok(self.tables.lock().sessions.get(token).map(|s| s.expires_at))
    }

    async fn delete(&self, token: &str) -> RepoResult<bool> {
        self.check("session.revoke")?;
        let mut tables = self.tables.lock();
        match tables.sessions.remove(token) {
            Some(session) => {
                tables.session_by_actor.remove(&session.actor_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    #[instrument(skip(self), fields(target = %target))]
    async fn apply(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        desired: Polarity,
    ) -> RepoResult<ReactionOutcome> {
        self.check("reaction.apply")?;
        let mut tables = self.tables.lock();

        // Existence check first so a missing target changes nothing.
        tables.counts_mut(target)?;

        let transition = tables.membership(actor_id, target).plan(desired);
        if transition.is_noop() {
            debug!("Reaction already in requested state");
        }

        for set in transition.removals() {
            if tables.memberships.remove(&Tables::key(actor_id, target, set)) {
                tables.counts_mut(target)?.adjust(set, -1);
            }
        }
        if let Some(set) = transition.insert {
            if tables.memberships.insert(Tables::key(actor_id, target, set)) {
                tables.counts_mut(target)?.adjust(set, 1);
            }
        }

        Ok(ReactionOutcome {
            target,
            state: desired.resulting_state(),
            counts: *tables.counts_mut(target)?,
            changed: !transition.is_noop(),
        })
    }

    async fn membership(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
    ) -> RepoResult<Membership> {
        self.check("reaction.membership")?;
        Ok(self.tables.lock().membership(actor_id, target))
    }

    async fn is_member(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> RepoResult<bool> {
        self.check("reaction.is_member")?;
        Ok(self
            .tables
            .lock()
            .memberships
            .contains(&Tables::key(actor_id, target, set)))
    }

    async fn counts(&self, target: ReactionTarget) -> RepoResult<ReactionCounts> {
        self.check("reaction.counts")?;
        Ok(*self.tables.lock().counts_mut(target)?)
    }

    async fn audit(&self, target: ReactionTarget) -> RepoResult<CounterAudit> {
        self.check("reaction.audit")?;
        let mut tables = self.tables.lock();
        let stored = *tables.counts_mut(target)?;
        let actual = ReactionCounts::new(
            tables.cardinality(target, MembershipSet::Likers),
            tables.cardinality(target, MembershipSet::Dislikers),
        );
        Ok(CounterAudit {
            target,
            stored,
            actual,
        })
    }
}
