use cmt_core::{
    CascadeMode, Comment, CommentBuilder, CommentFields, CommentId, Commentable, Comments,
    CommentsConfig, EntityKey, EventKind, EventLog, Morph, MorphRef, Scope,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Article {
    id: u64,
}

impl Morph for Article {
    const MORPH_TYPE: &'static str = "Article";

    fn morph_key(&self) -> EntityKey {
        self.id.into()
    }
}

impl Commentable for Article {}

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: u64,
}

impl Morph for User {
    const MORPH_TYPE: &'static str = "User";

    fn morph_key(&self) -> EntityKey {
        self.id.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Author {
    User(User),
}

/// Host-side article store that the cascade runs against
#[derive(Default, Clone)]
struct Articles(Arc<Mutex<Vec<Article>>>);

impl Articles {
    fn add(&self, article: Article) {
        self.0.lock().unwrap().push(article);
    }

    fn delete(&self, article: &Article) -> Result<(), String> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != article.id);
        if rows.len() == before {
            return Err(format!("no article {}", article.id));
        }
        Ok(())
    }

    fn exists(&self, id: u64) -> bool {
        self.0.lock().unwrap().iter().any(|a| a.id == id)
    }
}

fn ids(comments: Vec<&Comment>) -> Vec<CommentId> {
    comments.into_iter().map(|c| c.id.clone()).collect()
}

fn service() -> Comments<Author> {
    let mut comments: Comments<Author> = Comments::new(CommentsConfig::default());
    comments
        .commenters_mut()
        .register_type::<User, _>(|key| (key.as_str() == "7").then(|| Author::User(User { id: 7 })));
    comments
}

#[test]
fn article_with_three_comments() {
    let articles = Articles::default();
    let e1 = Article { id: 42 };
    articles.add(e1.clone());

    let mut comments = service();
    let log = EventLog::new();
    comments.subscribe(log.clone());

    let a = comments
        .create(CommentBuilder::on(e1.morph_ref()).content("A"))
        .unwrap();
    let b = comments
        .reply(&a.id, CommentBuilder::on(e1.morph_ref()).content("B"))
        .unwrap();
    let c = comments
        .create(
            CommentBuilder::on(e1.morph_ref())
                .content("C")
                .fill(CommentFields::new().approved(true)),
        )
        .unwrap();

    assert!(!a.approved);
    assert_eq!(
        ids(e1.comments(&comments)),
        vec![a.id.clone(), b.id.clone(), c.id.clone()]
    );
    assert_eq!(ids(e1.approved_comments(&comments)), vec![c.id.clone()]);
    assert_eq!(comments.top_comment(&b.id).unwrap().id, a.id);

    let report = comments
        .delete_commentable(&e1, |article| articles.delete(article))
        .unwrap();

    assert_eq!(report.mode, CascadeMode::Soft);
    assert!(!articles.exists(42));
    for id in [&a.id, &b.id, &c.id] {
        assert!(comments.find_with_trashed(id).unwrap().deleted_at.is_some());
    }
    assert!(e1.comments(&comments).is_empty());
    assert_eq!(
        log.kinds(),
        vec![EventKind::Created, EventKind::Created, EventKind::Created]
    );
}

#[test]
fn hard_delete_policy_removes_every_row() {
    let e1 = Article { id: 42 };
    let mut comments: Comments = Comments::new(CommentsConfig {
        soft_deletes: false,
        ..CommentsConfig::default()
    });
    let a = comments
        .create(CommentBuilder::on(e1.morph_ref()).content("A"))
        .unwrap();
    comments
        .reply(&a.id, CommentBuilder::on(e1.morph_ref()).content("B"))
        .unwrap();

    let report = comments.cascade_delete(&e1.morph_ref());

    assert_eq!(report.mode, CascadeMode::Hard);
    assert_eq!(report.count(), 2);
    assert!(comments
        .comments_on(&e1.morph_ref(), Scope::WithTrashed)
        .is_empty());
}

#[test]
fn guest_comment_has_no_commenter() {
    let mut comments = service();
    let guest = comments
        .create(
            CommentBuilder::on(MorphRef::new("Article", 42u64))
                .guest("Jane", Some("jane@example.com".to_string()))
                .content("Hi there"),
        )
        .unwrap();

    assert!(guest.is_guest());
    assert_eq!(comments.commenter(&guest).unwrap(), None);
    assert_eq!(guest.author_label(), "Jane");
}

#[test]
fn registered_commenter_resolves_through_registry() {
    let mut comments = service();
    let ada = User { id: 7 };
    let comment = comments
        .create(
            CommentBuilder::on(MorphRef::new("Article", 1u64))
                .by(ada.morph_ref())
                .content("First"),
        )
        .unwrap();

    let loaded = comments.fetch(&comment.id).unwrap();
    assert_eq!(loaded.commenter, Some(Author::User(ada)));

    let unknown = comments
        .create(
            CommentBuilder::on(MorphRef::new("Article", 1u64))
                .by(MorphRef::new("Bot", 1u64))
                .content("beep"),
        )
        .unwrap();
    assert!(comments.commenter(&unknown).is_err());
}

#[test]
fn listed_comments_carry_their_commenter() {
    let mut comments = service();
    let article = Article { id: 9 };
    let ada = User { id: 7 };

    let by_ada = comments
        .create(
            CommentBuilder::on(article.morph_ref())
                .by(ada.morph_ref())
                .fill(CommentFields::new().approved(true))
                .content("Great read"),
        )
        .unwrap();
    let by_guest = comments
        .create(
            CommentBuilder::on(article.morph_ref())
                .guest("Jane", None)
                .content("Agreed"),
        )
        .unwrap();
    comments
        .reply(
            &by_ada.id,
            CommentBuilder::on(article.morph_ref())
                .by(ada.morph_ref())
                .content("Thanks"),
        )
        .unwrap();

    let listed = article.comments_loaded(&comments).unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].comment.id, by_ada.id);
    assert_eq!(listed[0].commenter, Some(Author::User(ada.clone())));
    assert_eq!(listed[1].comment.id, by_guest.id);
    assert_eq!(listed[1].commenter, None);
    assert_eq!(listed[2].commenter, Some(Author::User(ada.clone())));

    let approved = article.approved_comments_loaded(&comments).unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].comment.id, by_ada.id);
    assert_eq!(approved[0].commenter, Some(Author::User(ada.clone())));

    let replies = comments.children_loaded(&by_ada.id).unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].commenter, Some(Author::User(ada)));

    comments
        .create(
            CommentBuilder::on(article.morph_ref())
                .by(MorphRef::new("Bot", 1u64))
                .content("beep"),
        )
        .unwrap();
    assert!(article.comments_loaded(&comments).is_err());
}

#[test]
fn top_comment_properties() {
    let target = MorphRef::new("Article", 3u64);
    let mut comments: Comments = Comments::new(CommentsConfig::default());

    let root = comments
        .create(CommentBuilder::on(target.clone()).content("root"))
        .unwrap();
    let mut chain = vec![root.id.clone()];
    for depth in 1..=5 {
        let parent = chain[chain.len() - 1].clone();
        let reply = comments
            .reply(
                &parent,
                CommentBuilder::on(target.clone()).content(format!("depth {}", depth)),
            )
            .unwrap();
        chain.push(reply.id);
    }

    for id in &chain {
        let top = comments.top_comment(id).unwrap();
        assert_eq!(top.id, root.id);
        assert_eq!(comments.top_comment(&top.id).unwrap().id, top.id);
    }
    assert_eq!(comments.top_comment(&root.id).unwrap().id, root.id);
}

#[test]
fn approved_comments_are_a_subset() {
    let target = MorphRef::new("Article", 5u64);
    let mut comments: Comments = Comments::new(CommentsConfig::default());

    for i in 0..10 {
        comments
            .create(
                CommentBuilder::on(target.clone())
                    .content(format!("comment {}", i))
                    .fill(CommentFields::new().approved(i % 3 == 0)),
            )
            .unwrap();
    }

    let all: HashSet<CommentId> = ids(comments.comments_on(&target, Scope::Default))
        .into_iter()
        .collect();
    let approved = comments.approved_comments_on(&target);

    assert_eq!(approved.len(), 4);
    for comment in &approved {
        assert!(comment.approved);
        assert!(all.contains(&comment.id));
    }
    let expected: Vec<_> = comments
        .comments_on(&target, Scope::Default)
        .into_iter()
        .filter(|c| c.approved)
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(ids(approved), expected);
}

#[test]
fn guarded_fields_are_ignored() {
    let target = MorphRef::new("Article", 9u64);
    let mut comments: Comments = Comments::new(CommentsConfig::default());

    let input = serde_json::json!({
        "id": "6f1c2a52-0c5e-4b8e-9d0e-3f2d1f0a9b11",
        "commentable_type": "Video",
        "commentable_id": "1",
        "created_at": "2001-01-01T00:00:00Z",
        "comment": "body",
        "approved": "on"
    });
    let comment = comments
        .create(CommentBuilder::on(target.clone()).fill(CommentFields::from_json(input).unwrap()))
        .unwrap();

    assert_ne!(comment.id.to_string(), "6f1c2a52-0c5e-4b8e-9d0e-3f2d1f0a9b11");
    assert_eq!(comment.commentable, target);
    assert!(comment.created_at.timestamp() > 978_307_200);
    assert_eq!(comment.comment, "body");
    assert!(comment.approved);

    let update = serde_json::json!({ "commentable_id": "2", "comment": "edited" });
    let updated = comments
        .update(&comment.id, CommentFields::from_json(update).unwrap())
        .unwrap();
    assert_eq!(updated.commentable, target);
    assert_eq!(updated.created_at, comment.created_at);
    assert_eq!(updated.comment, "edited");
}

#[test]
fn restore_brings_comment_back() {
    let target = MorphRef::new("Article", 11u64);
    let mut comments: Comments = Comments::new(CommentsConfig::default());
    let log = EventLog::new();
    comments.subscribe(log.clone());

    let comment = comments
        .create(CommentBuilder::on(target.clone()).content("oops"))
        .unwrap();
    comments.delete(&comment.id).unwrap();
    assert!(comments.find(&comment.id).is_none());
    assert_eq!(
        ids(comments.comments_on(&target, Scope::OnlyTrashed)),
        vec![comment.id.clone()]
    );

    comments.restore(&comment.id).unwrap();
    assert!(comments.find(&comment.id).is_some());
    assert_eq!(
        log.kinds(),
        vec![EventKind::Created, EventKind::Deleted, EventKind::Updated]
    );
}

#[test]
fn urls_and_morph_refs_use_config() {
    let mut comments: Comments = Comments::new(CommentsConfig {
        model: "App\\Models\\Comment".to_string(),
        base_url: "https://example.com/".to_string(),
        ..CommentsConfig::default()
    });
    let comment = comments
        .create(CommentBuilder::on(MorphRef::new("Article", 1u64)).content("x"))
        .unwrap();

    assert_eq!(
        comments.url(&comment),
        format!("https://example.com/comment/{}", comment.id)
    );
    assert_eq!(
        comments.morph_ref(&comment).morph_type.as_str(),
        "App\\Models\\Comment"
    );
}
