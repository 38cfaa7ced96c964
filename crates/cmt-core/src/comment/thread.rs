//! Nested thread view over the flat comment table
//!
//! Nodes live in one arena in depth-first order and refer to their replies
//! by index, so building, walking and dropping a thread never recurses.

use super::model::Comment;
use super::table::{CommentTable, Scope};
use crate::types::{CommentId, MorphRef};
use serde::Serialize;
use std::collections::HashSet;

/// One comment in a thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadNode<'a> {
    pub comment: &'a Comment,
    /// 0 for roots
    pub depth: usize,
    /// Arena indices of direct replies, in insertion order
    #[serde(skip)]
    pub replies: Vec<usize>,
}

/// Live comments on a commentable as a forest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thread<'a> {
    nodes: Vec<ThreadNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> Thread<'a> {
    /// Number of comments in the thread
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by arena index
    pub fn node(&self, index: usize) -> Option<&ThreadNode<'a>> {
        self.nodes.get(index)
    }

    /// Root nodes, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &ThreadNode<'a>> {
        self.roots.iter().map(move |&i| &self.nodes[i])
    }

    /// Direct replies of a node
    pub fn replies<'s>(
        &'s self,
        node: &'s ThreadNode<'a>,
    ) -> impl Iterator<Item = &'s ThreadNode<'a>> + 's {
        node.replies.iter().map(move |&i| &self.nodes[i])
    }

    /// Depth-first walk, parents before replies
    pub fn iter(&self) -> impl Iterator<Item = &ThreadNode<'a>> {
        self.nodes.iter()
    }

    /// Comments of the subtree rooted at `index`, depth-first
    pub fn subtree(&self, index: usize) -> Vec<&'a Comment> {
        let mut out = Vec::new();
        let mut stack = vec![index];
        while let Some(i) = stack.pop() {
            let Some(node) = self.nodes.get(i) else {
                continue;
            };
            out.push(node.comment);
            stack.extend(node.replies.iter().rev());
        }
        out
    }
}

impl Serialize for Thread<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.nodes.serialize(serializer)
    }
}

impl CommentTable {
    /// Live comments on a commentable as a forest, in insertion order.
    ///
    /// A reply whose parent is trashed, missing, or attached elsewhere is
    /// shown as a root. Comments caught in a parent cycle are shown once,
    /// rooted at the earliest inserted member.
    pub fn thread(&self, target: &MorphRef) -> Thread<'_> {
        let live = self.for_commentable(target, Scope::Default);
        let live_ids: HashSet<&CommentId> = live.iter().map(|c| &c.id).collect();
        let mut visited: HashSet<CommentId> = HashSet::new();
        let mut thread = Thread::default();

        for comment in live.iter().copied() {
            let has_visible_parent = comment
                .parent_id
                .as_ref()
                .map(|p| live_ids.contains(p) && p != &comment.id)
                .unwrap_or(false);
            if !has_visible_parent && !visited.contains(&comment.id) {
                self.grow(&mut thread, comment, target, &mut visited);
            }
        }

        for comment in live.iter().copied() {
            if !visited.contains(&comment.id) {
                tracing::warn!(comment = %comment.id, "reply cycle; promoting to root");
                self.grow(&mut thread, comment, target, &mut visited);
            }
        }

        thread
    }

    /// Append `root` and everything below it to the arena
    fn grow<'a>(
        &'a self,
        thread: &mut Thread<'a>,
        root: &'a Comment,
        target: &MorphRef,
        visited: &mut HashSet<CommentId>,
    ) {
        // (comment, depth, parent arena index)
        let mut stack: Vec<(&'a Comment, usize, Option<usize>)> = vec![(root, 0, None)];

        while let Some((comment, depth, parent)) = stack.pop() {
            if !visited.insert(comment.id.clone()) {
                continue;
            }

            let index = thread.nodes.len();
            thread.nodes.push(ThreadNode {
                comment,
                depth,
                replies: Vec::new(),
            });
            match parent {
                Some(p) => thread.nodes[p].replies.push(index),
                None => thread.roots.push(index),
            }

            let replies = self.children(&comment.id, Scope::Default);
            for reply in replies.into_iter().rev() {
                if &reply.commentable == target && !visited.contains(&reply.id) {
                    stack.push((reply, depth + 1, Some(index)));
                }
            }
        }
    }
}
