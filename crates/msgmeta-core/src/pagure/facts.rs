//! Links, objects, users and icons derived from Pagure events.

use super::PagureProcessor;
use crate::family::{Group, is_comment};
use crate::payload::{Id, Payload};
use msgmeta_proto::Topic;
use serde_json::Value;
use std::collections::BTreeSet;

impl PagureProcessor {
    /// Web root of a project; forks live under `/fork/`.
    fn project_url(&self, project: &str) -> String {
        let base = self.config.base_url();
        if project.contains('/') {
            format!("{base}/fork/{project}")
        } else {
            format!("{base}/{project}")
        }
    }

    pub(super) fn link_for(&self, topic: &Topic, payload: &Payload) -> Option<String> {
        let Some(group) = Group::classify(topic) else {
            return Some(self.config.base_url().to_string());
        };

        let link = match group {
            Group::Issue => {
                let issue = payload.issue.as_ref();
                entity_url(
                    self.project_url(&payload.project_path()),
                    "issue",
                    issue.and_then(|issue| issue.id.as_ref()),
                    issue.and_then(|issue| issue.comments.as_deref()),
                    is_comment(topic),
                )
            }
            Group::PullRequest => {
                let pr = payload.pullrequest.as_ref();
                entity_url(
                    self.project_url(&payload.project_path()),
                    "pull-request",
                    pr.and_then(|pr| pr.id.as_ref()),
                    pr.and_then(|pr| pr.comments.as_deref()),
                    is_comment(topic),
                )
            }
            Group::Project => self.project_url(&payload.project_path()),
            Group::GitReceive => {
                let root = self.project_url(&payload.repo_path());
                match payload.commit.as_ref().and_then(|c| c.rev.as_deref()) {
                    Some(rev) => format!("{root}/{rev}"),
                    None => root,
                }
            }
        };

        Some(link)
    }

    pub(super) fn objects_for(&self, topic: &Topic, payload: &Payload) -> BTreeSet<String> {
        let mut objects = BTreeSet::new();
        let Some(group) = Group::classify(topic) else {
            return objects;
        };

        match group {
            Group::Issue => {
                if let Some(id) = payload.issue_id() {
                    objects.insert(format!("issue/{id}"));
                }
                objects.insert(format!("project/{}", payload.project_path()));
            }
            Group::PullRequest => {
                if let Some(id) = payload.pull_request_id() {
                    objects.insert(format!("pull-request/{id}"));
                }
                objects.insert(format!("project/{}", payload.project_path()));
            }
            Group::Project => {
                objects.insert(format!("project/{}", payload.project_path()));
            }
            Group::GitReceive => {
                objects.insert(format!("project/{}", payload.repo_path()));
            }
        }

        objects
    }

    pub(super) fn usernames_for(&self, topic: &Topic, payload: &Payload) -> BTreeSet<String> {
        let username = payload.agent().map(str::to_string).or_else(|| {
            if Group::classify(topic) != Some(Group::GitReceive) {
                return None;
            }
            let email = payload.commit.as_ref()?.email.as_deref()?;
            self.identity.user_from_email(email)
        });

        username.into_iter().collect()
    }

    pub(super) fn secondary_icon_for(&self, payload: &Payload) -> Option<String> {
        payload
            .agent()
            .map(|agent| self.identity.avatar_url(agent))
    }
}

/// `{root}/{kind}/{id}`, with a `#comment-N` anchor for comment events.
///
/// Without an id the project root is the best link available.
fn entity_url(
    root: String,
    kind: &str,
    id: Option<&Id>,
    comments: Option<&[Value]>,
    comment_event: bool,
) -> String {
    let Some(id) = id else {
        return root;
    };

    match comments {
        Some(comments) if comment_event => {
            format!("{root}/{kind}/{id}#comment-{}", comments.len())
        }
        _ => format!("{root}/{kind}/{id}"),
    }
}
