//! Subtitle text for each Pagure event family.

use super::PagureProcessor;
use crate::family::Family;
use crate::payload::Payload;
use crate::text::render_series;
use msgmeta_proto::{Error, Topic};
use tracing::debug;

/// Shown in place of a missing `agent`.
const UNKNOWN_USER: &str = "(unknown)";

const PROJECT_NEW: &str = r#"{user} created a new project "{project}""#;
const ISSUE_NEW: &str = r#"{user} opened a new ticket {project}#{id}: "{title}""#;
const ISSUE_COMMENT: &str = r#"{user} commented on ticket {project}#{id}: "{title}""#;
const ISSUE_TAG_ADDED: &str = "{user} tagged ticket {project}#{id}: {tags}";
const ISSUE_TAG_REMOVED: &str = "{user} removed the {tags} tags from ticket {project}#{id}";
const ISSUE_ASSIGNED: &str = "{user} assigned ticket {project}#{id} to {assignee}";
const ISSUE_ASSIGNEE_RESET: &str = "{user} reset the assignee of ticket {project}#{id}";
const ISSUE_DEPENDENCY_ADDED: &str =
    "{user} added ticket {project}#{id} as a dependency of ticket {project}#{dep_id}";
const ISSUE_DEPENDENCY_REMOVED: &str =
    "{user} removed ticket {project}#{id} as a dependency of ticket {project}#{removed}";
const ISSUE_EDIT: &str = "{user} edited the {fields} fields of ticket {project}#{id}";
const PROJECT_EDIT: &str = "{user} edited the {fields} fields of project {project}";
const PROJECT_USER_ADDED: &str = r#"{user} added "{new_user}" to project {project}"#;
const PROJECT_TAG_REMOVED: &str = r#"{user} removed tags "{tags}" from project {project}"#;
const PROJECT_TAG_EDITED: &str =
    r#"{user} altered tags on project {project} from "{old_tag}" to "{new_tag}""#;
const PROJECT_FORKED: &str = r#"{user} forked project "{old_project}" to "{project}""#;
const PR_COMMENT: &str = r#"{user} commented on pull-request#{id} of project "{project}""#;
const PR_MERGED: &str = r#"{user} merged pull-request#{id} of project "{project}""#;
const PR_CLOSED: &str =
    r#"{user} closed (without merging) pull-request#{id} of project "{project}""#;
const PR_NEW: &str = r#"{user} opened pull-request#{id}: "{title}" on project "{project}""#;
const PR_FLAG_ADDED: &str = r#"{username} flagged {project}#{id} with "{comment}""#;
const PR_FLAG_UPDATED: &str =
    r#"{username} updated the flags on {project}#{id} with: "{comment}""#;
const GIT_RECEIVE: &str = r#"{user} pushed to {repo} ({branch}). "{summary}""#;

impl PagureProcessor {
    pub(super) fn subtitle_for(&self, topic: &Topic, payload: &Payload) -> Option<String> {
        let Some(family) = Family::classify(topic) else {
            debug!(error = %Error::UnknownFamily(topic.to_string()), "No subtitle");
            return None;
        };

        let subtitle = self.render_family(family, payload);
        if subtitle.is_none() {
            debug!(family = family.tag(), "Payload lacks fields for subtitle");
        }
        subtitle
    }

    fn render_family(&self, family: Family, payload: &Payload) -> Option<String> {
        let project = payload.project_path();
        let project = project.as_str();
        let user = payload.agent().unwrap_or(UNKNOWN_USER);
        let series = |items: Option<&Vec<String>>| {
            items.map(|items| render_series(items, self.config.series_limit))
        };

        let text = match family {
            Family::ProjectNew => {
                self.render(PROJECT_NEW, &[("user", user), ("project", project)])
            }
            Family::IssueNew | Family::IssueCommentAdded => {
                let issue = payload.issue.as_ref()?;
                let id = issue.id.as_ref()?.to_string();
                let title = issue.title.as_deref()?;
                let template = if family == Family::IssueNew {
                    ISSUE_NEW
                } else {
                    ISSUE_COMMENT
                };
                self.render(
                    template,
                    &[("user", user), ("project", project), ("id", &id), ("title", title)],
                )
            }
            Family::IssueTagAdded | Family::IssueTagRemoved => {
                let id = payload.issue_id()?.to_string();
                let tags = series(payload.tags.as_ref())?;
                let template = if family == Family::IssueTagAdded {
                    ISSUE_TAG_ADDED
                } else {
                    ISSUE_TAG_REMOVED
                };
                self.render(
                    template,
                    &[("user", user), ("project", project), ("id", &id), ("tags", &tags)],
                )
            }
            Family::IssueAssignedAdded => {
                let issue = payload.issue.as_ref()?;
                let id = issue.id.as_ref()?.to_string();
                let assignee = issue.assignee.as_ref()?.name.as_deref()?;
                self.render(
                    ISSUE_ASSIGNED,
                    &[("user", user), ("project", project), ("id", &id), ("assignee", assignee)],
                )
            }
            Family::IssueAssignedReset => {
                let id = payload.issue_id()?.to_string();
                self.render(
                    ISSUE_ASSIGNEE_RESET,
                    &[("user", user), ("project", project), ("id", &id)],
                )
            }
            Family::IssueDependencyAdded => {
                let id = payload.issue_id()?.to_string();
                let dep_id = payload.added_dependency.as_ref()?.to_string();
                self.render(
                    ISSUE_DEPENDENCY_ADDED,
                    &[("user", user), ("project", project), ("id", &id), ("dep_id", &dep_id)],
                )
            }
            Family::IssueDependencyRemoved => {
                let id = payload.issue_id()?.to_string();
                let removed = payload.removed_dependency.as_ref()?.to_string();
                self.render(
                    ISSUE_DEPENDENCY_REMOVED,
                    &[("user", user), ("project", project), ("id", &id), ("removed", &removed)],
                )
            }
            Family::IssueEdit => {
                let id = payload.issue_id()?.to_string();
                let fields = series(payload.fields.as_ref())?;
                self.render(
                    ISSUE_EDIT,
                    &[("user", user), ("project", project), ("id", &id), ("fields", &fields)],
                )
            }
            Family::ProjectEdit => {
                let fields = series(payload.fields.as_ref())?;
                self.render(
                    PROJECT_EDIT,
                    &[("user", user), ("project", project), ("fields", &fields)],
                )
            }
            Family::ProjectUserAdded => {
                let new_user = payload.new_user.as_deref()?;
                self.render(
                    PROJECT_USER_ADDED,
                    &[("user", user), ("project", project), ("new_user", new_user)],
                )
            }
            Family::ProjectTagRemoved => {
                let tags = series(payload.tags.as_ref())?;
                self.render(
                    PROJECT_TAG_REMOVED,
                    &[("user", user), ("project", project), ("tags", &tags)],
                )
            }
            Family::ProjectTagEdited => {
                let old_tag = payload.old_tag.as_deref()?;
                let new_tag = payload.new_tag.as_deref()?;
                self.render(
                    PROJECT_TAG_EDITED,
                    &[
                        ("user", user),
                        ("project", project),
                        ("old_tag", old_tag),
                        ("new_tag", new_tag),
                    ],
                )
            }
            Family::ProjectForked => {
                let old_project = payload.project.as_ref()?.parent_name()?;
                self.render(
                    PROJECT_FORKED,
                    &[("user", user), ("project", project), ("old_project", old_project)],
                )
            }
            Family::PullRequestCommentAdded => {
                let id = payload.pull_request_id()?.to_string();
                self.render(PR_COMMENT, &[("user", user), ("project", project), ("id", &id)])
            }
            Family::PullRequestClosed => {
                let id = payload.pull_request_id()?.to_string();
                let template = if payload.merged? { PR_MERGED } else { PR_CLOSED };
                self.render(template, &[("user", user), ("project", project), ("id", &id)])
            }
            Family::PullRequestNew => {
                let pr = payload.pullrequest.as_ref()?;
                let id = pr.id.as_ref()?.to_string();
                let title = pr.title.as_deref()?;
                self.render(
                    PR_NEW,
                    &[("user", user), ("project", project), ("id", &id), ("title", title)],
                )
            }
            Family::PullRequestFlagAdded | Family::PullRequestFlagUpdated => {
                let id = payload.pull_request_id()?.to_string();
                let flag = payload.flag.as_ref()?;
                let username = flag.username.as_deref()?;
                let comment = flag.comment.as_deref()?;
                let template = if family == Family::PullRequestFlagAdded {
                    PR_FLAG_ADDED
                } else {
                    PR_FLAG_UPDATED
                };
                self.render(
                    template,
                    &[
                        ("username", username),
                        ("project", project),
                        ("id", &id),
                        ("comment", comment),
                    ],
                )
            }
            Family::GitReceive => {
                let commit = payload.commit.as_ref()?;
                let repo = payload.repo_path();
                let email = commit.email.as_deref()?;
                let summary = commit.summary_line()?;
                let branch = commit.branch_name()?;
                let author = self.identity.user_from_email(email);
                let author = author.as_deref().unwrap_or(email);
                self.render(
                    GIT_RECEIVE,
                    &[
                        ("user", author),
                        ("repo", &repo),
                        ("branch", branch),
                        ("summary", &summary),
                    ],
                )
            }
        };

        Some(text)
    }
}
