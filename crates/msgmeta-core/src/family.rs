//! Topic classification for Pagure events.
//!
//! Families are recognized by substring containment of a tag in the topic.
//! Tags overlap (`pagure.issue` is contained in every issue tag), so the
//! tables below are scanned in order and the first hit wins.

use msgmeta_proto::Topic;

/// One specific kind of Pagure event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    ProjectNew,
    IssueNew,
    IssueCommentAdded,
    IssueTagAdded,
    IssueTagRemoved,
    IssueAssignedAdded,
    IssueAssignedReset,
    IssueDependencyAdded,
    IssueDependencyRemoved,
    IssueEdit,
    ProjectEdit,
    ProjectUserAdded,
    ProjectTagRemoved,
    ProjectTagEdited,
    ProjectForked,
    PullRequestCommentAdded,
    PullRequestClosed,
    PullRequestNew,
    PullRequestFlagAdded,
    PullRequestFlagUpdated,
    GitReceive,
}

/// Family tags in match priority order.
const FAMILIES: [(&str, Family); 21] = [
    ("pagure.project.new", Family::ProjectNew),
    ("pagure.issue.new", Family::IssueNew),
    ("pagure.issue.comment.added", Family::IssueCommentAdded),
    ("pagure.issue.tag.added", Family::IssueTagAdded),
    ("pagure.issue.tag.removed", Family::IssueTagRemoved),
    ("pagure.issue.assigned.added", Family::IssueAssignedAdded),
    ("pagure.issue.assigned.reset", Family::IssueAssignedReset),
    ("pagure.issue.dependency.added", Family::IssueDependencyAdded),
    ("pagure.issue.dependency.removed", Family::IssueDependencyRemoved),
    ("pagure.issue.edit", Family::IssueEdit),
    ("pagure.project.edit", Family::ProjectEdit),
    ("pagure.project.user.added", Family::ProjectUserAdded),
    ("pagure.project.tag.removed", Family::ProjectTagRemoved),
    ("pagure.project.tag.edited", Family::ProjectTagEdited),
    ("pagure.project.forked", Family::ProjectForked),
    ("pagure.pull-request.comment.added", Family::PullRequestCommentAdded),
    ("pagure.pull-request.closed", Family::PullRequestClosed),
    ("pagure.pull-request.new", Family::PullRequestNew),
    ("pagure.pull-request.flag.added", Family::PullRequestFlagAdded),
    ("pagure.pull-request.flag.updated", Family::PullRequestFlagUpdated),
    ("pagure.git.receive", Family::GitReceive),
];

impl Family {
    /// Returns the first family whose tag occurs in the topic.
    pub fn classify(topic: &Topic) -> Option<Self> {
        FAMILIES
            .iter()
            .find(|(tag, _)| topic.contains(tag))
            .map(|(_, family)| *family)
    }

    /// The tag that identifies this family.
    pub fn tag(self) -> &'static str {
        FAMILIES
            .iter()
            .find(|(_, family)| *family == self)
            .map_or("", |(tag, _)| *tag)
    }

    /// All families with their tags, in match order.
    pub fn all() -> impl Iterator<Item = (&'static str, Family)> {
        FAMILIES.into_iter()
    }

    /// The entity group this family belongs to.
    pub fn group(self) -> Group {
        match self {
            Family::ProjectNew
            | Family::ProjectEdit
            | Family::ProjectUserAdded
            | Family::ProjectTagRemoved
            | Family::ProjectTagEdited
            | Family::ProjectForked => Group::Project,
            Family::IssueNew
            | Family::IssueCommentAdded
            | Family::IssueTagAdded
            | Family::IssueTagRemoved
            | Family::IssueAssignedAdded
            | Family::IssueAssignedReset
            | Family::IssueDependencyAdded
            | Family::IssueDependencyRemoved
            | Family::IssueEdit => Group::Issue,
            Family::PullRequestCommentAdded
            | Family::PullRequestClosed
            | Family::PullRequestNew
            | Family::PullRequestFlagAdded
            | Family::PullRequestFlagUpdated => Group::PullRequest,
            Family::GitReceive => Group::GitReceive,
        }
    }
}

/// The kind of entity an event is about.
///
/// Groups are matched on their own, so a topic such as
/// `pagure.issue.drop` still links to its issue without a dedicated family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Issue,
    PullRequest,
    Project,
    GitReceive,
}

const GROUPS: [(&str, Group); 4] = [
    ("pagure.issue", Group::Issue),
    ("pagure.pull-request", Group::PullRequest),
    ("pagure.project", Group::Project),
    ("pagure.git.receive", Group::GitReceive),
];

/// Marker for comment sub-events inside the issue and pull-request groups.
const COMMENT_MARKER: &str = "comment";

impl Group {
    /// Returns the first group whose tag occurs in the topic.
    pub fn classify(topic: &Topic) -> Option<Self> {
        GROUPS
            .iter()
            .find(|(tag, _)| topic.contains(tag))
            .map(|(_, group)| *group)
    }
}

/// Returns true if the topic names a comment sub-event.
pub fn is_comment(topic: &Topic) -> bool {
    topic.contains(COMMENT_MARKER)
}
