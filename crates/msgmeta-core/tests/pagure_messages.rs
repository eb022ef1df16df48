//! End-to-end annotations of representative Pagure messages.

use msgmeta_core::{IdentityResolver, Localizer, MetaConfig, PagureProcessor, default_registry};
use msgmeta_proto::{Event, Processor};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Deterministic stand-in for the account service.
struct FakeIdentity;

impl IdentityResolver for FakeIdentity {
    fn avatar_url(&self, identity: &str) -> String {
        format!("https://avatars.example/{identity}")
    }

    fn user_from_email(&self, email: &str) -> Option<String> {
        match email {
            "pingou@pingoured.fr" => Some("pingou".to_string()),
            _ => None,
        }
    }
}

fn processor() -> PagureProcessor {
    PagureProcessor::new(MetaConfig::default())
        .unwrap()
        .with_identity(FakeIdentity)
}

fn event(kind: &str, msg: Value) -> Event {
    Event::new(format!("io.pagure.prod.{kind}"), msg)
        .with_username("pagure")
        .with_timestamp(1_431_506_542.0)
}

fn project(name: &str) -> Value {
    json!({"name": name, "parent": null, "user": {"name": "pingou"}})
}

fn fork(name: &str, owner: &str) -> Value {
    json!({
        "name": name,
        "parent": {"name": name, "parent": null, "user": {"name": "upstream"}},
        "user": {"name": owner}
    })
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Issues
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_issue_new() {
    let p = processor();
    let e = event(
        "pagure.issue.new",
        json!({
            "agent": "alice",
            "project": {"name": "foo", "parent": null},
            "issue": {"id": 12, "title": "Bug", "comments": []}
        }),
    );

    let annotation = p.annotate(&e);
    assert_eq!(annotation.title, "pagure.issue.new");
    assert_eq!(annotation.subtitle.as_deref(), Some(r#"alice opened a new ticket foo#12: "Bug""#));
    assert_eq!(annotation.link.as_deref(), Some("https://pagure.io/foo/issue/12"));
    assert_eq!(annotation.objects, set(&["issue/12", "project/foo"]));
    assert_eq!(annotation.usernames, set(&["alice"]));
    assert_eq!(
        annotation.icon.as_deref(),
        Some("https://apps.fedoraproject.org/packages/images/icons/package_128x128.png")
    );
    assert_eq!(annotation.secondary_icon.as_deref(), Some("https://avatars.example/alice"));
}

#[test]
fn test_issue_new_on_fork() {
    let p = processor();
    let e = event(
        "pagure.issue.new",
        json!({
            "agent": "alice",
            "project": {"name": "foo", "parent": {"name": "foo-parent"}, "user": {"name": "bob"}},
            "issue": {"id": 12, "title": "Bug"}
        }),
    );

    assert_eq!(p.subtitle(&e).as_deref(), Some(r#"alice opened a new ticket bob/foo#12: "Bug""#));
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/fork/bob/foo/issue/12"));
    assert_eq!(p.objects(&e), set(&["issue/12", "project/bob/foo"]));
}

#[test]
fn test_issue_comment_anchor_counts_comments() {
    let p = processor();
    let mut msg = json!({
        "agent": "pingou",
        "project": project("test"),
        "issue": {"id": 1, "title": "test issue", "comments": [{"id": 1}, {"id": 2}]}
    });

    let e = event("pagure.issue.comment.added", msg.clone());
    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"pingou commented on ticket test#1: "test issue""#)
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test/issue/1#comment-2"));
    assert_eq!(p.objects(&e), set(&["issue/1", "project/test"]));

    msg["issue"]["comments"] = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
    let e = event("pagure.issue.comment.added", msg);
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test/issue/1#comment-3"));
}

#[test]
fn test_issue_tags() {
    let p = processor();
    let added = event(
        "pagure.issue.tag.added",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 7, "title": "t"},
            "tags": ["easyfix", "bug"]
        }),
    );
    assert_eq!(p.subtitle(&added).as_deref(), Some("pingou tagged ticket test#7: bug and easyfix"));
    assert_eq!(p.link(&added).as_deref(), Some("https://pagure.io/test/issue/7"));

    let removed = event(
        "pagure.issue.tag.removed",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 7, "title": "t"},
            "tags": ["easyfix"]
        }),
    );
    assert_eq!(
        p.subtitle(&removed).as_deref(),
        Some("pingou removed the easyfix tags from ticket test#7")
    );
    assert_eq!(p.objects(&removed), set(&["issue/7", "project/test"]));
}

#[test]
fn test_issue_assignment() {
    let p = processor();
    let added = event(
        "pagure.issue.assigned.added",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 3, "title": "t", "assignee": {"name": "jsmith"}}
        }),
    );
    assert_eq!(p.subtitle(&added).as_deref(), Some("pingou assigned ticket test#3 to jsmith"));

    let reset = event(
        "pagure.issue.assigned.reset",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 3, "title": "t", "assignee": null}
        }),
    );
    assert_eq!(p.subtitle(&reset).as_deref(), Some("pingou reset the assignee of ticket test#3"));
    assert_eq!(p.link(&reset).as_deref(), Some("https://pagure.io/test/issue/3"));
}

#[test]
fn test_issue_dependencies() {
    let p = processor();
    let added = event(
        "pagure.issue.dependency.added",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 2, "title": "t"},
            "added_dependency": 1
        }),
    );
    assert_eq!(
        p.subtitle(&added).as_deref(),
        Some("pingou added ticket test#2 as a dependency of ticket test#1")
    );

    let removed = event(
        "pagure.issue.dependency.removed",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 2, "title": "t"},
            "removed_dependency": [1]
        }),
    );
    // a list is not an id, so the subtitle degrades
    assert_eq!(p.subtitle(&removed), None);
    assert_eq!(p.link(&removed).as_deref(), Some("https://pagure.io/test/issue/2"));
}

#[test]
fn test_issue_edit() {
    let p = processor();
    let e = event(
        "pagure.issue.edit",
        json!({
            "agent": "pingou",
            "project": project("test"),
            "issue": {"id": 4, "title": "t"},
            "fields": ["title", "content", "status"]
        }),
    );
    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some("pingou edited the content, status, and title fields of ticket test#4")
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test/issue/4"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_project_new() {
    let p = processor();
    let e = event("pagure.project.new", json!({"agent": "pingou", "project": project("test")}));

    assert_eq!(p.subtitle(&e).as_deref(), Some(r#"pingou created a new project "test""#));
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test"));
    assert_eq!(p.objects(&e), set(&["project/test"]));
}

#[test]
fn test_project_edit_and_users() {
    let p = processor();
    let edit = event(
        "pagure.project.edit",
        json!({"agent": "pingou", "project": project("test"), "fields": ["description"]}),
    );
    assert_eq!(
        p.subtitle(&edit).as_deref(),
        Some("pingou edited the description fields of project test")
    );
    assert_eq!(p.link(&edit).as_deref(), Some("https://pagure.io/test"));

    let user = event(
        "pagure.project.user.added",
        json!({"agent": "pingou", "project": project("test"), "new_user": "jsmith"}),
    );
    assert_eq!(p.subtitle(&user).as_deref(), Some(r#"pingou added "jsmith" to project test"#));
    assert_eq!(p.objects(&user), set(&["project/test"]));
}

#[test]
fn test_project_tags() {
    let p = processor();
    let removed = event(
        "pagure.project.tag.removed",
        json!({"agent": "pingou", "project": project("test"), "tags": ["foo", "bar"]}),
    );
    assert_eq!(
        p.subtitle(&removed).as_deref(),
        Some(r#"pingou removed tags "bar and foo" from project test"#)
    );

    let edited = event(
        "pagure.project.tag.edited",
        json!({"agent": "pingou", "project": project("test"), "old_tag": "foo", "new_tag": "bar"}),
    );
    assert_eq!(
        p.subtitle(&edited).as_deref(),
        Some(r#"pingou altered tags on project test from "foo" to "bar""#)
    );
    assert_eq!(p.link(&edited).as_deref(), Some("https://pagure.io/test"));
}

#[test]
fn test_project_forked() {
    let p = processor();
    let e = event("pagure.project.forked", json!({"agent": "pingou", "project": fork("test", "pingou")}));

    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"pingou forked project "test" to "pingou/test""#)
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/fork/pingou/test"));
    assert_eq!(p.objects(&e), set(&["project/pingou/test"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Pull-requests
// ─────────────────────────────────────────────────────────────────────────────

fn pull_request(comments: usize) -> Value {
    let comments: Vec<Value> = (1..=comments).map(|id| json!({"id": id})).collect();
    json!({
        "id": 4,
        "title": "Add CI",
        "comments": comments,
        "project": project("test")
    })
}

#[test]
fn test_pull_request_new_uses_nested_project() {
    let p = processor();
    let e = event("pagure.pull-request.new", json!({"agent": "pingou", "pullrequest": pull_request(0)}));

    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"pingou opened pull-request#4: "Add CI" on project "test""#)
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test/pull-request/4"));
    assert_eq!(p.objects(&e), set(&["project/test", "pull-request/4"]));
}

#[test]
fn test_pull_request_comment() {
    let p = processor();
    let e = event(
        "pagure.pull-request.comment.added",
        json!({"agent": "pingou", "pullrequest": pull_request(1)}),
    );

    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"pingou commented on pull-request#4 of project "test""#)
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test/pull-request/4#comment-1"));
}

#[test]
fn test_pull_request_closed() {
    let p = processor();
    let merged = event(
        "pagure.pull-request.closed",
        json!({"agent": "pingou", "pullrequest": pull_request(0), "merged": true}),
    );
    assert_eq!(
        p.subtitle(&merged).as_deref(),
        Some(r#"pingou merged pull-request#4 of project "test""#)
    );

    let closed = event(
        "pagure.pull-request.closed",
        json!({"agent": "pingou", "pullrequest": pull_request(0), "merged": false}),
    );
    assert_eq!(
        p.subtitle(&closed).as_deref(),
        Some(r#"pingou closed (without merging) pull-request#4 of project "test""#)
    );
    assert_eq!(p.link(&closed).as_deref(), Some("https://pagure.io/test/pull-request/4"));
}

#[test]
fn test_pull_request_flags() {
    let p = processor();
    let flag = json!({"username": "Jenkins", "comment": "Tests passed"});

    let added = event(
        "pagure.pull-request.flag.added",
        json!({"agent": "pingou", "pullrequest": pull_request(0), "flag": flag}),
    );
    assert_eq!(p.subtitle(&added).as_deref(), Some(r#"Jenkins flagged test#4 with "Tests passed""#));
    assert_eq!(p.usernames(&added), set(&["pingou"]));

    let updated = event(
        "pagure.pull-request.flag.updated",
        json!({"agent": "pingou", "pullrequest": pull_request(0), "flag": flag}),
    );
    assert_eq!(
        p.subtitle(&updated).as_deref(),
        Some(r#"Jenkins updated the flags on test#4 with: "Tests passed""#)
    );
    assert_eq!(p.link(&updated).as_deref(), Some("https://pagure.io/test/pull-request/4"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Pushes
// ─────────────────────────────────────────────────────────────────────────────

fn commit(repo: Value, email: &str, message: &str) -> Value {
    json!({
        "commit": {
            "rev": "9b0f2d4c4b5b4f0e5f3c2c8a1d7e6b5a4c3d2e1f",
            "repo": repo,
            "email": email,
            "summary": "Fix typo",
            "message": message,
            "branch": "refs/heads/master",
            "name": "Pierre-Yves Chibon"
        }
    })
}

#[test]
fn test_git_receive_resolves_author_from_email() {
    let p = processor();
    let e = event(
        "pagure.git.receive",
        commit(project("test"), "pingou@pingoured.fr", "Fix typo\n\nIn the README."),
    );

    let annotation = p.annotate(&e);
    assert_eq!(
        annotation.subtitle.as_deref(),
        Some(r#"pingou pushed to test (master). "Fix typo (..more)""#)
    );
    assert_eq!(
        annotation.link.as_deref(),
        Some("https://pagure.io/test/9b0f2d4c4b5b4f0e5f3c2c8a1d7e6b5a4c3d2e1f")
    );
    assert_eq!(annotation.objects, set(&["project/test"]));
    assert_eq!(annotation.usernames, set(&["pingou"]));
    assert_eq!(annotation.secondary_icon, None);
}

#[test]
fn test_git_receive_unknown_author_shows_email() {
    let p = processor();
    let e = event("pagure.git.receive", commit(project("test"), "someone@example.com", "Fix typo\n"));

    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"someone@example.com pushed to test (master). "Fix typo""#)
    );
    assert!(p.usernames(&e).is_empty());
    // repeated calls give the same text
    assert_eq!(p.subtitle(&e), p.subtitle(&e));
}

#[test]
fn test_git_receive_to_fork() {
    let p = processor();
    let e = event("pagure.git.receive", commit(fork("test", "jsmith"), "pingou@pingoured.fr", "Fix typo"));

    assert_eq!(
        p.link(&e).as_deref(),
        Some("https://pagure.io/fork/jsmith/test/9b0f2d4c4b5b4f0e5f3c2c8a1d7e6b5a4c3d2e1f")
    );
    assert_eq!(p.objects(&e), set(&["project/jsmith/test"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Degraded input
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unrecognized_topic() {
    let p = processor();
    let e = event("pagure.admin.reindex", json!({"agent": "pingou", "project": project("test")}));

    assert_eq!(p.subtitle(&e), None);
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io"));
    assert!(p.objects(&e).is_empty());
    assert_eq!(p.usernames(&e), set(&["pingou"]));
}

#[test]
fn test_empty_payload_never_panics() {
    let p = processor();
    for kind in [
        "pagure.issue.new",
        "pagure.issue.comment.added",
        "pagure.project.forked",
        "pagure.pull-request.closed",
        "pagure.pull-request.flag.added",
        "pagure.git.receive",
    ] {
        for msg in [json!({}), json!(null), json!("text"), json!({"issue": 5, "commit": []})] {
            let annotation = p.annotate(&event(kind, msg));
            assert_eq!(annotation.subtitle, None, "{kind}");
            assert!(annotation.usernames.is_empty(), "{kind}");
            assert!(annotation.link.is_some(), "{kind}");
        }
    }
}

#[test]
fn test_missing_project_uses_sentinel() {
    let p = processor();
    let e = event("pagure.issue.new", json!({"agent": "alice", "issue": {"id": 12, "title": "Bug"}}));

    assert_eq!(
        p.subtitle(&e).as_deref(),
        Some(r#"alice opened a new ticket (unknown)#12: "Bug""#)
    );
    assert_eq!(p.objects(&e), set(&["issue/12", "project/(unknown)"]));
}

#[test]
fn test_comment_event_without_issue_id_links_to_project() {
    let p = processor();
    let e = event(
        "pagure.issue.comment.added",
        json!({"agent": "alice", "project": project("test"), "issue": {"title": "no id"}}),
    );
    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/test"));
    assert_eq!(p.objects(&e), set(&["project/test"]));
}

#[test]
fn test_empty_agent_counts_as_missing() {
    // default resolver: fedoraproject.org addresses map to their local part
    let p = PagureProcessor::new(MetaConfig::default()).unwrap();
    let mut msg = commit(project("test"), "pingou@fedoraproject.org", "Fix typo");
    msg["agent"] = json!("");
    let push = event("pagure.git.receive", msg);

    assert_eq!(p.usernames(&push), set(&["pingou"]));
    assert_eq!(p.secondary_icon(&push), None);

    let issue = event(
        "pagure.issue.new",
        json!({"agent": "", "project": project("foo"), "issue": {"id": 12, "title": "Bug"}}),
    );
    assert_eq!(
        p.subtitle(&issue).as_deref(),
        Some(r#"(unknown) opened a new ticket foo#12: "Bug""#)
    );
    assert!(p.usernames(&issue).is_empty());
    assert_eq!(p.secondary_icon(&issue), None);
}

#[test]
fn test_project_without_parent_key_falls_through() {
    let p = processor();
    let e = event(
        "pagure.pull-request.new",
        json!({
            "agent": "pingou",
            "project": {"name": "top"},
            "pullrequest": {"id": 1, "title": "Add CI", "project": {"name": "bar", "parent": null}}
        }),
    );

    assert_eq!(p.link(&e).as_deref(), Some("https://pagure.io/bar/pull-request/1"));
    assert_eq!(p.objects(&e), set(&["project/bar", "pull-request/1"]));
}

#[test]
fn test_negative_issue_id_is_rendered() {
    let p = processor();
    let e = event(
        "pagure.issue.new",
        json!({"agent": "alice", "project": project("foo"), "issue": {"id": -1, "title": "Bug"}}),
    );
    assert_eq!(p.subtitle(&e).as_deref(), Some(r#"alice opened a new ticket foo#-1: "Bug""#));
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration and dispatch
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_custom_base_url_and_translation() {
    let mut config = MetaConfig::default();
    config.base_url = "https://src.example.org/".to_string();
    config.translations.insert(
        r#"{user} created a new project "{project}""#.to_string(),
        "{user} a créé le projet « {project} »".to_string(),
    );
    let p = PagureProcessor::new(config).unwrap().with_identity(FakeIdentity);
    let e = event("pagure.project.new", json!({"agent": "pingou", "project": project("test")}));

    assert_eq!(p.subtitle(&e).as_deref(), Some("pingou a créé le projet « test »"));
    assert_eq!(p.link(&e).as_deref(), Some("https://src.example.org/test"));
}

/// Wraps every template in brackets.
struct Bracketing;

impl Localizer for Bracketing {
    fn translate<'a>(&'a self, template: &'a str) -> Cow<'a, str> {
        Cow::Owned(format!("[{template}]"))
    }
}

#[test]
fn test_custom_localizer() {
    let p = processor().with_localizer(Bracketing);
    let e = event("pagure.project.new", json!({"agent": "pingou", "project": project("test")}));

    assert_eq!(p.subtitle(&e).as_deref(), Some(r#"[pingou created a new project "test"]"#));
}

#[test]
fn test_processor_metadata() {
    let mut config = MetaConfig::default();
    config.base_url = "https://src.example.org/".to_string();
    let p = PagureProcessor::new(config).unwrap();

    assert_eq!(p.config().base_url(), "https://src.example.org");
    assert_eq!(p.name(), "pagure");
    assert_eq!(p.object_kind(), "Pagure forge");
    assert_eq!(p.home_url(), Some("https://src.example.org"));
    assert_eq!(p.docs_url(), Some("https://pagure.io/pagure"));
}

#[test]
fn test_default_registry_dispatches_pagure_topics() {
    let registry = default_registry(MetaConfig::default()).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["pagure"]);

    for env in ["dev", "stg", "prod"] {
        let e = Event::new(
            format!("io.pagure.{env}.pagure.project.new"),
            json!({"agent": "pingou", "project": project("test")}),
        );
        let annotation = registry.annotate(&e).unwrap();
        assert_eq!(annotation.objects, set(&["project/test"]));
    }

    let foreign = Event::new("org.fedoraproject.prod.fedimg.image.upload", json!({}));
    assert!(registry.annotate(&foreign).is_none());
}

#[test]
fn test_processor_is_shareable_across_threads() {
    let p = processor();
    let e = event(
        "pagure.issue.new",
        json!({"agent": "alice", "project": project("foo"), "issue": {"id": 12, "title": "Bug"}}),
    );
    let expected = p.annotate(&e);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert_eq!(p.annotate(&e), expected));
        }
    });
}
