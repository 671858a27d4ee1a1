//! JSON bodies shaped like Bitbucket Cloud responses.

use serde_json::{Value, json};

/// A pull request in `acme/widgets`.
#[must_use]
pub fn pull_request(id: u64, state: &str, source: &str) -> Value {
    json!({
        "type": "pullrequest",
        "id": id,
        "title": format!("Pull request {id}"),
        "description": "",
        "state": state,
        "source": {
            "branch": {"name": source},
            "commit": {"hash": "1a2b3c4d5e6f"},
            "repository": {"full_name": "acme/widgets"}
        },
        "destination": {
            "branch": {"name": "main"},
            "repository": {"full_name": "acme/widgets"}
        },
        "author": {"uuid": "{author}", "nickname": "author", "display_name": "The Author"},
        "participants": [],
        "reviewers": [],
        "comment_count": 0,
        "close_source_branch": false,
        "created_on": "2025-03-01T10:00:00.000000+00:00",
        "updated_on": "2025-03-02T10:00:00.000000+00:00",
        "links": {
            "html": {"href": format!("https://bitbucket.org/acme/widgets/pull-requests/{id}")},
            "diff": {"href": format!("https://api.bitbucket.org/2.0/repositories/acme/widgets/pullrequests/{id}/diff")}
        }
    })
}

/// A page envelope.
#[must_use]
pub fn page(values: Vec<Value>, next: Option<&str>) -> Value {
    let len = values.len();
    let mut page = json!({
        "values": values,
        "pagelen": len,
        "size": len,
        "page": 1
    });
    if let Some(next) = next {
        page["next"] = json!(next);
    }
    page
}

#[must_use]
pub fn branch(name: &str, hash: &str, message: &str) -> Value {
    json!({
        "type": "branch",
        "name": name,
        "target": {"hash": hash, "message": message, "date": "2025-03-01T10:00:00+00:00"}
    })
}

#[must_use]
pub fn project(key: &str, name: &str) -> Value {
    json!({
        "type": "project",
        "key": key,
        "name": name,
        "description": "",
        "is_private": true,
        "uuid": format!("{{{key}}}"),
        "links": {"html": {"href": format!("https://bitbucket.org/acme/workspace/projects/{key}")}}
    })
}

#[must_use]
pub fn account(uuid: &str, nickname: &str, display_name: &str) -> Value {
    json!({
        "type": "user",
        "uuid": uuid,
        "nickname": nickname,
        "display_name": display_name,
        "account_id": format!("557058:{nickname}")
    })
}

#[must_use]
pub fn repository(main_branch: &str) -> Value {
    json!({
        "type": "repository",
        "full_name": "acme/widgets",
        "name": "widgets",
        "is_private": true,
        "mainbranch": {"type": "branch", "name": main_branch},
        "links": {"html": {"href": "https://bitbucket.org/acme/widgets"}}
    })
}
