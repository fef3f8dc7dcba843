use serde::{Deserialize, Serialize};

use crate::model::{Commit, Id};

/// A named, ordered sequence of commits, newest first. `head` always equals
/// `commits[0].id` after any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub head: Id,
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub is_default: bool,
}

impl Branch {
    /// The default branch seeded from the order's init commit.
    pub fn new_main(init: Commit) -> Self {
        Self {
            name: "main".to_string(),
            head: init.id.clone(),
            commits: vec![init],
            is_default: true,
        }
    }

    /// Snapshot this branch's head and full commit list into a new branch.
    pub fn forked_as(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head: self.head.clone(),
            commits: self.commits.clone(),
            is_default: false,
        }
    }

    /// Prepend a commit and move `head` to it.
    pub fn prepend(&mut self, commit: Commit) {
        self.head = commit.id.clone();
        self.commits.insert(0, commit);
    }

    pub fn position_of(&self, commit_id: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.id == commit_id)
    }
}
