//! Advisory per-document access lists and the form that edits them.
//!
//! Entries are metadata only; nothing in the hub enforces them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    View,
    Edit,
    Download,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Download => "download",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "view" => Ok(Permission::View),
            "edit" => Ok(Permission::Edit),
            "download" => Ok(Permission::Download),
            other => Err(anyhow::anyhow!("unknown permission: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclEntry {
    pub user_id: String,
    pub permission: Permission,
}

/// Form state of the access-control editor.
///
/// Every mutating call returns the proposed list when it changes anything;
/// the caller replaces the document's list with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclEditor {
    pub user_id: String,
    pub permission: Permission,
    editing: Option<String>,
}

impl AclEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// User whose entry is loaded in the form, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add the form's user. Empty ids and users already listed are ignored.
    pub fn add(&mut self, acl: &[AclEntry]) -> Option<Vec<AclEntry>> {
        if self.user_id.is_empty() || acl.iter().any(|e| e.user_id == self.user_id) {
            return None;
        }
        let mut out = acl.to_vec();
        out.push(AclEntry {
            user_id: self.user_id.clone(),
            permission: self.permission,
        });
        self.reset();
        Some(out)
    }

    /// Load an existing entry into the form.
    pub fn begin_edit(&mut self, acl: &[AclEntry], user_id: &str) -> bool {
        let Some(entry) = acl.iter().find(|e| e.user_id == user_id) else {
            return false;
        };
        self.user_id = entry.user_id.clone();
        self.permission = entry.permission;
        self.editing = Some(entry.user_id.clone());
        true
    }

    /// Apply the form's permission to the user being edited.
    pub fn save_edit(&mut self, acl: &[AclEntry]) -> Option<Vec<AclEntry>> {
        let editing = self.editing.clone()?;
        let out = acl
            .iter()
            .map(|e| {
                if e.user_id == editing {
                    AclEntry {
                        user_id: e.user_id.clone(),
                        permission: self.permission,
                    }
                } else {
                    e.clone()
                }
            })
            .collect();
        self.reset();
        Some(out)
    }

    /// Drop a user. Cancels the edit in progress when it targets them.
    pub fn remove(&mut self, acl: &[AclEntry], user_id: &str) -> Vec<AclEntry> {
        let out = acl.iter().filter(|e| e.user_id != user_id).cloned().collect();
        if self.editing.as_deref() == Some(user_id) {
            self.reset();
        }
        out
    }

    pub fn cancel(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, permission: Permission) -> AclEntry {
        AclEntry {
            user_id: user.to_string(),
            permission,
        }
    }

    #[test]
    fn add_appends_and_resets_form() {
        let mut editor = AclEditor::new();
        editor.user_id = "alice".to_string();
        editor.permission = Permission::Edit;
        let acl = editor.add(&[]).unwrap();
        assert_eq!(acl, vec![entry("alice", Permission::Edit)]);
        assert_eq!(editor, AclEditor::default());
    }

    #[test]
    fn duplicate_and_empty_users_are_ignored() {
        let acl = vec![entry("alice", Permission::View)];
        let mut editor = AclEditor::new();
        assert!(editor.add(&acl).is_none());

        editor.user_id = "alice".to_string();
        editor.permission = Permission::Download;
        assert!(editor.add(&acl).is_none());
        // form keeps its input when nothing was added
        assert_eq!(editor.user_id, "alice");
    }

    #[test]
    fn edit_changes_only_the_target() {
        let acl = vec![
            entry("alice", Permission::View),
            entry("bob", Permission::View),
        ];
        let mut editor = AclEditor::new();
        assert!(editor.begin_edit(&acl, "bob"));
        assert_eq!(editor.editing(), Some("bob"));
        editor.permission = Permission::Download;
        let acl = editor.save_edit(&acl).unwrap();
        assert_eq!(
            acl,
            vec![
                entry("alice", Permission::View),
                entry("bob", Permission::Download)
            ]
        );
        assert!(editor.editing().is_none());
        assert!(editor.save_edit(&acl).is_none());
    }

    #[test]
    fn removing_edited_user_cancels_edit() {
        let acl = vec![
            entry("alice", Permission::View),
            entry("bob", Permission::Edit),
        ];
        let mut editor = AclEditor::new();
        editor.begin_edit(&acl, "alice");

        let acl = editor.remove(&acl, "bob");
        assert_eq!(editor.editing(), Some("alice"));
        assert_eq!(acl.len(), 1);

        let acl = editor.remove(&acl, "alice");
        assert!(acl.is_empty());
        assert!(editor.editing().is_none());
        assert!(editor.user_id.is_empty());
    }

    #[test]
    fn begin_edit_unknown_user_is_noop() {
        let mut editor = AclEditor::new();
        assert!(!editor.begin_edit(&[], "ghost"));
        assert!(editor.editing().is_none());
    }

    #[test]
    fn permission_serializes_lowercase() {
        let json = serde_json::to_string(&entry("carol", Permission::Download)).unwrap();
        assert_eq!(json, r#"{"user_id":"carol","permission":"download"}"#);
        assert_eq!("edit".parse::<Permission>().unwrap(), Permission::Edit);
        assert!("admin".parse::<Permission>().is_err());
    }
}
