//! Changeset metadata shared by every element of an upload.

/// Default `created_by` tag for changesets opened by this library.
pub const DEFAULT_CREATED_BY: &str = concat!("osmchange v", env!("CARGO_PKG_VERSION"));

/// Default changeset comment.
pub const DEFAULT_COMMENT: &str = "Changes via API";

/// A server-side changeset as seen by the client.
///
/// Created locally without an id; the id is assigned once the server has
/// accepted the create-changeset call. `created_by` and `comment` are fixed
/// at construction.
///
/// # Examples
///
/// ```
/// use osmchange_core::ChangesetMetadata;
///
/// let mut changeset = ChangesetMetadata::new("mapper-bot", "Import footpaths");
/// assert_eq!(changeset.id(), None);
/// changeset.assign_id(12345);
/// assert_eq!(changeset.id(), Some(12345));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetMetadata {
    id: Option<u64>,
    created_by: String,
    comment: String,
}

impl Default for ChangesetMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_CREATED_BY, DEFAULT_COMMENT)
    }
}

impl ChangesetMetadata {
    /// Describe a changeset that has not been created on the server yet.
    pub fn new(created_by: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            id: None,
            created_by: created_by.into(),
            comment: comment.into(),
        }
    }

    /// Attach a server-assigned id, e.g. to resume an already open changeset.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Record the id returned by the server.
    pub fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    /// Server-assigned id, if the changeset has been created.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.id
    }

    /// Value of the `created_by` tag.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Value of the `comment` tag.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_uses_library_identity() {
        let changeset = ChangesetMetadata::default();
        assert!(changeset.created_by().starts_with("osmchange v"));
        assert_eq!(changeset.comment(), DEFAULT_COMMENT);
        assert_eq!(changeset.id(), None);
    }

    #[rstest]
    fn with_id_marks_changeset_as_created() {
        let changeset = ChangesetMetadata::new("bot", "comment").with_id(7);
        assert_eq!(changeset.id(), Some(7));
    }
}
