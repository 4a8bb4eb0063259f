//! Folder name resolution against the backend's enumerated hierarchy

use crate::backend::{FolderInfo, MailStoreBackend};
use crate::error::{AssistantError, AssistantResult};
use crate::model::ItemKind;

/// Maps a human-supplied folder name onto a backend folder.
pub struct FolderResolver;

impl FolderResolver {
    /// Resolve an optional folder name for the given kind.
    ///
    /// No name resolves to the backend's default folder (the primary inbox
    /// for mail, the default calendar for appointments). A name is matched
    /// case-insensitively and exactly against the enumerated folders; an
    /// unmatched name is an error naming the input, never a silent fallback
    /// to the default.
    pub async fn resolve(
        backend: &dyn MailStoreBackend,
        kind: ItemKind,
        name: Option<&str>,
    ) -> AssistantResult<FolderInfo> {
        match name {
            None => Ok(backend.default_folder(kind).await?),
            Some(raw) => {
                let needle = raw.to_lowercase();
                let folders = backend.list_folders().await?;
                folders
                    .into_iter()
                    .find(|folder| folder.name.to_lowercase() == needle)
                    .ok_or_else(|| AssistantError::folder_not_found(raw))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[tokio::test]
    async fn test_no_name_resolves_to_default() {
        let backend = MemoryBackend::new();

        let folder = FolderResolver::resolve(&backend, ItemKind::Mail, None)
            .await
            .unwrap();
        assert_eq!(folder.name, "Inbox");

        let folder = FolderResolver::resolve(&backend, ItemKind::Appointment, None)
            .await
            .unwrap();
        assert_eq!(folder.name, "Calendar");
    }

    #[tokio::test]
    async fn test_name_matches_case_insensitively() {
        let mut backend = MemoryBackend::new();
        backend.add_folder("Sent Items", 1);

        let folder = FolderResolver::resolve(&backend, ItemKind::Mail, Some("sent items"))
            .await
            .unwrap();
        assert_eq!(folder.name, "Sent Items");
    }

    #[tokio::test]
    async fn test_unknown_name_is_an_error_naming_the_input() {
        let backend = MemoryBackend::new();

        let err = FolderResolver::resolve(&backend, ItemKind::Mail, Some("Archive"))
            .await
            .unwrap_err();
        match err {
            AssistantError::FolderNotFound { name } => assert_eq!(name, "Archive"),
            other => panic!("expected FolderNotFound, got {other:?}"),
        }
    }
}
