use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json;
use rst_common::standard::uuid::Uuid;
use rst_common::with_logging::log::{debug, warn};
use rst_common::with_tokio::tokio::fs;

use prople_courier_core::agent::context::types::Provision;
use prople_courier_core::mediator::backup::types::{
    Attachment, BackupError, BackupId, RepoBackupBuilder,
};

const STAGING_DIR: &str = ".staging";
const ATTACHMENT_EXT: &str = "json";

/// `Repository` keeps the backups on the filesystem
///
/// Layout: `{root}/{backup_id}/{timestamp}/{index}.json`
///
/// A backup is written in `{root}/.staging` first and renamed into its timestamp location
/// once complete, a listing never observes a partially written backup. A store dropped before
/// the rename leaves its staging directory behind, [`RepoBackupBuilder::provision`] sweeps them
/// and so it must run before the repository starts serving stores.
///
/// Attachments are read back ordered by the numeric index of their file name
#[derive(Clone, Debug)]
pub struct Repository {
    root: PathBuf,
    create_if_missing: bool,
}

impl Repository {
    pub fn new(root: PathBuf, create_if_missing: bool) -> Self {
        Self {
            root,
            create_if_missing,
        }
    }

    fn backup_path(&self, backup_id: &BackupId) -> PathBuf {
        self.root.join(backup_id.to_string())
    }

    fn location_path(&self, backup_id: &BackupId, location: &str) -> PathBuf {
        self.backup_path(backup_id).join(location)
    }

    fn staging_path(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    async fn write_staged(
        &self,
        staged: &Path,
        attachments: &[Attachment],
    ) -> Result<(), BackupError> {
        fs::create_dir_all(staged)
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))?;

        for (index, attachment) in attachments.iter().enumerate() {
            let content = serde_json::to_vec(attachment)
                .map_err(|err| BackupError::RepoError(err.to_string()))?;

            let file = staged.join(format!("{:04}.{}", index, ATTACHMENT_EXT));
            fs::write(file, content)
                .await
                .map_err(|err| BackupError::RepoError(err.to_string()))?;
        }

        Ok(())
    }

    /// `sweep_staging` drops whatever is left in the staging directory and recreates it empty
    async fn sweep_staging(&self) -> Result<(), BackupError> {
        let staging = self.staging_path();
        match fs::remove_dir_all(&staging).await {
            Ok(_) => debug!("[repository:sweep_staging] cleared {}", staging.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(BackupError::RepoError(err.to_string())),
        }

        fs::create_dir_all(&staging)
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))
    }

    async fn discard_staged(&self, staged: &Path) {
        if let Err(err) = fs::remove_dir_all(staged).await {
            warn!(
                "[repository:discard_staged] unable to remove {}: {}",
                staged.display(),
                err
            );
        }
    }
}

fn attachment_index(path: &Path) -> Option<u64> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u64>().ok())
}

#[async_trait]
impl RepoBackupBuilder for Repository {
    async fn provision(&self) -> Result<Provision, BackupError> {
        let exists = fs::try_exists(&self.root)
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))?;

        if exists {
            self.sweep_staging().await?;
            return Ok(Provision::AlreadyExists);
        }

        if !self.create_if_missing {
            return Err(BackupError::RepoError(format!(
                "backup root is missing: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(self.staging_path())
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))?;

        debug!("[repository:provision] created {}", self.root.display());
        Ok(Provision::Created)
    }

    async fn save_backup(
        &self,
        backup_id: BackupId,
        timestamp: i64,
        attachments: Vec<Attachment>,
    ) -> Result<(), BackupError> {
        let target = self.location_path(&backup_id, &timestamp.to_string());
        let taken = fs::try_exists(&target)
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))?;

        if taken {
            return Err(BackupError::LocationConflict(timestamp));
        }

        let staged = self.staging_path().join(Uuid::new_v4().to_string());
        if let Err(err) = self.write_staged(&staged, &attachments).await {
            self.discard_staged(&staged).await;
            return Err(err);
        }

        if let Err(err) = fs::create_dir_all(self.backup_path(&backup_id)).await {
            self.discard_staged(&staged).await;
            return Err(BackupError::RepoError(err.to_string()));
        }

        if let Err(err) = fs::rename(&staged, &target).await {
            self.discard_staged(&staged).await;

            // another store won the same location between the check and the rename
            let raced = fs::try_exists(&target).await.unwrap_or(false);
            if raced {
                return Err(BackupError::LocationConflict(timestamp));
            }

            return Err(BackupError::RepoError(err.to_string()));
        }

        debug!(
            "[repository:save_backup] saved {} attachments at {}",
            attachments.len(),
            target.display()
        );
        Ok(())
    }

    async fn list_locations(&self, backup_id: BackupId) -> Result<Vec<String>, BackupError> {
        let mut entries = match fs::read_dir(self.backup_path(&backup_id)).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(BackupError::RepoError(err.to_string())),
        };

        let mut locations = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => return Err(BackupError::RepoError(err.to_string())),
            };

            // an entry may disappear between the scan and the type check
            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(BackupError::RepoError(err.to_string())),
            };

            if is_dir {
                locations.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(locations)
    }

    async fn get_attachments(
        &self,
        backup_id: BackupId,
        location: String,
    ) -> Result<Vec<Attachment>, BackupError> {
        let dir = self.location_path(&backup_id, &location);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(BackupError::RepoError(err.to_string())),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| BackupError::RepoError(err.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(ATTACHMENT_EXT) {
                let index = attachment_index(&path).ok_or_else(|| {
                    BackupError::DataIntegrityError(format!(
                        "unknown attachment file: {}",
                        path.display()
                    ))
                })?;

                files.push((index, path));
            }
        }

        files.sort_by_key(|(index, _)| *index);

        let mut attachments = Vec::new();
        for (_, file) in files {
            let content = fs::read(&file)
                .await
                .map_err(|err| BackupError::RepoError(err.to_string()))?;

            let attachment: Attachment = serde_json::from_slice(&content).map_err(|err| {
                BackupError::DataIntegrityError(format!("{}: {}", file.display(), err))
            })?;

            attachments.push(attachment);
        }

        Ok(attachments)
    }
}
