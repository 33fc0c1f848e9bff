mod backup;
pub use backup::Repository as BackupRepository;
