use std::path::Path;

/// Partition path helper for SCSI/ATA block devices (`/dev/sda` + 1 -> `/dev/sda1`).
pub fn partition_path(disk: &Path, num: u32) -> String {
    format!("{}{}", disk.display(), num)
}

/// Last path component of a device path (`/dev/sda` -> `sda`).
pub fn device_basename(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().to_string())
}
