//! Shared constants for test infrastructure

pub const OWNER: &str = "acme";
pub const REPO: &str = "images";
pub const UBUNTU: &str = "ubuntu";

pub const TAG_UBUNTU_20_04: &str = "ubuntu/v20.04.0";
pub const TAG_UBUNTU_22_04: &str = "ubuntu/v22.04.0";

pub const TARBALL_URL: &str = "https://downloads.example.com/ubuntu/v22.04.0/image.tar.xz";
pub const CHECKSUM_URL: &str =
    "https://downloads.example.com/ubuntu/v22.04.0/image.tar.xz.sha256";

/// 64 hex characters, exactly one SHA-256 digest
pub const CHECKSUM: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

/// Checksum file as written by `sha256sum`, with file name and newline
pub fn sha256sum_file() -> String {
    format!("{}  image.tar.xz\n", CHECKSUM)
}
