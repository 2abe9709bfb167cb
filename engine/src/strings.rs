// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset naming: the fixed-capacity path strings assets are stored with, and
//! the hashed identities they're looked up with.

use core::fmt::{self, Debug, Display};

use arrayvec::ArrayString;

/// The maximum length of an asset path, in bytes.
pub const ASSET_PATH_LENGTH: usize = 192;

/// A fixed-capacity string for asset paths and names.
pub type AssetPath = ArrayString<ASSET_PATH_LENGTH>;

/// The identity of an asset: a hash of its canonical name (see
/// [`canonical_name`]).
///
/// The hash is order-sensitive but not cryptographic, so differently named
/// assets can collide. Assets of different kinds can share an identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    /// Hashes the name into an identity. Backslashes are hashed as forward
    /// slashes, so `sprites\ship` and `sprites/ship` are the same asset.
    pub const fn new(name: &str) -> AssetId {
        let bytes = name.as_bytes();
        let mut hash = bytes.len() as u64;
        let mut i = 0;
        while i < bytes.len() {
            let c = if bytes[i] == b'\\' { b'/' } else { bytes[i] };
            hash = ((hash << 5) ^ (hash >> 59)) ^ c as u64;
            i += 1;
        }
        AssetId(hash)
    }
}

impl Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({:016x})", self.0)
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Turns a file path into the name an asset is registered under: backslashes
/// are replaced with forward slashes, and the file extension (if any) is
/// stripped. `sprites\ship.png` becomes `sprites/ship`.
///
/// Dots in directory names and leading dots of file names (`.hidden`) are not
/// treated as extensions. Returns None if the name doesn't fit in an
/// [`AssetPath`].
pub fn canonical_name(path: &str) -> Option<AssetPath> {
    let file_name_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let stem_end = match path[file_name_start..].rfind('.') {
        Some(dot) if dot > 0 => file_name_start + dot,
        _ => path.len(),
    };

    let mut name = AssetPath::new();
    for c in path[..stem_end].chars() {
        let c = if c == '\\' { '/' } else { c };
        name.try_push(c).ok()?;
    }
    Some(name)
}

/// Returns the extension of the file name at the end of `path`, without the
/// dot, following the same rules as [`canonical_name`].
pub fn extension(path: &str) -> Option<&str> {
    let file_name_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    match path[file_name_start..].rfind('.') {
        Some(dot) if dot > 0 => Some(&path[file_name_start + dot + 1..]),
        _ => None,
    }
}

/// Joins a base path and a path relative to it with a `/`. Returns None if
/// the result doesn't fit in an [`AssetPath`].
pub fn join_path(base: &str, relative: &str) -> Option<AssetPath> {
    let base = base.trim_end_matches(['/', '\\']);
    let mut joined = AssetPath::new();
    if !base.is_empty() {
        joined.try_push_str(base).ok()?;
        joined.try_push('/').ok()?;
    }
    joined.try_push_str(relative).ok()?;
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::{canonical_name, extension, join_path, AssetId};

    #[test]
    fn canonical_names() {
        assert_eq!("sprites/ship", canonical_name("sprites/ship.png").unwrap().as_str());
        assert_eq!("sprites/ship", canonical_name("sprites\\ship.png").unwrap().as_str());
        assert_eq!("a.b/c", canonical_name("a.b/c").unwrap().as_str());
        assert_eq!("music.tar", canonical_name("music.tar.ogg").unwrap().as_str());
        assert_eq!(".hidden", canonical_name(".hidden").unwrap().as_str());
        let too_long = core::str::from_utf8(&[b'x'; 300]).unwrap();
        assert!(canonical_name(too_long).is_none());
    }

    #[test]
    fn extensions() {
        assert_eq!(Some("png"), extension("sprites/ship.png"));
        assert_eq!(None, extension("sprites.d/ship"));
        assert_eq!(None, extension("dir/.gitignore"));
    }

    #[test]
    fn hashing_is_order_sensitive_and_separator_agnostic() {
        assert_eq!(AssetId::new("sprites/ship"), AssetId::new("sprites\\ship"));
        assert_ne!(AssetId::new("ab"), AssetId::new("ba"));
        assert_ne!(AssetId::new("a"), AssetId::new("a\0"));
        // Hashing happens at compile time for constant names.
        const SHIP: AssetId = AssetId::new("sprites/ship");
        assert_eq!(SHIP, AssetId::new("sprites/ship"));
    }

    #[test]
    fn joining() {
        assert_eq!("assets/a.png", join_path("assets/", "a.png").unwrap().as_str());
        assert_eq!("a.png", join_path("", "a.png").unwrap().as_str());
    }
}
