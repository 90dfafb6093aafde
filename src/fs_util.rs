//! Attribute helpers used by the caching client.
//!
//! This module contains functions for:
//! - Checking weak cache consistency data against cached attributes
//! - Converting NFS times to [`filetime::FileTime`]

use filetime::FileTime;

use crate::protocol::xdr::nfs3;

/// Checks the "before" half of weak cache consistency data against cached attributes.
///
/// Returns `true` when the object changed on the server since `cached` was
/// taken, i.e. someone else modified it concurrently.
pub fn wcc_conflicts(cached: &nfs3::fattr3, before: &nfs3::wcc_attr) -> bool {
    cached.size != before.size || cached.mtime != before.mtime || cached.ctime != before.ctime
}

/// Modification time of the object
pub fn mtime(attr: &nfs3::fattr3) -> FileTime {
    attr.mtime.into()
}

/// True if the attributes describe a directory
pub fn is_dir(attr: &nfs3::fattr3) -> bool {
    attr.ftype == nfs3::ftype3::NF3DIR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::xdr::nfs3::{fattr3, nfstime3, wcc_attr};

    fn attr(size: u64, mtime: u32) -> fattr3 {
        fattr3 {
            size,
            mtime: nfstime3 { seconds: mtime, nseconds: 0 },
            ctime: nfstime3 { seconds: mtime, nseconds: 0 },
            ..Default::default()
        }
    }

    #[test]
    fn matching_before_is_no_conflict() {
        let cached = attr(10, 100);
        assert!(!wcc_conflicts(&cached, &wcc_attr::from(&cached)));
    }

    #[test]
    fn size_or_time_change_is_a_conflict() {
        let cached = attr(10, 100);
        assert!(wcc_conflicts(&cached, &wcc_attr::from(&attr(11, 100))));
        assert!(wcc_conflicts(&cached, &wcc_attr::from(&attr(10, 101))));
    }

    #[test]
    fn mtime_converts_to_file_time() {
        let time = mtime(&attr(0, 1_700_000_000));
        assert_eq!(time.unix_seconds(), 1_700_000_000);
        assert_eq!(time.nanoseconds(), 0);
    }
}
