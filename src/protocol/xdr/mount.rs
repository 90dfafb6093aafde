//! This module implements the `MOUNT` protocol (RFC 1813 Appendix I) data structures
//! for XDR serialization and deserialization.
//!
//! The `MOUNT` protocol is used to establish the initial connection between an NFS client
//! and server. It provides functions for mounting and unmounting file systems, and
//! obtaining the initial file handle that serves as the root of the mounted file system.

// Keep original RFC naming conventions as written in RFC 1813
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use super::nfs3::nfs_fh3;
use super::*;

/// MOUNT program number for RPC
pub const PROGRAM: u32 = 100005;
/// MOUNT protocol version 3
pub const VERSION: u32 = 3;

/// Maximum bytes in a path name
pub const MNTPATHLEN: u32 = 1024;
/// Maximum bytes in a name
pub const MNTNAMLEN: u32 = 255;
/// Maximum bytes in a V3 file handle
pub const FHSIZE3: u32 = 64;

/// Status codes returned by `MOUNT` protocol operations
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum mountstat3 {
    /// No error
    #[default]
    MNT3_OK = 0, /* no error */
    /// Not owner
    MNT3ERR_PERM = 1, /* Not owner */
    /// No such file or directory
    MNT3ERR_NOENT = 2, /* No such file or directory */
    /// I/O error
    MNT3ERR_IO = 5, /* I/O error */
    /// Permission denied
    MNT3ERR_ACCES = 13, /* Permission denied */
    /// Not a directory
    MNT3ERR_NOTDIR = 20, /* Not a directory */
    /// Invalid argument
    MNT3ERR_INVAL = 22, /* Invalid argument */
    /// Filename too long
    MNT3ERR_NAMETOOLONG = 63, /* Filename too long */
    /// Operation not supported
    MNT3ERR_NOTSUPP = 10004, /* Operation not supported */
    /// A failure on the server
    MNT3ERR_SERVERFAULT = 10006, /* A failure on the server */
}
SerializeEnum!(mountstat3);
DeserializeEnum!(mountstat3);

/// Directory path on the server, bounded by [`MNTPATHLEN`]
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct dirpath(pub String);

impl Serialize for dirpath {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for dirpath {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0 = deserialize_string_bounded(src, MNTPATHLEN as usize)?;
        Ok(())
    }
}

/// Successful response to a mount request
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct mountres3_ok {
    /// File handle for the mounted directory
    pub fhandle: nfs_fh3,
    /// List of authentication flavors supported by the server
    pub auth_flavors: Vec<u32>,
}
DeserializeStruct!(mountres3_ok, fhandle, auth_flavors);
SerializeStruct!(mountres3_ok, fhandle, auth_flavors);

/// Result of `MOUNTPROC3_MNT`: the body only follows an `MNT3_OK` status.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub enum mountres3 {
    /// Mount succeeded
    Ok(mountres3_ok),
    /// Mount failed with the given status, nothing else follows
    Err(mountstat3),
}

impl Default for mountres3 {
    fn default() -> mountres3 {
        mountres3::Err(mountstat3::MNT3ERR_SERVERFAULT)
    }
}

impl Serialize for mountres3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            mountres3::Ok(ok) => {
                mountstat3::MNT3_OK.serialize(dest)?;
                ok.serialize(dest)
            }
            mountres3::Err(stat) => stat.serialize(dest),
        }
    }
}

impl Deserialize for mountres3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<mountstat3>(src)? {
            mountstat3::MNT3_OK => mountres3::Ok(deserialize(src)?),
            stat => mountres3::Err(stat),
        };
        Ok(())
    }
}

/// One exported file system and the groups allowed to mount it
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct exportnode {
    /// Exported directory
    pub dir: dirpath,
    /// Names of the client groups allowed to mount `dir`
    pub groups: Vec<String>,
}

/// Full export list returned by `MOUNTPROC3_EXPORT`.
///
/// On the wire both the export list and each group list are XDR linked
/// lists: every element is preceded by a `TRUE` and the list ends with `FALSE`.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct exports(pub Vec<exportnode>);

impl Serialize for exports {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        for node in &self.0 {
            true.serialize(dest)?;
            node.dir.serialize(dest)?;
            for group in &node.groups {
                true.serialize(dest)?;
                group.serialize(dest)?;
            }
            false.serialize(dest)?;
        }
        false.serialize(dest)
    }
}

impl Deserialize for exports {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.clear();
        while deserialize::<bool>(src)? {
            let dir = deserialize::<dirpath>(src)?;
            let mut groups = Vec::new();
            while deserialize::<bool>(src)? {
                groups.push(deserialize_string_bounded(src, MNTNAMLEN as usize)?);
            }
            self.0.push(exportnode { dir, groups });
        }
        Ok(())
    }
}

/// Procedure numbers for the `MOUNT` version 3 protocol
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, FromPrimitive, ToPrimitive)]
pub enum MountProgram {
    /// Null procedure for service availability testing
    MOUNTPROC3_NULL = 0,
    /// Mount a file system
    MOUNTPROC3_MNT = 1,
    /// Get list of mounted file systems
    MOUNTPROC3_DUMP = 2,
    /// Unmount a file system
    MOUNTPROC3_UMNT = 3,
    /// Unmount all file systems
    MOUNTPROC3_UMNTALL = 4,
    /// Get list of exported file systems
    MOUNTPROC3_EXPORT = 5,
}
