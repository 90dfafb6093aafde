//! Module contains XDR data structures related to directories for NFS version 3 protocol
//! as defined in RFC 1813.
//!
//! This module includes data structures for the following directory operations:
//! - LOOKUP: Look up a name (procedure 3)
//! - CREATE: Create a regular file (procedure 8)
//! - MKDIR: Create a directory (procedure 9)
//! - REMOVE / RMDIR: Remove an entry (procedures 12 and 13)
//! - RENAME: Rename an entry (procedure 14)
//! - READDIRPLUS: Extended read from a directory (procedure 17)

// Preserve original RFC naming conventions (e.g. READDIRPLUS3args, MKDIR3args)
// for consistency with the NFS version 3 protocol specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use super::*;

/// Successful response for the LOOKUP procedure as defined in RFC 1813 section 3.3.3
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LOOKUP3resok {
    /// File handle of the object found
    pub object: nfs_fh3,
    /// Attributes of the object found
    pub obj_attributes: post_op_attr,
    /// Attributes of the directory searched
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);
SerializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);

/// Result of LOOKUP. Failure carries the directory attributes
pub type LOOKUP3res = nfsres3<LOOKUP3resok, post_op_attr>;

/// How a new file is created, as defined in RFC 1813 section 3.3.8
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum createhow3 {
    /// Create without checking for an existing file
    UNCHECKED(sattr3),
    /// Fail with NFS3ERR_EXIST if the file already exists
    GUARDED(sattr3),
    /// Exclusive create keyed by the verifier
    EXCLUSIVE(createverf3),
}

impl Default for createhow3 {
    fn default() -> Self {
        createhow3::UNCHECKED(sattr3::default())
    }
}

impl Serialize for createhow3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            createhow3::UNCHECKED(v) => {
                0_u32.serialize(dest)?;
                v.serialize(dest)
            }
            createhow3::GUARDED(v) => {
                1_u32.serialize(dest)?;
                v.serialize(dest)
            }
            createhow3::EXCLUSIVE(v) => {
                2_u32.serialize(dest)?;
                v.serialize(dest)
            }
        }
    }
}

impl Deserialize for createhow3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<u32>(src)? {
            0 => createhow3::UNCHECKED(deserialize(src)?),
            1 => createhow3::GUARDED(deserialize(src)?),
            2 => createhow3::EXCLUSIVE(deserialize(src)?),
            c => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid createmode3 value: {c}"),
                ));
            }
        };
        Ok(())
    }
}

/// Arguments for the CREATE procedure (procedure 8)
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default)]
pub struct CREATE3args {
    /// Directory and name of the new file
    pub where_dir: diropargs3,
    /// Creation mode and initial attributes
    pub how: createhow3,
}
DeserializeStruct!(CREATE3args, where_dir, how);
SerializeStruct!(CREATE3args, where_dir, how);

/// Arguments for the MKDIR procedure (procedure 9)
/// as defined in RFC 1813 section 3.3.9
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default)]
pub struct MKDIR3args {
    /// Directory where new directory should be created and its name
    pub dirops: diropargs3,
    /// Initial attributes for the new directory
    pub attributes: sattr3,
}
DeserializeStruct!(MKDIR3args, dirops, attributes);
SerializeStruct!(MKDIR3args, dirops, attributes);

/// Successful response of the procedures creating a new object (CREATE, MKDIR)
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct diropres3ok {
    /// Handle of the new object, servers may omit it
    pub obj: post_op_fh3,
    /// Attributes of the new object
    pub obj_attributes: post_op_attr,
    /// wcc data of the parent directory
    pub dir_wcc: wcc_data,
}
DeserializeStruct!(diropres3ok, obj, obj_attributes, dir_wcc);
SerializeStruct!(diropres3ok, obj, obj_attributes, dir_wcc);

/// Result of CREATE and MKDIR. Failure carries the parent's wcc data
pub type diropres3 = nfsres3<diropres3ok, wcc_data>;

/// Result of REMOVE and RMDIR: the parent's wcc data in both arms
pub type REMOVE3res = nfsres3<wcc_data, wcc_data>;

/// Arguments for the RENAME procedure (procedure 14)
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default)]
pub struct RENAME3args {
    /// Source directory and name
    pub from: diropargs3,
    /// Target directory and name
    pub to: diropargs3,
}
DeserializeStruct!(RENAME3args, from, to);
SerializeStruct!(RENAME3args, from, to);

/// wcc data of both directories touched by RENAME
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RENAME3wcc {
    /// wcc data of the source directory
    pub fromdir_wcc: wcc_data,
    /// wcc data of the target directory
    pub todir_wcc: wcc_data,
}
DeserializeStruct!(RENAME3wcc, fromdir_wcc, todir_wcc);
SerializeStruct!(RENAME3wcc, fromdir_wcc, todir_wcc);

/// Result of RENAME, both arms carry the same wcc data
pub type RENAME3res = nfsres3<RENAME3wcc, RENAME3wcc>;

/// Directory entry with additional attributes for READDIRPLUS operation
/// as defined in RFC 1813 section 3.3.17
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct entryplus3 {
    /// File identifier (inode number) uniquely identifying the file within the filesystem
    pub fileid: fileid3,
    /// Name of the directory entry (filename)
    pub name: filename3,
    /// Cookie value that can be used in subsequent READDIRPLUS calls to resume listing
    pub cookie: cookie3,
    /// File attributes for this directory entry
    pub name_attributes: post_op_attr,
    /// File handle for this directory entry
    pub name_handle: post_op_fh3,
}
DeserializeStruct!(entryplus3, fileid, name, cookie, name_attributes, name_handle);
SerializeStruct!(entryplus3, fileid, name, cookie, name_attributes, name_handle);

/// One page of READDIRPLUS entries.
///
/// On the wire the entries form an XDR linked list (`TRUE` before each entry,
/// `FALSE` after the last), followed by the `eof` flag.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct dirlistplus3 {
    /// Entries of this page in server order
    pub entries: Vec<entryplus3>,
    /// True when the page ends the listing
    pub eof: bool,
}

impl Serialize for dirlistplus3 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        for entry in &self.entries {
            true.serialize(dest)?;
            entry.serialize(dest)?;
        }
        false.serialize(dest)?;
        self.eof.serialize(dest)
    }
}

impl Deserialize for dirlistplus3 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.entries.clear();
        while deserialize::<bool>(src)? {
            self.entries.push(deserialize(src)?);
        }
        self.eof.deserialize(src)
    }
}

/// Arguments for the READDIRPLUS procedure (procedure 17)
/// as defined in RFC 1813 section 3.3.17
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default)]
pub struct READDIRPLUS3args {
    /// Directory file handle
    pub dir: nfs_fh3,
    /// Cookie from previous READDIRPLUS - where to start reading
    pub cookie: cookie3,
    /// Cookie verifier to detect changed directories
    pub cookieverf: cookieverf3,
    /// Maximum number of bytes of directory information to return
    pub dircount: count3,
    /// Maximum size of the whole reply
    pub maxcount: count3,
}
DeserializeStruct!(READDIRPLUS3args, dir, cookie, cookieverf, dircount, maxcount);
SerializeStruct!(READDIRPLUS3args, dir, cookie, cookieverf, dircount, maxcount);

/// Successful response for the READDIRPLUS procedure
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct READDIRPLUS3resok {
    /// Attributes of the directory
    pub dir_attributes: post_op_attr,
    /// Verifier to send back with the next page
    pub cookieverf: cookieverf3,
    /// Entries of this page
    pub reply: dirlistplus3,
}
DeserializeStruct!(READDIRPLUS3resok, dir_attributes, cookieverf, reply);
SerializeStruct!(READDIRPLUS3resok, dir_attributes, cookieverf, reply);

/// Result of READDIRPLUS. Failure carries the directory attributes
pub type READDIRPLUS3res = nfsres3<READDIRPLUS3resok, post_op_attr>;
