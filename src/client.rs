//! Caching NFS client.
//!
//! [`NfsClient`] wraps the procedure client with two caches:
//!
//! - file handle to attributes, unbounded. Entries are replaced whenever a
//!   reply carries attributes for a handle and are never expired.
//! - file handle to FSSTAT results, each entry valid for the server's
//!   `invarsec`, but at least [`ClientConfig::min_fsstat_ttl`].
//!
//! Mutating calls apply the weak cache consistency data of the reply before
//! their status is checked, so the cache is refreshed even when the call
//! fails.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use tracing_attributes::instrument;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fs_util;
use crate::protocol::nfs::v3::Nfs3Client;
use crate::protocol::rpc::{Connector, Credentials, RpcClient};
use crate::protocol::xdr::mount::{self, exportnode, mountres3};
use crate::protocol::xdr::nfs3::dir::{
    diropres3, entryplus3, CREATE3args, MKDIR3args, READDIRPLUS3args, RENAME3args, createhow3,
};
use crate::protocol::xdr::nfs3::file::READ3args;
use crate::protocol::xdr::nfs3::fs::{fsinfo3, FSSTAT3resok};
use crate::protocol::xdr::nfs3::{
    self, count3, diropargs3, fattr3, filename3, nfs_fh3, nfspath3, nfsres3, nfsstat3, offset3,
    post_op_attr, sattr3, sattrguard3, wcc_data, SETATTR3args,
};
use crate::tcp::TcpConnector;

/// `dircount` of READDIRPLUS when the server advertises no preference
const DEFAULT_DIRCOUNT: u32 = 8192;

#[derive(Clone, Copy, Debug)]
struct CachedFsstat {
    expires: Instant,
    stat: FSSTAT3resok,
}

/// A mounted export with attribute and file system statistics caches.
///
/// Methods take `&mut self`: a client serves one call at a time.
pub struct NfsClient<C: Connector = TcpConnector> {
    nfs: Nfs3Client<C>,
    export: String,
    root: nfs_fh3,
    fsinfo: fsinfo3,
    attributes: HashMap<nfs_fh3, fattr3>,
    fsstats: HashMap<nfs_fh3, CachedFsstat>,
    min_fsstat_ttl: Duration,
}

impl NfsClient<TcpConnector> {
    /// Mounts `config.export` of `config.host` over TCP.
    pub async fn mount(config: ClientConfig) -> Result<Self> {
        let connector = TcpConnector::new(config.host.clone(), config.local_port);
        Self::mount_with(connector, config).await
    }
}

impl<C: Connector> NfsClient<C> {
    /// Mounts `config.export` through `connector`.
    ///
    /// Obtains the root handle with MNT, then fetches FSINFO once and caches
    /// the root attributes.
    #[instrument(skip_all, fields(host = %config.host, export = %config.export))]
    pub async fn mount_with(connector: C, config: ClientConfig) -> Result<Self> {
        let rpc = rpc_client(connector, &config, config.credentials.clone());
        let mut nfs = Nfs3Client::new(rpc);

        let root = match nfs.mountproc3_mnt(&config.export).await? {
            mountres3::Ok(ok) => ok.fhandle,
            mountres3::Err(stat) => return Err(Error::Mount(stat)),
        };
        let fsinfo = match nfs.nfsproc3_fsinfo(&root).await? {
            nfsres3::Ok(fsinfo) => fsinfo,
            nfsres3::Fail(stat, _) => return Err(Error::Nfs(stat)),
        };

        let mut client = NfsClient {
            nfs,
            export: config.export,
            root,
            fsinfo,
            attributes: HashMap::new(),
            fsstats: HashMap::new(),
            min_fsstat_ttl: config.min_fsstat_ttl,
        };
        let root = client.root.clone();
        match fsinfo.obj_attributes {
            Some(attr) => {
                client.attributes.insert(root, attr);
            }
            None => {
                client.getattr(&root).await?;
            }
        }
        info!("Mounted {}", client.export);
        Ok(client)
    }

    /// Root handle of the export
    pub fn root(&self) -> &nfs_fh3 {
        &self.root
    }

    /// File system information fetched at mount time
    pub fn fsinfo(&self) -> &fsinfo3 {
        &self.fsinfo
    }

    pub fn export(&self) -> &str {
        &self.export
    }

    /// Attributes currently cached for `fh`
    pub fn cached_attributes(&self, fh: &nfs_fh3) -> Option<&fattr3> {
        self.attributes.get(fh)
    }

    /// The procedure client, for calls the cache does not cover (NULL, COMMIT)
    pub fn procedures(&mut self) -> &mut Nfs3Client<C> {
        &mut self.nfs
    }

    fn cache_attributes(&mut self, fh: &nfs_fh3, attributes: &post_op_attr) {
        if let Some(attr) = attributes {
            self.attributes.insert(fh.clone(), *attr);
        }
    }

    fn apply_wcc(&mut self, fh: &nfs_fh3, wcc: &wcc_data) {
        if let (Some(before), Some(cached)) = (&wcc.before, self.attributes.get(fh)) {
            if fs_util::wcc_conflicts(cached, before) {
                warn!("{:?} was modified concurrently", fh);
            }
        }
        self.cache_attributes(fh, &wcc.after);
    }

    /// Returns the attributes of `fh`, from the cache when present.
    pub async fn getattr(&mut self, fh: &nfs_fh3) -> Result<fattr3> {
        if let Some(attr) = self.attributes.get(fh) {
            debug!("getattr({:?}) cache hit", fh);
            return Ok(*attr);
        }
        match self.nfs.nfsproc3_getattr(fh).await? {
            nfsres3::Ok(attr) => {
                self.attributes.insert(fh.clone(), attr);
                Ok(attr)
            }
            nfsres3::Fail(stat, ()) => Err(Error::Nfs(stat)),
        }
    }

    /// Changes the attributes of `fh`, optionally guarded by its ctime.
    pub async fn setattr(
        &mut self,
        fh: &nfs_fh3,
        new_attributes: sattr3,
        guard: sattrguard3,
    ) -> Result<()> {
        let args = SETATTR3args { object: fh.clone(), new_attributes, guard };
        match self.nfs.nfsproc3_setattr(&args).await? {
            nfsres3::Ok(wcc) => {
                self.apply_wcc(fh, &wcc);
                Ok(())
            }
            nfsres3::Fail(stat, wcc) => {
                self.apply_wcc(fh, &wcc);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Resolves `name` in `dir`. A missing name is `Ok(None)`.
    pub async fn lookup(&mut self, dir: &nfs_fh3, name: impl AsRef<[u8]>) -> Result<Option<nfs_fh3>> {
        let what = diropargs3 { dir: dir.clone(), name: filename3::from(name.as_ref()) };
        match self.nfs.nfsproc3_lookup(&what).await? {
            nfsres3::Ok(ok) => {
                self.cache_attributes(&ok.object, &ok.obj_attributes);
                self.cache_attributes(dir, &ok.dir_attributes);
                Ok(Some(ok.object))
            }
            nfsres3::Fail(stat, dir_attributes) => {
                self.cache_attributes(dir, &dir_attributes);
                match stat {
                    nfsstat3::NFS3ERR_NOENT => Ok(None),
                    stat => Err(Error::Nfs(stat)),
                }
            }
        }
    }

    /// Returns the subset of the `access` bits (`ACCESS3_*`) granted on `fh`.
    pub async fn access(&mut self, fh: &nfs_fh3, access: u32) -> Result<u32> {
        match self.nfs.nfsproc3_access(fh, access).await? {
            nfsres3::Ok(ok) => {
                self.cache_attributes(fh, &ok.obj_attributes);
                Ok(ok.access)
            }
            nfsres3::Fail(stat, obj_attributes) => {
                self.cache_attributes(fh, &obj_attributes);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Reads up to `count` bytes at `offset`. Returns the data and the eof flag.
    pub async fn read(
        &mut self,
        fh: &nfs_fh3,
        offset: offset3,
        count: count3,
    ) -> Result<(Vec<u8>, bool)> {
        let args = READ3args { file: fh.clone(), offset, count };
        match self.nfs.nfsproc3_read(&args).await? {
            nfsres3::Ok(ok) => {
                self.cache_attributes(fh, &ok.file_attributes);
                Ok((ok.data, ok.eof))
            }
            nfsres3::Fail(stat, file_attributes) => {
                self.cache_attributes(fh, &file_attributes);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Reads the target of a symbolic link.
    pub async fn readlink(&mut self, fh: &nfs_fh3) -> Result<nfspath3> {
        match self.nfs.nfsproc3_readlink(fh).await? {
            nfsres3::Ok(ok) => {
                self.cache_attributes(fh, &ok.symlink_attributes);
                Ok(ok.data)
            }
            nfsres3::Fail(stat, symlink_attributes) => {
                self.cache_attributes(fh, &symlink_attributes);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Writes `data` at `offset` as an unstable write and returns the byte count written.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn write(&mut self, fh: &nfs_fh3, offset: offset3, data: &[u8]) -> Result<count3> {
        match self.nfs.nfsproc3_write(fh, offset, data).await? {
            nfsres3::Ok(ok) => {
                self.apply_wcc(fh, &ok.file_wcc);
                Ok(ok.count)
            }
            nfsres3::Fail(stat, wcc) => {
                self.apply_wcc(fh, &wcc);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Creates the regular file `name` in `dir` and returns its handle.
    pub async fn create(
        &mut self,
        dir: &nfs_fh3,
        name: impl AsRef<[u8]>,
        how: createhow3,
    ) -> Result<nfs_fh3> {
        let args = CREATE3args {
            where_dir: diropargs3 { dir: dir.clone(), name: filename3::from(name.as_ref()) },
            how,
        };
        let res = self.nfs.nfsproc3_create(&args).await?;
        self.created(dir, &args.where_dir.name, res).await
    }

    /// Creates the directory `name` in `dir` and returns its handle.
    pub async fn mkdir(
        &mut self,
        dir: &nfs_fh3,
        name: impl AsRef<[u8]>,
        attributes: sattr3,
    ) -> Result<nfs_fh3> {
        let args = MKDIR3args {
            dirops: diropargs3 { dir: dir.clone(), name: filename3::from(name.as_ref()) },
            attributes,
        };
        let res = self.nfs.nfsproc3_mkdir(&args).await?;
        self.created(dir, &args.dirops.name, res).await
    }

    /// Caches what CREATE or MKDIR returned. Servers may omit the new handle,
    /// then it is looked up.
    async fn created(&mut self, dir: &nfs_fh3, name: &filename3, res: diropres3) -> Result<nfs_fh3> {
        let ok = match res {
            nfsres3::Ok(ok) => ok,
            nfsres3::Fail(stat, dir_wcc) => {
                self.apply_wcc(dir, &dir_wcc);
                return Err(Error::Nfs(stat));
            }
        };
        self.apply_wcc(dir, &ok.dir_wcc);
        match ok.obj {
            Some(fh) => {
                self.cache_attributes(&fh, &ok.obj_attributes);
                Ok(fh)
            }
            None => {
                debug!("no handle returned for {:?}, looking it up", name);
                self.lookup(dir, name).await?.ok_or(Error::Nfs(nfsstat3::NFS3ERR_NOENT))
            }
        }
    }

    /// Removes the non-directory entry `name` from `dir`.
    pub async fn remove(&mut self, dir: &nfs_fh3, name: impl AsRef<[u8]>) -> Result<()> {
        let object = diropargs3 { dir: dir.clone(), name: filename3::from(name.as_ref()) };
        let res = self.nfs.nfsproc3_remove(&object).await?;
        self.removed(dir, res)
    }

    /// Removes the empty directory `name` from `dir`.
    pub async fn rmdir(&mut self, dir: &nfs_fh3, name: impl AsRef<[u8]>) -> Result<()> {
        let object = diropargs3 { dir: dir.clone(), name: filename3::from(name.as_ref()) };
        let res = self.nfs.nfsproc3_rmdir(&object).await?;
        self.removed(dir, res)
    }

    fn removed(&mut self, dir: &nfs_fh3, res: nfsres3<wcc_data, wcc_data>) -> Result<()> {
        match res {
            nfsres3::Ok(dir_wcc) => {
                self.apply_wcc(dir, &dir_wcc);
                Ok(())
            }
            nfsres3::Fail(stat, dir_wcc) => {
                self.apply_wcc(dir, &dir_wcc);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Renames `from_name` in `from_dir` to `to_name` in `to_dir`.
    pub async fn rename(
        &mut self,
        from_dir: &nfs_fh3,
        from_name: impl AsRef<[u8]>,
        to_dir: &nfs_fh3,
        to_name: impl AsRef<[u8]>,
    ) -> Result<()> {
        let args = RENAME3args {
            from: diropargs3 { dir: from_dir.clone(), name: filename3::from(from_name.as_ref()) },
            to: diropargs3 { dir: to_dir.clone(), name: filename3::from(to_name.as_ref()) },
        };
        let (stat, wcc) = match self.nfs.nfsproc3_rename(&args).await? {
            nfsres3::Ok(wcc) => (nfsstat3::NFS3_OK, wcc),
            nfsres3::Fail(stat, wcc) => (stat, wcc),
        };
        self.apply_wcc(from_dir, &wcc.fromdir_wcc);
        self.apply_wcc(to_dir, &wcc.todir_wcc);
        match stat {
            nfsstat3::NFS3_OK => Ok(()),
            stat => Err(Error::Nfs(stat)),
        }
    }

    /// Returns file system statistics, cached for `max(invarsec, min_fsstat_ttl)`.
    pub async fn fsstat(&mut self, fh: &nfs_fh3) -> Result<FSSTAT3resok> {
        let now = Instant::now();
        if let Some(cached) = self.fsstats.get(fh) {
            if cached.expires > now {
                debug!("fsstat({:?}) cache hit", fh);
                return Ok(cached.stat);
            }
        }
        match self.nfs.nfsproc3_fsstat(fh).await? {
            nfsres3::Ok(stat) => {
                self.cache_attributes(fh, &stat.obj_attributes);
                let ttl = Duration::from_secs(stat.invarsec.into()).max(self.min_fsstat_ttl);
                self.fsstats.insert(fh.clone(), CachedFsstat { expires: now + ttl, stat });
                Ok(stat)
            }
            nfsres3::Fail(stat, obj_attributes) => {
                self.cache_attributes(fh, &obj_attributes);
                Err(Error::Nfs(stat))
            }
        }
    }

    /// Lists `dir` with READDIRPLUS, page by page until the server signals eof.
    ///
    /// Every entry that comes with a handle has its attributes cached. With
    /// `silent_access_denied`, `NFS3ERR_ACCES` yields an empty listing
    /// instead of an error.
    #[instrument(skip(self))]
    pub async fn readdir(
        &mut self,
        dir: &nfs_fh3,
        silent_access_denied: bool,
    ) -> Result<Vec<entryplus3>> {
        let dircount = if self.fsinfo.dtpref > 0 { self.fsinfo.dtpref } else { DEFAULT_DIRCOUNT };
        let mut args = READDIRPLUS3args {
            dir: dir.clone(),
            cookie: 0,
            cookieverf: nfs3::cookieverf3::default(),
            dircount,
            maxcount: dircount.saturating_mul(4),
        };

        let mut entries = Vec::new();
        loop {
            let page = match self.nfs.nfsproc3_readdirplus(&args).await? {
                nfsres3::Ok(page) => page,
                nfsres3::Fail(stat, dir_attributes) => {
                    self.cache_attributes(dir, &dir_attributes);
                    if stat == nfsstat3::NFS3ERR_ACCES && silent_access_denied {
                        debug!("access denied to {:?}, listing it as empty", dir);
                        return Ok(Vec::new());
                    }
                    return Err(Error::Nfs(stat));
                }
            };

            self.cache_attributes(dir, &page.dir_attributes);
            for entry in &page.reply.entries {
                if let Some(fh) = &entry.name_handle {
                    self.cache_attributes(fh, &entry.name_attributes);
                }
            }

            let last_cookie = page.reply.entries.last().map(|entry| entry.cookie);
            let eof = page.reply.eof;
            entries.extend(page.reply.entries);
            if eof {
                break;
            }
            match last_cookie {
                Some(cookie) => {
                    args.cookie = cookie;
                    args.cookieverf = page.cookieverf;
                }
                None => {
                    warn!("empty READDIRPLUS page without eof for {:?}", dir);
                    break;
                }
            }
        }
        debug!("read {} entries", entries.len());
        Ok(entries)
    }

    /// Unmounts the export and releases every transport.
    ///
    /// A failing UMNT is only logged: the server drops stale mount entries on its own.
    pub async fn close(mut self) {
        if let Err(e) = self.nfs.mountproc3_umnt(&self.export).await {
            warn!("Unmounting {} failed: {}", self.export, e);
        }
        self.nfs.close().await;
    }
}

fn rpc_client<C: Connector>(
    connector: C,
    config: &ClientConfig,
    credentials: Credentials,
) -> RpcClient<C> {
    let mut rpc = RpcClient::new(connector, credentials, config.transport.clone());
    if let Some(port) = config.nfs_port {
        rpc.set_program_port(nfs3::PROGRAM, port);
    }
    if let Some(port) = config.mount_port {
        rpc.set_program_port(mount::PROGRAM, port);
    }
    rpc
}

/// Lists the exports of `config.host` over TCP.
pub async fn list_exports(config: &ClientConfig) -> Result<Vec<exportnode>> {
    let connector = TcpConnector::new(config.host.clone(), config.local_port);
    list_exports_with(connector, config).await
}

/// Lists the exports of a server through `connector`, without credentials
/// and independent of any mount.
pub async fn list_exports_with<C: Connector>(
    connector: C,
    config: &ClientConfig,
) -> Result<Vec<exportnode>> {
    let mut nfs = Nfs3Client::new(rpc_client(connector, config, Credentials::Null));
    let reply = nfs.mountproc3_export().await;
    nfs.close().await;
    Ok(reply?.0)
}
