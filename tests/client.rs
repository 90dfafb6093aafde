use std::time::Duration;

mod support;

use nfs_mamont_client::xdr::mount::{self, dirpath, exportnode, exports, mountres3, mountstat3};
use nfs_mamont_client::xdr::nfs3::dir::{
    createhow3, diropres3ok, dirlistplus3, entryplus3, LOOKUP3resok, READDIRPLUS3args,
    READDIRPLUS3resok, RENAME3wcc,
};
use nfs_mamont_client::xdr::nfs3::file::{stable_how, WRITE3args, WRITE3resok};
use nfs_mamont_client::xdr::nfs3::fs::FSSTAT3resok;
use nfs_mamont_client::xdr::nfs3::{
    self, diropargs3, fattr3, nfs_fh3, nfsres3, nfsstat3, post_op_attr, sattr3, wcc_attr, wcc_data,
    NFSProgram,
};
use nfs_mamont_client::xdr::rpc::{auth_flavor, garbage_args_reply_message};
use nfs_mamont_client::{list_exports_with, Error, NfsClient, RpcError};

use support::{
    config, dir_attr, encode, fh, file_attr, mountable_server, root_fh, serve_portmap, FakeConnector,
    FakeServer, Reply, EXPORT,
};

async fn mount(server: &FakeServer) -> NfsClient<FakeConnector> {
    NfsClient::mount_with(server.connector(), config()).await.expect("mount")
}

fn proc(p: NFSProgram) -> u32 {
    p as u32
}

fn wcc(before: Option<&fattr3>, after: Option<fattr3>) -> wcc_data {
    wcc_data { before: before.map(wcc_attr::from), after }
}

fn entry(id: u8) -> entryplus3 {
    entryplus3 {
        fileid: id.into(),
        name: format!("file{id}").as_str().into(),
        cookie: id.into(),
        name_attributes: Some(file_attr(id.into(), 100 * u64::from(id))),
        name_handle: Some(fh(id)),
    }
}

#[tokio::test]
async fn mount_fetches_root_and_fsinfo() {
    let server = mountable_server();
    let client = mount(&server).await;

    assert_eq!(client.root(), &root_fh());
    assert_eq!(client.fsinfo().dtpref, 4096);
    assert_eq!(client.cached_attributes(&root_fh()), Some(&dir_attr(1)));

    let mnt = &server.calls_to(mount::PROGRAM, mount::MountProgram::MOUNTPROC3_MNT as u32)[0];
    let path: dirpath = mnt.args();
    assert_eq!(path.0, EXPORT);
    assert_eq!(mnt.cred.flavor, auth_flavor::AUTH_UNIX);
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_GETATTR)).len(), 0);
}

#[tokio::test]
async fn mount_status_is_a_mount_error() {
    let server = mountable_server();
    server.reply_with(
        mount::PROGRAM,
        mount::MountProgram::MOUNTPROC3_MNT as u32,
        mountres3::Err(mountstat3::MNT3ERR_ACCES),
    );

    let err = NfsClient::mount_with(server.connector(), config()).await.err().expect("mount error");
    assert!(matches!(err, Error::Mount(mountstat3::MNT3ERR_ACCES)), "{err:?}");
    assert!(!err.is_rpc());
}

#[tokio::test]
async fn unencodable_export_path_is_never_sent() {
    let server = mountable_server();
    let mut config = config();
    config.export = String::from("/\u{263a}");

    let err = NfsClient::mount_with(server.connector(), config).await.err().expect("mount error");
    assert!(matches!(err, Error::Rpc(RpcError::Encode(_))), "{err:?}");
    assert!(err.to_string().starts_with("cannot encode call"), "{err}");
    assert!(server.calls_to(mount::PROGRAM, mount::MountProgram::MOUNTPROC3_MNT as u32).is_empty());
}

#[tokio::test]
async fn mount_uses_pinned_ports() {
    let server = mountable_server();
    let mut config = config();
    config.nfs_port = Some(2050);
    config.mount_port = Some(635);

    let client = NfsClient::mount_with(server.connector(), config).await.expect("mount");
    assert_eq!(server.connects(), vec![635, 2050]);
    client.close().await;
}

#[tokio::test]
async fn getattr_is_served_from_the_cache() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_GETATTR),
        nfsres3::<fattr3, ()>::Ok(file_attr(7, 42)),
    );
    let mut client = mount(&server).await;

    assert_eq!(client.getattr(&root_fh()).await.unwrap(), dir_attr(1));
    assert_eq!(client.getattr(&fh(7)).await.unwrap(), file_attr(7, 42));
    assert_eq!(client.getattr(&fh(7)).await.unwrap(), file_attr(7, 42));
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_GETATTR)).len(), 1);
}

#[tokio::test]
async fn nfs_status_and_rpc_failures_are_distinct() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_GETATTR),
        nfsres3::<fattr3, ()>::Fail(nfsstat3::NFS3ERR_STALE, ()),
    );
    server.route(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_ACCESS), |call| {
        Reply::Message(encode(&garbage_args_reply_message(call.xid)))
    });
    let mut client = mount(&server).await;

    let err = client.getattr(&fh(9)).await.unwrap_err();
    assert_eq!(err.status(), Some(nfsstat3::NFS3ERR_STALE));
    assert!(!err.is_rpc());

    let err = client.access(&fh(9), nfs3::ACCESS3_READ).await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(err.is_rpc(), "{err:?}");
}

#[tokio::test]
async fn write_refreshes_cached_attributes() {
    let server = mountable_server();
    let before = file_attr(5, 0);
    let after = file_attr(5, 4);
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_WRITE),
        nfsres3::<WRITE3resok, wcc_data>::Ok(WRITE3resok {
            file_wcc: wcc(Some(&before), Some(after)),
            count: 4,
            committed: stable_how::UNSTABLE,
            verf: [1; 8],
        }),
    );
    let mut client = mount(&server).await;

    assert_eq!(client.write(&fh(5), 0, b"data").await.unwrap(), 4);
    assert_eq!(client.cached_attributes(&fh(5)), Some(&after));
    assert_eq!(client.getattr(&fh(5)).await.unwrap(), after);
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_GETATTR)).len(), 0);

    let call = &server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_WRITE))[0];
    let args: WRITE3args = call.args();
    assert_eq!(args.stable, stable_how::UNSTABLE);
    assert_eq!(args.count, 4);
    assert_eq!(args.data, b"data");
}

#[tokio::test]
async fn failed_write_still_applies_wcc() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_WRITE),
        nfsres3::<WRITE3resok, wcc_data>::Fail(
            nfsstat3::NFS3ERR_NOSPC,
            wcc(None, Some(file_attr(5, 9))),
        ),
    );
    let mut client = mount(&server).await;

    let err = client.write(&fh(5), 0, &[0; 16]).await.unwrap_err();
    assert!(matches!(err, Error::Nfs(nfsstat3::NFS3ERR_NOSPC)), "{err:?}");
    assert_eq!(client.cached_attributes(&fh(5)).map(|a| a.size), Some(9));
}

#[tokio::test]
async fn setattr_and_remove_apply_wcc() {
    let server = mountable_server();
    let mut chmod = file_attr(5, 0);
    chmod.mode = 0o600;
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_SETATTR),
        nfsres3::<wcc_data, wcc_data>::Ok(wcc(None, Some(chmod))),
    );
    let mut shrunk = dir_attr(1);
    shrunk.size = 2048;
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_RMDIR),
        nfsres3::<wcc_data, wcc_data>::Fail(nfsstat3::NFS3ERR_NOTEMPTY, wcc(None, Some(shrunk))),
    );
    let mut client = mount(&server).await;

    let attributes = sattr3 { mode: Some(0o600), ..Default::default() };
    client.setattr(&fh(5), attributes, None).await.unwrap();
    assert_eq!(client.cached_attributes(&fh(5)).map(|a| a.mode), Some(0o600));

    let err = client.rmdir(&root_fh(), "full").await.unwrap_err();
    assert_eq!(err.status(), Some(nfsstat3::NFS3ERR_NOTEMPTY));
    assert_eq!(client.cached_attributes(&root_fh()), Some(&shrunk));
}

#[tokio::test]
async fn lookup_of_missing_name_is_none() {
    let server = mountable_server();
    let mut listed = dir_attr(1);
    listed.nlink = 3;
    server.route(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_LOOKUP), move |call| {
        let what: diropargs3 = call.args();
        let res = match &what.name.0[..] {
            b"x" => nfsres3::Fail(nfsstat3::NFS3ERR_ACCES, None),
            b"found" => nfsres3::Ok(LOOKUP3resok {
                object: fh(3),
                obj_attributes: Some(file_attr(3, 10)),
                dir_attributes: Some(listed),
            }),
            _ => nfsres3::Fail(nfsstat3::NFS3ERR_NOENT, Some(listed)),
        };
        Reply::Success(encode(&res))
    });
    let mut client = mount(&server).await;

    assert_eq!(client.lookup(&root_fh(), "missing").await.unwrap(), None);
    assert_eq!(client.cached_attributes(&root_fh()).map(|a| a.nlink), Some(3));

    let err = client.lookup(&root_fh(), "x").await.unwrap_err();
    assert!(matches!(err, Error::Nfs(nfsstat3::NFS3ERR_ACCES)), "{err:?}");

    assert_eq!(client.lookup(&root_fh(), "found").await.unwrap(), Some(fh(3)));
    assert_eq!(client.cached_attributes(&fh(3)), Some(&file_attr(3, 10)));
}

#[tokio::test]
async fn readdir_pages_until_eof() {
    let server = mountable_server();
    server.route(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_READDIRPLUS), |call| {
        let args: READDIRPLUS3args = call.args();
        assert_eq!(args.dircount, 4096);
        assert_eq!(args.maxcount, 4 * 4096);
        let page = match args.cookie {
            0 => {
                assert_eq!(args.cookieverf, [0; 8]);
                READDIRPLUS3resok {
                    dir_attributes: Some(dir_attr(1)),
                    cookieverf: [7; 8],
                    reply: dirlistplus3 { entries: vec![entry(2), entry(3), entry(4)], eof: false },
                }
            }
            4 => {
                assert_eq!(args.cookieverf, [7; 8]);
                READDIRPLUS3resok {
                    dir_attributes: Some(dir_attr(1)),
                    cookieverf: [7; 8],
                    reply: dirlistplus3 { entries: vec![entry(5), entry(6)], eof: true },
                }
            }
            cookie => panic!("unexpected cookie {cookie}"),
        };
        Reply::Success(encode(&nfsres3::<READDIRPLUS3resok, post_op_attr>::Ok(page)))
    });
    let mut client = mount(&server).await;

    let entries = client.readdir(&root_fh(), false).await.expect("readdir");
    let ids: Vec<u64> = entries.iter().map(|e| e.fileid).collect();
    assert_eq!(ids, [2, 3, 4, 5, 6]);
    assert_eq!(entries[0].name.to_string(), "file2");
    for id in 2..=6 {
        assert_eq!(client.cached_attributes(&fh(id)).map(|a| a.fileid), Some(u64::from(id)));
    }
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_READDIRPLUS)).len(), 2);
}

#[tokio::test]
async fn readdir_access_denied() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_READDIRPLUS),
        nfsres3::<READDIRPLUS3resok, post_op_attr>::Fail(nfsstat3::NFS3ERR_ACCES, None),
    );
    let mut client = mount(&server).await;

    assert!(client.readdir(&fh(8), true).await.unwrap().is_empty());
    let err = client.readdir(&fh(8), false).await.unwrap_err();
    assert_eq!(err.status(), Some(nfsstat3::NFS3ERR_ACCES));
}

#[tokio::test]
async fn empty_page_without_eof_ends_the_listing() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_READDIRPLUS),
        nfsres3::<READDIRPLUS3resok, post_op_attr>::Ok(READDIRPLUS3resok::default()),
    );
    let mut client = mount(&server).await;

    assert!(client.readdir(&root_fh(), false).await.unwrap().is_empty());
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_READDIRPLUS)).len(), 1);
}

#[tokio::test]
async fn fsstat_is_cached_for_at_least_the_minimum_ttl() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_FSSTAT),
        nfsres3::<FSSTAT3resok, post_op_attr>::Ok(FSSTAT3resok {
            tbytes: 1 << 30,
            fbytes: 1 << 20,
            invarsec: 0,
            ..Default::default()
        }),
    );
    let fsstat = proc(NFSProgram::NFSPROC3_FSSTAT);

    let mut client = mount(&server).await;
    assert_eq!(client.fsstat(&root_fh()).await.unwrap().tbytes, 1 << 30);
    assert_eq!(client.fsstat(&root_fh()).await.unwrap().fbytes, 1 << 20);
    assert_eq!(server.calls_to(nfs3::PROGRAM, fsstat).len(), 1);

    let mut config = config();
    config.min_fsstat_ttl = Duration::ZERO;
    let mut client = NfsClient::mount_with(server.connector(), config).await.expect("mount");
    client.fsstat(&root_fh()).await.unwrap();
    client.fsstat(&root_fh()).await.unwrap();
    assert_eq!(server.calls_to(nfs3::PROGRAM, fsstat).len(), 3);
}

#[tokio::test]
async fn rename_updates_both_directories() {
    let server = mountable_server();
    let mut from = dir_attr(1);
    from.size = 1;
    let mut to = dir_attr(2);
    to.size = 2;
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_RENAME),
        nfsres3::<RENAME3wcc, RENAME3wcc>::Ok(RENAME3wcc {
            fromdir_wcc: wcc(None, Some(from)),
            todir_wcc: wcc(None, Some(to)),
        }),
    );
    let mut client = mount(&server).await;

    client.rename(&root_fh(), "a", &fh(2), "b").await.unwrap();
    assert_eq!(client.cached_attributes(&root_fh()), Some(&from));
    assert_eq!(client.cached_attributes(&fh(2)), Some(&to));
}

#[tokio::test]
async fn create_without_handle_looks_the_file_up() {
    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_CREATE),
        nfsres3::<diropres3ok, wcc_data>::Ok(diropres3ok {
            obj: None,
            obj_attributes: None,
            dir_wcc: wcc(Some(&dir_attr(1)), Some(dir_attr(1))),
        }),
    );
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_LOOKUP),
        nfsres3::<LOOKUP3resok, post_op_attr>::Ok(LOOKUP3resok {
            object: fh(11),
            obj_attributes: Some(file_attr(11, 0)),
            dir_attributes: None,
        }),
    );
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_MKDIR),
        nfsres3::<diropres3ok, wcc_data>::Ok(diropres3ok {
            obj: Some(fh(12)),
            obj_attributes: Some(dir_attr(12)),
            dir_wcc: wcc(None, None),
        }),
    );
    let mut client = mount(&server).await;

    let how = createhow3::GUARDED(sattr3::default());
    assert_eq!(client.create(&root_fh(), "new", how).await.unwrap(), fh(11));
    assert_eq!(client.cached_attributes(&fh(11)), Some(&file_attr(11, 0)));
    let lookup: diropargs3 =
        server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_LOOKUP))[0].args();
    assert_eq!(lookup.name.to_string(), "new");

    assert_eq!(client.mkdir(&root_fh(), "sub", sattr3::default()).await.unwrap(), fh(12));
    assert_eq!(client.cached_attributes(&fh(12)), Some(&dir_attr(12)));
    assert_eq!(server.calls_to(nfs3::PROGRAM, proc(NFSProgram::NFSPROC3_LOOKUP)).len(), 1);
}

#[tokio::test]
async fn close_unmounts() {
    let server = mountable_server();
    let client = mount(&server).await;
    client.close().await;

    let umnt = &server.calls_to(mount::PROGRAM, mount::MountProgram::MOUNTPROC3_UMNT as u32);
    assert_eq!(umnt.len(), 1);
    assert_eq!(umnt[0].args::<dirpath>().0, EXPORT);
}

#[tokio::test]
async fn exports_are_listed_without_credentials() {
    let server = FakeServer::new();
    serve_portmap(&server);
    server.reply_with(
        mount::PROGRAM,
        mount::MountProgram::MOUNTPROC3_EXPORT as u32,
        exports(vec![
            exportnode { dir: dirpath("/export".into()), groups: vec!["*".into()] },
            exportnode { dir: dirpath("/home".into()), groups: vec![] },
        ]),
    );

    let list = list_exports_with(server.connector(), &config()).await.expect("EXPORT");
    let dirs: Vec<&str> = list.iter().map(|e| e.dir.0.as_str()).collect();
    assert_eq!(dirs, ["/export", "/home"]);
    assert_eq!(list[0].groups, ["*"]);

    let call = &server.calls_to(mount::PROGRAM, mount::MountProgram::MOUNTPROC3_EXPORT as u32)[0];
    assert_eq!(call.cred.flavor, auth_flavor::AUTH_NULL);
}

#[tokio::test]
async fn read_caches_file_attributes() {
    use nfs_mamont_client::xdr::nfs3::file::READ3resok;

    let server = mountable_server();
    server.reply_with(
        nfs3::PROGRAM,
        proc(NFSProgram::NFSPROC3_READ),
        nfsres3::<READ3resok, post_op_attr>::Ok(READ3resok {
            file_attributes: Some(file_attr(4, 5)),
            count: 5,
            eof: true,
            data: b"hello".to_vec(),
        }),
    );
    let mut client = mount(&server).await;

    let (data, eof) = client.read(&fh(4), 0, 4096).await.unwrap();
    assert_eq!(data, b"hello");
    assert!(eof);
    assert_eq!(client.cached_attributes(&fh(4)), Some(&file_attr(4, 5)));
}

#[test]
fn handles_compare_bytewise() {
    let mut handles = vec![nfs_fh3::from(vec![2]), nfs_fh3::from(vec![1, 9]), nfs_fh3::from(vec![1])];
    handles.sort();
    assert_eq!(handles, [nfs_fh3::from(vec![1]), nfs_fh3::from(vec![1, 9]), nfs_fh3::from(vec![2])]);
}
