#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::DuplexStream;

use nfs_mamont_client::protocol::rpc::{read_message, write_message, Connector, MAX_FRAGMENT_SIZE};
use nfs_mamont_client::xdr::nfs3::fs::fsinfo3;
use nfs_mamont_client::xdr::nfs3::{self, fattr3, ftype3, nfs_fh3, nfsres3, nfstime3};
use nfs_mamont_client::xdr::{self, deserialize, mount, portmap, Deserialize, Serialize};
use nfs_mamont_client::ClientConfig;

pub const NFS_PORT: u16 = 2049;
pub const MOUNT_PORT: u16 = 20048;
pub const EXPORT: &str = "/export";

/// What the fake server does with a call
pub enum Reply {
    /// Accepted SUCCESS header followed by these result bytes
    Success(Vec<u8>),
    /// A complete reply message sent verbatim
    Message(Vec<u8>),
    /// Drop the connection without answering
    Close,
}

/// A decoded call as the fake server received it
#[derive(Clone, Debug)]
pub struct Call {
    pub port: u16,
    pub xid: u32,
    pub prog: u32,
    pub vers: u32,
    pub proc: u32,
    pub cred: xdr::rpc::opaque_auth,
    pub args: Vec<u8>,
}

impl Call {
    pub fn args<T: Deserialize + Default>(&self) -> T {
        deserialize::<T>(&mut Cursor::new(&self.args)).expect("cannot decode call arguments")
    }
}

type Handler = Box<dyn FnMut(&Call) -> Reply + Send>;

#[derive(Default)]
struct Inner {
    routes: Mutex<HashMap<(u32, u32), Handler>>,
    calls: Mutex<Vec<Call>>,
    connects: Mutex<Vec<u16>>,
    failing_connects: AtomicU32,
}

/// In-process RPC server answering calls with scripted handlers, routed by
/// program and procedure. Unrouted procedures get `PROC_UNAVAIL`.
#[derive(Clone, Default)]
pub struct FakeServer {
    inner: Arc<Inner>,
}

impl FakeServer {
    pub fn new() -> Self {
        FakeServer::default()
    }

    pub fn route<F>(&self, prog: u32, proc: u32, handler: F)
    where
        F: FnMut(&Call) -> Reply + Send + 'static,
    {
        self.inner.routes.lock().unwrap().insert((prog, proc), Box::new(handler));
    }

    /// Answers every call of `prog`/`proc` with `results`.
    pub fn reply_with<T: Serialize>(&self, prog: u32, proc: u32, results: T) {
        let bytes = encode(&results);
        self.route(prog, proc, move |_| Reply::Success(bytes.clone()));
    }

    /// Makes the next `n` connection attempts fail.
    pub fn fail_connects(&self, n: u32) {
        self.inner.failing_connects.store(n, Ordering::SeqCst);
    }

    /// Ports of every connection attempt, failed ones included
    pub fn connects(&self) -> Vec<u16> {
        self.inner.connects.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prog: u32, proc: u32) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.prog == prog && c.proc == proc).collect()
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector { server: self.clone() }
    }

    fn dispatch(&self, call: &Call) -> Reply {
        self.inner.calls.lock().unwrap().push(call.clone());
        let mut routes = self.inner.routes.lock().unwrap();
        match routes.get_mut(&(call.prog, call.proc)) {
            Some(handler) => handler(call),
            None => Reply::Message(encode(&xdr::rpc::proc_unavail_reply_message(call.xid))),
        }
    }

    async fn serve(self, port: u16, mut socket: DuplexStream) {
        loop {
            let Ok(message) = read_message(&mut socket).await else {
                return;
            };
            let Some(call) = parse_call(port, message) else {
                return;
            };
            let reply = match self.dispatch(&call) {
                Reply::Success(results) => {
                    let mut buf = encode(&xdr::rpc::make_success_reply(call.xid));
                    buf.extend_from_slice(&results);
                    buf
                }
                Reply::Message(buf) => buf,
                Reply::Close => return,
            };
            if write_message(&mut socket, &reply, MAX_FRAGMENT_SIZE).await.is_err() {
                return;
            }
        }
    }
}

fn parse_call(port: u16, message: Vec<u8>) -> Option<Call> {
    let mut cursor = Cursor::new(message);
    let msg = deserialize::<xdr::rpc::rpc_msg>(&mut cursor).ok()?;
    let xdr::rpc::rpc_body::CALL(body) = msg.body else {
        return None;
    };
    let position = cursor.position() as usize;
    let args = cursor.into_inner()[position..].to_vec();
    Some(Call {
        port,
        xid: msg.xid,
        prog: body.prog,
        vers: body.vers,
        proc: body.proc,
        cred: body.cred,
        args,
    })
}

/// Connects transports to a [`FakeServer`] through in-memory pipes.
#[derive(Clone)]
pub struct FakeConnector {
    server: FakeServer,
}

#[async_trait]
impl Connector for FakeConnector {
    type Stream = DuplexStream;

    async fn connect(&self, port: u16) -> io::Result<DuplexStream> {
        self.server.inner.connects.lock().unwrap().push(port);
        let failing = &self.server.inner.failing_connects;
        if failing.load(Ordering::SeqCst) > 0 {
            failing.fetch_sub(1, Ordering::SeqCst);
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        }
        let (client, server) = tokio::io::duplex(64 * 1024);
        tokio::spawn(self.server.clone().serve(port, server));
        Ok(client)
    }
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.serialize(&mut buf).expect("cannot serialize");
    buf
}

pub fn fh(id: u8) -> nfs_fh3 {
    nfs_fh3::from(vec![0xfe, id, 0, 0, 0, 0, 0, id])
}

pub fn root_fh() -> nfs_fh3 {
    fh(1)
}

pub fn attr(fileid: u64, ftype: ftype3, size: u64) -> fattr3 {
    fattr3 {
        ftype,
        mode: 0o755,
        nlink: 1,
        size,
        used: size,
        fileid,
        mtime: nfstime3 { seconds: 1_700_000_000, nseconds: 0 },
        ctime: nfstime3 { seconds: 1_700_000_000, nseconds: 0 },
        ..Default::default()
    }
}

pub fn dir_attr(fileid: u64) -> fattr3 {
    attr(fileid, ftype3::NF3DIR, 4096)
}

pub fn file_attr(fileid: u64, size: u64) -> fattr3 {
    attr(fileid, ftype3::NF3REG, size)
}

/// Answers GETPORT for the NFS and MOUNT programs; anything else is unregistered.
pub fn serve_portmap(server: &FakeServer) {
    server.route(portmap::PROGRAM, portmap::PortmapProgram::PMAPPROC_GETPORT as u32, |call| {
        let query: portmap::mapping = call.args();
        let port: u32 = match query.prog {
            nfs3::PROGRAM => NFS_PORT.into(),
            mount::PROGRAM => MOUNT_PORT.into(),
            _ => 0,
        };
        Reply::Success(encode(&port))
    });
}

/// Server with the port mapper, MNT, UMNT and FSINFO in place, ready to be mounted.
pub fn mountable_server() -> FakeServer {
    let server = FakeServer::new();
    serve_portmap(&server);
    server.reply_with(
        mount::PROGRAM,
        mount::MountProgram::MOUNTPROC3_MNT as u32,
        mount::mountres3::Ok(mount::mountres3_ok { fhandle: root_fh(), auth_flavors: vec![1] }),
    );
    server.reply_with(mount::PROGRAM, mount::MountProgram::MOUNTPROC3_UMNT as u32, ());
    server.reply_with(
        nfs3::PROGRAM,
        nfs3::NFSProgram::NFSPROC3_FSINFO as u32,
        nfsres3::<fsinfo3, nfs3::post_op_attr>::Ok(fsinfo3 {
            obj_attributes: Some(dir_attr(1)),
            rtmax: 65536,
            rtpref: 65536,
            wtmax: 65536,
            wtpref: 65536,
            dtpref: 4096,
            ..Default::default()
        }),
    );
    server
}

pub fn config() -> ClientConfig {
    let mut config = ClientConfig::new("fake", EXPORT);
    config.transport.retry_delay = std::time::Duration::ZERO;
    config
}
