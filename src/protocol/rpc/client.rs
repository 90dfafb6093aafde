//! RPC client owning one transport per remote program.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{envelope, Connector, Credentials, Transport};
use crate::config::TransportConfig;
use crate::error::RpcError;
use crate::protocol::nfs::portmap;
use crate::protocol::xdr::{self, deserialize, Deserialize, Serialize};

/// Issues calls to the programs of one server.
///
/// The port mapper transport exists from the start. Every other program gets
/// its transport on first use, at the port the port mapper reports unless a
/// fixed port was registered with [`RpcClient::set_program_port`].
pub struct RpcClient<C: Connector> {
    connector: Arc<C>,
    transports: HashMap<u32, Transport<C>>,
    config: TransportConfig,
    credentials: Credentials,
    xid: u32,
}

impl<C: Connector> RpcClient<C> {
    pub fn new(connector: C, credentials: Credentials, config: TransportConfig) -> Self {
        let connector = Arc::new(connector);
        let mut transports = HashMap::new();
        transports.insert(
            xdr::portmap::PROGRAM,
            Transport::new(connector.clone(), xdr::portmap::PMAP_PORT, config.clone()),
        );
        RpcClient { connector, transports, config, credentials, xid: rand::random::<u32>() }
    }

    /// Pins `prog` to a known port so the port mapper is never asked for it.
    pub fn set_program_port(&mut self, prog: u32, port: u16) {
        self.transports
            .insert(prog, Transport::new(self.connector.clone(), port, self.config.clone()));
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Port of the transport serving `prog`, if one exists yet
    pub fn program_port(&self, prog: u32) -> Option<u16> {
        self.transports.get(&prog).map(Transport::port)
    }

    fn next_xid(&mut self) -> u32 {
        self.xid = self.xid.wrapping_add(1);
        self.xid
    }

    /// Calls `proc` of `prog` with the client credentials and decodes the results as `R`.
    pub async fn call<A, R>(&mut self, prog: u32, vers: u32, proc: u32, args: &A) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: Deserialize + Default,
    {
        let credentials = self.credentials.clone();
        self.call_with(prog, vers, proc, &credentials, args).await
    }

    /// Like [`RpcClient::call`], with explicit credentials.
    pub async fn call_with<A, R>(
        &mut self,
        prog: u32,
        vers: u32,
        proc: u32,
        credentials: &Credentials,
        args: &A,
    ) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: Deserialize + Default,
    {
        if !self.transports.contains_key(&prog) {
            let port = portmap::get_port(self, prog, vers).await?;
            debug!("program {} version {} is at port {}", prog, vers, port);
            self.set_program_port(prog, port);
        }
        self.call_registered(prog, vers, proc, credentials, args).await
    }

    /// Calls a program whose transport already exists.
    pub(crate) async fn call_registered<A, R>(
        &mut self,
        prog: u32,
        vers: u32,
        proc: u32,
        credentials: &Credentials,
        args: &A,
    ) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: Deserialize + Default,
    {
        let xid = self.next_xid();
        let message = envelope::encode_call(xid, prog, vers, proc, credentials, args)?;
        let transport = self.transports.get_mut(&prog).ok_or(RpcError::NotRegistered { prog, vers })?;

        trace!("call xid {} prog {} proc {} ({} bytes)", xid, prog, proc, message.len());
        let reply = transport.send_and_receive(&message).await?;
        let mut results = envelope::decode_reply(reply)?;
        Ok(deserialize::<R>(&mut results)?)
    }

    /// Shuts every transport down. A later call reconnects.
    pub async fn close(&mut self) {
        for transport in self.transports.values_mut() {
            transport.close().await;
        }
    }
}
