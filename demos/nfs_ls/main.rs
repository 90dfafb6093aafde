use anyhow::{anyhow, bail, Context};

use nfs_mamont_client::fs_util;
use nfs_mamont_client::{list_exports, ClientConfig, Credentials, NfsClient};

const USAGE: &str = "Usage: nfs_ls [OPTIONS] <HOST> [EXPORT [PATH]]\n\
     \n\
     Without EXPORT, lists the exports of HOST. Otherwise mounts EXPORT and\n\
     lists PATH (default: the export root).\n\
     \n\
     Options:\n\
       --uid <UID> --gid <GID>   Unix credentials (default: nobody)\n\
       --local-port <PORT>       Bind outgoing connections to PORT\n\
       --nfs-port <PORT>         Skip the port mapper for NFS\n\
       -h, --help                Show this help and exit";

fn parse_num<T: std::str::FromStr>(flag: &str, value: Option<String>) -> anyhow::Result<T> {
    let value = value.ok_or_else(|| anyhow!("{flag} needs a value"))?;
    value.parse().map_err(|_| anyhow!("invalid value for {flag}: {value}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let mut uid = None;
    let mut gid = None;
    let mut local_port = None;
    let mut nfs_port = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--uid" => uid = Some(parse_num::<u32>("--uid", args.next())?),
            "--gid" => gid = Some(parse_num::<u32>("--gid", args.next())?),
            "--local-port" => local_port = Some(parse_num::<u16>("--local-port", args.next())?),
            "--nfs-port" => nfs_port = Some(parse_num::<u16>("--nfs-port", args.next())?),
            "--help" | "-h" => {
                eprintln!("{USAGE}");
                return Ok(());
            }
            _ if arg.starts_with('-') => bail!("Unknown flag: {arg}\nRun with --help for usage."),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let host = positional.next().ok_or_else(|| anyhow!("missing HOST\n{USAGE}"))?;
    let export = positional.next();
    let path = positional.next().unwrap_or_default();

    let mut config = ClientConfig::new(host, export.clone().unwrap_or_default());
    config.local_port = local_port;
    config.nfs_port = nfs_port;
    if uid.is_some() || gid.is_some() {
        config.credentials = Credentials::unix(
            uid.unwrap_or(nfs_mamont_client::protocol::rpc::NOBODY),
            gid.unwrap_or(nfs_mamont_client::protocol::rpc::NOBODY),
            Vec::new(),
        );
    }

    if export.is_none() {
        for node in list_exports(&config).await.context("listing exports")? {
            println!("{}\t{}", node.dir.0, node.groups.join(","));
        }
        return Ok(());
    }

    let mut client = NfsClient::mount(config).await.context("mounting")?;
    let mut dir = client.root().clone();
    for name in path.split('/').filter(|name| !name.is_empty()) {
        dir = client
            .lookup(&dir, name)
            .await?
            .ok_or_else(|| anyhow!("{name}: no such file or directory"))?;
    }

    let mut entries = client.readdir(&dir, false).await?;
    entries.sort_by(|a, b| a.name.0.cmp(&b.name.0));
    for entry in entries {
        let Some(attr) = entry.name_attributes else {
            println!("{:>12}  {}", "?", entry.name);
            continue;
        };
        let suffix = if fs_util::is_dir(&attr) { "/" } else { "" };
        let mtime = fs_util::mtime(&attr);
        println!("{:>12}  {:>10}  {}{}", attr.size, mtime.unix_seconds(), entry.name, suffix);
    }

    let root = client.root().clone();
    let stat = client.fsstat(&root).await?;
    println!("{} of {} bytes free", stat.fbytes, stat.tbytes);

    client.close().await;
    Ok(())
}
