//! Command-line surface and the `run` entry point.

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use libp2p::Multiaddr;
use periscope_p2p::{BootstrapAddress, BootstrapSet, Config, NetworkBuilder};
use periscope_types::{ForkDigest, expand_topics, parse_topic_codes};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// The inspector command.
#[derive(Parser, Debug, Clone)]
#[command(about = "Joins a beacon-chain gossip overlay and logs what it sees")]
pub struct InspectorCommand {
    /// Log level: trace, debug, info, warn or error.
    #[arg(short, long, default_value = "trace")]
    pub verbosity: String,
    /// Render full peer identities in logs instead of shortened ones.
    #[arg(short = 'p', long = "fullpeerid")]
    pub full_peer_id: bool,
    /// Select the FloodSub engine. Accepted for compatibility; the engine is
    /// GossipSub-backed either way.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub floodsub: bool,
    /// Select the GossipSub engine. Accepted for compatibility; the engine is
    /// GossipSub-backed either way.
    #[arg(short, long)]
    pub gossipsub: bool,
    /// 4-byte hex fork digest override, e.g. 0x01020304.
    #[arg(long = "forkdigest")]
    pub fork_digest: Option<String>,
    /// Sign and verify pub/sub envelopes.
    #[arg(short, long)]
    pub sign: bool,
    /// Topic short code: `*`, `a`, `b`, `e`, `ps` or `as`. Repeatable;
    /// empty selects everything.
    #[arg(short, long = "topics")]
    pub topics: Vec<String>,
    /// Verbatim topic name to subscribe to. Repeatable.
    #[arg(short, long = "custom")]
    pub custom: Vec<String>,
    /// Path to a newline-delimited bootstrap list file.
    #[arg(short = 'l', long = "bootfile")]
    pub boot_file: Option<PathBuf>,
    /// Bootstrap entry: an `enr:` URI or a `/ip4/.../tcp/.../p2p/...`
    /// multiaddress. Repeatable.
    #[arg(short, long = "bootnodes")]
    pub boot_nodes: Vec<String>,
    /// Decode received payloads against the canonical serialization.
    #[arg(short, long)]
    pub decode: bool,
    /// UDP port for discovery.
    #[arg(long = "discoveryPort", default_value = "9000")]
    pub discovery_port: u16,
    /// TCP port for the overlay transport.
    #[arg(long = "ethPort", default_value = "9000")]
    pub eth_port: u16,
    /// Multiaddress to bind on, ip layer only.
    #[arg(long = "bindAddress", default_value = "/ip4/0.0.0.0")]
    pub bind_address: String,
    /// Discovery target population.
    #[arg(long = "maxPeers", default_value = "100")]
    pub max_peers: usize,
    /// Disable the discovery loop.
    #[arg(long = "noDiscovery")]
    pub no_discovery: bool,
}

/// Parses a 4-byte hex fork digest, with or without the `0x` prefix.
fn parse_fork_digest(input: &str) -> anyhow::Result<ForkDigest> {
    let bytes = alloy_primitives::hex::decode(input.trim_start_matches("0x"))
        .with_context(|| format!("fork digest is not hex: {input}"))?;
    let digest: [u8; 4] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("fork digest must be exactly 4 bytes: {input}"))?;
    Ok(digest.into())
}

impl InspectorCommand {
    fn init_tracing(&self) -> anyhow::Result<()> {
        let level: LevelFilter = self
            .verbosity
            .parse()
            .map_err(|_| anyhow!("unknown verbosity level: {}", self.verbosity))?;
        let filter =
            EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
        tracing_subscriber::fmt().with_env_filter(filter).init();
        Ok(())
    }

    /// Runs the inspector until interrupted.
    ///
    /// Never returns success: the inspector is long-running, so the only
    /// outcomes are an error or process termination on SIGINT.
    pub async fn run(self) -> anyhow::Result<()> {
        self.init_tracing()?;

        let operator_digest =
            self.fork_digest.as_deref().map(parse_fork_digest).transpose()?;

        let bootstraps = BootstrapAddress::load(self.boot_file.as_deref(), &self.boot_nodes)
            .context("failed to read the bootstrap file")?;
        if bootstraps.is_empty() {
            bail!("no bootstrap addresses; supply --bootnodes or --bootfile");
        }

        let set = BootstrapSet::from_addresses(&bootstraps, operator_digest);
        if set.eth2_bootnodes.is_empty() {
            bail!("no overlay-dialable bootstrap addresses");
        }
        let fork_digest = set.fork_digest.ok_or_else(|| {
            anyhow!("no fork digest: no bootstrap record carries one and --forkdigest was not given")
        })?;

        let mut topics = expand_topics(&parse_topic_codes(&self.topics), fork_digest);
        topics.extend(self.custom.iter().cloned());

        let bind_address: Multiaddr = self
            .bind_address
            .parse()
            .map_err(|err| anyhow!("malformed bind address {}: {err}", self.bind_address))?;

        tracing::info!(
            %fork_digest,
            topics = topics.len(),
            overlay_bootnodes = set.eth2_bootnodes.len(),
            discovery_bootnodes = set.disc_bootnodes.len(),
            "joining overlay"
        );

        let network = NetworkBuilder::new(Config {
            bind_address,
            eth_port: self.eth_port,
            discovery_port: self.discovery_port,
            topics,
            decode: self.decode,
            sign: self.sign,
            full_peer_ids: self.full_peer_id,
            max_peers: self.max_peers,
            no_discovery: self.no_discovery,
            eth2_bootnodes: set.eth2_bootnodes,
            disc_bootnodes: set.disc_bootnodes,
            disc_endpoints: set.disc_endpoints,
            enr_pair: set.enr_pair,
            ..Default::default()
        })
        .build()?;

        let discovery = network.start()?;
        if let Some(handle) = &discovery {
            if let Some(enr) = handle.local_enr().await {
                tracing::info!(enr = %enr.to_base64(), "local discovery record");
            }
        }

        tokio::signal::ctrl_c().await?;
        tracing::info!("interrupt received, shutting down");
        // Long-running process: exit code 0 is reserved for "never happens",
        // so an interrupt terminates with the conventional SIGINT status.
        std::process::exit(130)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fork_digest() {
        assert_eq!(
            parse_fork_digest("0x01020304").unwrap(),
            ForkDigest::from([1, 2, 3, 4])
        );
        assert_eq!(
            parse_fork_digest("deadbeef").unwrap(),
            ForkDigest::from([0xde, 0xad, 0xbe, 0xef])
        );
        assert!(parse_fork_digest("0x0102").is_err());
        assert!(parse_fork_digest("zzzz").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cmd = InspectorCommand::parse_from(["periscope"]);
        assert_eq!(cmd.verbosity, "trace");
        assert!(cmd.floodsub);
        assert!(!cmd.gossipsub);
        assert!(!cmd.decode);
        assert_eq!(cmd.discovery_port, 9000);
        assert_eq!(cmd.eth_port, 9000);
        assert_eq!(cmd.bind_address, "/ip4/0.0.0.0");
        assert_eq!(cmd.max_peers, 100);
        assert!(!cmd.no_discovery);
    }

    #[test]
    fn test_cli_repeatable_flags() {
        let cmd = InspectorCommand::parse_from([
            "periscope", "-t", "a", "-t", "b", "-c", "x", "-b", "enr:-abc",
        ]);
        assert_eq!(cmd.topics, vec!["a", "b"]);
        assert_eq!(cmd.custom, vec!["x"]);
        assert_eq!(cmd.boot_nodes, vec!["enr:-abc"]);
    }
}
