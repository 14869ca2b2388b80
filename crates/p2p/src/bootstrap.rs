//! Bootstrap-address ingestion.
//!
//! Bootstrap entries arrive as free text, from an optional newline-delimited
//! file and from the command line. Each candidate is either an `enr:` URI
//! (a signed discovery record) or a composite multiaddress; anything that
//! parses to neither shape is warned about and dropped, never fatal here.

use crate::peers::{EnrFieldPair, Eth2Enr, PeerInfo};
use discv5::Enr;
use libp2p::{Multiaddr, multiaddr::Protocol};
use periscope_types::ForkDigest;
use std::{path::Path, str::FromStr};

/// A successfully parsed bootstrap entry.
///
/// Every instance originates from a parse that succeeded; malformed input
/// never constructs one.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::From)]
pub enum BootstrapAddress {
    /// A signed, self-describing discovery record.
    #[display("{_0:?}")]
    Record(Enr),
    /// A layered transport address embedding an overlay identity.
    #[display("{_0}")]
    Multi(Multiaddr),
}

/// An error classifying one bootstrap candidate.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapParseError {
    /// The `enr:` URI did not decode to a valid signed record.
    #[error("invalid discovery record: {0}")]
    InvalidRecord(String),
    /// The candidate is not a parseable multiaddress.
    #[error("invalid multiaddress: {0}")]
    InvalidMultiaddr(#[from] libp2p::multiaddr::Error),
    /// The multiaddress matches neither accepted shape.
    #[error("multiaddress is neither a tcp overlay peer nor a udp discovery endpoint: {0}")]
    UnsupportedShape(Multiaddr),
}

fn has_protocol(addr: &Multiaddr, pred: fn(&Protocol<'_>) -> bool) -> bool {
    addr.iter().any(|p| pred(&p))
}

/// `tcp ∧ p2p`: a directly dialable overlay peer address.
pub(crate) fn is_overlay_addr(addr: &Multiaddr) -> bool {
    has_protocol(addr, |p| matches!(p, Protocol::Tcp(_)))
        && has_protocol(addr, |p| matches!(p, Protocol::P2p(_)))
}

/// `udp ∧ p2p`: a discovery endpoint address.
pub(crate) fn is_discovery_addr(addr: &Multiaddr) -> bool {
    has_protocol(addr, |p| matches!(p, Protocol::Udp(_)))
        && has_protocol(addr, |p| matches!(p, Protocol::P2p(_)))
}

impl FromStr for BootstrapAddress {
    type Err = BootstrapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("enr:") {
            let enr = Enr::from_str(s)
                .map_err(|err| BootstrapParseError::InvalidRecord(err.to_string()))?;
            return Ok(Self::Record(enr));
        }
        let addr = Multiaddr::from_str(s)?;
        if is_overlay_addr(&addr) || is_discovery_addr(&addr) {
            Ok(Self::Multi(addr))
        } else {
            Err(BootstrapParseError::UnsupportedShape(addr))
        }
    }
}

/// Extracts the inner token of a YAML list item of the shape `- "entry"`.
///
/// Anything else comes back trimmed but otherwise untouched.
pub fn unpack_yaml_item(line: &str) -> &str {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix('-') {
        if let Some(inner) =
            rest.trim_start().strip_prefix('"').and_then(|r| r.strip_suffix('"'))
        {
            if !inner.contains('"') {
                return inner;
            }
        }
    }
    trimmed
}

impl BootstrapAddress {
    /// Loads the bootstrap list: the optional file first, then the
    /// command-line entries, in order.
    ///
    /// Unparseable lines are warned about and skipped. An unreadable file is
    /// an error for the caller to classify.
    pub fn load(file: Option<&Path>, entries: &[String]) -> std::io::Result<Vec<Self>> {
        let mut out = Vec::new();
        if let Some(path) = file {
            let text = std::fs::read_to_string(path)?;
            for line in text.lines() {
                Self::push_parsed(unpack_yaml_item(line), &mut out);
            }
        }
        for entry in entries {
            Self::push_parsed(entry.trim(), &mut out);
        }
        Ok(out)
    }

    fn push_parsed(candidate: &str, out: &mut Vec<Self>) {
        if candidate.is_empty() {
            return;
        }
        match candidate.parse::<Self>() {
            Ok(addr) => out.push(addr),
            Err(err) => {
                warn!(target: "p2p::bootstrap", candidate, %err, "skipping bootstrap entry");
            }
        }
    }
}

/// The usable product of a bootstrap list: dialable overlay peers, discovery
/// seeds, and the application fields stitched from the records.
#[derive(Debug, Default)]
pub struct BootstrapSet {
    /// Overlay peers with a dialable TCP address.
    pub eth2_bootnodes: Vec<PeerInfo>,
    /// Signed records seeding the discovery table.
    pub disc_bootnodes: Vec<Enr>,
    /// Discovery endpoints known only by address.
    pub disc_endpoints: Vec<Multiaddr>,
    /// Fork digest of the overlay; first record wins, the operator overrides.
    pub fork_digest: Option<ForkDigest>,
    /// `eth2`/`attnets` pair for the local record; first complete pair wins.
    pub enr_pair: Option<EnrFieldPair>,
}

impl BootstrapSet {
    /// Partitions parsed bootstrap addresses into the two joining paths and
    /// stitches the fork digest and ENR field pair.
    pub fn from_addresses(
        addresses: &[BootstrapAddress],
        operator_digest: Option<ForkDigest>,
    ) -> Self {
        let mut set = Self::default();
        for address in addresses {
            match address {
                BootstrapAddress::Record(enr) => set.absorb_record(enr),
                BootstrapAddress::Multi(addr) => set.absorb_multiaddr(addr),
            }
        }
        if let Some(digest) = operator_digest {
            if set.fork_digest.is_some_and(|seen| seen != digest) {
                warn!(
                    target: "p2p::bootstrap",
                    bootstrap = %set.fork_digest.unwrap_or_default(),
                    operator = %digest,
                    "operator fork digest overrides the bootstrap records"
                );
            }
            set.fork_digest = Some(digest);
        }
        set
    }

    fn absorb_record(&mut self, enr: &Enr) {
        if let Some(digest) = enr.fork_digest() {
            match self.fork_digest {
                None => self.fork_digest = Some(digest),
                Some(seen) if seen != digest => {
                    warn!(
                        target: "p2p::bootstrap",
                        seen = %seen,
                        digest = %digest,
                        "bootstrap record disagrees on fork digest, keeping first"
                    );
                }
                Some(_) => {}
            }
        }
        if let Some(pair) = enr.enr_field_pair() {
            match &self.enr_pair {
                None => self.enr_pair = Some(pair),
                Some(seen) if *seen != pair => {
                    warn!(
                        target: "p2p::bootstrap",
                        "bootstrap record disagrees on eth2 field, keeping first"
                    );
                }
                Some(_) => {}
            }
        }

        match PeerInfo::from_enr(enr) {
            Ok(info) => {
                if info.has_tcp() {
                    self.eth2_bootnodes.push(info);
                }
            }
            Err(err) => {
                debug!(target: "p2p::bootstrap", %err, "record yields no dialable peer");
            }
        }
        if enr.udp4().is_some() || enr.udp6().is_some() {
            self.disc_bootnodes.push(enr.clone());
        }
    }

    fn absorb_multiaddr(&mut self, addr: &Multiaddr) {
        if is_overlay_addr(addr) {
            match PeerInfo::from_multiaddr(addr) {
                Ok(info) => self.eth2_bootnodes.push(info),
                Err(err) => {
                    warn!(target: "p2p::bootstrap", %addr, %err, "skipping overlay bootstrap");
                }
            }
        } else {
            // The parser admits only the two shapes; everything else here is
            // a discovery endpoint.
            self.disc_endpoints.push(addr.clone());
        }
    }
}
