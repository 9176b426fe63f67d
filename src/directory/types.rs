//! Federation Directory Types
//!
//! Node naming, per-member endpoint records and the directory itself.

use std::fmt;

use anyhow::{Result, anyhow, bail};

/// Name of a federation member (e.g. `MTL`). Compared case-sensitively,
/// exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(pub String);

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeName {
    fn from(name: &str) -> Self {
        NodeName(name.to_string())
    }
}

/// One federation member as configured: where clients reach it and where
/// its control-plane listener receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry {
    pub name: NodeName,
    pub host: String,
    pub client_port: u16,
    pub control_port: u16,
}

impl NodeEntry {
    /// Parses a `NAME=host:client_port:control_port` member declaration.
    pub fn parse(declaration: &str) -> Result<NodeEntry> {
        let (name, endpoints) = declaration
            .split_once('=')
            .ok_or_else(|| anyhow!("member declaration {:?} is missing '='", declaration))?;
        if name.is_empty() {
            bail!("member declaration {:?} has an empty name", declaration);
        }

        let parts: Vec<&str> = endpoints.split(':').collect();
        let [host, client_port, control_port] = parts.as_slice() else {
            bail!(
                "member declaration {:?} must be NAME=host:client_port:control_port",
                declaration
            );
        };
        if host.is_empty() {
            bail!("member declaration {:?} has an empty host", declaration);
        }

        let client_port: u16 = client_port
            .parse()
            .map_err(|_| anyhow!("bad client port in member declaration {:?}", declaration))?;
        let control_port: u16 = control_port
            .parse()
            .map_err(|_| anyhow!("bad control port in member declaration {:?}", declaration))?;

        Ok(NodeEntry {
            name: NodeName(name.to_string()),
            host: host.to_string(),
            client_port,
            control_port,
        })
    }

    /// `host:port` target of this member's control-plane listener.
    pub fn control_target(&self) -> String {
        format!("{}:{}", self.host, self.control_port)
    }
}

/// The full federation as this node knows it. Immutable once built; members
/// are kept sorted by name so every node agrees on ordinals.
#[derive(Debug, Clone)]
pub struct NodeDirectory {
    members: Vec<NodeEntry>,
    local_index: usize,
}

impl NodeDirectory {
    /// Builds the directory and pins down which member is this process.
    /// The local name must appear in the member list, and names must be
    /// unique.
    pub fn new(local: NodeName, mut members: Vec<NodeEntry>) -> Result<NodeDirectory> {
        if members.is_empty() {
            bail!("federation needs at least one member");
        }
        members.sort_by(|a, b| a.name.0.cmp(&b.name.0));
        for pair in members.windows(2) {
            if pair[0].name == pair[1].name {
                bail!("duplicate federation member {}", pair[0].name);
            }
        }
        let local_index = members
            .iter()
            .position(|member| member.name == local)
            .ok_or_else(|| anyhow!("local node {} is not in the member list", local))?;

        Ok(NodeDirectory { members, local_index })
    }

    pub fn local_name(&self) -> &NodeName {
        &self.members[self.local_index].name
    }

    pub fn local_entry(&self) -> &NodeEntry {
        &self.members[self.local_index]
    }

    /// This node's position in the name-sorted member list. Seeds the
    /// identifier allocator.
    pub fn ordinal(&self) -> u32 {
        self.local_index as u32
    }

    /// Number of federation members, local node included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &NodeName) -> Option<&NodeEntry> {
        self.members.iter().find(|member| &member.name == name)
    }

    /// All members in name order.
    pub fn members(&self) -> &[NodeEntry] {
        &self.members
    }

    /// All members except this node, in name order.
    pub fn peers(&self) -> impl Iterator<Item = &NodeEntry> {
        let local = self.local_index;
        self.members
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != local)
            .map(|(_, member)| member)
    }
}
