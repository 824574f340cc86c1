//! Interface state reader
//!
//! Parses the `ifconfig -a` dump into [`InterfaceRecord`]s. The grammar:
//!
//! - A block starts at every line that does not begin with whitespace; the
//!   indented lines that follow belong to it.
//! - The interface name is the leading run of non-whitespace, non-colon
//!   characters of the block's first line. Blocks without one are skipped.
//! - `UP` (whole token), `RUNNING`, the first `inet [addr:]a.b.c.d` and a
//!   case-insensitive `no carrier` are looked up anywhere in the block.
//!
//! Both the modern (`flags=4163<UP,BROADCAST,RUNNING>` / `inet 10.0.2.15`) and
//! legacy (`UP BROADCAST RUNNING` / `inet addr:10.0.2.15`) layouts parse.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::backends::NetToolsBackend;

/// The interface-state query produced no output at all. Fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUnavailable {
    pub query: &'static str,
    pub cause: Option<String>,
}

impl fmt::Display for DataUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface state unavailable: `{}` produced no output", self.query)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for DataUnavailable {}

/// Parsed state of one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip)]
    pub raw_text: String,
    pub has_carrier_up: bool,
    pub ipv4_address: Option<Ipv4Addr>,
    pub is_running: bool,
    pub no_carrier: bool,
}

/// Interface records in dump order, unique by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceTable {
    records: Vec<InterfaceRecord>,
}

impl InterfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A duplicate name replaces the earlier record in place.
    pub fn insert(&mut self, record: InterfaceRecord) {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => {
                log::debug!("Interface {} listed twice, keeping the later block", record.name);
                *existing = record;
            }
            None => self.records.push(record),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Compiled patterns for the interface dump
pub struct DumpParser {
    name: Regex,
    up_flag: Regex,
    ipv4: Regex,
}

impl DumpParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name: Regex::new(r"^([^\s:]+)").context("compiling interface name regex")?,
            up_flag: Regex::new(r"\bUP\b").context("compiling UP flag regex")?,
            ipv4: Regex::new(r"inet\s+(?:addr:)?(\d{1,3}(?:\.\d{1,3}){3})\b")
                .context("compiling IPv4 address regex")?,
        })
    }

    /// Parse a full dump into a table. Never fails; unnamed blocks are dropped.
    pub fn parse(&self, dump: &str) -> InterfaceTable {
        let mut table = InterfaceTable::new();
        for block in split_blocks(dump) {
            match self.parse_block(&block) {
                Some(record) => table.insert(record),
                None => log::debug!("Skipping interface block without a name: {:?}", block),
            }
        }
        table
    }

    /// Parse a single block; `None` if its header carries no name.
    pub fn parse_block(&self, block: &str) -> Option<InterfaceRecord> {
        let header = block.lines().next()?;
        let name = self.name.captures(header)?.get(1)?.as_str().to_string();

        let ipv4_address = self
            .ipv4
            .captures(block)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<Ipv4Addr>().ok());

        Some(InterfaceRecord {
            name,
            raw_text: block.to_string(),
            has_carrier_up: self.up_flag.is_match(block),
            ipv4_address,
            is_running: block.contains("RUNNING"),
            no_carrier: block.to_lowercase().contains("no carrier"),
        })
    }
}

/// Split a dump into per-interface blocks (header line + indented continuation)
fn split_blocks(dump: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();

    for line in dump.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            // Continuation lines before the first header have no owner
            if let Some(current) = blocks.last_mut() {
                current.push('\n');
                current.push_str(line);
            }
        } else {
            blocks.push(line.to_string());
        }
    }

    blocks
}

/// Query the backend for the interface dump and parse it
pub fn read_interfaces(backend: &dyn NetToolsBackend) -> Result<InterfaceTable> {
    let query = "ifconfig -a";
    let dump = match backend.interface_dump() {
        Ok(dump) => dump,
        Err(e) => {
            return Err(DataUnavailable {
                query,
                cause: Some(format!("{e:#}")),
            }
            .into());
        }
    };

    if dump.trim().is_empty() {
        return Err(DataUnavailable { query, cause: None }.into());
    }

    let table = DumpParser::new()?.parse(&dump);
    log::info!("Found {} interfaces", table.len());
    for record in table.iter() {
        log::trace!("{}:\n{}", record.name, record.raw_text);
    }

    Ok(table)
}
