//! Unused interface classification
//!
//! An interface outside the exclusion set is selected when any one of three
//! signals says it is unused: no IPv4 address, no `UP` flag, or an explicit
//! "no carrier". One signal is enough.

use serde::Serialize;
use std::fmt;

use crate::exclusion::ExclusionSet;
use crate::interfaces::{InterfaceRecord, InterfaceTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableReason {
    NoIpv4Address,
    NotUp,
    NoCarrier,
}

impl fmt::Display for DisableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisableReason::NoIpv4Address => write!(f, "no IPv4 address"),
            DisableReason::NotUp => write!(f, "not UP"),
            DisableReason::NoCarrier => write!(f, "no carrier"),
        }
    }
}

/// An interface selected for deactivation and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub reasons: Vec<DisableReason>,
}

/// Every unused-ness signal the record shows (empty = in use)
pub fn disable_reasons(record: &InterfaceRecord) -> Vec<DisableReason> {
    let mut reasons = Vec::new();
    if record.ipv4_address.is_none() {
        reasons.push(DisableReason::NoIpv4Address);
    }
    if !record.has_carrier_up {
        reasons.push(DisableReason::NotUp);
    }
    if record.no_carrier {
        reasons.push(DisableReason::NoCarrier);
    }
    reasons
}

/// Select interfaces to bring down, in table order
pub fn classify(table: &InterfaceTable, exclusions: &ExclusionSet) -> Vec<Candidate> {
    table
        .iter()
        .filter(|record| {
            let excluded = exclusions.contains(&record.name);
            if excluded {
                log::debug!("{} is excluded", record.name);
            }
            !excluded
        })
        .filter_map(|record| {
            let reasons = disable_reasons(record);
            if reasons.is_empty() {
                log::debug!("{} is in use", record.name);
                return None;
            }
            log::debug!("{} selected: {:?}", record.name, reasons);
            Some(Candidate {
                name: record.name.clone(),
                reasons,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::LOOPBACK;
    use std::net::Ipv4Addr;

    fn record(name: &str, addr: Option<[u8; 4]>, up: bool, no_carrier: bool) -> InterfaceRecord {
        InterfaceRecord {
            name: name.to_string(),
            raw_text: String::new(),
            has_carrier_up: up,
            ipv4_address: addr.map(Ipv4Addr::from),
            is_running: up && !no_carrier,
            no_carrier,
        }
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_missing_address_alone_selects() {
        let r = record("eth1", None, true, false);
        assert_eq!(disable_reasons(&r), vec![DisableReason::NoIpv4Address]);
    }

    #[test]
    fn test_no_carrier_alone_selects() {
        let r = record("eth1", Some([10, 0, 0, 5]), true, true);
        assert_eq!(disable_reasons(&r), vec![DisableReason::NoCarrier]);
    }

    #[test]
    fn test_not_up_alone_selects() {
        let r = record("eth1", Some([10, 0, 0, 5]), false, false);
        assert_eq!(disable_reasons(&r), vec![DisableReason::NotUp]);
    }

    #[test]
    fn test_in_use_is_not_selected() {
        let r = record("eth1", Some([10, 0, 0, 5]), true, false);
        assert!(disable_reasons(&r).is_empty());
    }

    #[test]
    fn test_excluded_never_selected() {
        let mut table = InterfaceTable::new();
        table.insert(record("lo", None, false, true));
        table.insert(record("wg0", None, false, true));
        table.insert(record("eth9", None, false, true));

        let exclusions = ExclusionSet::build(LOOPBACK, "wg0", None);
        let selected = classify(&table, &exclusions);
        assert_eq!(names(&selected), vec!["eth9"]);
        assert_eq!(
            selected[0].reasons,
            vec![
                DisableReason::NoIpv4Address,
                DisableReason::NotUp,
                DisableReason::NoCarrier
            ]
        );
    }

    #[test]
    fn test_preserves_table_order() {
        let mut table = InterfaceTable::new();
        table.insert(record("zz0", None, true, false));
        table.insert(record("eth0", Some([10, 0, 0, 1]), true, false));
        table.insert(record("aa0", None, true, false));

        let selected = classify(&table, &ExclusionSet::build(LOOPBACK, "", None));
        assert_eq!(names(&selected), vec!["zz0", "aa0"]);
    }

    #[test]
    fn test_empty_result() {
        let mut table = InterfaceTable::new();
        table.insert(record("lo", Some([127, 0, 0, 1]), true, false));
        assert!(classify(&table, &ExclusionSet::build(LOOPBACK, "", None)).is_empty());
    }
}
