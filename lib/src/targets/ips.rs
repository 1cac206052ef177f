//! Provides helpers for managing IP target lists

use std::{collections::HashSet, net, str::FromStr};

use crate::error::{NetScopeError, Result};

#[derive(Debug)]
/// Represents a list of IP targets
///
/// Rather than storing all 65536 IPs in a /16 CIDR block, or a range of IPs,
/// this wrapper stores the CIDR or range in string form and loops the IPs in
/// that block when needed.
///
/// # Errors
///
/// Returns an error if an item in the list is not a valid IP, CIDR block, or
/// range
///
/// # Examples
///
/// ```
/// # use std::net;
/// # use netscope_lib::error::Result;
/// # use netscope_lib::targets::ips::IPTargets;
/// let print_ip = |ip: net::Ipv4Addr| -> Result<()> {
///   println!("ip: {}", ip);
///   Ok(())
/// };
/// let ips = IPTargets::new(
///     vec![
///       "192.168.0.1".to_string(),
///       "172.17.0.1-172.17.0.24".to_string(),
///       "192.168.68.1/24".to_string(),
///     ]
/// ).unwrap();
/// ips.lazy_loop(print_ip).unwrap();
/// ```
pub struct IPTargets(Vec<String>, usize);

fn parse_ip(target: &str, raw: &str) -> Result<net::Ipv4Addr> {
    net::Ipv4Addr::from_str(raw.trim())
        .map_err(|e| NetScopeError::from_net_addr_parse_error(target, e))
}

fn loop_ips<F: FnMut(net::Ipv4Addr) -> Result<()>>(
    list: &[String],
    mut cb: F,
) -> Result<()> {
    for target in list.iter() {
        let target = target.trim();

        if let Some((start, end)) = target.split_once('-') {
            let begin = parse_ip(target, start)?;
            let end = parse_ip(target, end)?;

            if begin > end {
                return Err(NetScopeError::Target {
                    target: target.to_string(),
                    error: "range start is after range end".into(),
                });
            }

            for ip in u32::from(begin)..=u32::from(end) {
                cb(net::Ipv4Addr::from(ip))?;
            }
        } else if target.contains('/') {
            let ip_net = ipnet::Ipv4Net::from_str(target).map_err(|e| {
                NetScopeError::from_ipnet_addr_parse_error(target, e)
            })?;

            for ip in ip_net.hosts() {
                cb(ip)?;
            }
        } else {
            cb(parse_ip(target, target)?)?;
        }
    }
    Ok(())
}

impl IPTargets {
    /// Returns a new instance of IPTargets using the provided list
    pub fn new(list: Vec<String>) -> Result<Self> {
        let mut len = 0;

        loop_ips(&list, |_| {
            len += 1;
            Ok(())
        })?;

        Ok(Self(list, len))
    }

    /// Returns the true length of the target list. If the underlying
    /// `Vec<String>` is just `["192.168.0.1/24"]`, then a call to "len" will
    /// return 254
    pub fn len(&self) -> usize {
        self.1
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.1 == 0
    }

    /// loops over all targets including those that are not explicitly in the
    /// list but fall within a range or CIDR block defined in the list
    pub fn lazy_loop<F: FnMut(net::Ipv4Addr) -> Result<()>>(
        &self,
        cb: F,
    ) -> Result<()> {
        loop_ips(&self.0, cb)
    }

    /// Collects every target into a set
    pub fn to_set(&self) -> Result<HashSet<net::Ipv4Addr>> {
        let mut set = HashSet::with_capacity(self.1);
        self.lazy_loop(|ip| {
            set.insert(ip);
            Ok(())
        })?;
        Ok(set)
    }
}

#[cfg(test)]
#[path = "./ips_tests.rs"]
mod tests;
