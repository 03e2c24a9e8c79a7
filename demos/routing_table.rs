//! Build a small routing table from CIDR strings and resolve a few addresses against it.
//!
//! Run with `cargo run --example routing_table --features tracing` to see the structural changes
//! of the trie as they happen.

use std::net::Ipv4Addr;

use prefix_mgmt::*;

const ROUTES: &[&str] = &[
    "0.0.0.0/0",
    "10.0.0.0/8",
    "10.20.0.0/16",
    "10.20.30.0/24",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "192.168.1.0/24",
    "192.168.1.128/25",
    "203.0.113.7/32",
];

const QUERIES: &[&str] = &[
    "10.20.30.40",
    "10.20.99.1",
    "10.99.0.1",
    "172.31.255.255",
    "192.168.1.200",
    "192.168.1.100",
    "203.0.113.7",
    "203.0.113.8",
    "8.8.8.8",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut table = PrefixMgmt::new();
    table.init()?;

    for route in ROUTES {
        let prefix: Ipv4Prefix = route.parse()?;
        table.add(prefix.base(), prefix.prefix_len() as i8)?;
    }
    // rejected before touching the table.
    for (base, mask) in [(0x0a000001, 8), (0x0a000000, 33), (0x0a000000, -1)] {
        if let Err(e) = table.add(base, mask) {
            println!("add {}/{mask}: {e}", Ipv4Addr::from(base));
        }
    }

    resolve(&table)?;

    let withdrawn: Ipv4Prefix = "10.20.0.0/16".parse()?;
    table.del(withdrawn.base(), withdrawn.prefix_len() as i8)?;
    println!("\nafter withdrawing {withdrawn}:");
    resolve(&table)?;

    if let Some(trie) = table.trie() {
        println!("\n{trie:#?}");
    }

    table.cleanup();
    Ok(())
}

fn resolve(table: &PrefixMgmt) -> Result<(), Box<dyn std::error::Error>> {
    for query in QUERIES {
        let ip: u32 = query.parse::<Ipv4Addr>()?.into();
        match table.check(ip) {
            Some(len) => println!("{query:>15} -> /{len}"),
            None => println!("{query:>15} -> no route"),
        }
    }
    Ok(())
}
