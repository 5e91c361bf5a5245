use std::sync::Arc;

use anyhow::{bail, Result};
use orcfile::memory::MemoryGovernor;

/// Register one writer per requested size and print each one's share
pub fn run(pool: u64, sizes: Vec<u64>, release: Vec<usize>) -> Result<()> {
    let governor = Arc::new(MemoryGovernor::new(pool)?);

    for &index in &release {
        if index >= sizes.len() {
            bail!("--release {} is out of range for {} writers", index, sizes.len());
        }
    }

    let mut leases: Vec<_> = sizes.iter().map(|&size| Some(governor.lease(size))).collect();
    for &index in &release {
        leases[index] = None;
    }

    println!("Budget: {} bytes, scale {:.4}", governor.budget(), governor.allocation_scale());
    println!("{:<8} {:>16} {:>16} {:>16}", "writer", "requested", "at register", "now");
    for (index, (size, lease)) in sizes.iter().zip(&leases).enumerate() {
        match lease {
            Some(lease) => println!(
                "{:<8} {:>16} {:>16} {:>16}",
                index,
                size,
                lease.initial_stripe_size(),
                lease.effective_stripe_size()
            ),
            None => println!("{:<8} {:>16} {:>16} {:>16}", index, size, "-", "closed"),
        }
    }

    let granted: u64 = leases.iter().flatten().map(|l| l.effective_stripe_size()).sum();
    println!("Granted: {} of {} bytes", granted, governor.budget());
    Ok(())
}
