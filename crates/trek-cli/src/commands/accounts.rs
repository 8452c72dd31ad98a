//! Demo accounts listing

use anyhow::Result;

use trek_core::demo::demo_accounts;

pub fn cmd_accounts() -> Result<()> {
    let accounts = demo_accounts();

    println!("👤 Demo accounts ({})", accounts.len());
    println!();
    for account in accounts {
        println!("   {} {} ({})", account.avatar, account.name, account.account_id);
        println!("      {}", account.description);
    }
    println!();
    println!("Pick one with e.g. `trek stats --account acc-1`");

    Ok(())
}
