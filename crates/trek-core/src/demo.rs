//! Demo fixtures
//!
//! Sample accounts and simulated providers for the demo dashboard. The
//! upstream sandbox only carries data for these account ids.

use crate::models::{DemoAccount, TransportProvider};

/// The selectable demo accounts
pub fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            id: "1".to_string(),
            account_id: "acc-1".to_string(),
            name: "Sarah Mitchell".to_string(),
            description: "Daily rail commuter with occasional bus hops".to_string(),
            avatar: "🚆".to_string(),
        },
        DemoAccount {
            id: "2".to_string(),
            account_id: "acc-2".to_string(),
            name: "James Okafor".to_string(),
            description: "City cyclist who keeps a taxi fallback".to_string(),
            avatar: "🚲".to_string(),
        },
        DemoAccount {
            id: "3".to_string(),
            account_id: "acc-3".to_string(),
            name: "Priya Desai".to_string(),
            description: "Mixed-mode traveller across tube, tram and bus".to_string(),
            avatar: "🚇".to_string(),
        },
    ]
}

/// The connectable demo providers
pub fn demo_providers() -> Vec<TransportProvider> {
    vec![
        TransportProvider {
            id: "national-rail".to_string(),
            name: "National Rail".to_string(),
            description: "Train journeys and season tickets".to_string(),
            connected: false,
        },
        TransportProvider {
            id: "city-buses".to_string(),
            name: "City Buses".to_string(),
            description: "Bus journeys and tap-on fares".to_string(),
            connected: false,
        },
        TransportProvider {
            id: "metro".to_string(),
            name: "Metro".to_string(),
            description: "Tube and tram travel".to_string(),
            connected: false,
        },
    ]
}

/// Look up a demo account by its upstream account id
pub fn find_account(account_id: &str) -> Option<DemoAccount> {
    demo_accounts()
        .into_iter()
        .find(|a| a.account_id == account_id)
}
