//! Fuzz target: snapshot indexing and dashboard building
//!
//! Feeds arbitrary bytes as a JSON array of host state records through
//! the indexer and the dashboard builder, verifying:
//! - No panics on any record shape the deserializer accepts
//! - Every zone in the dashboard is a domain switch
//! - `will_water` always agrees with the reported zone count
//!
//! cargo fuzz run fuzz_snapshot

#![no_main]

use irrigation_panel::config::PanelConfig;
use irrigation_panel::indexer::{DomainFilter, index_snapshot};
use irrigation_panel::state::{FullStatus, StateRecord, StateSnapshot};
use irrigation_panel::view_model::build_dashboard;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<Vec<StateRecord>>(data) else {
        return;
    };
    let snapshot: StateSnapshot = records.into_iter().collect();
    let filter = DomainFilter::from_config(&PanelConfig::default());
    let indexed = index_snapshot(&snapshot, &filter);

    let full = FullStatus {
        is_running: Some(data.len() % 2 == 0),
        ..FullStatus::default()
    };
    for status in [None, Some(&full)] {
        let dash = build_dashboard(&indexed, status);

        assert_eq!(dash.ai.will_water, dash.ai.zones_needing_water > 0);
        assert_eq!(dash.factors.len(), 4);
        for zone in &dash.zones {
            assert!(zone.id.starts_with("switch."), "non-switch zone {}", zone.id);
        }
    }
});
