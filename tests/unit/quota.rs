//! Quota gate scenarios, including the ResourceQuota adaptation path

use db_console::platform::quota::adapt_resource_quota;
use db_console::reconcile::quota::{QuotaItem, QuotaKind};
use db_console::reconcile::check_quota;

use crate::fixtures::resource;

#[test]
fn test_gate_from_adapted_resource_quota() {
    let doc = serde_json::json!({
        "status": {
            "hard": { "limits.cpu": "4", "limits.memory": "8Gi", "requests.storage": "50Gi" },
            "used": { "limits.cpu": "3", "limits.memory": "2Gi", "requests.storage": "10Gi" }
        }
    });
    let quota = adapt_resource_quota(&doc).unwrap();

    // Two more cores bust the 4-core limit.
    let desired = [resource("mysql", 2000, 1024, 1, 1)];
    assert_eq!(check_quota(&desired, None, &quota), Some(QuotaKind::Cpu));

    // Half a core fits.
    let desired = [resource("mysql", 500, 1024, 1, 1)];
    assert_eq!(check_quota(&desired, None, &quota), None);
}

#[test]
fn test_edit_discounts_previous_usage() {
    let quota = [QuotaItem {
        kind: QuotaKind::Storage,
        used: 45.0,
        limit: 50.0,
    }];

    let previous = [resource("mysql", 1000, 1024, 1, 20)];

    // Growing storage from 20Gi to 24Gi projects +4Gi: fits.
    let desired = [resource("mysql", 1000, 1024, 1, 24)];
    assert_eq!(check_quota(&desired, Some(&previous), &quota), None);

    // Growing to 26Gi projects +6Gi: exceeds the remaining 5Gi.
    let desired = [resource("mysql", 1000, 1024, 1, 26)];
    assert_eq!(
        check_quota(&desired, Some(&previous), &quota),
        Some(QuotaKind::Storage)
    );
}

#[test]
fn test_empty_quota_never_blocks() {
    let desired = [resource("mysql", 64000, 1 << 20, 20, 300)];
    assert_eq!(check_quota(&desired, None, &[]), None);
}
