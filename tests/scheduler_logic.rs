//! The price-significance gate used to decide whether a bid warrants an
//! immediate channel edit ahead of the regular sync cadence.

use auctioneer_bot::services::scheduler::should_update_channel;

#[test]
fn ten_percent_rise_triggers_an_update() {
    assert!(should_update_channel(1000.0, 1100.0));
    assert!(should_update_channel(10000.0, 11000.0));
}

#[test]
fn small_rises_are_ignored() {
    assert!(!should_update_channel(1000.0, 1050.0)); // 5%, 50 units
    assert!(!should_update_channel(10000.0, 10900.0)); // 9%, 900 units
}

#[test]
fn large_absolute_rise_triggers_even_below_ten_percent() {
    assert!(should_update_channel(100000.0, 101500.0)); // 1.5%, 1500 units
    assert!(should_update_channel(1000.0, 2001.0));
}

#[test]
fn price_drops_never_trigger() {
    assert!(!should_update_channel(2000.0, 1000.0));
    assert!(!should_update_channel(2000.0, 500.0));
}

#[test]
fn zero_base_price_relies_on_the_absolute_threshold() {
    assert!(!should_update_channel(0.0, 999.0));
    assert!(should_update_channel(0.0, 1000.0));
}
