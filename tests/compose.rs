//! Message composer: layout, graceful omission of absent fields, escaping.

use auctioneer_bot::channel::compose::{channel_button, compose_lot_message};
use auctioneer_bot::database::models::{LeaderInfo, Lot, LotStatus, Seller};
use auctioneer_bot::util::{escape_html, format_amount, mask_username};
use chrono::{TimeZone, Utc};

fn fixture_lot() -> Lot {
    Lot {
        lot_id: 7,
        title: "Antique samovar".to_string(),
        description: "Brass, early 20th century".to_string(),
        starting_price: 1000.0,
        current_price: 12345.5,
        min_bid_increment: 250.0,
        seller_id: 1,
        status: LotStatus::Active,
        location: None,
        seller_link: None,
        images: None,
        start_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        end_time: Some(Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap()),
        channel_message_id: None,
    }
}

fn fixture_seller() -> Seller {
    Seller {
        user_id: 1,
        username: Some("antiques_ru".to_string()),
        first_name: "Olga".to_string(),
    }
}

#[test]
fn renders_core_fields() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let leader = LeaderInfo {
        display_name: "@cha**".to_string(),
        amount: 12345.5,
    };
    let text = compose_lot_message(&fixture_lot(), &fixture_seller(), Some(&leader), 4, now);

    assert!(text.contains("<b>Antique samovar</b>"));
    assert!(text.contains("Brass, early 20th century"));
    assert!(text.contains("<b>Starting price:</b> 1,000.00 ₽"));
    assert!(text.contains("<b>Current price:</b> 12,345.50 ₽"));
    assert!(text.contains("<b>Minimum increment:</b> 250.00 ₽"));
    assert!(text.contains("<b>Leader:</b> @cha** (12,345.50 ₽)"));
    assert!(text.contains("<b>Seller:</b> Olga"));
    assert!(text.contains("<b>Bids:</b> 4"));
    assert!(text.contains("<b>Starts:</b> 01.05.2024 12:00"));
    assert!(text.contains("<b>Ends:</b> 08.05.2024 12:00"));
    assert!(text.contains("🟢 <b>Status:</b> Active"));
}

#[test]
fn omits_absent_optional_lines() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let text = compose_lot_message(&fixture_lot(), &fixture_seller(), None, 0, now);

    assert!(!text.contains("Leader:"), "no placeholder leader line");
    assert!(!text.contains("Seller link:"));
    assert!(!text.contains("Location:"));
    assert!(!text.contains("Images:"));
}

#[test]
fn renders_optional_lines_when_present() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let mut lot = fixture_lot();
    lot.location = Some("Moscow".to_string());
    lot.seller_link = Some("https://example.com/olga".to_string());
    lot.images = Some(r#"["/data/img/a.jpg","/data/img/b.jpg"]"#.to_string());
    let text = compose_lot_message(&lot, &fixture_seller(), None, 0, now);

    assert!(text.contains("<b>Location:</b> Moscow"));
    assert!(text.contains("<b>Seller link:</b> https://example.com/olga"));
    assert!(text.contains("<b>Images:</b> 2"));
}

#[test]
fn closed_status_after_end_time() {
    let after_end = Utc.with_ymd_and_hms(2024, 5, 9, 12, 0, 0).unwrap();
    let text = compose_lot_message(&fixture_lot(), &fixture_seller(), None, 0, after_end);
    assert!(text.contains("🔴 <b>Status:</b> Closed"));
}

#[test]
fn identical_inputs_compose_identical_text() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let a = compose_lot_message(&fixture_lot(), &fixture_seller(), None, 2, now);
    let b = compose_lot_message(&fixture_lot(), &fixture_seller(), None, 2, now);
    assert_eq!(a, b);
}

#[test]
fn user_supplied_markup_is_escaped() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let mut lot = fixture_lot();
    lot.title = "<script>alert(1)</script> & co".to_string();
    let text = compose_lot_message(&lot, &fixture_seller(), None, 0, now);
    assert!(text.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"));
    assert!(!text.contains("<script>"));
}

#[test]
fn deep_link_button_needs_a_bot_username() {
    let button = channel_button(7, Some("auction_bot")).expect("button expected");
    assert_eq!(button.url, "https://t.me/auction_bot?start=lot_7");
    assert_eq!(button.label, "🔗 Open lot");
    assert!(channel_button(7, None).is_none());
}

#[test]
fn amount_formatting_groups_thousands() {
    assert_eq!(format_amount(0.0), "0.00");
    assert_eq!(format_amount(999.0), "999.00");
    assert_eq!(format_amount(1000.0), "1,000.00");
    assert_eq!(format_amount(1234567.891), "1,234,567.89");
    assert_eq!(format_amount(999.999), "1,000.00");
}

#[test]
fn username_masking_keeps_three_characters() {
    assert_eq!(mask_username("champion"), "@cha**");
    assert_eq!(mask_username("ab"), "@ab**");
}

#[test]
fn html_escaping_touches_only_markup_characters() {
    assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    assert_eq!(escape_html("plain"), "plain");
}
