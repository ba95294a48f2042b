//! Pure message composition for the channel: no I/O, deterministic for
//! identical inputs. The channel's own `NotModified` outcome relies on the
//! composer producing byte-identical text when nothing changed.

use crate::channel::media;
use crate::channel::transport::LinkButton;
use crate::constants::{CURRENCY, MESSAGE_TIME_FORMAT};
use crate::database::models::{LeaderInfo, Lot, Seller};
use crate::util::{escape_html, format_amount};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Render the full channel message for a lot.
///
/// Optional pieces (leader, seller link, location, image hint) are omitted
/// entirely when absent; the message never renders placeholder lines.
/// `now` is passed in so the active/closed line is reproducible.
pub fn compose_lot_message(
    lot: &Lot,
    seller: &Seller,
    leader: Option<&LeaderInfo>,
    bid_count: i64,
    now: DateTime<Utc>,
) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "🏷️ <b>{}</b>", escape_html(&lot.title));
    text.push('\n');
    text.push_str("📝 <b>Description:</b>\n");
    let _ = writeln!(text, "{}", escape_html(&lot.description));
    text.push('\n');

    let _ = writeln!(
        text,
        "💰 <b>Starting price:</b> {} {CURRENCY}",
        format_amount(lot.starting_price)
    );
    let _ = writeln!(
        text,
        "💰 <b>Current price:</b> {} {CURRENCY}",
        format_amount(lot.current_price)
    );
    let _ = writeln!(
        text,
        "📈 <b>Minimum increment:</b> {} {CURRENCY}",
        format_amount(lot.min_bid_increment)
    );
    text.push('\n');

    if let Some(leader) = leader {
        let _ = writeln!(
            text,
            "🥇 <b>Leader:</b> {} ({} {CURRENCY})",
            escape_html(&leader.display_name),
            format_amount(leader.amount)
        );
        text.push('\n');
    }

    let _ = writeln!(text, "👤 <b>Seller:</b> {}", escape_html(&seller.first_name));
    if let Some(link) = &lot.seller_link {
        let _ = writeln!(text, "🔗 <b>Seller link:</b> {}", escape_html(link));
    }
    if let Some(location) = &lot.location {
        let _ = writeln!(text, "📍 <b>Location:</b> {}", escape_html(location));
    }
    text.push('\n');

    let _ = writeln!(text, "📊 <b>Bids:</b> {bid_count}");
    let _ = writeln!(text, "⏰ <b>Starts:</b> {}", match lot.start_time {
        Some(start) => start.format(MESSAGE_TIME_FORMAT).to_string(),
        None => "Immediately".to_string(),
    });
    let _ = writeln!(text, "⏰ <b>Ends:</b> {}", match lot.end_time {
        Some(end) => end.format(MESSAGE_TIME_FORMAT).to_string(),
        None => "Open-ended".to_string(),
    });
    let image_count = media::listed_images(lot.images.as_deref()).len();
    if image_count > 0 {
        let _ = writeln!(text, "📸 <b>Images:</b> {image_count}");
    }
    text.push('\n');

    if lot.is_open(now) {
        text.push_str("🟢 <b>Status:</b> Active");
    } else {
        text.push_str("🔴 <b>Status:</b> Closed");
    }

    text
}

/// The single interactive control for channel messages: a deep link opening
/// the lot inside the bot. Returns `None` when no bot username is configured,
/// in which case the message goes out without a button.
pub fn channel_button(lot_id: i64, bot_username: Option<&str>) -> Option<LinkButton> {
    let username = bot_username?;
    Some(LinkButton {
        label: "🔗 Open lot".to_string(),
        url: format!("https://t.me/{username}?start=lot_{lot_id}"),
    })
}
